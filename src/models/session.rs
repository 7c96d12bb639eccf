use chrono::{DateTime, Utc};
use serde::Serialize;

/// The signed form fields posted to the processor.
///
/// Built once by the checkout service and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFields {
    pub merchant_id: String,
    pub account_id: String,
    pub description: String,
    pub reference_code: String,
    /// Always two decimals, identical to the signed amount.
    pub amount: String,
    pub currency: String,
    pub buyer_email: String,
    pub signature: String,
    pub response_url: String,
    pub confirmation_url: String,
    /// `"1"` for test transactions, `"0"` otherwise.
    pub test: String,
}

impl PaymentFields {
    /// Returns the fields as `(form name, value)` pairs in transmission order.
    pub fn pairs(&self) -> [(&'static str, &str); 11] {
        [
            ("merchantId", self.merchant_id.as_str()),
            ("accountId", self.account_id.as_str()),
            ("description", self.description.as_str()),
            ("referenceCode", self.reference_code.as_str()),
            ("amount", self.amount.as_str()),
            ("currency", self.currency.as_str()),
            ("buyerEmail", self.buyer_email.as_str()),
            ("signature", self.signature.as_str()),
            ("responseUrl", self.response_url.as_str()),
            ("confirmationUrl", self.confirmation_url.as_str()),
            ("test", self.test.as_str()),
        ]
    }
}

/// An ephemeral checkout session.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    /// The fields rendered into the redirect form.
    pub fields: PaymentFields,
    /// The timestamp when the session expires.
    pub expires_at: DateTime<Utc>,
}

impl CheckoutSession {
    /// Whether the session is expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
