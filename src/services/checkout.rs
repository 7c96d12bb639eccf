use crate::{
    error::Result,
    extractors::payload::Payload,
    models::session::PaymentFields,
    state::AppState,
    validation::checkout::{format_amount, non_empty, reject_delimiter, require_amount_and_reference},
};

/// Currency used when the request names none.
pub const DEFAULT_CURRENCY: &str = "COP";
/// Buyer email used when the request names none.
pub const DEFAULT_BUYER_EMAIL: &str = "buyer@test.com";

/// A payment intent as submitted by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub amount: Option<String>,
    pub currency: Option<String>,
    pub reference: Option<String>,
    pub description: Option<String>,
    pub buyer_email: Option<String>,
}

impl CheckoutRequest {
    /// Projects a checkout request out of a decoded payload. Falsy `amount`
    /// and `reference` values are treated as absent.
    pub fn from_payload(payload: &Payload) -> Self {
        let field = |key: &str| payload.get(key).map(str::to_string);
        let required = |key: &str| payload.get_truthy(key).map(str::to_string);
        Self {
            amount: required("amount"),
            currency: field("currency"),
            reference: required("reference"),
            description: field("description"),
            buyer_email: field("buyerEmail"),
        }
    }
}

/// A started checkout.
#[derive(Debug, Clone)]
pub struct StartedCheckout {
    pub token: String,
    pub pay_url: String,
    pub fields: PaymentFields,
}

/// Validates and signs a payment intent.
///
/// # Returns
///
/// The field set to post to the processor.
pub fn build_fields(state: &AppState, request: &CheckoutRequest) -> Result<PaymentFields> {
    let (amount, reference) =
        require_amount_and_reference(request.amount.as_deref(), request.reference.as_deref())?;

    let amount = format_amount(amount)?;
    let currency = non_empty(request.currency.as_deref()).unwrap_or(DEFAULT_CURRENCY);
    reject_delimiter("reference", reference)?;
    reject_delimiter("currency", currency)?;
    let signature = state.signer.sign(reference, &amount, currency);
    let config = &state.config;

    Ok(PaymentFields {
        merchant_id: config.merchant_id.clone(),
        account_id: config.account_id.clone(),
        description: request
            .description
            .clone()
            .unwrap_or_else(|| format!("Purchase {}", reference)),
        reference_code: reference.to_string(),
        amount,
        currency: currency.to_string(),
        buyer_email: request
            .buyer_email
            .clone()
            .unwrap_or_else(|| DEFAULT_BUYER_EMAIL.to_string()),
        signature,
        response_url: config.response_url(),
        confirmation_url: config.confirmation_url(),
        test: if config.test_mode { "1" } else { "0" }.to_string(),
    })
}

/// Builds the signed fields, stores them under a new token and returns the
/// link that renders the redirect form.
pub async fn start_checkout(state: &AppState, request: &CheckoutRequest) -> Result<StartedCheckout> {
    let fields = build_fields(state, request)?;
    let token = state.sessions.create(fields.clone()).await;
    let pay_url = state.config.pay_url(&token);

    Ok(StartedCheckout {
        token,
        pay_url,
        fields,
    })
}
