use serde::Serialize;

use crate::extractors::payload::Payload;

/// The fields of a processor notification worth logging at a glance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOverview {
    pub reference_code: Option<String>,
    pub transaction_id: Option<String>,
    /// `transactionState`, or `lapTransactionState` when absent.
    pub transaction_state: Option<String>,
    pub lap_response_code: Option<String>,
    /// `message`, or `responseMessage` when absent.
    pub message: Option<String>,
    pub signature: Option<String>,
}

impl NotificationOverview {
    /// Projects the overview out of a decoded payload.
    pub fn from_payload(payload: &Payload) -> Self {
        let pick = |key: &str| {
            payload
                .get(key)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Self {
            reference_code: pick("referenceCode"),
            transaction_id: pick("transactionId"),
            transaction_state: pick("transactionState").or_else(|| pick("lapTransactionState")),
            lap_response_code: pick("lapResponseCode"),
            message: pick("message").or_else(|| pick("responseMessage")),
            signature: pick("signature"),
        }
    }
}

/// The browser return leg as received: query string and body kept apart.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReturnPayload {
    pub query: Payload,
    pub body: Payload,
}

impl ReturnPayload {
    /// Body fields overlaid by query fields.
    pub fn merged(&self) -> Payload {
        self.body.merged_with(&self.query)
    }
}
