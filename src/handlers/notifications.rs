//! Processor callbacks: the buyer's browser return and the server-to-server
//! confirmation.

use axum::{
    body::Bytes,
    http::{HeaderMap, StatusCode, Uri},
    response::Html,
};

use crate::{
    error::{AppError, Result},
    extractors::{client::ClientInfo, payload::Payload},
    models::notification::{NotificationOverview, ReturnPayload},
    views,
};

fn log_notification<T: std::fmt::Debug>(
    tag: &str,
    client: &ClientInfo,
    overview: &NotificationOverview,
    field_count: usize,
    raw: &T,
) {
    tracing::info!(
        client = %client,
        reference_code = ?overview.reference_code,
        transaction_id = ?overview.transaction_id,
        transaction_state = ?overview.transaction_state,
        lap_response_code = ?overview.lap_response_code,
        message = ?overview.message,
        signature = ?overview.signature,
        "📨 [{}] overview",
        tag
    );
    tracing::info!("📦 [{}] full payload ({} fields): {:?}", tag, field_count, raw);
}

/// The page PayU sends the buyer back to. Informational only: the browser leg
/// can be skipped, replayed or forged, so nothing here changes order state.
pub async fn response(
    client: ClientInfo,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Html<String>> {
    let body = Payload::from_body(&headers, &body).unwrap_or_else(|e| {
        tracing::warn!("⚠️  [responseUrl] undecodable body ignored: {}", e);
        Payload::default()
    });
    let payload = ReturnPayload {
        query: Payload::from_query(uri.query()),
        body,
    };

    let merged = payload.merged();
    let overview = NotificationOverview::from_payload(&merged);
    log_notification("responseUrl", &client, &overview, merged.len(), &payload);

    let pretty = sonic_rs::to_string_pretty(&payload)
        .map_err(|e| AppError::Internal(format!("Payload serialization failed: {}", e)))?;

    Ok(Html(views::response_page(&pretty)))
}

/// The confirmation webhook. Always acknowledged with `200`.
///
/// The received `signature` is logged but not verified against a recomputed
/// one, and no order is updated. Both belong here, keyed by reference code and
/// transaction id so redeliveries stay idempotent.
pub async fn confirm(
    client: ClientInfo,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    match Payload::from_body(&headers, &body) {
        Ok(payload) if payload.is_empty() => {
            tracing::warn!(client = %client, "⚠️  [confirmationUrl (webhook)] empty payload");
        }
        Ok(payload) => {
            let overview = NotificationOverview::from_payload(&payload);
            log_notification(
                "confirmationUrl (webhook)",
                &client,
                &overview,
                payload.len(),
                &payload,
            );
        }
        Err(e) => {
            tracing::warn!(
                client = %client,
                "⚠️  [confirmationUrl (webhook)] undecodable payload ({}): {}",
                e,
                String::from_utf8_lossy(&body)
            );
        }
    }

    StatusCode::OK
}
