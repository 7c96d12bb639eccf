use axum::{
    Json,
    extract::{Path, State},
    response::{Html, IntoResponse},
};
use serde::Serialize;

use crate::{
    error::{AppError, Result},
    extractors::{client::ClientInfo, payload::Payload},
    models::session::PaymentFields,
    services::checkout::{self as checkout_service, CheckoutRequest},
    state::AppState,
    views,
};

/// The response payload of a started checkout.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub ok: bool,
    /// The link to open in the browser to pay.
    pub pay_url: String,
    /// The processor endpoint the form posts to.
    pub action: String,
    /// The signed fields, for debugging.
    pub fields: PaymentFields,
}

/// Starts a WebCheckout: signs the fields and returns the pay link.
#[axum::debug_handler]
pub async fn checkout(
    State(state): State<AppState>,
    client: ClientInfo,
    payload: Payload,
) -> Result<impl IntoResponse> {
    tracing::info!(
        client = %client,
        forwarded_proto = ?client.forwarded_proto,
        forwarded_host = ?client.forwarded_host,
        "🛒 [checkout] request body: {:?}",
        payload
    );

    let request = CheckoutRequest::from_payload(&payload);
    let started = checkout_service::start_checkout(&state, &request).await?;

    tracing::info!("✅ [checkout] fields to PayU: {:?}", started.fields);
    tracing::info!("🔗 [checkout] payUrl: {}", started.pay_url);

    Ok(Json(CheckoutResponse {
        ok: true,
        pay_url: started.pay_url,
        action: state.config.action_url.clone(),
        fields: started.fields,
    }))
}

/// Serves the page that auto-posts the stored fields to the processor.
#[axum::debug_handler]
pub async fn redirect(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Html<String>> {
    let fields = state.sessions.get(&token).await.ok_or_else(|| {
        tracing::warn!("❌ [redirect] unknown or expired token: {}", token);
        AppError::SessionExpiredOrUnknown
    })?;

    tracing::info!("🔑 [redirect] token: {}", token);
    tracing::debug!("[redirect] fields: {:?}", fields);

    Ok(Html(views::auto_submit_form(&state.config.action_url, &fields)))
}
