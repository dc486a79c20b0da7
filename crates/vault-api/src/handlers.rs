//! # Request Handlers
//!
//! Axum request handlers for the card-vault API.

use crate::callable::{parse_callable_data, CallableError, CallableResult};
use crate::state::AppState;
use axum::{body::Bytes, extract::State, http::HeaderMap, response::IntoResponse, Json};
use serde_json::Value;
use tracing::instrument;
use uuid::Uuid;
use vault_core::TokenizedCard;

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "card-vault",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// `generatePaymobToken` callable: tokenize a card and store its summary.
#[instrument(skip(state, headers, body), fields(request_id = %Uuid::new_v4()))]
pub async fn generate_paymob_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CallableResult<TokenizedCard>>, CallableError> {
    let caller = state.authenticator.authenticate(&headers);

    // The body is only read once the caller is known.
    let data = match caller {
        Some(_) => parse_callable_data(&body)?,
        None => Value::Null,
    };

    let card = state.service.generate_token(caller.as_ref(), &data).await?;

    Ok(Json(CallableResult::new(card)))
}
