//! # Callable Wire Protocol
//!
//! Request: `{ "data": ... }`.
//! Success: `{ "result": ... }` with HTTP 200.
//! Failure: `{ "error": { "status": "INTERNAL", "message": "..." } }` with
//! the HTTP status of the error kind.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use vault_core::VaultError;

/// Successful callable response
#[derive(Debug, Serialize)]
pub struct CallableResult<T> {
    pub result: T,
}

impl<T> CallableResult<T> {
    pub fn new(result: T) -> Self {
        Self { result }
    }
}

/// Failure body
#[derive(Debug, Serialize)]
pub struct CallableErrorBody {
    pub error: CallableErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct CallableErrorDetail {
    pub status: &'static str,
    pub message: String,
}

/// A `VaultError` on its way back to the caller
#[derive(Debug)]
pub struct CallableError(pub VaultError);

impl From<VaultError> for CallableError {
    fn from(err: VaultError) -> Self {
        Self(err)
    }
}

impl IntoResponse for CallableError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status =
            StatusCode::from_u16(kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = CallableErrorBody {
            error: CallableErrorDetail {
                status: kind.as_status(),
                message: self.0.message(),
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Pull the `data` member out of a callable request body.
pub fn parse_callable_data(body: &[u8]) -> Result<Value, VaultError> {
    let bad_request = || VaultError::InvalidArgument("Bad Request".to_string());

    let mut envelope: Value = serde_json::from_slice(body).map_err(|_| bad_request())?;
    envelope
        .as_object_mut()
        .and_then(|obj| obj.remove("data"))
        .ok_or_else(bad_request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_data_member() {
        let data = parse_callable_data(br#"{"data":{"cvv":"123"}}"#).unwrap();
        assert_eq!(data, json!({ "cvv": "123" }));

        let data = parse_callable_data(br#"{"data":null}"#).unwrap();
        assert!(data.is_null());
    }

    #[test]
    fn test_bad_envelopes() {
        let bodies: [&[u8]; 4] = [b"not json", br#"{"cvv":"123"}"#, b"[]", b""];
        for body in bodies {
            let err = parse_callable_data(body).unwrap_err();
            assert_eq!(err.message(), "Bad Request");
        }
    }

    #[test]
    fn test_error_response_status() {
        let response = CallableError(VaultError::unauthenticated()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = CallableError(VaultError::missing_card_details()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = CallableError(VaultError::GatewayTokenization).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
