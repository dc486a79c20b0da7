//! # Paymob Card Tokenization
//!
//! Two sequential calls against the Paymob Accept API:
//!
//! 1. `POST /api/auth/tokens` exchanges the API key for a short-lived auth token.
//! 2. `POST /api/acceptance/tokenization` exchanges the auth token plus card
//!    data for a reusable card token.
//!
//! Neither call is retried.

use crate::config::PaymobConfig;
use crate::transport::{BoxedTransport, HttpJsonTransport};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use vault_core::{
    CardDetails, CardTokenization, TokenizationGateway, VaultError, VaultResult,
};

/// Paymob tokenization gateway
pub struct PaymobGateway {
    config: PaymobConfig,
    transport: BoxedTransport,
}

impl PaymobGateway {
    /// Create a gateway talking HTTP through reqwest
    pub fn new(config: PaymobConfig) -> VaultResult<Self> {
        let transport = HttpJsonTransport::new(config.timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a gateway over a caller-supplied transport
    pub fn with_transport(config: PaymobConfig, transport: BoxedTransport) -> Self {
        Self { config, transport }
    }

    /// Obtain a one-shot auth token for the tokenization call.
    #[instrument(skip(self))]
    pub async fn authenticate(&self) -> VaultResult<String> {
        let request = AuthTokenRequest {
            api_key: &self.config.api_key,
        };

        let body = self
            .transport
            .post_json(&self.config.auth_tokens_url(), &serde_json::to_value(&request)?)
            .await?;

        let token = token_field(&body).ok_or(VaultError::GatewayAuthentication)?;

        debug!("Obtained Paymob auth token");
        Ok(token)
    }

    /// Exchange card data for a card token.
    #[instrument(skip(self, auth_token, card))]
    pub async fn tokenize(
        &self,
        auth_token: &str,
        card: &CardDetails,
    ) -> VaultResult<CardTokenization> {
        let request = TokenizationRequest {
            token: auth_token,
            card_number: &card.card_number,
            card_expiry_mm: &card.expiry_month,
            card_expiry_yy: &card.expiry_year,
            card_cvv: &card.cvv,
        };

        let body = self
            .transport
            .post_json(&self.config.tokenization_url(), &serde_json::to_value(&request)?)
            .await?;

        let token = token_field(&body).ok_or(VaultError::GatewayTokenization)?;
        let card_subtype = text_field(&body, "card_subtype");

        info!("Paymob tokenization succeeded: subtype={:?}", card_subtype);

        Ok(CardTokenization {
            token,
            card_subtype,
            masked_pan: text_field(&body, "masked_pan"),
        })
    }
}

#[async_trait]
impl TokenizationGateway for PaymobGateway {
    async fn tokenize_card(&self, card: &CardDetails) -> VaultResult<CardTokenization> {
        let auth_token = self.authenticate().await?;
        self.tokenize(&auth_token, card).await
    }

    fn provider_name(&self) -> &'static str {
        "paymob"
    }
}

/// `token` of a response body. Non-empty strings count, and so do non-zero
/// numbers (kept as their decimal text). Anything else is no token.
fn token_field(body: &Value) -> Option<String> {
    match body.get("token")? {
        Value::String(token) if !token.is_empty() => Some(token.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// Optional string field; a value of another type is treated as absent.
fn text_field(body: &Value, key: &str) -> Option<String> {
    body.get(key).and_then(Value::as_str).map(str::to_owned)
}

// =============================================================================
// Paymob API Types
// =============================================================================

#[derive(Serialize)]
struct AuthTokenRequest<'a> {
    api_key: &'a str,
}

#[derive(Serialize)]
struct TokenizationRequest<'a> {
    token: &'a str,
    card_number: &'a Value,
    card_expiry_mm: &'a Value,
    card_expiry_yy: &'a Value,
    card_cvv: &'a Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::JsonTransport;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use vault_core::CardDetailsPayload;

    /// Transport double replaying canned bodies and recording requests
    #[derive(Default)]
    struct ScriptedTransport {
        responses: Mutex<VecDeque<VaultResult<Value>>>,
        requests: Mutex<Vec<(String, Value)>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<VaultResult<Value>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::default(),
            })
        }

        fn requests(&self) -> Vec<(String, Value)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl JsonTransport for ScriptedTransport {
        async fn post_json(&self, url: &str, body: &Value) -> VaultResult<Value> {
            self.requests.lock().unwrap().push((url.to_string(), body.clone()));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(VaultError::Network("no scripted response".into())))
        }
    }

    fn card() -> CardDetails {
        CardDetailsPayload::from_value(&json!({
            "cardNumber": "4000000000001234",
            "expiryMonth": "12",
            "expiryYear": 25,
            "cvv": "123"
        }))
        .validate()
        .unwrap()
    }

    fn gateway(transport: Arc<ScriptedTransport>) -> PaymobGateway {
        PaymobGateway::with_transport(PaymobConfig::new("api-key-1"), transport)
    }

    #[tokio::test]
    async fn test_two_sequential_calls() {
        let transport = ScriptedTransport::new(vec![
            Ok(json!({ "token": "auth-abc" })),
            Ok(json!({
                "token": "tok_123",
                "card_subtype": "Visa",
                "masked_pan": "400000XXXXXX1234"
            })),
        ]);

        let result = gateway(transport.clone()).tokenize_card(&card()).await.unwrap();

        assert_eq!(result.token, "tok_123");
        assert_eq!(result.card_subtype.as_deref(), Some("Visa"));
        assert_eq!(result.masked_pan.as_deref(), Some("400000XXXXXX1234"));

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].0, "https://accept.paymob.com/api/auth/tokens");
        assert_eq!(requests[0].1, json!({ "api_key": "api-key-1" }));
        assert_eq!(
            requests[1].0,
            "https://accept.paymob.com/api/acceptance/tokenization"
        );
        assert_eq!(
            requests[1].1,
            json!({
                "token": "auth-abc",
                "card_number": "4000000000001234",
                "card_expiry_mm": "12",
                "card_expiry_yy": 25,
                "card_cvv": "123"
            })
        );
    }

    #[tokio::test]
    async fn test_missing_auth_token_stops_before_tokenize() {
        let transport = ScriptedTransport::new(vec![Ok(json!({}))]);

        let err = gateway(transport.clone()).tokenize_card(&card()).await.unwrap_err();

        assert!(matches!(err, VaultError::GatewayAuthentication));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_card_token() {
        let transport = ScriptedTransport::new(vec![
            Ok(json!({ "token": "auth-abc" })),
            Ok(json!({ "detail": "card declined" })),
        ]);

        let err = gateway(transport).tokenize_card(&card()).await.unwrap_err();

        assert!(matches!(err, VaultError::GatewayTokenization));
        assert_eq!(err.message(), "Failed to generate Paymob token");
    }

    #[tokio::test]
    async fn test_mistyped_optional_fields_keep_the_token() {
        let transport = ScriptedTransport::new(vec![
            Ok(json!({ "token": "auth-abc" })),
            Ok(json!({
                "token": "tok_123",
                "card_subtype": 7,
                "masked_pan": "400000XXXXXX1234"
            })),
        ]);

        let result = gateway(transport).tokenize_card(&card()).await.unwrap();

        assert_eq!(result.token, "tok_123");
        assert_eq!(result.card_subtype, None);
        assert_eq!(result.masked_pan.as_deref(), Some("400000XXXXXX1234"));
    }

    #[test]
    fn test_token_shapes() {
        let accepted = [(json!({ "token": 98765 }), "98765"), (json!({ "token": "t" }), "t")];
        for (body, expected) in accepted {
            assert_eq!(token_field(&body).as_deref(), Some(expected));
        }

        for body in [
            json!({ "token": "" }),
            json!({ "token": 0 }),
            json!({ "token": true }),
            json!({ "token": null }),
            json!({ "token": { "id": "t" } }),
            json!({}),
            json!(["t"]),
        ] {
            assert_eq!(token_field(&body), None, "{}", body);
        }
    }

    #[tokio::test]
    async fn test_non_object_body_counts_as_missing_token() {
        let transport = ScriptedTransport::new(vec![Ok(json!(["unexpected"]))]);

        let err = gateway(transport).authenticate().await.unwrap_err();

        assert!(matches!(err, VaultError::GatewayAuthentication));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let transport =
            ScriptedTransport::new(vec![Err(VaultError::Network("connection reset".into()))]);

        let err = gateway(transport).tokenize_card(&card()).await.unwrap_err();

        assert!(matches!(err, VaultError::Network(_)));
        assert_eq!(err.message(), "connection reset");
    }
}
