//! # Card Tokenization Service
//!
//! The linear pipeline behind the `generatePaymobToken` callable:
//!
//! ```text
//! caller ─▶ auth gate ─▶ input check ─▶ gateway (auth, tokenize)
//!        ─▶ redaction ─▶ store write ─▶ response
//! ```
//!
//! Nothing is persisted unless the gateway handed back a card token.

use crate::card::CardDetailsPayload;
use crate::error::{ErrorKind, VaultError, VaultResult};
use crate::gateway::BoxedGateway;
use crate::identity::CallerIdentity;
use crate::payment_method::{DocumentPath, PaymentMethodRecord, TokenizedCard};
use crate::store::BoxedStore;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

/// Tokenizes cards through a gateway and records the redacted result.
#[derive(Clone)]
pub struct CardTokenizationService {
    gateway: BoxedGateway,
    store: BoxedStore,
}

impl CardTokenizationService {
    pub fn new(gateway: BoxedGateway, store: BoxedStore) -> Self {
        Self { gateway, store }
    }

    pub fn gateway(&self) -> &BoxedGateway {
        &self.gateway
    }

    pub fn store(&self) -> &BoxedStore {
        &self.store
    }

    /// Run one invocation.
    ///
    /// `caller` is `None` when the request carried no valid identity.
    /// `data` is the callable's raw `data` member.
    #[instrument(
        skip(self, caller, data),
        fields(
            provider = self.gateway.provider_name(),
            caller = %caller.map(|c| c.fingerprint()).unwrap_or_default()
        )
    )]
    pub async fn generate_token(
        &self,
        caller: Option<&CallerIdentity>,
        data: &Value,
    ) -> VaultResult<TokenizedCard> {
        let result = self.run(caller, data).await;

        if let Err(err) = &result {
            match err.kind() {
                ErrorKind::Internal => error!("Error generating card token: {}", err),
                _ => warn!("Rejected card token request: {}", err),
            }
        }

        result
    }

    async fn run(
        &self,
        caller: Option<&CallerIdentity>,
        data: &Value,
    ) -> VaultResult<TokenizedCard> {
        let caller = caller.ok_or_else(VaultError::unauthenticated)?;

        let card = CardDetailsPayload::from_value(data).validate()?;
        debug!("Card details present, calling {}", self.gateway.provider_name());

        let tokenization = self.gateway.tokenize_card(&card).await?;
        if tokenization.token.is_empty() {
            return Err(VaultError::GatewayTokenization);
        }

        let record = PaymentMethodRecord::from_tokenization(&tokenization, &card);
        let path = DocumentPath::new(caller, tokenization.token.as_str())?;

        self.store.put(&path, &record).await?;

        info!(
            "Stored payment method: brand={}, last4={}, backend={}",
            record.card_brand,
            record.last4,
            self.store.backend_name()
        );

        Ok(TokenizedCard {
            token: tokenization.token,
            record,
        })
    }
}
