//! # Tokenization Gateway Trait
//!
//! Strategy trait for card tokenization providers.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │        TokenizationGateway (trait)          │
//! │  ├── tokenize_card()                        │
//! │  └── provider_name()                        │
//! └─────────────────────────────────────────────┘
//!                       ▲
//!              ┌────────┴────────┐
//!      ┌───────┴───────┐ ┌───────┴───────┐
//!      │ PaymobGateway │ │  (others)     │
//!      └───────────────┘ └───────────────┘
//! ```

use crate::card::CardDetails;
use crate::error::VaultResult;
use crate::payment_method::CardTokenization;
use async_trait::async_trait;
use std::sync::Arc;

/// Core trait for card tokenization providers.
#[async_trait]
pub trait TokenizationGateway: Send + Sync {
    /// Exchange raw card details for a reusable card token.
    ///
    /// Implementations must only return `Ok` with a non-empty token; any
    /// authentication or tokenization step that fails is an error.
    async fn tokenize_card(&self, card: &CardDetails) -> VaultResult<CardTokenization>;

    /// Provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type BoxedGateway = Arc<dyn TokenizationGateway>;
