//! # vault-paymob
//!
//! Paymob tokenization gateway for card-vault.
//!
//! `PaymobGateway` implements `vault_core::TokenizationGateway` with the
//! Paymob Accept API: an auth-token call followed by a card tokenization
//! call. Both go through the `JsonTransport` trait.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vault_paymob::{PaymobConfig, PaymobGateway};
//! use vault_core::TokenizationGateway;
//!
//! // PAYMOB_API_KEY is required, PAYMOB_API_BASE_URL optional
//! let config = PaymobConfig::from_lookup(|key| std::env::var(key).ok())?;
//! let gateway = PaymobGateway::new(config)?;
//!
//! let tokenization = gateway.tokenize_card(&card).await?;
//! println!("card token: {}", tokenization.token);
//! ```

pub mod config;
pub mod gateway;
pub mod transport;

// Re-exports
pub use config::{PaymobConfig, DEFAULT_API_BASE_URL};
pub use gateway::PaymobGateway;
pub use transport::{BoxedTransport, HttpJsonTransport, JsonTransport};
