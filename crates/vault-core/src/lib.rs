//! # vault-core
//!
//! Core types and traits for the card-vault tokenization service.
//!
//! This crate provides:
//! - `TokenizationGateway` trait for card tokenization providers
//! - `PaymentMethodStore` trait and the in-process `MemoryStore`
//! - `CardDetailsPayload` / `CardDetails` for caller input
//! - `PaymentMethodRecord` and the redaction rules that build it
//! - `CardTokenizationService`, the auth → validate → tokenize → store pipeline
//! - `VaultError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use vault_core::{CallerIdentity, CardTokenizationService, MemoryStore};
//!
//! let service = CardTokenizationService::new(gateway, Arc::new(MemoryStore::new()));
//!
//! let caller = CallerIdentity::new("uid-123");
//! let card = service.generate_token(Some(&caller), &request_data).await?;
//!
//! // card.token is safe to keep; card.record is what was stored
//! ```

pub mod card;
pub mod error;
pub mod gateway;
pub mod identity;
pub mod payment_method;
pub mod service;
pub mod store;

// Re-exports for convenience
pub use card::{CardDetails, CardDetailsPayload};
pub use error::{ErrorKind, VaultError, VaultResult};
pub use gateway::{BoxedGateway, TokenizationGateway};
pub use identity::CallerIdentity;
pub use payment_method::{
    collection_path, CardTokenization, DocumentPath, PaymentMethodRecord, TokenizedCard,
};
pub use service::CardTokenizationService;
pub use store::{BoxedStore, MemoryStore, PaymentMethodStore};
