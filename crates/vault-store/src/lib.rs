//! # vault-store
//!
//! Durable `PaymentMethodStore` for card-vault, backed by SQLite via sqlx.
//!
//! ```rust,ignore
//! use vault_store::SqliteStore;
//!
//! let store = SqliteStore::connect("sqlite://data/card-vault.db").await?;
//! store.put(&path, &record).await?;
//! ```

pub mod sqlite;

pub use sqlite::SqliteStore;
