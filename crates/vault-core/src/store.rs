//! # Payment Method Store
//!
//! Document-store abstraction for persisted payment methods, laid out as
//! `users/{userId}/payment_methods/{token}`.

use crate::error::VaultResult;
use crate::payment_method::{DocumentPath, PaymentMethodRecord};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Persistence for payment method records.
#[async_trait]
pub trait PaymentMethodStore: Send + Sync {
    /// Write the record at `path`, replacing whatever was there.
    async fn put(&self, path: &DocumentPath, record: &PaymentMethodRecord) -> VaultResult<()>;

    /// Read a single record.
    async fn get(&self, path: &DocumentPath) -> VaultResult<Option<PaymentMethodRecord>>;

    /// All records of one user, ordered by token.
    async fn list(&self, user_id: &str) -> VaultResult<Vec<(String, PaymentMethodRecord)>>;

    /// Backend name (for logging).
    fn backend_name(&self) -> &'static str;
}

/// Type alias for a shared store handle
pub type BoxedStore = Arc<dyn PaymentMethodStore>;

/// Process-local store, used in tests and when no database is configured.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<BTreeMap<DocumentPath, PaymentMethodRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents across all users
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl PaymentMethodStore for MemoryStore {
    async fn put(&self, path: &DocumentPath, record: &PaymentMethodRecord) -> VaultResult<()> {
        self.documents
            .write()
            .await
            .insert(path.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, path: &DocumentPath) -> VaultResult<Option<PaymentMethodRecord>> {
        Ok(self.documents.read().await.get(path).cloned())
    }

    async fn list(&self, user_id: &str) -> VaultResult<Vec<(String, PaymentMethodRecord)>> {
        Ok(self
            .documents
            .read()
            .await
            .iter()
            .filter(|(path, _)| path.user_id() == user_id)
            .map(|(path, record)| (path.token().to_string(), record.clone()))
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::CallerIdentity;
    use chrono::Utc;
    use serde_json::json;

    fn record(brand: &str) -> PaymentMethodRecord {
        PaymentMethodRecord::build(Some(brand), Some("1111"), json!("01"), json!("30"), Utc::now())
    }

    #[tokio::test]
    async fn test_put_overwrites_same_path() {
        let store = MemoryStore::new();
        let path = DocumentPath::new(&CallerIdentity::new("u1"), "tok_1").unwrap();

        store.put(&path, &record("Visa")).await.unwrap();
        store.put(&path, &record("MasterCard")).await.unwrap();

        assert_eq!(store.len().await, 1);
        let stored = store.get(&path).await.unwrap().unwrap();
        assert_eq!(stored.card_brand, "MasterCard");
    }

    #[tokio::test]
    async fn test_list_is_partitioned_by_user() {
        let store = MemoryStore::new();
        let alice = CallerIdentity::new("alice");
        let bob = CallerIdentity::new("bob");

        store.put(&DocumentPath::new(&alice, "tok_b").unwrap(), &record("Visa")).await.unwrap();
        store.put(&DocumentPath::new(&alice, "tok_a").unwrap(), &record("Visa")).await.unwrap();
        store.put(&DocumentPath::new(&bob, "tok_c").unwrap(), &record("Visa")).await.unwrap();

        let tokens: Vec<String> = store
            .list("alice")
            .await
            .unwrap()
            .into_iter()
            .map(|(token, _)| token)
            .collect();
        assert_eq!(tokens, vec!["tok_a", "tok_b"]);
        assert!(store.list("carol").await.unwrap().is_empty());
    }
}
