//! # SQLite Document Store
//!
//! Stores each payment method as a JSON document addressed by its full
//! path (`users/{userId}/payment_methods/{token}`). Writes are upserts, so
//! a repeated token replaces the earlier document.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};
use vault_core::{
    collection_path, DocumentPath, PaymentMethodRecord, PaymentMethodStore, VaultError,
    VaultResult,
};

const CREATE_DOCUMENTS: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    path TEXT PRIMARY KEY,
    parent TEXT NOT NULL,
    doc_id TEXT NOT NULL,
    body TEXT NOT NULL,
    updated_at TEXT NOT NULL
)"#;

const CREATE_PARENT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_documents_parent ON documents(parent, doc_id)";

/// Payment method store on a SQLite pool
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `url` and ensure the schema.
    ///
    /// `url` is a sqlx SQLite URL such as `sqlite://data/vault.db`.
    pub async fn connect(url: &str) -> VaultResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| VaultError::Configuration(format!("Invalid DATABASE_URL: {}", e)))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(storage_error)?;

        let store = Self::from_pool(pool).await?;
        info!("Connected SQLite document store");
        Ok(store)
    }

    /// Private in-memory database; lives as long as the store.
    pub async fn in_memory() -> VaultResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(storage_error)?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool and ensure the schema.
    async fn from_pool(pool: SqlitePool) -> VaultResult<Self> {
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> VaultResult<()> {
        sqlx::query(CREATE_DOCUMENTS)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        sqlx::query(CREATE_PARENT_INDEX)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(())
    }
}

#[async_trait]
impl PaymentMethodStore for SqliteStore {
    async fn put(&self, path: &DocumentPath, record: &PaymentMethodRecord) -> VaultResult<()> {
        let body = serde_json::to_string(record)?;

        sqlx::query(
            r#"INSERT INTO documents (path, parent, doc_id, body, updated_at)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT(path) DO UPDATE SET
                   body = excluded.body,
                   updated_at = excluded.updated_at"#,
        )
        .bind(path.to_string())
        .bind(path.collection())
        .bind(path.token())
        .bind(body)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        debug!("Wrote payment method document {}", path.token());
        Ok(())
    }

    async fn get(&self, path: &DocumentPath) -> VaultResult<Option<PaymentMethodRecord>> {
        let row = sqlx::query("SELECT body FROM documents WHERE path = ?")
            .bind(path.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        match row {
            Some(row) => {
                let body: String = row.try_get("body").map_err(storage_error)?;
                Ok(Some(serde_json::from_str(&body)?))
            }
            None => Ok(None),
        }
    }

    async fn list(&self, user_id: &str) -> VaultResult<Vec<(String, PaymentMethodRecord)>> {
        let rows = sqlx::query("SELECT doc_id, body FROM documents WHERE parent = ? ORDER BY doc_id")
            .bind(collection_path(user_id))
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        rows.into_iter()
            .map(|row| -> VaultResult<(String, PaymentMethodRecord)> {
                let doc_id: String = row.try_get("doc_id").map_err(storage_error)?;
                let body: String = row.try_get("body").map_err(storage_error)?;
                Ok((doc_id, serde_json::from_str(&body)?))
            })
            .collect()
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

fn storage_error(err: sqlx::Error) -> VaultError {
    VaultError::Storage(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vault_core::CallerIdentity;

    fn record(brand: &str, last4: &str) -> PaymentMethodRecord {
        PaymentMethodRecord::build(Some(brand), Some(last4), json!("12"), json!("25"), Utc::now())
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let store = SqliteStore::in_memory().await.unwrap();
        let path = DocumentPath::new(&CallerIdentity::new("uid-1"), "tok_123").unwrap();
        let written = record("Visa", "400000XXXXXX1234");

        store.put(&path, &written).await.unwrap();

        let read = store.get(&path).await.unwrap().unwrap();
        assert_eq!(read, written);
        assert_eq!(read.last4, "1234");
    }

    #[tokio::test]
    async fn test_missing_document() {
        let store = SqliteStore::in_memory().await.unwrap();
        let path = DocumentPath::new(&CallerIdentity::new("uid-1"), "tok_none").unwrap();

        assert!(store.get(&path).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_same_token_overwrites() {
        let store = SqliteStore::in_memory().await.unwrap();
        let caller = CallerIdentity::new("uid-1");
        let path = DocumentPath::new(&caller, "tok_123").unwrap();

        store.put(&path, &record("Visa", "1111")).await.unwrap();
        store.put(&path, &record("Visa", "2222")).await.unwrap();

        let all = store.list("uid-1").await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].0, "tok_123");
        assert_eq!(all[0].1.last4, "2222");
    }

    #[tokio::test]
    async fn test_list_scoped_to_user() {
        let store = SqliteStore::in_memory().await.unwrap();
        let alice = CallerIdentity::new("alice");
        let bob = CallerIdentity::new("bob");

        store.put(&DocumentPath::new(&alice, "tok_b").unwrap(), &record("Visa", "1")).await.unwrap();
        store.put(&DocumentPath::new(&alice, "tok_a").unwrap(), &record("Visa", "2")).await.unwrap();
        store.put(&DocumentPath::new(&bob, "tok_c").unwrap(), &record("Visa", "3")).await.unwrap();

        let tokens: Vec<String> = store
            .list("alice")
            .await
            .unwrap()
            .into_iter()
            .map(|(token, _)| token)
            .collect();
        assert_eq!(tokens, vec!["tok_a", "tok_b"]);
    }

    #[tokio::test]
    async fn test_nested_ids_cannot_alias_another_users_document() {
        let store = SqliteStore::in_memory().await.unwrap();
        let owner = CallerIdentity::new("u1");
        store
            .put(&DocumentPath::new(&owner, "t1").unwrap(), &record("A", "1111"))
            .await
            .unwrap();

        let nested_user = CallerIdentity::new("u1/payment_methods/t1");
        assert!(DocumentPath::new(&nested_user, "tok").is_err());
        assert!(DocumentPath::new(&owner, "t1/payment_methods/tok").is_err());

        let all = store.list("u1").await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].0, "t1");
        assert_eq!(all[0].1.card_brand, "A");
    }
}
