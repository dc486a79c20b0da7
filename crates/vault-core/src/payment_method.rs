//! # Payment Method Records
//!
//! The redacted summary of a tokenized card, how it is derived from the
//! gateway's answer, and where it lives in the document store.

use crate::card::CardDetails;
use crate::error::{VaultError, VaultResult};
use crate::identity::CallerIdentity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Brand recorded when the gateway does not name one
pub const UNKNOWN_BRAND: &str = "Unknown";

/// Last-four placeholder when the gateway does not disclose a masked PAN
pub const UNDISCLOSED_LAST4: &str = "****";

/// Collection holding per-user payment methods
pub const PAYMENT_METHODS_COLLECTION: &str = "payment_methods";

/// Result of a successful tokenization call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardTokenization {
    /// Gateway card token, never empty
    pub token: String,
    /// Card brand as reported by the gateway (e.g. "Visa")
    pub card_subtype: Option<String>,
    /// Masked card number (e.g. "400000XXXXXX1234")
    pub masked_pan: Option<String>,
}

/// Safe-to-store summary of a tokenized card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodRecord {
    pub card_brand: String,
    pub last4: String,
    pub expiry_month: Value,
    pub expiry_year: Value,
    pub is_default: bool,
    pub added_at: DateTime<Utc>,
}

impl PaymentMethodRecord {
    /// Build the record for a fresh tokenization.
    ///
    /// `is_default` is set unconditionally, even when the caller already
    /// holds other payment methods.
    pub fn from_tokenization(tokenization: &CardTokenization, card: &CardDetails) -> Self {
        Self::build(
            tokenization.card_subtype.as_deref(),
            tokenization.masked_pan.as_deref(),
            card.expiry_month.clone(),
            card.expiry_year.clone(),
            Utc::now(),
        )
    }

    pub fn build(
        card_subtype: Option<&str>,
        masked_pan: Option<&str>,
        expiry_month: Value,
        expiry_year: Value,
        added_at: DateTime<Utc>,
    ) -> Self {
        let card_brand = card_subtype
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_BRAND)
            .to_string();

        let last4 = masked_pan
            .filter(|s| !s.is_empty())
            .map(last_four)
            .unwrap_or_else(|| UNDISCLOSED_LAST4.to_string());

        Self {
            card_brand,
            last4,
            expiry_month,
            expiry_year,
            is_default: true,
            added_at,
        }
    }
}

/// Last four characters, or the whole string when it is shorter.
fn last_four(masked_pan: &str) -> String {
    let count = masked_pan.chars().count();
    masked_pan.chars().skip(count.saturating_sub(4)).collect()
}

/// Success payload: the card token plus every stored field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenizedCard {
    pub token: String,
    #[serde(flatten)]
    pub record: PaymentMethodRecord,
}

/// Storage key `users/{userId}/payment_methods/{token}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentPath {
    user_id: String,
    token: String,
}

impl DocumentPath {
    /// Both segments must be non-empty, free of `/`, and not `.` or `..`,
    /// so distinct (user, token) pairs never render to the same path.
    pub fn new(caller: &CallerIdentity, token: impl Into<String>) -> VaultResult<Self> {
        let token = token.into();
        check_segment("user id", caller.uid())?;
        check_segment("document id", &token)?;

        Ok(Self {
            user_id: caller.uid().to_string(),
            token,
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Document id within the collection
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Path of the owning collection
    pub fn collection(&self) -> String {
        collection_path(&self.user_id)
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection(), self.token)
    }
}

fn check_segment(what: &str, segment: &str) -> VaultResult<()> {
    if segment.is_empty() || segment.contains('/') || segment == "." || segment == ".." {
        return Err(VaultError::Storage(format!("Invalid {} for a document path", what)));
    }
    Ok(())
}

/// Path of a user's payment method collection
pub fn collection_path(user_id: &str) -> String {
    format!("users/{}/{}", user_id, PAYMENT_METHODS_COLLECTION)
}
