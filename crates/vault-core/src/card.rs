//! # Card Input
//!
//! Caller-supplied card details and the presence check applied to them.
//! Values are passed through to the gateway exactly as received: no
//! coercion, no Luhn or format checks.

use crate::error::{VaultError, VaultResult};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Raw card payload as it arrives from the caller.
///
/// Every field is optional here; [`CardDetailsPayload::validate`] decides
/// whether the payload is usable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetailsPayload {
    #[serde(default)]
    pub card_number: Option<Value>,
    #[serde(default)]
    pub expiry_month: Option<Value>,
    #[serde(default)]
    pub expiry_year: Option<Value>,
    #[serde(default)]
    pub cvv: Option<Value>,
}

impl CardDetailsPayload {
    /// Read a payload out of an arbitrary JSON value.
    ///
    /// Anything that is not an object carries no card fields at all.
    pub fn from_value(value: &Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        serde_json::from_value(value.clone()).unwrap_or_default()
    }

    /// Confirm all four fields are present and truthy.
    pub fn validate(self) -> VaultResult<CardDetails> {
        match (self.card_number, self.expiry_month, self.expiry_year, self.cvv) {
            (Some(card_number), Some(expiry_month), Some(expiry_year), Some(cvv))
                if [&card_number, &expiry_month, &expiry_year, &cvv]
                    .into_iter()
                    .all(is_truthy) =>
            {
                Ok(CardDetails {
                    card_number,
                    expiry_month,
                    expiry_year,
                    cvv,
                })
            }
            _ => Err(VaultError::missing_card_details()),
        }
    }
}

/// Card details that passed the presence check.
///
/// Lives for one invocation only and is never persisted.
#[derive(Clone)]
pub struct CardDetails {
    pub card_number: Value,
    pub expiry_month: Value,
    pub expiry_year: Value,
    pub cvv: Value,
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("card_number", &"[redacted]")
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("cvv", &"[redacted]")
            .finish()
    }
}

/// JSON truthiness: `null`, `false`, `0` and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
