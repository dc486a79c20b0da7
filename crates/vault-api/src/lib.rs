//! # vault-api
//!
//! HTTP API layer for card-vault.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - The `generatePaymobToken` callable (bearer-authenticated)
//! - App configuration and shared state
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/generatePaymobToken` | Tokenize a card and store its summary |

pub mod auth;
pub mod callable;
pub mod handlers;
pub mod routes;
pub mod state;

pub use auth::{Authenticator, JwtAuthenticator};
pub use routes::create_router;
pub use state::{AppConfig, AppState};
