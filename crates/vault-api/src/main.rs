//! # Card Vault
//!
//! Card tokenization service in front of the Paymob gateway.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export PAYMOB_API_KEY=...
//! export AUTH_JWT_SECRET=...
//! export DATABASE_URL=sqlite://data/card-vault.db   # optional
//!
//! # Run the server
//! card-vault
//! ```

use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vault_api::{routes, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_tracing();

    // Initialize application state
    let state = AppState::new().await?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!(
        "Gateway: {} ({})",
        state.service.gateway().provider_name(),
        state.config.paymob.api_base_url
    );
    info!("Store: {}", state.service.store().backend_name());

    // Create router
    let app = routes::create_router(state);

    info!("Card vault starting on http://{}", addr);

    if !is_prod {
        info!("Health: GET http://{}/health", addr);
        info!("Tokenize: POST http://{}/generatePaymobToken", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `RUST_LOG` filters, `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
