//! Item dispenser demo binary.
//!
//! # Examples
//!
//! ```bash
//! HOLDING_BAG_ID=archer_bag HOLDING_REMOVALS=15 cargo run -p holding-client
//! ```

use anyhow::Result;
use holding_client::{ClientConfig, logging, run_session};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _guard = logging::setup_logging()?;
    let config = ClientConfig::from_env();

    tracing::info!("Starting holding-bag session");
    tracing::debug!(?config, "client configuration");

    let reports = run_session(&config).await?;
    println!("{}", serde_json::to_string_pretty(&reports)?);

    tracing::info!("Session complete");
    Ok(())
}
