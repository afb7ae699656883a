use std::error::Error;

use api::core::app_state::AppState;
use tracing::{info, warn};

mod telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env is fine; the process environment still applies.
    let dotenv = dotenvy::dotenv();

    telemetry::init()?;

    if let Err(e) = &dotenv {
        if !e.not_found() {
            warn!(error = %e, "failed to load .env");
        }
    }

    let state = AppState::from_env()?;
    info!(
        address = %state.config.address,
        mode = ?state.reviewer.config().mode,
        include_files = state.config.include_files,
        "configuration loaded"
    );

    api::start(state).await?;

    Ok(())
}
