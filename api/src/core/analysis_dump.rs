//! Optional on-disk copy of each successful analysis.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

/// Writes `payload` as pretty JSON to `<dir>/analysis_<epoch-millis>.json`.
pub async fn write_analysis<T: Serialize>(dir: &Path, payload: &T) -> std::io::Result<PathBuf> {
    let json = serde_json::to_vec_pretty(payload)?;
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(format!("analysis_{}.json", Utc::now().timestamp_millis()));
    tokio::fs::write(&path, json).await?;
    Ok(path)
}

/// [`write_analysis`], logging instead of failing.
pub async fn dump_best_effort<T: Serialize>(dir: Option<&Path>, payload: &T) {
    let Some(dir) = dir else {
        return;
    };
    match write_analysis(dir, payload).await {
        Ok(path) => info!(path = %path.display(), "analysis written"),
        Err(e) => warn!(dir = %dir.display(), error = %e, "failed to write analysis dump"),
    }
}
