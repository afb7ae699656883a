//! Repository snapshot extraction built on the `git` CLI.
//!
//! - One disposable workspace per request: `<WORKSPACE_ROOT>/<team>_<uuid>`,
//!   removed on every exit path.
//! - History is read oldest first; per-commit fetches run concurrently with
//!   a bounded fan-out across commits.
//! - Optionally snapshots the final working tree.
//!
//! Either the whole history is returned or an [`ExtractionError`].

use tracing::{info, instrument};

pub mod config;
pub mod errors;
pub mod git_cli;
pub mod history;
pub mod model;
pub mod tree;
pub mod workspace;

pub use config::SnapshotConfig;
pub use errors::{ExtractionError, Result};
pub use model::{AnalysisResult, CommitRecord, FileSnapshot};

use git_cli::GitCli;
use workspace::Workspace;

/// Clones `repo_url` and reconstructs its history.
///
/// `workspace_key` only names the scratch directory (it is sanitized and
/// suffixed with a UUID). With `include_files`, the final working tree is
/// snapshotted as well.
///
/// # Errors
/// Any clone, log or tree-walk failure, including timeouts. The workspace
/// is gone by the time this returns, whatever the outcome.
#[instrument(
    skip(cfg, repo_url),
    fields(root = %cfg.workspace_root.display(), repo = %git_cli::redact_url(repo_url))
)]
pub async fn extract(
    cfg: &SnapshotConfig,
    repo_url: &str,
    workspace_key: &str,
    include_files: bool,
) -> Result<AnalysisResult> {
    let ws = Workspace::acquire(&cfg.workspace_root, workspace_key).await?;
    let result = extract_into(cfg, &ws, repo_url, include_files).await;
    ws.cleanup().await;
    result
}

async fn extract_into(
    cfg: &SnapshotConfig,
    ws: &Workspace,
    repo_url: &str,
    include_files: bool,
) -> Result<AnalysisResult> {
    let git = GitCli::new(cfg.git_bin.clone());

    let target = ws.path().to_string_lossy().into_owned();
    info!(path = %target, "begin clone");
    let clone_args = ["clone", "--quiet", "--", repo_url, &target];
    git.run(None, &clone_args, cfg.clone_timeout).await?;
    info!("clone completed");

    let hashes = history::list_hashes(&git, ws.path(), cfg.fetch_timeout).await?;
    let commits = history::collect_commits(
        &git,
        ws.path(),
        hashes,
        cfg.fetch_concurrency,
        cfg.fetch_timeout,
    )
    .await?;
    info!(commits = commits.len(), "history collected");

    let files = if include_files {
        let root = ws.path().to_path_buf();
        let files = tokio::task::spawn_blocking(move || tree::snapshot_tree(&root)).await??;
        Some(files)
    } else {
        None
    };

    Ok(AnalysisResult { commits, files })
}
