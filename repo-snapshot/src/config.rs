//! Extraction knobs, read once at startup.

use std::{path::PathBuf, time::Duration};

/// Runtime configuration for [`extract`](crate::extract).
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    /// Parent directory of the per-request workspaces.
    pub workspace_root: PathBuf,
    /// Git executable (`git` on `PATH` by default).
    pub git_bin: String,
    /// Upper bound for `git clone`.
    pub clone_timeout: Duration,
    /// Upper bound for each per-commit `git` invocation.
    pub fetch_timeout: Duration,
    /// Commits whose metadata/files/diff are fetched at the same time.
    pub fetch_concurrency: usize,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            workspace_root: std::env::temp_dir().join("ai-jury"),
            git_bin: "git".to_string(),
            clone_timeout: Duration::from_secs(300),
            fetch_timeout: Duration::from_secs(60),
            fetch_concurrency: 8,
        }
    }
}

impl SnapshotConfig {
    /// Reads `WORKSPACE_ROOT`, `GIT_BIN`, `GIT_CLONE_TIMEOUT_SECS`,
    /// `GIT_FETCH_TIMEOUT_SECS` and `GIT_FETCH_CONCURRENCY` through
    /// `lookup`; unset or unparsable values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let secs = |name: &str, default_: Duration| {
            get(name)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|s| *s > 0)
                .map(Duration::from_secs)
                .unwrap_or(default_)
        };

        Self {
            workspace_root: get("WORKSPACE_ROOT")
                .map(PathBuf::from)
                .unwrap_or(d.workspace_root),
            git_bin: get("GIT_BIN").unwrap_or(d.git_bin),
            clone_timeout: secs("GIT_CLONE_TIMEOUT_SECS", d.clone_timeout),
            fetch_timeout: secs("GIT_FETCH_TIMEOUT_SECS", d.fetch_timeout),
            fetch_concurrency: get("GIT_FETCH_CONCURRENCY")
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(d.fetch_concurrency)
                .max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_overrides_and_clamps() {
        let cfg = SnapshotConfig::from_lookup(|name| match name {
            "WORKSPACE_ROOT" => Some("/var/jury".into()),
            "GIT_CLONE_TIMEOUT_SECS" => Some("30".into()),
            "GIT_FETCH_TIMEOUT_SECS" => Some("nope".into()),
            "GIT_FETCH_CONCURRENCY" => Some("0".into()),
            _ => None,
        });
        assert_eq!(cfg.workspace_root, PathBuf::from("/var/jury"));
        assert_eq!(cfg.git_bin, "git");
        assert_eq!(cfg.clone_timeout, Duration::from_secs(30));
        assert_eq!(cfg.fetch_timeout, Duration::from_secs(60));
        assert_eq!(cfg.fetch_concurrency, 1);
    }
}
