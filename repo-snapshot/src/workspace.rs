//! Disposable per-request clone directories.
//!
//! The directory name is `<sanitized key>_<uuid>`: readable in logs, and
//! unique even when two requests carry the same team name. The key part is
//! capped at [`MAX_KEY_LEN`] characters so the name stays well under the
//! usual 255-byte file name limit.
//!
//! Filesystem work runs on the blocking pool. Callers release the
//! directory with [`Workspace::cleanup`]; if the guard is dropped instead
//! (panic, cancelled request) `Drop` removes it synchronously.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tokio::task;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::Result;

/// Longest sanitized key kept in a workspace name.
pub const MAX_KEY_LEN: usize = 64;

/// Replaces every character outside `[A-Za-z0-9]` with `_` and keeps at
/// most [`MAX_KEY_LEN`] characters.
pub fn sanitize_key(key: &str) -> String {
    key.chars()
        .take(MAX_KEY_LEN)
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Scoped workspace directory.
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
    released: bool,
}

impl Workspace {
    /// Reserves a fresh path under `root` for `key`.
    ///
    /// `root` is created if missing and any leftover at the target path is
    /// removed. The workspace directory itself is not created here:
    /// `git clone` wants to create it.
    pub async fn acquire(root: &Path, key: &str) -> Result<Self> {
        let name = format!("{}_{}", sanitize_key(key), Uuid::new_v4().simple());
        let path = root.join(name);

        let root = root.to_path_buf();
        let target = path.clone();
        task::spawn_blocking(move || -> io::Result<()> {
            fs::create_dir_all(&root)?;
            remove_best_effort(&target);
            Ok(())
        })
        .await??;

        debug!(path = %path.display(), "workspace acquired");
        Ok(Self {
            path,
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the directory tree off the async workers.
    pub async fn cleanup(mut self) {
        let path = self.path.clone();
        match task::spawn_blocking(move || remove_best_effort(&path)).await {
            Ok(()) => self.released = true,
            // Leave `released` unset so `Drop` retries.
            Err(e) => warn!(error = %e, "workspace cleanup task failed"),
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if !self.released {
            remove_best_effort(&self.path);
        }
    }
}

/// Removes `path` recursively; a missing directory is not an error.
fn remove_best_effort(path: &Path) {
    match fs::remove_dir_all(path) {
        Ok(()) => debug!(path = %path.display(), "workspace removed"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "failed to remove workspace"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_everything_but_ascii_alnum() {
        assert_eq!(sanitize_key("Team Rocket/42!"), "Team_Rocket_42_");
        assert_eq!(sanitize_key("../../etc"), "______etc");
        assert_eq!(sanitize_key("Ünïcode"), "_n_code");
    }

    #[test]
    fn long_keys_are_capped() {
        let key = "Team ".repeat(60);
        let s = sanitize_key(&key);
        assert_eq!(s.len(), MAX_KEY_LEN);
        assert!(s.starts_with("Team_Team_"));
    }

    #[tokio::test]
    async fn long_key_yields_creatable_name() {
        let root = tempfile::tempdir().unwrap();
        let ws = Workspace::acquire(root.path(), &"Team ".repeat(60)).await.unwrap();
        let name_len = ws.path().file_name().unwrap().len();
        assert!(name_len <= MAX_KEY_LEN + 1 + 32, "{name_len}");
        fs::create_dir(ws.path()).unwrap();
        ws.cleanup().await;
    }

    #[tokio::test]
    async fn same_key_gets_distinct_paths() {
        let root = tempfile::tempdir().unwrap();
        let a = Workspace::acquire(root.path(), "team a").await.unwrap();
        let b = Workspace::acquire(root.path(), "team a").await.unwrap();
        assert_ne!(a.path(), b.path());
        assert!(a.path().starts_with(root.path()));
        let name = a.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("team_a_"));
    }

    #[tokio::test]
    async fn cleanup_removes_directory_tree() {
        let root = tempfile::tempdir().unwrap();
        let ws = Workspace::acquire(root.path(), "t").await.unwrap();
        let path = ws.path().to_path_buf();
        fs::create_dir_all(path.join("nested/deeper")).unwrap();
        fs::write(path.join("nested/file.txt"), "x").unwrap();

        ws.cleanup().await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn drop_removes_directory_tree() {
        let root = tempfile::tempdir().unwrap();
        let ws = Workspace::acquire(root.path(), "t").await.unwrap();
        let path = ws.path().to_path_buf();
        fs::create_dir_all(path.join("nested")).unwrap();

        drop(ws);
        assert!(!path.exists());
    }
}
