//! Commit history reconstruction.
//!
//! 1. `git log --reverse --format=%H` gives the hashes oldest first.
//! 2. For every hash, metadata, touched paths and the patch are fetched
//!    concurrently (`try_join!`).
//! 3. Commits are processed through an ordered, bounded stream, so the
//!    output has exactly the order and length of the hash list.

use std::path::Path;

use chrono::{DateTime, SecondsFormat};
use futures::{StreamExt, TryStreamExt, stream};
use tracing::{debug, instrument};

use crate::{
    errors::{ExtractionError, Result},
    git_cli::GitCli,
    model::CommitRecord,
};

/// Pretty format for the metadata line: `hash|author|email|epoch|subject`.
const META_FORMAT: &str = "--format=%H|%an|%ae|%at|%s";

/// Lists commit hashes of `HEAD`, oldest first.
pub async fn list_hashes(git: &GitCli, repo: &Path, timeout: std::time::Duration) -> Result<Vec<String>> {
    let out = git
        .run(Some(repo), &["log", "--reverse", "--format=%H"], timeout)
        .await?;
    Ok(out
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Builds the [`CommitRecord`] of every hash, preserving order.
///
/// At most `concurrency` commits are in flight; the first failure aborts
/// the whole history.
#[instrument(skip_all, fields(commits = hashes.len(), concurrency = concurrency))]
pub async fn collect_commits(
    git: &GitCli,
    repo: &Path,
    hashes: Vec<String>,
    concurrency: usize,
    timeout: std::time::Duration,
) -> Result<Vec<CommitRecord>> {
    stream::iter(hashes)
        .map(|hash| async move { fetch_commit(git, repo, &hash, timeout).await })
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}

/// Fetches metadata, changed files and diff of one commit.
pub async fn fetch_commit(
    git: &GitCli,
    repo: &Path,
    hash: &str,
    timeout: std::time::Duration,
) -> Result<CommitRecord> {
    let meta_args = ["show", "-s", META_FORMAT, hash];
    let files_args = ["diff-tree", "--root", "--no-commit-id", "--name-only", "-r", hash];
    let diff_args = ["show", "--pretty=format:", "--patch", hash];
    let (meta, files, diff) = tokio::try_join!(
        git.run(Some(repo), &meta_args, timeout),
        git.run(Some(repo), &files_args, timeout),
        git.run(Some(repo), &diff_args, timeout),
    )?;

    let meta = parse_metadata(&meta)?;
    debug!(hash = %meta.hash, "commit fetched");

    Ok(CommitRecord {
        hash: meta.hash,
        author: meta.author,
        email: meta.email,
        timestamp: meta.timestamp,
        message: meta.message,
        changed_files: parse_changed_files(&files),
        diff: diff.trim().to_string(),
    })
}

#[derive(Debug, PartialEq, Eq)]
struct CommitMeta {
    hash: String,
    author: String,
    email: String,
    timestamp: String,
    message: String,
}

/// Parses `hash|author|email|epoch|subject`.
///
/// Author and email must not contain `|`. The subject may: everything after
/// the fourth delimiter belongs to it.
fn parse_metadata(raw: &str) -> Result<CommitMeta> {
    let line = raw.trim();
    let mut parts = line.splitn(5, '|');
    let mut next = |what: &str| {
        parts
            .next()
            .map(str::to_string)
            .ok_or_else(|| ExtractionError::MalformedLog(format!("missing {what} in `{line}`")))
    };

    let hash = next("hash")?;
    let author = next("author")?;
    let email = next("email")?;
    let epoch = next("timestamp")?;
    let message = next("subject").unwrap_or_default();

    if hash.len() != 40 || !hash.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ExtractionError::MalformedLog(format!("bad object id `{hash}`")));
    }

    Ok(CommitMeta {
        hash,
        author,
        email,
        timestamp: epoch_to_iso(&epoch)?,
        message,
    })
}

/// `1700000000` → `2023-11-14T22:13:20.000Z`.
pub fn epoch_to_iso(epoch: &str) -> Result<String> {
    let secs: i64 = epoch
        .trim()
        .parse()
        .map_err(|_| ExtractionError::MalformedLog(format!("bad epoch seconds `{epoch}`")))?;
    let dt = DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| ExtractionError::MalformedLog(format!("epoch out of range `{epoch}`")))?;
    Ok(dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// One path per line; blank lines dropped, first occurrence kept.
fn parse_changed_files(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if !out.iter().any(|p| p == line) {
            out.push(line.to_string());
        }
    }
    out
}
