//! Working-tree snapshot at the final commit.
//!
//! An entry is skipped when its repository-relative path contains any of
//! [`IGNORED_FRAGMENTS`] as a plain substring. This is not path-segment
//! matching: `mybuild.log` and `distance.rs` are skipped too, which is the
//! behavior the dashboard has always had.

use std::{fs, path::Path};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::{errors::Result, model::FileSnapshot};

/// Substrings that exclude an entry from the snapshot.
pub const IGNORED_FRAGMENTS: [&str; 6] = [".git", "node_modules", "dist", "build", ".cache", ".DS_Store"];

/// `true` if `rel_path` contains any ignored fragment.
pub fn is_ignored(rel_path: &str) -> bool {
    IGNORED_FRAGMENTS.iter().any(|f| rel_path.contains(f))
}

/// Lower-cased suffix after the last dot of `filename`, empty if none.
///
/// A leading dot alone (`.env`) does not count as an extension.
pub fn extension_of(filename: &str) -> String {
    match filename.rfind('.') {
        Some(i) if i > 0 && i + 1 < filename.len() => filename[i + 1..].to_ascii_lowercase(),
        _ => String::new(),
    }
}

/// Walks `root` and returns every readable text file, sorted by path.
///
/// Directory traversal errors are fatal. A file that cannot be read as
/// UTF-8 text (binary, permissions, vanished) is skipped with a warning.
pub fn snapshot_tree(root: &Path) -> Result<Vec<FileSnapshot>> {
    info!("tree: start -> {}", root.display());

    let mut skipped_unreadable = 0usize;
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_ignored(&relative(root, e.path())));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let rel = relative(root, path);

        let content = match fs::read(path).map(String::from_utf8) {
            Ok(Ok(text)) => text,
            Ok(Err(_)) => {
                skipped_unreadable += 1;
                warn!("tree: skip non-utf8 {}", rel);
                continue;
            }
            Err(err) => {
                skipped_unreadable += 1;
                warn!("tree: failed to read {}: {}", rel, err);
                continue;
            }
        };

        let filename = entry.file_name().to_string_lossy().into_owned();
        debug!("tree: file {} ({}B)", rel, content.len());

        files.push(FileSnapshot {
            extension: extension_of(&filename),
            filename,
            path: rel,
            size: content.len() as u64,
            content,
        });
    }

    info!(
        "tree: done files={} skipped_unreadable={}",
        files.len(),
        skipped_unreadable
    );
    Ok(files)
}

/// `/`-separated path of `path` relative to `root`.
fn relative(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, bytes: &[u8]) {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, bytes).unwrap();
    }

    #[test]
    fn keeps_only_source_outside_ignored_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, ".git/HEAD", b"ref: refs/heads/main\n");
        write(root, "node_modules/left-pad/index.js", b"module.exports = 1;");
        write(root, "src/main.ts", b"console.log('hi');\n");

        let files = snapshot_tree(root).unwrap();
        assert_eq!(files.len(), 1);
        let f = &files[0];
        assert_eq!(f.path, "src/main.ts");
        assert_eq!(f.filename, "main.ts");
        assert_eq!(f.extension, "ts");
        assert_eq!(f.content, "console.log('hi');\n");
        assert_eq!(f.size, 19);
    }

    #[test]
    fn substring_matching_also_skips_lookalike_names() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "mybuild.log", b"x");
        write(root, "src/distance.rs", b"x");
        write(root, "src/lib.rs", b"x");

        let paths: Vec<String> = snapshot_tree(root).unwrap().into_iter().map(|f| f.path).collect();
        assert_eq!(paths, vec!["src/lib.rs"]);
    }

    #[test]
    fn binary_files_are_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "logo.png", &[0x89, 0x50, 0x4e, 0x47, 0xff, 0xfe, 0x00]);
        write(root, "README.MD", b"# hi");

        let files = snapshot_tree(root).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].extension, "md");
    }

    #[test]
    fn extension_rules() {
        assert_eq!(extension_of("Main.TS"), "ts");
        assert_eq!(extension_of("Makefile"), "");
        assert_eq!(extension_of(".env"), "");
        assert_eq!(extension_of("archive.tar.gz"), "gz");
        assert_eq!(extension_of("trailing."), "");
    }

    #[test]
    fn ignore_list_is_substring_based() {
        assert!(is_ignored(".github/workflows/ci.yml"));
        assert!(is_ignored("web/.cache/x"));
        assert!(!is_ignored("src/app.rs"));
    }
}
