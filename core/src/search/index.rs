use super::patterns::build_matcher;
use crate::error::Result;
use globset::GlobMatcher;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A regular file seen during a walk
#[derive(Debug, Clone)]
struct IndexedFile {
    path: PathBuf,
    name: String,
}

/// Listing of every regular file under a root, in discovery order
///
/// Built with a single recursive walk so that repeated lookups for many
/// cases do not each traverse the tree again.
///
/// Discovery order is deterministic: directory entries are visited sorted
/// by file name. Symbolic links are not followed and never listed. Hidden
/// directories below the root, files whose path is not valid UTF-8 and
/// unreadable entries are logged and ignored.
#[derive(Debug, Clone, Default)]
pub struct FileIndex {
    root: PathBuf,
    files: Vec<IndexedFile>,
}

impl FileIndex {
    /// Walks `root` and records every regular file
    ///
    /// A root that does not exist yields an empty index.
    pub fn scan(root: &Path) -> Self {
        let root = absolute_root(root);
        let mut files = Vec::new();

        let walker = WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden_dir(e));

        for entry in walker {
            match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }
                    // Paths are written to the manifest as text, so they must be UTF-8
                    if entry.path().to_str().is_none() {
                        log::debug!("Skipping non-UTF-8 path {}", entry.path().display());
                        continue;
                    }
                    if let Some(name) = entry.file_name().to_str() {
                        files.push(IndexedFile {
                            name: name.to_string(),
                            path: entry.into_path(),
                        });
                    }
                }
                Err(e) => {
                    log::debug!("Skipping unreadable entry under {}: {}", root.display(), e);
                }
            }
        }

        log::debug!("Indexed {} files under {}", files.len(), root.display());
        Self { root, files }
    }

    /// Absolute root this index was built from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of regular files indexed
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if no regular file was found
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Returns the first file matching `patterns`
    ///
    /// Patterns are tried in order; within one pattern the first file in
    /// discovery order wins. Each file is listed once, so a file matched by
    /// several patterns cannot be selected twice.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is not a valid glob.
    pub fn find_first(&self, patterns: &[String]) -> Result<Option<PathBuf>> {
        let matchers = patterns
            .iter()
            .map(|p| build_matcher(p))
            .collect::<Result<Vec<GlobMatcher>>>()?;
        Ok(self.find_first_compiled(&matchers))
    }

    fn find_first_compiled(&self, matchers: &[GlobMatcher]) -> Option<PathBuf> {
        matchers.iter().find_map(|matcher| {
            self.files
                .iter()
                .find(|file| matcher.is_match(&file.name))
                .map(|file| file.path.clone())
        })
    }
}

/// Searches `root` recursively for the first regular file matching `patterns`
///
/// Selection follows [`FileIndex::find_first`]: pattern order first, then
/// discovery order. Performs one walk per call; use [`FileIndex`] directly
/// when resolving many cases against the same tree.
///
/// # Errors
///
/// Returns an error only if a pattern is not a valid glob. Missing roots and
/// unreadable directories are treated as having no matches.
pub fn find_first_regular_file(root: &Path, patterns: &[String]) -> Result<Option<PathBuf>> {
    let matchers = patterns
        .iter()
        .map(|p| build_matcher(p))
        .collect::<Result<Vec<GlobMatcher>>>()?;
    Ok(FileIndex::scan(root).find_first_compiled(&matchers))
}

/// Resolves the root to an absolute path, following symlinks when it exists
fn absolute_root(root: &Path) -> PathBuf {
    fs::canonicalize(root)
        .or_else(|_| std::path::absolute(root))
        .unwrap_or_else(|_| root.to_path_buf())
}

fn is_hidden_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}
