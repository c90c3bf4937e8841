use crate::error::{IngestError, Result};
use crate::filter::{ExtractionBudget, FilterPolicy};
use repodoc_summarizer::Language;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Kind of a visited tree entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
    /// Symlinks, sockets and anything else that is neither
    Unknown,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
            EntryKind::Unknown => "unknown",
        }
    }
}

/// One visited entry of the working tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Repository-relative, forward-slash separated
    pub path: String,
    pub kind: EntryKind,
}

impl FileEntry {
    pub fn depth(&self) -> usize {
        self.path.split('/').count()
    }

    /// `  src/lib.ts (file)`: two spaces per level below the root
    pub fn listing_line(&self) -> String {
        format!(
            "{}{} ({})",
            "  ".repeat(self.depth().saturating_sub(1)),
            self.path,
            self.kind.as_str()
        )
    }
}

/// Fenced content of one extracted file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedFile {
    pub path: String,
    /// Raw content wrapped in a code fence labelled with the file's language
    pub content: String,
    /// The fence closed on a line of its own that the raw text lacked
    #[serde(skip)]
    newline_added: bool,
}

impl ExtractedFile {
    pub fn new(path: impl Into<String>, raw: &str) -> Self {
        let path = path.into();
        let content = Language::from_path(&path).fence(raw);
        Self {
            path,
            content,
            newline_added: !raw.ends_with('\n'),
        }
    }

    pub fn language(&self) -> Language {
        Language::from_path(&self.path)
    }

    /// The raw text inside the fence
    pub fn source(&self) -> &str {
        let body = self
            .content
            .split_once('\n')
            .map_or("", |(_, rest)| rest);
        let body = body.strip_suffix("```").unwrap_or(body);
        if self.newline_added {
            body.strip_suffix('\n').unwrap_or(body)
        } else {
            body
        }
    }
}

/// A file that passed the filter but could not be extracted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

/// Result of one walk: complete listing plus the bounded file map
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkOutput {
    pub structure: String,
    pub file_contents: BTreeMap<String, ExtractedFile>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedFile>,
    /// Eligible files were left out because the cap was reached
    pub truncated: bool,
}

impl WalkOutput {
    pub fn listing_len(&self) -> usize {
        self.structure.lines().count()
    }
}

/// Depth-first walker over a checked-out working tree
pub struct RepositoryWalker {
    root: PathBuf,
    policy: FilterPolicy,
}

impl RepositoryWalker {
    pub fn new(root: impl AsRef<Path>, policy: FilterPolicy) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            policy,
        }
    }

    /// Walk once, listing every entry and extracting eligible files until the budget runs out.
    ///
    /// Directory descent continues after the budget is exhausted so the listing
    /// stays complete. Only an unreadable root is fatal.
    pub fn walk(&self, budget: &mut ExtractionBudget) -> Result<WalkOutput> {
        let meta = std::fs::metadata(&self.root).map_err(|source| IngestError::WalkRoot {
            path: self.root.clone(),
            source,
        })?;
        if !meta.is_dir() {
            return Err(IngestError::WalkRoot {
                path: self.root.clone(),
                source: std::io::Error::other("not a directory"),
            });
        }

        let mut output = WalkOutput::default();
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.file_name() != ".git");

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("walk failed at root"));
                    return Err(IngestError::WalkRoot {
                        path: self.root.clone(),
                        source,
                    });
                }
                Err(e) => {
                    log::warn!("Failed to read entry: {e}");
                    continue;
                }
            };

            let Some(visited) = self.classify(&entry) else {
                continue;
            };
            output.structure.push_str(&visited.listing_line());
            output.structure.push('\n');

            if visited.kind == EntryKind::File {
                self.extract(&entry, &visited.path, budget, &mut output);
            }
        }

        log::debug!(
            "Walked {}: {} entries, {} extracted, {} skipped{}",
            self.root.display(),
            output.listing_len(),
            output.file_contents.len(),
            output.skipped.len(),
            if output.truncated { ", truncated" } else { "" }
        );
        Ok(output)
    }

    fn classify(&self, entry: &DirEntry) -> Option<FileEntry> {
        let relative = entry.path().strip_prefix(&self.root).ok()?;
        let path = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        let file_type = entry.file_type();
        let kind = if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Unknown
        };
        Some(FileEntry { path, kind })
    }

    fn extract(
        &self,
        entry: &DirEntry,
        path: &str,
        budget: &mut ExtractionBudget,
        output: &mut WalkOutput,
    ) {
        if !self.policy.should_include(path) {
            log::debug!("Filtered out {path}");
            return;
        }
        if !budget.has_room() {
            log::debug!("Extraction cap reached, not reading {path}");
            output.truncated = true;
            return;
        }

        match self.read(entry) {
            Ok(raw) => {
                budget.consume();
                output
                    .file_contents
                    .insert(path.to_string(), ExtractedFile::new(path, &raw));
            }
            Err(reason) => {
                log::warn!("Skipping {path}: {reason}");
                output.skipped.push(SkippedFile {
                    path: path.to_string(),
                    reason,
                });
            }
        }
    }

    fn read(&self, entry: &DirEntry) -> std::result::Result<String, String> {
        let len = entry
            .metadata()
            .map_err(|e| format!("metadata unavailable: {e}"))?
            .len();
        if !self.policy.fits(len) {
            return Err(format!(
                "{len} bytes exceeds the {} byte limit",
                self.policy.max_file_bytes()
            ));
        }
        let bytes = std::fs::read(entry.path()).map_err(|e| format!("read failed: {e}"))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
