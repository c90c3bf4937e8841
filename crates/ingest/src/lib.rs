//! # Repodoc Ingest
//!
//! Repository ingestion: a transient shallow clone, one bounded walk, and
//! per-file units of documentation work.
//!
//! ## Pipeline
//!
//! ```text
//! Repository URL
//!     │
//!     ├──> Workspace (shallow clone in a temp dir, pinned to a commit)
//!     │
//!     ├──> Walker (single depth-first pass)
//!     │      ├─> structure listing (every entry)
//!     │      └─> file map (Filter Policy + extraction cap)
//!     │
//!     └──> Units (structural digest or fenced raw text per file)
//! ```
//!
//! The clone is removed before [`ingest_repository`] returns, whatever the outcome.
//!
//! ## Example
//!
//! ```no_run
//! use repodoc_ingest::{ingest_repository, prepare_units, Credentials, IngestConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = IngestConfig::default();
//!     let output = ingest_repository(
//!         "https://github.com/acme/widgets.git",
//!         &Credentials::default(),
//!         &config,
//!     )
//!     .await?;
//!
//!     print!("{}", output.walk.structure);
//!     for unit in prepare_units(&output.walk, &config) {
//!         println!("{}: {}", unit.path, unit.digest.render());
//!     }
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod filter;
mod pipeline;
mod repo_ref;
mod walker;
mod workspace;

pub use config::{
    IngestConfig, DEFAULT_CLONE_TIMEOUT_SECS, DEFAULT_MAX_FILES, DEFAULT_MAX_FILE_BYTES,
};
pub use error::{IngestError, Result};
pub use filter::{ExtractionBudget, FilterPolicy, IgnoreRuleSet, DEFAULT_IGNORE_PATTERNS};
pub use pipeline::{
    ingest_repository, prepare_units, walk_tree, DocumentationUnit, FileDigest, IngestOutput,
};
pub use repo_ref::{redact_url, RepoRef};
pub use walker::{
    EntryKind, ExtractedFile, FileEntry, RepositoryWalker, SkippedFile, WalkOutput,
};
pub use workspace::{Credentials, Workspace};
