use crate::config::IngestConfig;
use crate::error::{IngestError, Result};
use crate::filter::ExtractionBudget;
use crate::repo_ref::RepoRef;
use crate::walker::{RepositoryWalker, WalkOutput};
use crate::workspace::{Credentials, Workspace};
use repodoc_summarizer::{Language, StructuralNode, Summarizer};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Everything extracted from one repository at one commit
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestOutput {
    pub repository: RepoRef,
    pub branch: String,
    pub commit: String,
    #[serde(flatten)]
    pub walk: WalkOutput,
}

/// Clone, pin, walk. The clone is gone by the time this returns, on every path.
pub async fn ingest_repository(
    url: &str,
    credentials: &Credentials,
    config: &IngestConfig,
) -> Result<IngestOutput> {
    config.validate()?;
    let workspace = Workspace::acquire(url, credentials, config).await?;
    let walk = walk_tree(workspace.path(), config).await?;
    let output = IngestOutput {
        repository: RepoRef::parse(url),
        branch: workspace.branch().to_string(),
        commit: workspace.commit().to_string(),
        walk,
    };
    workspace.close();

    log::info!(
        "Extracted {} of {} listed entries from {} ({})",
        output.walk.file_contents.len(),
        output.walk.listing_len(),
        output.repository.display_name(),
        output.commit
    );
    Ok(output)
}

/// Walk an already checked-out tree on the blocking pool
pub async fn walk_tree(root: &Path, config: &IngestConfig) -> Result<WalkOutput> {
    let walker = RepositoryWalker::new(root, config.filter_policy());
    let mut budget = ExtractionBudget::new(config.max_files);
    tokio::task::spawn_blocking(move || walker.walk(&mut budget))
        .await
        .map_err(|e| IngestError::Other(format!("walk task failed: {e}")))?
}

/// What gets handed to the generator for one file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "format", content = "digest", rename_all = "lowercase")]
pub enum FileDigest {
    Structural(StructuralNode),
    /// Fenced raw source
    Raw(String),
}

impl FileDigest {
    /// Text embedded in a prompt
    pub fn render(&self) -> String {
        match self {
            FileDigest::Structural(node) => node.to_digest(),
            FileDigest::Raw(fenced) => fenced.clone(),
        }
    }

    pub fn is_structural(&self) -> bool {
        matches!(self, FileDigest::Structural(_))
    }
}

/// One independent unit of documentation work
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentationUnit {
    pub path: String,
    #[serde(serialize_with = "language_name")]
    pub language: Language,
    #[serde(flatten)]
    pub digest: FileDigest,
}

fn language_name<S: serde::Serializer>(
    language: &Language,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(language.as_str())
}

/// Turn every extracted file into a unit, summarizing where a grammar exists.
///
/// Summarization failures degrade to raw text; one parser per language is reused.
pub fn prepare_units(walk: &WalkOutput, config: &IngestConfig) -> Vec<DocumentationUnit> {
    let mut summarizers: HashMap<Language, Summarizer> = HashMap::new();
    walk.file_contents
        .values()
        .map(|file| {
            let language = file.language();
            let digest = if config.summarize && language.supports_summary() {
                summarize_with(&mut summarizers, language, file.source())
                    .map(FileDigest::Structural)
                    .unwrap_or_else(|e| {
                        log::warn!("Summarization of {} failed, using raw text: {e}", file.path);
                        FileDigest::Raw(file.content.clone())
                    })
            } else {
                FileDigest::Raw(file.content.clone())
            };
            DocumentationUnit {
                path: file.path.clone(),
                language,
                digest,
            }
        })
        .collect()
}

fn summarize_with(
    cache: &mut HashMap<Language, Summarizer>,
    language: Language,
    source: &str,
) -> repodoc_summarizer::Result<StructuralNode> {
    let summarizer = match cache.entry(language) {
        std::collections::hash_map::Entry::Occupied(slot) => slot.into_mut(),
        std::collections::hash_map::Entry::Vacant(slot) => slot.insert(Summarizer::new(language)?),
    };
    summarizer.summarize(source)
}
