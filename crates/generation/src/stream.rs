use crate::backend::{FragmentStream, TextGenerator};
use crate::error::{GenerationError, Result};
use crate::options::GenerationOptions;
use crate::prompt::build_prompt;
use futures::{Stream, StreamExt};
use repodoc_ingest::DocumentationUnit;
use std::collections::BTreeMap;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio_util::sync::CancellationToken;

/// Handle that stops one generation from anywhere
#[derive(Debug, Clone)]
pub struct AbortHandle(CancellationToken);

impl AbortHandle {
    pub fn abort(&self) {
        self.0.cancel();
    }

    pub fn is_aborted(&self) -> bool {
        self.0.is_cancelled()
    }
}

/// One file's generation in flight
///
/// Yields fragments as the backend produces them. After [`abort`](Self::abort)
/// the stream yields a single `Err(Cancelled)` and ends; fragments already
/// delivered stay valid.
pub struct FileGeneration<'a> {
    path: String,
    cancel: CancellationToken,
    fragments: FragmentStream<'a>,
}

impl<'a> FileGeneration<'a> {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn abort(&self) {
        self.cancel.cancel();
    }

    pub fn abort_handle(&self) -> AbortHandle {
        AbortHandle(self.cancel.clone())
    }

    /// Drain the remaining fragments into one string
    pub async fn into_text(mut self) -> Result<String> {
        let mut text = String::new();
        while let Some(fragment) = self.next().await {
            text.push_str(&fragment?);
        }
        Ok(text)
    }
}

impl Stream for FileGeneration<'_> {
    type Item = Result<String>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.fragments.as_mut().poll_next(cx)
    }
}

/// Start generating documentation for one unit
pub fn start_generation<'a>(
    generator: &'a dyn TextGenerator,
    unit: &DocumentationUnit,
    prompt: String,
    options: &GenerationOptions,
) -> FileGeneration<'a> {
    start_with_token(generator, unit, prompt, options, CancellationToken::new())
}

fn start_with_token<'a>(
    generator: &'a dyn TextGenerator,
    unit: &DocumentationUnit,
    prompt: String,
    options: &GenerationOptions,
    cancel: CancellationToken,
) -> FileGeneration<'a> {
    let delay = options.fragment_delay();
    let stop = cancel.clone();
    let path = unit.path.clone();
    log::debug!("Generating {path} with {}", generator.name());
    let mut source = generator.generate(prompt, options);

    let fragments = Box::pin(async_stream::stream! {
        let mut delivered = 0usize;
        loop {
            // `None` means aborted.
            let next = tokio::select! {
                biased;
                _ = stop.cancelled() => None,
                next = source.next() => Some(next),
            };
            let item = match next {
                None => {
                    yield Err(GenerationError::Cancelled);
                    break;
                }
                Some(None) => break,
                Some(Some(item)) => item,
            };

            if delivered > 0 && !delay.is_zero() {
                let aborted = tokio::select! {
                    biased;
                    _ = stop.cancelled() => true,
                    _ = tokio::time::sleep(delay) => false,
                };
                if aborted {
                    yield Err(GenerationError::Cancelled);
                    break;
                }
            }

            let failed = item.is_err();
            delivered += 1;
            yield item;
            if failed {
                break;
            }
        }
    });

    FileGeneration {
        path,
        cancel,
        fragments,
    }
}

/// Generated documentation keyed by path; each file succeeds or fails on its own
pub type Documentation = BTreeMap<String, Result<String>>;

/// Generate every unit concurrently.
///
/// Completion order is unspecified; results are reassembled by path.
/// Cancelling `cancel` stops every generation still in flight.
pub async fn generate_all(
    generator: &dyn TextGenerator,
    repo_name: &str,
    structure: &str,
    units: &[DocumentationUnit],
    options: &GenerationOptions,
    cancel: &CancellationToken,
) -> Result<Documentation> {
    options.validate()?;

    let tasks = units.iter().map(|unit| {
        let prompt = build_prompt(repo_name, structure, unit);
        let generation = start_with_token(generator, unit, prompt, options, cancel.child_token());
        async move {
            let path = generation.path().to_string();
            let outcome = generation.into_text().await;
            if let Err(e) = &outcome {
                log::warn!("Generation for {path} failed: {e}");
            }
            (path, outcome)
        }
    });

    Ok(futures::future::join_all(tasks).await.into_iter().collect())
}
