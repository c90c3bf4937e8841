//! # Repodoc Generation
//!
//! Turns prepared documentation units into Markdown through a pluggable
//! text-generation backend.
//!
//! ## Flow
//!
//! ```text
//! DocumentationUnit ──> build_prompt ──> TextGenerator::generate
//!                                              │
//!                                              └─> FileGeneration (fragment stream, abortable)
//! ```
//!
//! Every file is generated independently; [`generate_all`] runs them
//! concurrently and reassembles the results by path.
//!
//! ## Example
//!
//! ```rust
//! use repodoc_generation::{FragmentStream, GenerationOptions, TextGenerator};
//!
//! struct Echo;
//!
//! impl TextGenerator for Echo {
//!     fn name(&self) -> &str {
//!         "echo"
//!     }
//!
//!     fn generate(&self, prompt: String, _options: &GenerationOptions) -> FragmentStream<'_> {
//!         Box::pin(futures::stream::iter(vec![Ok(prompt)]))
//!     }
//! }
//! ```

mod backend;
mod error;
mod options;
mod prompt;
mod stream;

pub use backend::{FragmentStream, TextGenerator};
pub use error::{GenerationError, Result};
pub use options::GenerationOptions;
pub use prompt::build_prompt;
pub use stream::{generate_all, start_generation, AbortHandle, Documentation, FileGeneration};
pub use tokio_util::sync::CancellationToken;
