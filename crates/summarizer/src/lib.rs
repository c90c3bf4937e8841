//! # Repodoc Summarizer
//!
//! Lossy, documentation-oriented structural digests of JavaScript/TypeScript sources.
//!
//! ## Philosophy
//!
//! The digest is not an AST. It keeps what a reader needs to document a file:
//! - Declarations (functions, classes, interfaces, enums, type aliases, variables)
//! - Signatures (parameters with types and optionality, return types)
//! - Module wiring (imports and exports)
//! - A coarse logic-flow skeleton for every function-like body
//!
//! Everything else is pruned.
//!
//! ## Architecture
//!
//! ```text
//! Source Code
//!     │
//!     ├──> Language Detection (from extension)
//!     │
//!     ├──> Tree-sitter Parsing → syntax tree
//!     │
//!     ├──> Declaration pass (one top-down walk)
//!     │    ├─> SyntaxCategory → handler
//!     │    └─> unrecognized → recurse, prune if empty
//!     │
//!     └──> Logic-flow pass (per function body)
//!          └─> if / return / call / loop / switch / try skeleton
//! ```
//!
//! ## Example
//!
//! ```rust
//! use repodoc_summarizer::{Language, NodeKind, Summarizer};
//!
//! let mut summarizer = Summarizer::new(Language::TypeScript).unwrap();
//! let digest = summarizer
//!     .summarize("export function add(a: number, b: number): number { return a + b; }")
//!     .unwrap();
//!
//! assert_eq!(digest.kind, NodeKind::Module);
//! assert_eq!(digest.children[0].name.as_deref(), Some("add"));
//! println!("{}", digest.to_digest());
//! ```

mod error;
mod language;
mod logic_flow;
mod summarizer;
mod syntax;
mod types;

pub use error::{Result, SummarizerError};
pub use language::{Language, SUPPORTED_EXTENSIONS};
pub use summarizer::{summarize, Summarizer};
pub use types::{
    ConstructKind, ExportDetail, ExportElement, ImportDetail, ImportElement, LogicNode, NodeKind,
    Parameter, Signature, StructuralNode,
};
