//! Extraction schema inference for HTML pages
//!
//! Given a loaded document, finds the repeated item container and infers
//! typed field selectors inside it:
//! - Pattern mining over shared semantic classes
//! - Multi-factor pattern scoring with a content diversity gate
//! - Link / image / text field discovery with type classification
//! - Per-field confidence and name deduplication
//!
//! The engine works on any `Document`; `HtmlDocument` (scraper) and
//! `fetch_document_blocking` (ureq) are the bundled providers.

pub mod document;
pub mod error;
pub mod fetch;
pub mod ffi;
pub mod inference;
pub mod report;

pub use document::{Document, DocumentElement, HtmlDocument};
pub use error::{InferError, Result};
pub use fetch::{fetch_document_blocking, FetchOptions};
pub use inference::{
    analyze, analyze_at, rank_patterns, Analysis, Field, FieldType, InferOptions, PatternReport,
    Schema,
};
pub use report::Reporter;
