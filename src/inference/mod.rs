//! Schema inference engine
//!
//! Pipeline: mine candidate patterns, score and select one, extract fields
//! from its members, then filter and deduplicate them into a `Schema`.
//! A manual container selector skips mining and scoring.
//!
//! The engine never logs and never touches the network; diagnostics come
//! back as data in `Analysis`.

pub mod classes;
pub mod confidence;
pub mod fields;
pub mod miner;
pub mod options;
pub mod schema;
pub mod scorer;
pub mod text;

pub use classes::{is_semantic, semantic_classes};
pub use confidence::Field;
pub use fields::{classify_text, FieldType, RawField};
pub use miner::{CandidatePattern, SamplePreview};
pub use options::InferOptions;
pub use schema::{Schema, SchemaMeta};
pub use scorer::{ScoreBreakdown, ScoredPattern};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::document::Document;
use crate::error::{InferError, Result};
use text::truncate_chars;

const REPORT_SAMPLE_COUNT: usize = 3;
const REPORT_SAMPLE_LEN: usize = 80;

/// Summary of one candidate pattern for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternReport {
    pub selector: String,
    pub item_count: usize,
    pub depth: usize,
    /// `None` for a manual container selector, which is never scored
    pub score: Option<f64>,
    pub gated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
    pub samples: Vec<String>,
}

impl PatternReport {
    fn from_pattern<E>(pattern: &CandidatePattern<E>) -> Self {
        Self {
            selector: pattern.selector.clone(),
            item_count: pattern.item_count(),
            depth: pattern.depth,
            score: None,
            gated: false,
            breakdown: None,
            samples: pattern
                .samples
                .iter()
                .take(REPORT_SAMPLE_COUNT)
                .map(|s| truncate_chars(&text::collapse_whitespace(&s.text), REPORT_SAMPLE_LEN))
                .collect(),
        }
    }

    fn from_scored<E>(scored: &ScoredPattern<E>) -> Self {
        Self {
            score: Some(scored.score),
            gated: scored.gated,
            breakdown: scored.breakdown,
            ..Self::from_pattern(&scored.pattern)
        }
    }
}

/// Result of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub schema: Schema,
    /// The pattern the schema was built from
    pub selected: PatternReport,
    /// Full ranked list, only when `list_patterns` is set
    pub patterns: Vec<PatternReport>,
}

/// Mine and score without extracting fields.
///
/// Returns every candidate that passes the depth filter, best first,
/// including gated ones.
pub fn rank_patterns<D: Document>(doc: &D, options: &InferOptions) -> Result<Vec<PatternReport>> {
    let candidates = miner::mine(doc, options);
    if candidates.is_empty() {
        return Err(no_candidates(options));
    }
    let total = candidates.len();

    let ranked = scorer::rank(candidates, options);
    if ranked.is_empty() {
        return Err(all_too_deep(total, options));
    }
    Ok(ranked.iter().map(PatternReport::from_scored).collect())
}

/// Infer a schema, stamped with the current time
pub fn analyze<D: Document>(doc: &D, options: &InferOptions) -> Result<Analysis> {
    analyze_at(doc, options, Utc::now())
}

/// Infer a schema with an explicit `generated` timestamp.
///
/// Output is a pure function of the document, the options and `generated`.
pub fn analyze_at<D: Document>(
    doc: &D,
    options: &InferOptions,
    generated: DateTime<Utc>,
) -> Result<Analysis> {
    let (selected, patterns, item_count, min_items) = match options.container_selector.as_deref() {
        Some(selector) => {
            let pattern = miner::manual_pattern(doc, selector)?;
            let report = PatternReport::from_pattern(&pattern);
            (report, Vec::new(), pattern.item_count(), 1)
        }
        None => {
            let candidates = miner::mine(doc, options);
            if candidates.is_empty() {
                return Err(no_candidates(options));
            }
            let total = candidates.len();

            let ranked = scorer::rank(candidates, options);
            if ranked.is_empty() {
                return Err(all_too_deep(total, options));
            }

            let Some(best) = ranked.iter().find(|p| !p.gated) else {
                return Err(InferError::NoPatternsFound(format!(
                    "all {} candidate patterns repeat the same text (diversity below {})",
                    ranked.len(),
                    scorer::DIVERSITY_GATE
                )));
            };

            let report = PatternReport::from_scored(best);
            let item_count = best.pattern.item_count();
            let patterns = if options.list_patterns {
                ranked.iter().map(PatternReport::from_scored).collect()
            } else {
                Vec::new()
            };
            (report, patterns, item_count, options.min_items)
        }
    };

    let raw = fields::extract_fields(doc, &selected.selector, options)?;
    let fields = confidence::finalize_fields(raw, options);
    let confidence = confidence::schema_confidence(item_count, min_items, &fields);

    let schema = Schema {
        meta: SchemaMeta {
            url: doc.url().to_string(),
            generated,
            confidence,
            item_count,
        },
        container_selector: selected.selector.clone(),
        fields,
    };

    Ok(Analysis {
        schema,
        selected,
        patterns,
    })
}

fn no_candidates(options: &InferOptions) -> InferError {
    InferError::NoPatternsFound(format!(
        "no group of at least {} same-tag elements shares a semantic class \
         (min_children = {}, min_text_length = {}, {} exclusion selectors)",
        options.min_items,
        options.min_children,
        options.min_text_length,
        options.exclude_selectors.len()
    ))
}

fn all_too_deep(total: usize, options: &InferOptions) -> InferError {
    InferError::NoPatternsFound(format!(
        "all {} candidate patterns are deeper than max_depth = {}",
        total,
        options.max_depth.unwrap_or_default()
    ))
}
