//! Analysis parameters

use serde::{Deserialize, Serialize};

use super::fields::FieldType;

/// Parameters for one analysis run
///
/// Every field has a default, so a partial JSON object (or `{}`) decodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferOptions {
    /// Minimum group size for a candidate pattern
    pub min_items: usize,
    /// Candidates whose first match is deeper than this are discarded before scoring
    pub max_depth: Option<usize>,
    /// Use this container selector directly instead of mining
    pub container_selector: Option<String>,
    /// Elements inside any of these selectors are removed from mining input.
    /// Selectors that fail to parse are skipped.
    pub exclude_selectors: Vec<String>,
    /// Also exclude navigation landmarks (nav, header, footer, ...)
    pub ignore_nav: bool,
    /// Minimum element-child count for an element to be clustered
    pub min_children: usize,
    /// Minimum trimmed text length (in chars) for an element to be clustered
    pub min_text_length: usize,
    /// Enable the table row / table selector bonus
    pub prefer_table: bool,
    /// Keep only fields of these types
    pub field_types: Option<Vec<FieldType>>,
    /// Record empty text and attribute values as field samples
    pub include_empty: bool,
    /// Minimum per-field confidence to keep a field
    pub confidence_threshold: f64,
    /// Number of containers walked during field extraction
    pub sample_size: usize,
    /// Keep per-term score breakdowns
    pub debug: bool,
    /// Return the full ranked candidate list alongside the schema
    pub list_patterns: bool,
}

impl Default for InferOptions {
    fn default() -> Self {
        Self {
            min_items: 3,
            max_depth: None,
            container_selector: None,
            exclude_selectors: Vec::new(),
            ignore_nav: false,
            min_children: 0,
            min_text_length: 0,
            prefer_table: false,
            field_types: None,
            include_empty: false,
            confidence_threshold: 0.7,
            sample_size: 5,
            debug: false,
            list_patterns: false,
        }
    }
}
