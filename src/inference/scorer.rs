//! Pattern scoring and selection
//!
//! Scoring system:
//! - diversity < 0.2 forces the score to -100 (repeated boilerplate such as
//!   menus must never win on item count alone)
//! - ln(item count) * 10
//! - up to +10 for depth close to 4
//! - diversity * 15
//! - up to +20 for an average of three or more child elements
//! - +25 for classed `tr` rows, +15 for table/tbody selectors (only with `prefer_table`)
//! - -15 for anchor containers
//!
//! The weights and the gate have no derivation beyond observed behaviour and
//! are kept fixed.

use serde::Serialize;

use super::miner::{CandidatePattern, SamplePreview};
use super::options::InferOptions;
use super::text::{collapse_whitespace, truncate_chars};

pub const DIVERSITY_GATE: f64 = 0.2;
pub const GATED_SCORE: f64 = -100.0;
pub const IDEAL_DEPTH: f64 = 4.0;

const DIVERSITY_SAMPLE_LIMIT: usize = 10;
const NORMALIZED_TEXT_LEN: usize = 50;
const NEUTRAL_DIVERSITY: f64 = 0.5;

const TR_TABLE_BONUS: f64 = 25.0;
const TABLE_SELECTOR_BONUS: f64 = 15.0;
const ANCHOR_PENALTY: f64 = -15.0;

/// Every scoring term, kept for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub diversity: f64,
    pub gated: bool,
    pub count: f64,
    pub depth: f64,
    pub diversity_bonus: f64,
    pub children: f64,
    pub table: f64,
    pub anchor: f64,
}

#[derive(Debug, Clone)]
pub struct ScoredPattern<E> {
    pub pattern: CandidatePattern<E>,
    pub score: f64,
    /// Diversity fell below the gate; the pattern is never selected
    pub gated: bool,
    /// Present only when diagnostics are requested
    pub breakdown: Option<ScoreBreakdown>,
}

/// Fraction of distinct normalized texts among the first samples.
///
/// Samples without text are ignored; with no text at all the result is 0.5.
pub fn diversity(samples: &[SamplePreview]) -> f64 {
    let texts: Vec<String> = samples
        .iter()
        .take(DIVERSITY_SAMPLE_LIMIT)
        .map(|s| truncate_chars(&collapse_whitespace(&s.text).to_lowercase(), NORMALIZED_TEXT_LEN))
        .filter(|t| !t.is_empty())
        .collect();

    if texts.is_empty() {
        return NEUTRAL_DIVERSITY;
    }

    let mut unique: Vec<&str> = Vec::new();
    for text in &texts {
        if !unique.contains(&text.as_str()) {
            unique.push(text);
        }
    }
    unique.len() as f64 / texts.len() as f64
}

fn table_bonus<E>(pattern: &CandidatePattern<E>) -> f64 {
    if pattern.tag == "tr" && !pattern.classes.is_empty() {
        TR_TABLE_BONUS
    } else if pattern.selector.contains("table") || pattern.selector.contains("tbody") {
        TABLE_SELECTOR_BONUS
    } else {
        0.0
    }
}

/// Score one pattern, returning the total and its terms
pub fn score_pattern<E>(pattern: &CandidatePattern<E>, prefer_table: bool) -> (f64, ScoreBreakdown) {
    let diversity = diversity(&pattern.samples);

    if diversity < DIVERSITY_GATE {
        let breakdown = ScoreBreakdown {
            diversity,
            gated: true,
            count: 0.0,
            depth: 0.0,
            diversity_bonus: 0.0,
            children: 0.0,
            table: 0.0,
            anchor: 0.0,
        };
        return (GATED_SCORE, breakdown);
    }

    let count = (pattern.item_count().max(1) as f64).ln() * 10.0;
    let depth = (10.0 - (pattern.depth as f64 - IDEAL_DEPTH).abs() * 2.0).max(0.0);
    let diversity_bonus = diversity * 15.0;

    let avg_children = if pattern.samples.is_empty() {
        0.0
    } else {
        let total: usize = pattern.samples.iter().map(|s| s.child_count).sum();
        total as f64 / pattern.samples.len() as f64
    };
    let children = (avg_children / 3.0).min(1.0) * 20.0;

    let table = if prefer_table { table_bonus(pattern) } else { 0.0 };
    let anchor = if pattern.tag == "a" { ANCHOR_PENALTY } else { 0.0 };

    let breakdown = ScoreBreakdown {
        diversity,
        gated: false,
        count,
        depth,
        diversity_bonus,
        children,
        table,
        anchor,
    };
    let total = count + depth + diversity_bonus + children + table + anchor;
    (total, breakdown)
}

/// Drop patterns deeper than `max_depth`, score the rest and sort them by
/// descending score. Equal scores keep discovery order.
pub fn rank<E>(patterns: Vec<CandidatePattern<E>>, options: &InferOptions) -> Vec<ScoredPattern<E>> {
    let mut scored: Vec<ScoredPattern<E>> = patterns
        .into_iter()
        .filter(|p| options.max_depth.map_or(true, |max| p.depth <= max))
        .map(|pattern| {
            let (score, breakdown) = score_pattern(&pattern, options.prefer_table);
            ScoredPattern {
                pattern,
                score,
                gated: breakdown.gated,
                breakdown: options.debug.then_some(breakdown),
            }
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// Highest-ranked pattern that passed the diversity gate
pub fn select_best<E>(patterns: Vec<CandidatePattern<E>>, options: &InferOptions) -> Option<ScoredPattern<E>> {
    rank(patterns, options).into_iter().find(|p| !p.gated)
}
