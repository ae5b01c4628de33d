//! Pattern mining
//!
//! Finds groups of same-tag elements that share at least one semantic class.
//! Clustering is a single greedy pass in document order: each element joins
//! the open group whose running class signature overlaps it the most, and that
//! signature shrinks to the overlap. The result depends on element order and
//! is not a globally optimal grouping; scoring thresholds are tuned against
//! exactly this behaviour.

use serde::Serialize;

use super::classes::semantic_classes;
use super::options::InferOptions;
use super::text::truncate_chars;
use crate::document::{Document, DocumentElement};
use crate::error::{InferError, Result};

/// Tags considered as repeated-item containers, in mining order
pub const CANDIDATE_TAGS: &[&str] = &["article", "div", "li", "tr", "section", "a"];

/// Navigation landmarks excluded when `ignore_nav` is set
pub const NAV_SELECTORS: &[&str] = &[
    "nav",
    "header",
    "footer",
    "aside",
    r#"[role="navigation"]"#,
    r#"[role="banner"]"#,
    r#"[role="contentinfo"]"#,
    r#"[role="menu"]"#,
    r#"[role="menubar"]"#,
];

/// Members cached as previews per pattern
pub const SAMPLE_LIMIT: usize = 10;

const TEXT_PREVIEW_LEN: usize = 200;
const HTML_PREVIEW_LEN: usize = 500;

/// Cached view of one pattern member, used by scoring and reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SamplePreview {
    pub text: String,
    pub html: String,
    pub child_count: usize,
    /// Length of the full trimmed text, before truncation
    pub text_length: usize,
}

impl SamplePreview {
    pub fn of<'a, E: DocumentElement<'a>>(element: &E) -> Self {
        let text = element.text_content();
        let text = text.trim();
        Self {
            text: truncate_chars(text, TEXT_PREVIEW_LEN),
            html: truncate_chars(&element.outer_html(), HTML_PREVIEW_LEN),
            child_count: element.child_elements().len(),
            text_length: text.chars().count(),
        }
    }
}

/// A tag + shared-class grouping of elements believed to repeat
#[derive(Debug, Clone)]
pub struct CandidatePattern<E> {
    /// `tag.class1.class2`, or the manual selector
    pub selector: String,
    pub tag: String,
    /// Shared semantic class chain (empty for manual selectors)
    pub classes: Vec<String>,
    /// Members in document order
    pub elements: Vec<E>,
    pub samples: Vec<SamplePreview>,
    /// DOM depth of the first member
    pub depth: usize,
}

impl<E> CandidatePattern<E> {
    pub fn item_count(&self) -> usize {
        self.elements.len()
    }
}

impl<'a, E: DocumentElement<'a>> CandidatePattern<E> {
    /// Build a pattern from an already-matched, non-empty element list
    fn new(selector: String, tag: String, classes: Vec<String>, elements: Vec<E>) -> Self {
        let samples = elements
            .iter()
            .take(SAMPLE_LIMIT)
            .map(SamplePreview::of)
            .collect();
        let depth = elements.first().map(|el| el.depth()).unwrap_or(0);
        Self {
            selector,
            tag,
            classes,
            elements,
            samples,
            depth,
        }
    }
}

/// An open cluster during mining
#[derive(Debug, Clone)]
pub struct Group<'a, E> {
    pub signature: Vec<&'a str>,
    pub members: Vec<E>,
}

/// Greedily cluster `elements` by shared semantic classes.
///
/// Elements without semantic classes are left out: a group seeded by an empty
/// set can never be joined or emitted.
pub fn cluster<'a, E: DocumentElement<'a>>(elements: &[E]) -> Vec<Group<'a, E>> {
    let mut groups: Vec<Group<'a, E>> = Vec::new();

    for element in elements {
        let classes = semantic_classes(element);
        if classes.is_empty() {
            continue;
        }

        let mut best: Option<(usize, usize)> = None;
        for (idx, group) in groups.iter().enumerate() {
            let overlap = group
                .signature
                .iter()
                .filter(|class| classes.contains(*class))
                .count();
            if overlap >= 1 && best.map_or(true, |(_, size)| overlap > size) {
                best = Some((idx, overlap));
            }
        }

        match best {
            Some((idx, _)) => {
                let group = &mut groups[idx];
                group.signature.retain(|class| classes.contains(class));
                group.members.push(*element);
            }
            None => groups.push(Group {
                signature: classes,
                members: vec![*element],
            }),
        }
    }

    groups
}

/// Elements that are, or sit inside, a match of any exclusion selector
fn exclusion_roots<'a, D: Document>(doc: &'a D, options: &InferOptions) -> Vec<D::Element<'a>> {
    let nav: &[&str] = if options.ignore_nav { NAV_SELECTORS } else { &[] };
    let selectors = options
        .exclude_selectors
        .iter()
        .map(String::as_str)
        .chain(nav.iter().copied());

    let mut roots = Vec::new();
    for selector in selectors {
        // An unparseable exclusion is dropped; the rest still apply
        if let Ok(found) = doc.select(selector) {
            roots.extend(found);
        }
    }
    roots
}

fn admits<'a, E: DocumentElement<'a>>(element: &E, options: &InferOptions) -> bool {
    if options.min_children > 0 && element.child_elements().len() < options.min_children {
        return false;
    }
    if options.min_text_length > 0 {
        let text = element.text_content();
        if text.trim().chars().count() < options.min_text_length {
            return false;
        }
    }
    true
}

/// Discover candidate patterns in document order (tag order, then group order)
pub fn mine<'a, D: Document>(doc: &'a D, options: &InferOptions) -> Vec<CandidatePattern<D::Element<'a>>> {
    let excluded = exclusion_roots(doc, options);
    let mut patterns = Vec::new();

    for tag in CANDIDATE_TAGS {
        let Ok(elements) = doc.select(tag) else {
            continue;
        };

        let admitted: Vec<_> = elements
            .into_iter()
            .filter(|el| !el.is_within(&excluded))
            .filter(|el| admits(el, options))
            .collect();

        for group in cluster(&admitted) {
            if group.members.len() < options.min_items || group.signature.is_empty() {
                continue;
            }
            let classes: Vec<String> = group.signature.iter().map(|c| c.to_string()).collect();
            let selector = format!("{}.{}", tag, classes.join("."));
            patterns.push(CandidatePattern::new(
                selector,
                tag.to_string(),
                classes,
                group.members,
            ));
        }
    }

    patterns
}

/// Build the single pattern for a caller-supplied container selector.
///
/// A malformed selector is `InvalidInput`; zero matches is `NoPatternsFound`.
pub fn manual_pattern<'a, D: Document>(
    doc: &'a D,
    selector: &str,
) -> Result<CandidatePattern<D::Element<'a>>> {
    let elements = doc.select(selector)?;
    let Some(first) = elements.first() else {
        return Err(InferError::NoPatternsFound(format!(
            "container selector `{}` matched no elements",
            selector
        )));
    };
    let tag = first.tag_name().to_string();
    Ok(CandidatePattern::new(selector.to_string(), tag, Vec::new(), elements))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::HtmlDocument;

    fn list_page() -> HtmlDocument {
        HtmlDocument::parse(
            "https://example.com/list",
            r#"
            <html><body>
                <nav><ul>
                    <li class="item extra">Nav one</li>
                    <li class="item extra">Nav two</li>
                    <li class="item extra">Nav three</li>
                </ul></nav>
                <ul class="results">
                    <li class="item extra"><a href="/1">One</a></li>
                    <li class="item extra"><a href="/2">Two</a></li>
                    <li class="item extra"><a href="/3">Three</a></li>
                    <li class="item extra"><a href="/4">Four</a></li>
                    <li class="item extra"><a href="/5">Five</a></li>
                </ul>
                <p class="flex mt-4">utility only</p>
            </body></html>
            "#,
        )
    }

    #[test]
    fn test_mine_groups_by_shared_classes() {
        let doc = list_page();
        let patterns = mine(&doc, &InferOptions::default());

        let li = patterns.iter().find(|p| p.tag == "li").unwrap();
        assert_eq!(li.selector, "li.item.extra");
        assert_eq!(li.item_count(), 8);
        assert_eq!(li.samples.len(), 8);
        assert_eq!(li.samples[0].text, "Nav one");
        // html > body > nav > ul > li
        assert_eq!(li.depth, 4);
    }

    #[test]
    fn test_ignore_nav_and_exclusions() {
        let doc = list_page();
        let opts = InferOptions {
            ignore_nav: true,
            ..Default::default()
        };
        let patterns = mine(&doc, &opts);
        let li = patterns.iter().find(|p| p.tag == "li").unwrap();
        assert_eq!(li.item_count(), 5);
        assert_eq!(li.samples[0].text, "One");

        // An invalid exclusion is skipped, the valid one still applies
        let opts = InferOptions {
            exclude_selectors: vec!["ul[".into(), "nav".into()],
            ..Default::default()
        };
        let li_count = mine(&doc, &opts)
            .iter()
            .find(|p| p.tag == "li")
            .map(|p| p.item_count());
        assert_eq!(li_count, Some(5));
    }

    #[test]
    fn test_admission_filters() {
        let doc = list_page();
        let opts = InferOptions {
            min_children: 1,
            ..Default::default()
        };
        let li = mine(&doc, &opts).into_iter().find(|p| p.tag == "li").unwrap();
        assert_eq!(li.item_count(), 5);

        let opts = InferOptions {
            min_text_length: 4,
            ..Default::default()
        };
        // "One" and "Two" are too short
        let li = mine(&doc, &opts).into_iter().find(|p| p.tag == "li").unwrap();
        assert_eq!(li.item_count(), 6);
    }

    #[test]
    fn test_min_items_threshold() {
        let doc = list_page();
        let opts = InferOptions {
            min_items: 9,
            ..Default::default()
        };
        assert!(mine(&doc, &opts).iter().all(|p| p.tag != "li"));
    }

    #[test]
    fn test_signature_only_shrinks() {
        let doc = HtmlDocument::parse(
            "",
            r#"
            <div class="card featured wide">a</div>
            <div class="card featured">b</div>
            <div class="card wide">c</div>
            <div class="card">d</div>
            <div class="other">e</div>
            "#,
        );
        let divs = doc.select("div").unwrap();

        let mut previous = usize::MAX;
        for n in 1..=4 {
            let groups = cluster(&divs[..n]);
            assert_eq!(groups.len(), 1);
            let size = groups[0].signature.len();
            assert!(size <= previous);
            previous = size;
        }

        let groups = cluster(&divs);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].signature, vec!["card"]);
        assert_eq!(groups[0].members.len(), 4);
        assert_eq!(groups[1].signature, vec!["other"]);
    }

    #[test]
    fn test_join_largest_overlap() {
        let doc = HtmlDocument::parse(
            "",
            r#"
            <div class="a b">1</div>
            <div class="c d">2</div>
            <div class="c d a">3</div>
            "#,
        );
        let divs = doc.select("div").unwrap();
        let groups = cluster(&divs);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].members.len(), 2);
        assert_eq!(groups[1].signature, vec!["c", "d"]);
    }

    #[test]
    fn test_manual_pattern() {
        let doc = list_page();
        let pattern = manual_pattern(&doc, "ul.results > li").unwrap();
        assert_eq!(pattern.item_count(), 5);
        assert_eq!(pattern.tag, "li");
        assert_eq!(pattern.selector, "ul.results > li");

        match manual_pattern(&doc, "table.missing") {
            Err(InferError::NoPatternsFound(msg)) => assert!(msg.contains("table.missing")),
            other => panic!("unexpected: {:?}", other.map(|p| p.selector)),
        }

        assert!(matches!(
            manual_pattern(&doc, "li["),
            Err(InferError::InvalidInput { .. })
        ));
    }
}
