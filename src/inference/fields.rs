//! Field extraction and content-type classification
//!
//! Walks a handful of containers of the selected pattern and records every
//! link, image and text leaf under a structural key: the content type plus
//! the container-relative path of `tag.first-semantic-class` segments. Values
//! found at the same key in different containers are samples of one field.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::classes::{selector_fragment, semantic_classes};
use super::options::InferOptions;
use super::text::truncate_chars;
use crate::document::{Document, DocumentElement};
use crate::error::Result;

/// Subtrees that never hold visible content
const SKIP_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "svg", "iframe", "object", "head",
];

const MAX_NAME_LEN: usize = 30;

static PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[$€£¥₹₩]\s?\d+(?:[.,]\d+)*|\d+(?:[.,]\d+)*\s?[$€£¥₹₩]")
        .expect("Invalid price regex")
});

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+(?:[.,]\d+)*$").expect("Invalid number regex"));

static NUMERIC_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,4}[-/]\d{1,2}[-/]\d{1,4}").expect("Invalid numeric date regex")
});

static MONTH_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(jan(uary)?|feb(ruary)?|mar(ch)?|apr(il)?|may|june?|july?|aug(ust)?|sep(t(ember)?)?|oct(ober)?|nov(ember)?|dec(ember)?)\b",
    )
    .expect("Invalid month date regex")
});

static NON_ALNUM_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("Invalid name regex"));

/// Inferred content type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Href,
    Url,
    Number,
    Date,
    Price,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Href => "href",
            FieldType::Url => "url",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Price => "price",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Classify leaf text: price, then number, then date, else text
pub fn classify_text(text: &str) -> FieldType {
    let text = text.trim();
    if PRICE.is_match(text) {
        FieldType::Price
    } else if NUMBER.is_match(text) {
        FieldType::Number
    } else if NUMERIC_DATE.is_match(text) || MONTH_DATE.is_match(text) {
        FieldType::Date
    } else {
        FieldType::Text
    }
}

/// Lowercase, truncate, collapse non-alphanumeric runs to `_`, trim `_`.
///
/// May return an empty string; callers pick the fallback.
pub fn sanitize_name(raw: &str) -> String {
    let lowered = truncate_chars(&raw.to_lowercase(), MAX_NAME_LEN);
    NON_ALNUM_RUN
        .replace_all(&lowered, "_")
        .trim_matches('_')
        .to_string()
}

fn name_or(raw: &str, fallback: &str) -> String {
    let name = sanitize_name(raw);
    if name.is_empty() {
        fallback.to_string()
    } else {
        name
    }
}

/// One structural slot observed across sampled containers
#[derive(Debug, Clone, PartialEq)]
pub struct RawField {
    /// `type:path`, identical for the same slot in every container
    pub key: String,
    pub name: String,
    pub field_type: FieldType,
    /// Path relative to the container
    pub selector: String,
    /// Values in discovery order
    pub samples: Vec<String>,
}

/// Raw fields keyed by structural key, iterated in first-seen order
#[derive(Debug, Default)]
pub struct FieldMap {
    fields: Vec<RawField>,
    index: HashMap<String, usize>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the field at `key`, creating it on first sight
    pub fn record(&mut self, field_type: FieldType, path: &str, name: String, value: String) {
        let key = format!("{}:{}", field_type, path);
        match self.index.get(&key) {
            Some(&idx) => self.fields[idx].samples.push(value),
            None => {
                self.index.insert(key.clone(), self.fields.len());
                self.fields.push(RawField {
                    key,
                    name,
                    field_type,
                    selector: path.to_string(),
                    samples: vec![value],
                });
            }
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_fields(self) -> Vec<RawField> {
        self.fields
    }
}

/// Container-relative path to `element`, or `None` if it sits in a skipped subtree
fn relative_path<'a, E: DocumentElement<'a>>(container: &E, element: &E) -> Option<String> {
    let mut chain = Vec::new();
    let mut current = Some(*element);
    while let Some(el) = current {
        if el == *container {
            break;
        }
        if SKIP_TAGS.contains(&el.tag_name()) {
            return None;
        }
        chain.push(selector_fragment(&el));
        current = el.parent_element();
    }
    chain.reverse();
    Some(chain.join(" > "))
}

/// Record the fields of one container into `map`
pub fn collect_container<'a, E: DocumentElement<'a>>(
    container: &E,
    options: &InferOptions,
    map: &mut FieldMap,
) {
    for element in container.descendant_elements() {
        let Some(path) = relative_path(container, &element) else {
            continue;
        };
        let tag = element.tag_name();

        if tag == "a" {
            if let Some(href) = element.attr("href") {
                let href = href.trim();
                if href.is_empty() && !options.include_empty {
                    continue;
                }
                let name = name_or(element.text_content().trim(), "link");
                map.record(FieldType::Href, &path, name, href.to_string());
                continue;
            }
        }

        if tag == "img" {
            if let Some(src) = element.attr("src") {
                let src = src.trim();
                if src.is_empty() && !options.include_empty {
                    continue;
                }
                let name = name_or(element.attr("alt").unwrap_or(""), "image");
                map.record(FieldType::Url, &path, name, src.to_string());
                continue;
            }
        }

        if !element.child_elements().is_empty() {
            continue;
        }

        let text = element.text_content();
        let text = text.trim();
        if text.is_empty() && !options.include_empty {
            continue;
        }

        let label = semantic_classes(&element).first().copied().unwrap_or(tag);
        let name = name_or(label, tag);
        map.record(classify_text(text), &path, name, text.to_string());
    }
}

/// Walk up to `sample_size` containers matching `selector` and collect raw fields
pub fn extract_fields<D: Document>(
    doc: &D,
    selector: &str,
    options: &InferOptions,
) -> Result<Vec<RawField>> {
    let containers = doc.select(selector)?;
    let mut map = FieldMap::new();
    for container in containers.iter().take(options.sample_size.max(1)) {
        collect_container(container, options, &mut map);
    }
    Ok(map.into_fields())
}
