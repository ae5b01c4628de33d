//! Field confidence, filtering and name deduplication

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::fields::{FieldType, RawField};
use super::options::InferOptions;
use super::text::round2;

/// A field that survived the confidence filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub selector: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample: Option<String>,
}

/// Distinct values over total values, rounded to two decimals (0 for no samples)
pub fn field_confidence(samples: &[String]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let distinct: HashSet<&str> = samples.iter().map(String::as_str).collect();
    round2(distinct.len() as f64 / samples.len() as f64)
}

/// Apply the confidence threshold, the type allow-list and name deduplication,
/// keeping discovery order
pub fn finalize_fields(raw: Vec<RawField>, options: &InferOptions) -> Vec<Field> {
    let mut fields: Vec<Field> = raw
        .into_iter()
        .filter_map(|field| {
            let confidence = field_confidence(&field.samples);
            if confidence < options.confidence_threshold {
                return None;
            }
            Some(Field {
                name: field.name,
                selector: field.selector,
                field_type: field.field_type,
                confidence,
                sample: field.samples.into_iter().next(),
            })
        })
        .filter(|field| {
            options
                .field_types
                .as_ref()
                .map_or(true, |allowed| allowed.contains(&field.field_type))
        })
        .collect();

    dedup_names(&mut fields);
    fields
}

/// Rename repeated names to `name_1`, `name_2`, ... in order.
///
/// A generated name that is already taken is skipped, so the result never
/// contains two equal names.
pub fn dedup_names(fields: &mut [Field]) {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut taken: HashSet<String> = HashSet::new();

    for field in fields.iter_mut() {
        let base = field.name.clone();
        let count = seen.entry(base.clone()).or_insert(0);

        if *count > 0 || taken.contains(&base) {
            let mut candidate = format!("{}_{}", base, (*count).max(1));
            while taken.contains(&candidate) {
                *count += 1;
                candidate = format!("{}_{}", base, *count);
            }
            field.name = candidate;
        }
        *count += 1;
        taken.insert(field.name.clone());
    }
}

/// Weighted blend of item coverage, mean field confidence and field count
pub fn schema_confidence(item_count: usize, min_items: usize, fields: &[Field]) -> f64 {
    if fields.is_empty() {
        return 0.0;
    }
    let min_items = min_items.max(1) as f64;
    let items = (item_count as f64 / min_items / 2.0).min(1.0);
    let mean = fields.iter().map(|f| f.confidence).sum::<f64>() / fields.len() as f64;
    let count = (fields.len() as f64 / 5.0).min(1.0);
    round2(0.3 * items + 0.4 * mean + 0.3 * count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, field_type: FieldType, samples: &[&str]) -> RawField {
        RawField {
            key: format!("{}:{}", field_type, name),
            name: name.to_string(),
            field_type,
            selector: name.to_string(),
            samples: samples.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn field(name: &str) -> Field {
        Field {
            name: name.to_string(),
            selector: String::new(),
            field_type: FieldType::Text,
            confidence: 1.0,
            sample: None,
        }
    }

    #[test]
    fn test_field_confidence() {
        let s = |v: &[&str]| v.iter().map(|x| x.to_string()).collect::<Vec<_>>();
        assert_eq!(field_confidence(&s(&["a", "b", "c"])), 1.0);
        assert_eq!(field_confidence(&s(&["a", "a", "b"])), 0.67);
        assert_eq!(field_confidence(&s(&["x", "x", "x", "x"])), 0.25);
        assert_eq!(field_confidence(&[]), 0.0);
    }

    #[test]
    fn test_threshold_and_type_filter() {
        let fields = vec![
            raw("title", FieldType::Href, &["/a", "/b", "/c"]),
            raw("stock", FieldType::Text, &["In stock", "In stock", "In stock"]),
            raw("price", FieldType::Price, &["£1", "£2", "£3"]),
        ];
        let kept = finalize_fields(fields.clone(), &InferOptions::default());
        let names: Vec<&str> = kept.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["title", "price"]);
        assert_eq!(kept[0].sample.as_deref(), Some("/a"));

        let opts = InferOptions {
            field_types: Some(vec![FieldType::Price]),
            ..Default::default()
        };
        let kept = finalize_fields(fields, &opts);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].field_type, FieldType::Price);
    }

    #[test]
    fn test_dedup_names() {
        let mut fields = vec![field("p"), field("p"), field("span"), field("p")];
        dedup_names(&mut fields);
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["p", "p_1", "span", "p_2"]);
    }

    #[test]
    fn test_dedup_avoids_existing_suffix() {
        let mut fields = vec![field("p_1"), field("p"), field("p")];
        dedup_names(&mut fields);
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["p_1", "p", "p_2"]);

        let mut fields = vec![field("p"), field("p"), field("p_1")];
        dedup_names(&mut fields);
        let names: HashSet<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_schema_confidence() {
        assert_eq!(schema_confidence(10, 3, &[]), 0.0);

        let fields = vec![field("a"), field("b")];
        // 0.3 * 1 + 0.4 * 1 + 0.3 * 0.4
        assert_eq!(schema_confidence(10, 3, &fields), 0.82);
        // 0.3 * 0.5 + 0.4 + 0.12
        assert_eq!(schema_confidence(3, 3, &fields), 0.67);
        // min_items of zero behaves like one
        assert_eq!(schema_confidence(2, 0, &fields), 0.82);
    }

    #[test]
    fn test_field_serializes_type_key() {
        let f = Field {
            sample: Some("£51.77".into()),
            field_type: FieldType::Price,
            ..field("price")
        };
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["type"], "price");
        assert_eq!(json["sample"], "£51.77");

        let json = serde_json::to_value(field("x")).unwrap();
        assert!(json.get("sample").is_none());
    }
}
