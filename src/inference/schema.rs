//! Inferred extraction schema

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::confidence::Field;
use crate::error::{InferError, Result};

/// Run metadata, serialized under the `schema` key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaMeta {
    pub url: String,
    pub generated: DateTime<Utc>,
    pub confidence: f64,
    pub item_count: usize,
}

/// Container selector plus typed field selectors relative to it
///
/// Serializes as
/// `{ "schema": { url, generated, confidence, item_count }, "container": ..., "fields": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "schema")]
    pub meta: SchemaMeta,
    #[serde(rename = "container")]
    pub container_selector: String,
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Rename a field during review. Names must stay unique.
    pub fn rename_field(&mut self, from: &str, to: &str) -> Result<()> {
        if from == to {
            return Ok(());
        }
        if self.field(to).is_some() {
            return Err(InferError::InvalidInput {
                selector: to.to_string(),
                reason: format!("a field named `{}` already exists", to),
            });
        }
        match self.fields.iter_mut().find(|f| f.name == from) {
            Some(field) => {
                field.name = to.to_string();
                Ok(())
            }
            None => Err(InferError::InvalidInput {
                selector: from.to_string(),
                reason: format!("no field named `{}`", from),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::fields::FieldType;
    use chrono::TimeZone;

    fn schema() -> Schema {
        Schema {
            meta: SchemaMeta {
                url: "https://books.toscrape.com/".into(),
                generated: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
                confidence: 0.9,
                item_count: 20,
            },
            container_selector: "article.product_pod".into(),
            fields: vec![
                Field {
                    name: "title".into(),
                    selector: "h3 > a".into(),
                    field_type: FieldType::Href,
                    confidence: 1.0,
                    sample: Some("/a-light".into()),
                },
                Field {
                    name: "price_color".into(),
                    selector: "p.price_color".into(),
                    field_type: FieldType::Price,
                    confidence: 1.0,
                    sample: None,
                },
            ],
        }
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(schema()).unwrap();
        assert_eq!(json["schema"]["url"], "https://books.toscrape.com/");
        assert_eq!(json["schema"]["generated"], "2024-01-15T12:00:00Z");
        assert_eq!(json["schema"]["item_count"], 20);
        assert_eq!(json["container"], "article.product_pod");
        assert_eq!(json["fields"][0]["type"], "href");
        assert!(json["fields"][1].get("sample").is_none());
    }

    #[test]
    fn test_round_trip() {
        let original = schema();
        let json = original.to_json_pretty().unwrap();
        let parsed: Schema = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_rename_field() {
        let mut s = schema();
        s.rename_field("price_color", "price").unwrap();
        assert!(s.field("price").is_some());

        assert!(s.rename_field("price", "title").is_err());
        assert!(s.rename_field("missing", "other").is_err());
    }
}
