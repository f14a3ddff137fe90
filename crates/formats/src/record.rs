//! Typed record representation shared by every reader

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// A single monitored content item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Identifier, unique within a batch
    pub id: i64,
    /// Title, empty when the source had none
    #[serde(default)]
    pub title: String,
    /// Description text; `None` when the source value was null or absent
    #[serde(default)]
    pub description: Option<String>,
}

impl Record {
    /// Create a new record
    pub fn new(id: i64, title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description,
        }
    }

    /// Borrow the description, if any
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Map a loosely typed JSON row into a record.
    ///
    /// `id` may be an integer or a string holding one. `title` may be absent,
    /// null, a string or a scalar. `description` must be a string or null;
    /// anything else is rejected here rather than reaching the classifier.
    pub fn from_value(value: &Value, source_line: usize) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidRecord {
            line: source_line,
            reason,
        };

        let obj = value
            .as_object()
            .ok_or_else(|| invalid("row is not a JSON object".to_string()))?;

        let id = match obj.get("id") {
            Some(Value::Number(n)) => n
                .as_i64()
                .ok_or_else(|| invalid(format!("id {} is not an integer", n)))?,
            Some(Value::String(s)) => parse_id(s).map_err(invalid)?,
            Some(Value::Null) | None => return Err(invalid("missing id".to_string())),
            Some(other) => return Err(invalid(format!("id has unsupported type: {}", other))),
        };

        let title = match obj.get("title") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
            Some(_) => return Err(invalid("title must be a string".to_string())),
        };

        let description = match obj.get("description") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(_) => {
                return Err(invalid(
                    "description must be a string or null".to_string(),
                ))
            }
        };

        Ok(Self {
            id,
            title,
            description,
        })
    }
}

/// Parse an id cell, tolerating surrounding whitespace
pub(crate) fn parse_id(raw: &str) -> std::result::Result<i64, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("missing id".to_string());
    }
    trimmed
        .parse::<i64>()
        .map_err(|_| format!("id '{}' is not an integer", trimmed))
}

/// Reject a batch containing the same id twice
pub fn ensure_unique_ids(records: &[Record]) -> Result<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id) {
            return Err(Error::DuplicateId(record.id));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_full_row() {
        let value = json!({"id": 7, "title": "Widget", "description": "A useful widget"});
        let record = Record::from_value(&value, 1).unwrap();
        assert_eq!(record, Record::new(7, "Widget", Some("A useful widget".to_string())));
    }

    #[test]
    fn test_from_value_null_description() {
        let value = json!({"id": 1, "title": "Corrupted Record", "description": null});
        let record = Record::from_value(&value, 1).unwrap();
        assert!(record.description.is_none());

        let missing = json!({"id": 2});
        let record = Record::from_value(&missing, 2).unwrap();
        assert_eq!(record.title, "");
        assert!(record.description().is_none());
    }

    #[test]
    fn test_from_value_string_id() {
        let value = json!({"id": " 42 ", "description": "text"});
        assert_eq!(Record::from_value(&value, 1).unwrap().id, 42);
    }

    #[test]
    fn test_from_value_rejects_bad_rows() {
        let bad_description = json!({"id": 1, "description": 12});
        assert!(matches!(
            Record::from_value(&bad_description, 3),
            Err(Error::InvalidRecord { line: 3, .. })
        ));

        let no_id = json!({"title": "x"});
        assert!(Record::from_value(&no_id, 1).is_err());

        let float_id = json!({"id": 1.5});
        assert!(Record::from_value(&float_id, 1).is_err());

        let not_object = json!(["id", 1]);
        assert!(Record::from_value(&not_object, 1).is_err());
    }

    #[test]
    fn test_unique_ids() {
        let records = vec![
            Record::new(1, "a", None),
            Record::new(2, "b", None),
        ];
        assert!(ensure_unique_ids(&records).is_ok());

        let dupes = vec![
            Record::new(1, "a", None),
            Record::new(1, "b", None),
        ];
        assert!(matches!(ensure_unique_ids(&dupes), Err(Error::DuplicateId(1))));
    }
}
