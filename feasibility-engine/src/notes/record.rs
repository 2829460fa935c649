//! Airport note records as returned by the note-fetch collaborator.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::payload;

/// One airport note. Every field is optional; which ones are populated
/// depends on how the note was entered upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteRecord {
    pub note: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub valid_from: Option<String>,
    pub valid_to: Option<String>,
}

impl NoteRecord {
    /// A record holding only note text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            note: Some(text.into()),
            ..Self::default()
        }
    }

    /// Lenient conversion from an untyped payload; non-string fields are
    /// rendered or dropped rather than rejected.
    pub fn from_value(value: &Value) -> Self {
        Self {
            note: payload::first_str(value, &["note"]),
            title: payload::first_str(value, &["title"]),
            body: payload::first_str(value, &["body"]),
            category: payload::first_str(value, &["category"]),
            kind: payload::first_str(value, &["type"]),
            valid_from: payload::first_str(value, &["valid_from", "validFrom"]),
            valid_to: payload::first_str(value, &["valid_to", "validTo"]),
        }
    }

    /// First non-empty text among note, title, body, category, type.
    pub fn text(&self) -> Option<&str> {
        note_text(self)
    }
}

/// First non-empty trimmed field among note, title, body, category, type.
///
/// ```
/// use feasibility_engine::notes::{NoteRecord, note_text};
///
/// let record = NoteRecord {
///     note: Some("  ".into()),
///     title: Some("PPR required".into()),
///     ..Default::default()
/// };
/// assert_eq!(note_text(&record), Some("PPR required"));
/// assert_eq!(note_text(&NoteRecord::default()), None);
/// ```
pub fn note_text(record: &NoteRecord) -> Option<&str> {
    [
        &record.note,
        &record.title,
        &record.body,
        &record.category,
        &record.kind,
    ]
    .into_iter()
    .filter_map(|field| field.as_deref())
    .map(str::trim)
    .find(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_prefers_note_field() {
        let record = NoteRecord {
            note: Some(" Slot required ".into()),
            title: Some("Title".into()),
            ..Default::default()
        };
        assert_eq!(record.text(), Some("Slot required"));
    }

    #[test]
    fn text_falls_back_to_type() {
        let record = NoteRecord {
            kind: Some("CUSTOMS".into()),
            ..Default::default()
        };
        assert_eq!(record.text(), Some("CUSTOMS"));
    }

    #[test]
    fn from_value_is_lenient() {
        let record = NoteRecord::from_value(&json!({
            "note": null,
            "body": "Fuel not available",
            "type": 7,
            "validFrom": "2025-01-01"
        }));
        assert_eq!(record.note, None);
        assert_eq!(record.text(), Some("Fuel not available"));
        assert_eq!(record.kind.as_deref(), Some("7"));
        assert_eq!(record.valid_from.as_deref(), Some("2025-01-01"));
    }

    #[test]
    fn deserializes_type_field() {
        let record: NoteRecord =
            serde_json::from_value(json!({"type": "OPS", "title": "Curfew 2300-0600"})).unwrap();
        assert_eq!(record.kind.as_deref(), Some("OPS"));
        assert_eq!(record.text(), Some("Curfew 2300-0600"));
    }
}
