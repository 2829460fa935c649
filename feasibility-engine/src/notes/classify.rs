//! Customs versus operational bucketing of raw note records.

use serde::Serialize;
use tracing::trace;

use super::record::{NoteRecord, note_text};
use super::rules::{CustomsRules, RestrictionRules, contains_any, contains_word};

/// Note texts bucketed by audience.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NoteSplit {
    pub customs: Vec<String>,
    pub operational: Vec<String>,
    /// Every text that survived the noise filter, in record order.
    pub retained: Vec<String>,
}

/// True for known-noise notes that never reach classification.
pub fn should_ignore_operational_note(text: &str, rules: &RestrictionRules) -> bool {
    let lowered = text.trim().to_lowercase();
    if lowered.is_empty() {
        return true;
    }
    rules
        .ignore_prefixes
        .iter()
        .any(|prefix| lowered.starts_with(prefix.as_str()))
        || contains_any(&lowered, &rules.ignore_phrases)
}

/// Whether a note belongs in the customs bucket.
pub fn is_customs_note(text: &str, rules: &CustomsRules) -> bool {
    let lowered = text.trim().to_lowercase();
    if lowered.starts_with("crew notes") {
        return false;
    }
    if !contains_word(&lowered, &rules.customs_keywords) {
        return false;
    }
    if lowered.contains("crew") {
        return contains_word(&lowered, &rules.customs_specific_terms);
    }
    true
}

/// Split note records into customs and operational texts, dropping noise
/// and records with no text.
pub fn split_customs_operational_notes(
    records: &[NoteRecord],
    restriction_rules: &RestrictionRules,
    customs_rules: &CustomsRules,
) -> NoteSplit {
    let mut split = NoteSplit::default();
    for record in records {
        let Some(text) = note_text(record) else {
            continue;
        };
        if should_ignore_operational_note(text, restriction_rules) {
            trace!(note = text, "ignoring noise note");
            continue;
        }
        split.retained.push(text.to_string());
        if is_customs_note(text, customs_rules) {
            split.customs.push(text.to_string());
        } else {
            split.operational.push(text.to_string());
        }
    }
    split
}
