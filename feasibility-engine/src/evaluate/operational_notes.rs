//! Catch-all category for operational notes that survived classification.

use crate::domain::{CategoryResult, Status};
use crate::notes::{ParsedCustoms, ParsedRestrictions, contains_any, contains_word};

/// Phrase-matched flags scanned in every raw note: phrases, severity, label.
const NOTE_FLAGS: &[(&[&str], Status, &str)] = &[
    (&["wet runway", "runway wet"], Status::Caution, "Wet runway caution"),
    (
        &[
            "duty pilot approval",
            "approval from duty pilot",
            "duty pilot must approve",
            "requires duty pilot",
        ],
        Status::Caution,
        "Duty pilot approval required",
    ),
    (
        &[
            "limited winter maintenance",
            "no winter maintenance",
            "winter maintenance limited",
            "not maintained in winter",
        ],
        Status::Caution,
        "Limited winter maintenance",
    ),
    (
        &[
            "contact pic",
            "pic to contact",
            "pic must contact",
            "contact duty pilot",
            "call duty pilot",
            "contact the duty pilot",
        ],
        Status::Info,
        "PIC/duty pilot contact",
    ),
];

const TFR_NEGATIONS: &[&str] = &["no tfr", "no active tfr", "tfr cancelled", "tfr canceled"];

/// Flags operational restrictions that no dedicated category owns.
///
/// Customs notes are passed so their count can be reported, but customs
/// findings themselves belong to the customs category.
pub fn evaluate_operational_notes(
    restrictions: &ParsedRestrictions,
    customs: &ParsedCustoms,
) -> CategoryResult {
    if restrictions.raw_notes.is_empty() && customs.raw_notes.is_empty() {
        return CategoryResult::pass("No operational notes");
    }

    let mut result = CategoryResult::pass("");
    let mut labels: Vec<String> = Vec::new();
    let mut flag = |result: &mut CategoryResult, status: Status, label: &str, issue: String| {
        result.raise(status);
        if !labels.iter().any(|l| l == label) {
            labels.push(label.to_string());
        }
        result.push_unique(issue);
    };

    if !restrictions.hours_of_operation.is_empty() {
        flag(
            &mut result,
            Status::Caution,
            "Hours of operation restricted",
            format!("Airport closed {}.", restrictions.hours_of_operation.join(", ")),
        );
    }
    for note in &restrictions.curfew_notes {
        flag(&mut result, Status::Caution, "Curfew in effect", format!("Curfew: {note}"));
    }
    if restrictions.night_ops_allowed == Some(false) {
        flag(
            &mut result,
            Status::Caution,
            "Day operations only",
            "Night operations not permitted.".to_string(),
        );
    }
    for note in &restrictions.weather_limitations {
        flag(
            &mut result,
            Status::Caution,
            "Weather limitation",
            format!("Weather limitation: {note}"),
        );
    }
    if restrictions.surface_contamination {
        flag(
            &mut result,
            Status::Caution,
            "Surface contamination",
            "Surface contamination reported; check braking action.".to_string(),
        );
    }

    let mut flagged_notes: Vec<&str> = Vec::new();
    for note in &restrictions.raw_notes {
        let lowered = note.to_lowercase();
        for (phrases, status, label) in NOTE_FLAGS {
            if contains_any(&lowered, *phrases) {
                flag(&mut result, *status, *label, format!("{label}: {note}"));
                flagged_notes.push(note);
            }
        }
        if contains_word(&lowered, &["tfr"]) && !contains_any(&lowered, TFR_NEGATIONS) {
            flag(&mut result, Status::Caution, "Active TFR", format!("Active TFR: {note}"));
            flagged_notes.push(note);
        }
    }

    for note in &restrictions.generic_restrictions {
        if !flagged_notes.contains(&note.as_str()) {
            flag(&mut result, Status::Info, "Restriction noted", format!("Restriction: {note}"));
        }
    }

    if labels.is_empty() {
        result.raise(Status::Info);
        result.set_summary("Operational notes present, no tracked flags");
        let count = restrictions.raw_notes.len() + customs.raw_notes.len();
        result.push_issue(format!("{count} operational note(s) reviewed."));
    } else {
        result.set_summary(labels.join("; "));
    }
    result
}
