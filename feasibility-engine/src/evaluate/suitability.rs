//! Airport suitability: approval, runway length and closures.

use super::thousands;
use crate::config::EngineConfig;
use crate::domain::{CategoryResult, LegContext, Status};
use crate::notes::contains_any;
use crate::reference::AirportProfile;

const CLOSURE_KEYWORDS: &[&str] = &["closed", "closure", "no ga", "curfew"];

/// Approval, runway length against the aircraft category minimum, and any
/// closure or curfew mentioned in the airport's notes.
pub fn evaluate_suitability<S: AsRef<str>>(
    profile: &AirportProfile,
    leg: &LegContext,
    note_texts: &[S],
    config: &EngineConfig,
) -> CategoryResult {
    let mut result = CategoryResult::pass("Airport approved");

    if !profile.is_approved_for_ops {
        result.raise(Status::Fail);
        result.set_summary("Airport not approved");
        result.push_issue("Airport marked as not approved for operations.");
    }

    let category = Some(leg.aircraft_category.as_str()).filter(|c| !c.is_empty());
    let required = i64::from(config.runway_minimum_ft(category));
    match profile.longest_runway_ft.map(i64::from) {
        None => {
            result.raise(Status::Caution);
            result.set_summary("Missing runway intel");
            result.push_issue("No runway data available; verify manually.");
        }
        Some(longest) if longest < required => {
            result.raise(Status::Fail);
            result.set_summary("Insufficient runway length");
            result.push_issue(format!(
                "Longest runway {} ft < required {} ft for {}.",
                thousands(longest),
                thousands(required),
                category.unwrap_or("aircraft"),
            ));
        }
        Some(longest) if longest - required < i64::from(config.runway_tight_margin_ft) => {
            result.raise(Status::Caution);
            result.set_summary("Runway margin tight");
            result.push_issue(format!(
                "Runway margin only {} ft; monitor performance numbers.",
                thousands(longest - required),
            ));
        }
        Some(_) => {}
    }

    let closed = note_texts
        .iter()
        .any(|note| contains_any(&note.as_ref().to_lowercase(), CLOSURE_KEYWORDS));
    if closed {
        result.raise(Status::Fail);
        result.set_summary("Operational closure in effect");
        result.push_issue("Operational notes indicate closures or curfews impacting this leg.");
    }

    result
}
