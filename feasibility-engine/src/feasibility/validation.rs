//! Day-level cross-checks of the booking against planning notes.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

use super::planning_notes::{owner_hint, parse_route_entries, requested_aircraft};
use crate::domain::{LegContext, localize};
use crate::sources::TimezoneLookup;

/// Tokens that identify an aircraft family: (family, tokens).
const FAMILIES: &[(&str, &[&str])] = &[
    ("CJ2", &["CJ2", "C25A", "525A"]),
    ("CJ3", &["CJ3", "C25B", "525B"]),
    ("CJ4", &["CJ4", "C25C", "525C"]),
    (
        "EMB",
        &["EMB", "E545", "E550", "P500", "P600", "PRAETOR", "LEGACY"],
    ),
    ("PC12", &["PC12", "PILATUS"]),
];

/// Canonical family for a free-text aircraft label. Labels outside the
/// known families compare by their compacted text.
///
/// ```
/// use feasibility_engine::feasibility::aircraft_family;
///
/// assert_eq!(aircraft_family("Citation CJ3+"), "CJ3");
/// assert_eq!(aircraft_family("C25B"), "CJ3");
/// assert_eq!(aircraft_family("Praetor 500"), aircraft_family("E545"));
/// assert_eq!(aircraft_family("King Air"), "KINGAIR");
/// ```
pub fn aircraft_family(label: &str) -> String {
    let compact: String = label
        .to_uppercase()
        .replace("CITATION", "")
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    FAMILIES
        .iter()
        .find(|(_, tokens)| tokens.iter().any(|t| compact.contains(t)))
        .map_or(compact, |(family, _)| (*family).to_string())
}

/// How a booking workflow commits the aircraft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkflowClass {
    Guaranteed,
    Interchange,
    AsAvailable,
}

impl WorkflowClass {
    pub fn classify(label: &str) -> Option<Self> {
        let lowered = label.to_lowercase();
        if lowered.contains("interchange") {
            Some(Self::Interchange)
        } else if lowered.contains("guaranteed") {
            Some(Self::Guaranteed)
        } else if lowered.contains("as available") || lowered.contains("as-available") {
            Some(Self::AsAvailable)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Guaranteed => "Guaranteed",
            Self::Interchange => "Interchange",
            Self::AsAvailable => "As Available",
        }
    }
}

impl fmt::Display for WorkflowClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation findings. Every finding is a check; mismatches are also
/// issues.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub checks: Vec<String>,
    pub issues: Vec<String>,
}

impl ValidationReport {
    fn confirm(&mut self, message: String) {
        if !self.checks.contains(&message) {
            self.checks.push(message);
        }
    }

    fn mismatch(&mut self, message: String) {
        if !self.issues.contains(&message) {
            self.issues.push(message.clone());
        }
        self.confirm(message);
    }
}

/// Compare the workflow label with the owner hint in the planning notes.
pub fn validate_workflow(label: &str, planning_notes: &str, report: &mut ValidationReport) {
    let label = label.trim();
    let Some(class) = WorkflowClass::classify(label) else {
        return;
    };
    if class == WorkflowClass::AsAvailable {
        report.confirm(format!("Workflow '{label}' validated as As Available."));
        return;
    }

    let Some(hint) = owner_hint(planning_notes) else {
        report.confirm(format!(
            "Workflow '{label}' ({class}) not verified; no owner request in planning notes."
        ));
        return;
    };
    let hinted = if hint.is_interchange() {
        WorkflowClass::Interchange
    } else {
        WorkflowClass::Guaranteed
    };
    if hinted == class {
        report.confirm(format!(
            "Workflow '{label}' aligns with planning notes ({class})"
        ));
    } else {
        report.mismatch(format!(
            "Workflow '{label}' is {class} but planning notes indicate {hinted}"
        ));
    }
}

/// Compare the requested aircraft (booking field, else planning notes)
/// with the quoted aircraft. Matching families produce no finding.
pub fn validate_requested_aircraft(
    requested: Option<&str>,
    planning_notes: &str,
    quoted: &str,
    report: &mut ValidationReport,
) {
    let quoted = quoted.trim();
    if quoted.is_empty() {
        return;
    }
    let requested = requested
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .or_else(|| requested_aircraft(planning_notes));
    let Some(requested) = requested else {
        return;
    };
    if aircraft_family(&requested) != aircraft_family(quoted) {
        report.mismatch(format!(
            "Requested aircraft type {requested} does not match quoted {quoted}."
        ));
    }
}

fn departure_date(leg: &LegContext, at: DateTime<Utc>, timezones: &dyn TimezoneLookup) -> NaiveDate {
    let zone = timezones.tz_for(&leg.departure_icao);
    localize(at, zone.as_deref()).date_naive()
}

/// Compare each leg against date-tagged route lines in its planning notes,
/// falling back to the day's notes when the leg has none.
pub fn validate_routes(
    legs: &[LegContext],
    day_notes: &str,
    timezones: &dyn TimezoneLookup,
    report: &mut ValidationReport,
) {
    for leg in legs {
        let Some(departure) = leg.departure_utc else {
            continue;
        };
        let notes = if leg.planning_notes.trim().is_empty() {
            day_notes
        } else {
            leg.planning_notes.as_str()
        };
        let booked = departure_date(leg, departure, timezones);
        let entries = parse_route_entries(notes, booked.year());
        if entries.is_empty() {
            continue;
        }

        let dep = leg.departure_icao.as_str();
        let arr = leg.arrival_icao.as_str();
        let label = leg.route_label();
        let same_day: Vec<_> = entries.iter().filter(|e| e.date == booked).collect();

        if let Some(first) = same_day.first() {
            match same_day.iter().find(|e| e.covers(dep, arr)) {
                Some(entry) => report.confirm(format!(
                    "Planning notes route for {} ({}) matches booked {label}.",
                    entry.date,
                    entry.route()
                )),
                None => report.mismatch(format!(
                    "Planning notes route for {} ({}) does not match booked {label}.",
                    first.date,
                    first.route()
                )),
            }
        } else if let Some(entry) = entries.iter().find(|e| e.covers(dep, arr)) {
            report.mismatch(format!(
                "Planning notes route date {} ({}) does not match booked {label} on {booked}.",
                entry.date,
                entry.route()
            ));
        }
    }
}
