//! Customs clearance for international arrivals.
//!
//! The customs record sets the baseline. Facts parsed from customs notes
//! layer on top, each adding issues and only ever raising severity. When
//! the notes name service hours, the scheduled local arrival time is
//! checked against them.

use chrono::{DateTime, Datelike, Timelike};
use chrono_tz::Tz;

use super::Side;
use crate::domain::{CategoryResult, LegContext, Status};
use crate::notes::{CustomsHours, ParsedCustoms, UNKNOWN_DAYS, WEEKDAYS};
use crate::reference::CustomsProfile;

pub fn evaluate_customs(
    profile: Option<&CustomsProfile>,
    leg: &LegContext,
    side: Side,
    parsed: &ParsedCustoms,
    arrival_local: Option<DateTime<Tz>>,
) -> CategoryResult {
    if side == Side::Departure {
        return CategoryResult::pass("Not required for departure");
    }
    if !leg.is_international {
        return CategoryResult::pass("Domestic leg");
    }

    let mut result = CategoryResult::pass("Customs available");
    match profile {
        None => {
            result.raise(Status::Caution);
            result.set_summary("No customs intel");
            result.push_issue("No customs record available; confirm with airport directly.");
        }
        Some(profile) => {
            let service_type = profile.service_type.as_deref().unwrap_or("UNKNOWN");
            result.push_issue(format!("Customs service type: {service_type}."));
            let upper = service_type.to_uppercase();
            if upper == "NONE" {
                result.raise(Status::Fail);
                result.set_summary("No customs service");
                result.push_issue("International arrival requires customs; arrange alternate field.");
            } else if upper.contains("CANPASS") {
                result.raise(Status::Caution);
                result.set_summary("CANPASS arrival");
                result.push_issue("Ensure CANPASS paperwork and notice are completed.");
            }
            if let Some(notes) = &profile.notes {
                result.push_issue(notes.clone());
            }
        }
    }

    apply_parsed(&mut result, parsed);
    if let Some(local) = arrival_local {
        check_hours(&mut result, parsed, local);
    }
    let summary = build_summary(&result.summary, parsed);
    result.set_summary(summary);
    result
}

fn apply_parsed(result: &mut CategoryResult, parsed: &ParsedCustoms) {
    if parsed.canpass_only {
        result.raise(Status::Caution);
        result.set_summary("CANPASS arrival");
        result.push_issue("Operational notes: CANPASS-only clearance.");
    }
    if let Some(hours) = parsed.customs_prior_notice_hours {
        result.raise(Status::Caution);
        result.push_issue(format!("Customs requires {hours} hours prior notice."));
    }
    if let Some(days) = parsed.customs_prior_notice_days {
        result.raise(Status::Caution);
        result.push_issue(format!("Customs requires {days} day notice."));
    }
    if parsed.customs_contact_required {
        result.raise(Status::Caution);
        result.push_issue("Customs contact required per notes.");
        result.issues.extend(parsed.customs_contact_notes.iter().cloned());
    }
    if parsed.customs_afterhours_available {
        result.push_issue("Afterhours customs available; verify call-out requirements.");
        result
            .issues
            .extend(parsed.customs_afterhours_requirements.iter().cloned());
    }
    if let Some(location) = &parsed.location_to_clear {
        result.push_issue(format!("Clear customs at {location}."));
        result.issues.extend(parsed.location_notes.iter().cloned());
    }
    for requirements in [&parsed.pax_requirements, &parsed.crew_requirements] {
        if !requirements.is_empty() {
            result.raise(Status::Caution);
            result.issues.extend(requirements.iter().cloned());
        }
    }
}

/// Flags an arrival that lands outside every service window for its day.
fn check_hours(result: &mut CategoryResult, parsed: &ParsedCustoms, local: DateTime<Tz>) {
    if parsed.customs_hours.is_empty() {
        return;
    }
    let weekday = WEEKDAYS[local.weekday().num_days_from_monday() as usize];
    let minute = local.hour() * 60 + local.minute();
    let open = parsed
        .customs_hours
        .iter()
        .any(|window| window.applies_on(weekday) && window.contains_minute(minute));
    if open {
        return;
    }

    let windows: Vec<String> = parsed.customs_hours.iter().map(CustomsHours::label).collect();
    let arrival = local.format("%a %H%M");
    if parsed.customs_afterhours_available {
        result.raise(Status::Caution);
        result.push_issue(format!(
            "Arrival {arrival} local is outside customs hours ({}); arrange after-hours call-out.",
            windows.join(", ")
        ));
    } else {
        result.raise(Status::Fail);
        result.push_issue(format!(
            "Arrival {arrival} local is outside customs hours ({}).",
            windows.join(", ")
        ));
    }
}

fn hours_detail(entry: &CustomsHours) -> Option<String> {
    let days: Vec<&str> = entry
        .days
        .iter()
        .map(|d| d.trim())
        .filter(|d| !d.is_empty() && !d.eq_ignore_ascii_case(UNKNOWN_DAYS))
        .collect();
    let start = entry.start.trim();
    let end = entry.end.trim();
    let hours = match (start.is_empty(), end.is_empty()) {
        (false, false) => format!("{start}-{end}"),
        (false, true) => start.to_string(),
        (true, false) => end.to_string(),
        (true, true) => String::new(),
    };
    match (days.is_empty(), hours.is_empty()) {
        (false, false) => Some(format!("{} {hours}", days.join("/"))),
        (true, false) => Some(hours),
        (false, true) => Some(days.join("/")),
        (true, true) => None,
    }
}

/// Append the first hours window and any notice or after-hours detail to
/// the base summary.
fn build_summary(base: &str, parsed: &ParsedCustoms) -> String {
    let mut details = Vec::new();
    if let Some(detail) = parsed.customs_hours.first().and_then(hours_detail) {
        details.push(detail);
    }

    let mut notice = Vec::new();
    if let Some(hours) = parsed.customs_prior_notice_hours {
        notice.push(format!("{hours}h notice"));
    }
    if let Some(days) = parsed.customs_prior_notice_days {
        notice.push(format!("{days} day notice"));
    }
    let notice = notice.join(" and ");
    if parsed.customs_afterhours_available {
        if notice.is_empty() {
            details.push("After-hours possible".to_string());
        } else {
            details.push(format!("After-hours possible with {notice}"));
        }
    } else if !notice.is_empty() {
        details.push(format!("Requires {notice}"));
    }

    if details.is_empty() {
        return base.to_string();
    }
    let details = details.join("; ");
    if base.to_lowercase().starts_with("customs available") {
        format!("{base} {details}")
    } else {
        format!("{base} - {details}")
    }
}
