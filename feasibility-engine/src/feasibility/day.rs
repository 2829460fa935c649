//! Day orchestration: a quote's legs evaluated together.
//!
//! A quote carries the aircraft, workflow and booking metadata for a day of
//! flying plus its legs. Each leg inherits the quote's aircraft when it
//! names none of its own, legs are ordered by departure, every leg runs
//! through the leg orchestrator and the duty day is evaluated once across
//! all of them.
//!
//! The overall status folds `INFO` to `PASS` before merging, so an
//! informational note never reads as a day-level finding.

use std::iter;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::airport::{AirportFeasibilityResult, FeasibilityEngine};
use super::duty::{DutyFeasibilityResult, evaluate_duty};
use super::validation::{
    ValidationReport, validate_requested_aircraft, validate_routes, validate_workflow,
};
use crate::domain::{Icao, LegContext, Status, localize, worst};
use crate::payload;
use crate::reference::{ReferenceData, day_category_label};

const LEG_KEYS: &[&str] = &["legs", "flights", "quoteLegs"];
const BOOKING_KEYS: &[&str] = &["bookingIdentifier", "bookingCode", "bookingid"];
const QUOTE_ID_KEYS: &[&str] = &["bookingid", "quoteId", "id"];
const AIRCRAFT_TYPE_PATHS: &[&[&str]] = &[
    &["aircraftObj", "type"],
    &["aircraftObj", "model"],
    &["aircraftType"],
    &["aircraft"],
];
const AIRCRAFT_CATEGORY_PATHS: &[&[&str]] = &[&["aircraftObj", "category"], &["aircraftCategory"]];

/// Categories whose CAUTION or FAIL findings are lifted into the day's
/// issue list.
const KEY_ISSUE_CATEGORIES: &[&str] = &[
    "Customs",
    "Operational Notes",
    "Deice",
    "Overflight",
    "Aircraft",
    "Weight & Balance",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeasibilityError {
    #[error("quote payload is not an object")]
    InvalidQuote,

    #[error("quote {0} has no valid legs")]
    NoLegs(String),
}

/// Booking metadata and ordered legs for one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayContext {
    pub booking_identifier: String,
    pub quote_id: Option<String>,
    pub aircraft_type: String,
    pub aircraft_category: String,
    pub workflow: String,
    pub requested_aircraft_type: Option<String>,
    pub sales_contact: Option<String>,
    pub planning_notes: String,
    pub legs: Vec<LegContext>,
}

impl DayContext {
    /// Build the day from a quote payload. Legs missing an airport are
    /// dropped; a quote left with no legs is an error.
    pub fn from_quote(quote: &Value, reference: &ReferenceData) -> Result<Self, FeasibilityError> {
        if !quote.is_object() {
            return Err(FeasibilityError::InvalidQuote);
        }

        let booking_identifier =
            payload::first_str(quote, BOOKING_KEYS).unwrap_or_else(|| "UNKNOWN".to_string());
        let aircraft_type = first_path_str(quote, AIRCRAFT_TYPE_PATHS).unwrap_or_default();
        let aircraft_category = first_path_str(quote, AIRCRAFT_CATEGORY_PATHS)
            .unwrap_or_default()
            .to_uppercase();

        let mut legs: Vec<LegContext> = LEG_KEYS
            .iter()
            .flat_map(|key| payload::objects(quote.get(*key)))
            .filter_map(|flight| LegContext::from_flight(flight, reference))
            .map(|leg| leg.inherit_aircraft(&aircraft_type, &aircraft_category))
            .collect();
        if legs.is_empty() {
            return Err(FeasibilityError::NoLegs(booking_identifier));
        }
        legs.sort_by_key(|leg| (leg.departure_utc.is_none(), leg.departure_utc));

        let workflow = payload::first_str(quote, &["workflowCustomName", "workflow"])
            .or_else(|| {
                legs.iter()
                    .map(|leg| leg.workflow_custom_name.as_str())
                    .chain(legs.iter().map(|leg| leg.workflow.as_str()))
                    .find(|w| !w.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_default();

        let planning_notes = payload::first_str(quote, &["planningNotes", "planningNote"])
            .unwrap_or_else(|| {
                let mut notes: Vec<&str> = Vec::new();
                for leg in &legs {
                    let text = leg.planning_notes.trim();
                    if !text.is_empty() && !notes.contains(&text) {
                        notes.push(text);
                    }
                }
                notes.join("\n")
            });

        let sales_contact = quote.get("salesPerson").and_then(|person| {
            let name = [
                payload::first_str(person, &["firstName"]),
                payload::first_str(person, &["lastName"]),
            ]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
            (!name.is_empty()).then_some(name)
        });

        Ok(Self {
            booking_identifier,
            quote_id: payload::first_str(quote, QUOTE_ID_KEYS),
            aircraft_type,
            aircraft_category,
            workflow,
            requested_aircraft_type: payload::first_str(quote, &["requestedAircraftType"]),
            sales_contact,
            planning_notes,
            legs,
        })
    }

    /// Every airport touched, in itinerary order.
    pub fn airports(&self) -> impl Iterator<Item = &Icao> {
        self.legs
            .iter()
            .flat_map(|leg| [&leg.departure_icao, &leg.arrival_icao])
    }
}

fn first_path_str(value: &Value, paths: &[&[&str]]) -> Option<String> {
    paths
        .iter()
        .filter_map(|path| payload::path(value, path))
        .find_map(payload::scalar_str)
}

/// Everything the engine concluded about a day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullFeasibilityResult {
    pub booking_identifier: String,
    pub quote_id: Option<String>,
    pub aircraft_type: String,
    pub aircraft_category: String,
    pub workflow: String,
    pub flight_category: String,
    pub legs: Vec<LegContext>,
    pub leg_results: Vec<AirportFeasibilityResult>,
    pub duty: DutyFeasibilityResult,
    pub overall_status: Status,
    pub issues: Vec<String>,
    pub validation_checks: Vec<String>,
    pub summary: String,
}

impl FullFeasibilityResult {
    /// JSON projection of the whole result tree.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl FeasibilityEngine<'_> {
    /// Evaluate every leg of a quote and the duty day they form.
    pub fn run_feasibility(&self, quote: &Value) -> Result<FullFeasibilityResult, FeasibilityError> {
        let day = DayContext::from_quote(quote, self.reference)?;
        Ok(self.evaluate_day(day))
    }

    pub fn evaluate_day(&self, day: DayContext) -> FullFeasibilityResult {
        let leg_results: Vec<AirportFeasibilityResult> =
            day.legs.iter().map(|leg| self.evaluate_leg(leg)).collect();
        let duty = evaluate_duty(&day.legs, self.sources.timezones, self.config);

        let overall_status = worst(
            iter::once(duty.status)
                .chain(
                    leg_results
                        .iter()
                        .flat_map(|leg| leg.categories().into_iter().map(|(_, r)| r.status)),
                )
                .map(Status::fold_info),
        );

        let mut validation = ValidationReport::default();
        validate_workflow(&day.workflow, &day.planning_notes, &mut validation);
        validate_requested_aircraft(
            day.requested_aircraft_type.as_deref(),
            &day.planning_notes,
            &day.aircraft_type,
            &mut validation,
        );
        validate_routes(
            &day.legs,
            &day.planning_notes,
            self.sources.timezones,
            &mut validation,
        );

        let mut issues = Vec::new();
        if duty.status.is_actionable() {
            issues.push(format!("Duty: {}", duty.summary));
        }
        for (index, leg) in leg_results.iter().enumerate() {
            for (label, result) in leg.categories() {
                let key = KEY_ISSUE_CATEGORIES
                    .iter()
                    .any(|category| label.ends_with(category));
                if key && result.status.is_actionable() {
                    issues.push(format!(
                        "Leg {} {}: {label} - {}",
                        index + 1,
                        leg.route,
                        result.summary
                    ));
                }
            }
        }
        issues.extend(validation.issues);

        let flight_category = day_category_label(day.airports(), self.reference).to_string();
        let summary = self.summary_text(&day, &leg_results, &duty, &flight_category);

        debug!(
            booking = %day.booking_identifier,
            legs = day.legs.len(),
            overall = %overall_status,
            duty = %duty.status,
            issues = issues.len(),
            "evaluated day"
        );

        FullFeasibilityResult {
            booking_identifier: day.booking_identifier,
            quote_id: day.quote_id,
            aircraft_type: day.aircraft_type,
            aircraft_category: day.aircraft_category,
            workflow: day.workflow,
            flight_category,
            legs: day.legs,
            leg_results,
            duty,
            overall_status,
            issues,
            validation_checks: validation.checks,
            summary,
        }
    }

    fn local_departure_date(&self, leg: &LegContext) -> Option<NaiveDate> {
        let departure = leg.departure_utc?;
        let zone = self.sources.timezones.tz_for(&leg.departure_icao);
        Some(localize(departure, zone.as_deref()).date_naive())
    }

    fn summary_text(
        &self,
        day: &DayContext,
        leg_results: &[AirportFeasibilityResult],
        duty: &DutyFeasibilityResult,
        flight_category: &str,
    ) -> String {
        let mut lines = Vec::new();
        if day.aircraft_type.is_empty() {
            lines.push(format!("Quote {}", day.booking_identifier));
        } else {
            lines.push(format!("Quote {} ({})", day.booking_identifier, day.aircraft_type));
        }

        let mut sequence: Vec<&str> = Vec::new();
        for leg in &day.legs {
            if sequence.last() != Some(&leg.departure_icao.as_str()) {
                sequence.push(leg.departure_icao.as_str());
            }
            sequence.push(leg.arrival_icao.as_str());
        }
        let dates: Vec<NaiveDate> = day
            .legs
            .iter()
            .filter_map(|leg| self.local_departure_date(leg))
            .collect();
        let mut header = format!("{}-leg sequence {}", day.legs.len(), sequence.join("→"));
        match (dates.iter().min(), dates.iter().max()) {
            (Some(first), Some(last)) if first == last => {
                header.push_str(&format!(" on {}", first.format("%-d %b %Y")));
            }
            (Some(first), Some(last)) => {
                header.push_str(&format!(
                    " from {} - {}",
                    first.format("%-d %b %Y"),
                    last.format("%-d %b %Y")
                ));
            }
            _ => {}
        }
        lines.push(header);
        lines.push(format!("Flight category: {flight_category}"));

        lines.push("Duty Day:".to_string());
        lines.push(format!("- {}", duty.summary));
        if duty.split_duty_possible {
            lines.push("- Split duty possible (≥6h ground).".to_string());
        }
        if duty.reset_duty_possible {
            lines.push("- Reset duty possible (≥11h15 ground).".to_string());
        }

        for (index, leg) in leg_results.iter().enumerate() {
            lines.push(format!("Leg {} ({}):", index + 1, leg.route));
            let findings: Vec<String> = leg
                .categories()
                .into_iter()
                .filter(|(_, result)| !result.is_pass())
                .map(|(label, result)| format!("- {label}: {} ({})", result.summary, result.status))
                .collect();
            if findings.is_empty() {
                lines.push("- All checks PASS.".to_string());
            } else {
                lines.extend(findings);
            }
        }
        lines.join("\n")
    }
}
