//! Duty-day reconstruction across an ordered sequence of legs.
//!
//! The duty day runs from the first scheduled departure to the last
//! scheduled arrival. Ground time between consecutive legs decides whether
//! a split or reset duty is available.

use serde::Serialize;
use tracing::debug;

use crate::config::EngineConfig;
use crate::domain::{LegContext, Status, format_hhmm, localize};
use crate::sources::TimezoneLookup;

/// Ground time between two consecutive legs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnTime {
    /// Airport where the aircraft sits between the legs.
    pub airport: String,
    /// Minutes on the ground, `None` when either timestamp is unknown.
    pub minutes: Option<i64>,
}

/// Duty legality for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DutyFeasibilityResult {
    pub status: Status,
    /// Minutes from first departure to last arrival.
    pub total_duty: Option<i64>,
    pub duty_start_local: Option<String>,
    pub duty_end_local: Option<String>,
    pub turn_times: Vec<TurnTime>,
    pub split_duty_possible: bool,
    pub reset_duty_possible: bool,
    pub issues: Vec<String>,
    pub summary: String,
}

impl DutyFeasibilityResult {
    fn empty(status: Status, summary: &str) -> Self {
        Self {
            status,
            total_duty: None,
            duty_start_local: None,
            duty_end_local: None,
            turn_times: Vec::new(),
            split_duty_possible: false,
            reset_duty_possible: false,
            issues: Vec::new(),
            summary: summary.to_string(),
        }
    }
}

/// Evaluate the duty day formed by `legs`, which must already be in
/// chronological order.
pub fn evaluate_duty(
    legs: &[LegContext],
    timezones: &dyn TimezoneLookup,
    config: &EngineConfig,
) -> DutyFeasibilityResult {
    let (Some(first), Some(last)) = (legs.first(), legs.last()) else {
        return DutyFeasibilityResult::empty(Status::Pass, "No legs provided");
    };
    let mut result = DutyFeasibilityResult::empty(Status::Pass, "");

    for pair in legs.windows(2) {
        let (inbound, outbound) = (&pair[0], &pair[1]);
        let minutes = match (inbound.arrival_utc, outbound.departure_utc) {
            (Some(arrived), Some(departs)) => {
                let ground = (departs - arrived).num_minutes().max(0);
                result.issues.push(format!(
                    "Turn between {} and {}: {}",
                    inbound.route_label(),
                    outbound.route_label(),
                    format_hhmm(ground)
                ));
                Some(ground)
            }
            _ => {
                result.issues.push(format!(
                    "Missing timestamps for turn between {} and {}.",
                    inbound.route_label(),
                    outbound.route_label()
                ));
                None
            }
        };
        result.turn_times.push(TurnTime {
            airport: inbound.arrival_icao.to_string(),
            minutes,
        });
    }

    let ground: Vec<i64> = result.turn_times.iter().filter_map(|t| t.minutes).collect();
    result.split_duty_possible = ground.iter().any(|m| *m >= config.split_duty_turn_mins);
    result.reset_duty_possible = ground.iter().any(|m| *m >= config.reset_duty_turn_mins);

    result.duty_start_local = first.departure_utc.map(|dt| {
        let zone = timezones.tz_for(&first.departure_icao);
        localize(dt, zone.as_deref()).to_rfc3339()
    });
    result.duty_end_local = last.arrival_utc.map(|dt| {
        let zone = timezones.tz_for(&last.arrival_icao);
        localize(dt, zone.as_deref()).to_rfc3339()
    });

    let total = match (first.departure_utc, last.arrival_utc) {
        (Some(start), Some(end)) if end >= start => (end - start).num_minutes(),
        (Some(_), Some(_)) => {
            result.status = Status::Caution;
            result.summary = "Duty duration unavailable".to_string();
            result
                .issues
                .push("Last arrival is earlier than first departure.".to_string());
            return result;
        }
        _ => {
            result.status = Status::Caution;
            result.summary = "Duty duration unavailable".to_string();
            result
                .issues
                .push("Missing first departure or last arrival time.".to_string());
            return result;
        }
    };
    result.total_duty = Some(total);

    let standard = format_hhmm(config.duty_standard_max_mins);
    let hard = format_hhmm(config.duty_hard_max_mins);
    let total_label = format_hhmm(total);
    if total <= config.duty_standard_max_mins {
        result.summary = format!("Total duty {total_label} within {standard} limit");
    } else if total < config.duty_hard_max_mins {
        result.status = Status::Caution;
        result.summary = format!("Total duty {total_label} exceeds {standard} limit");
        result.issues.push(format!(
            "Duty exceeds the {standard} standard by {}.",
            format_hhmm(total - config.duty_standard_max_mins)
        ));
    } else {
        result.status = Status::Fail;
        result.summary = format!("Total duty {total_label} exceeds {hard} limit");
        result.issues.push(format!(
            "Duty exceeds the {hard} maximum by {}.",
            format_hhmm(total - config.duty_hard_max_mins)
        ));
    }

    debug!(
        total_minutes = total,
        status = %result.status,
        split = result.split_duty_possible,
        reset = result.reset_duty_possible,
        "evaluated duty day"
    );
    result
}
