//! Slot and prior-permission lead times.

use chrono::{DateTime, Utc};

use super::Side;
use crate::domain::{CategoryResult, LegContext, Status};
use crate::reference::SlotPprProfile;

/// Lead time before which a slot or PPR cannot be requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lead {
    Days(u32),
    Hours(u32),
}

impl Lead {
    fn from_parts(days: Option<u32>, hours: Option<u32>) -> Option<Self> {
        days.map(Lead::Days).or(hours.map(Lead::Hours))
    }

    fn hours(self) -> f64 {
        match self {
            Lead::Days(days) => f64::from(days) * 24.0,
            Lead::Hours(hours) => f64::from(hours),
        }
    }

    fn window_label(self) -> String {
        match self {
            Lead::Days(days) => format!("{days}-day"),
            Lead::Hours(hours) => format!("{hours}-hour"),
        }
    }

    fn out_label(self) -> String {
        match self {
            Lead::Days(days) => format!("{days} days out"),
            Lead::Hours(hours) => format!("{hours} hours out"),
        }
    }
}

/// Slot and PPR requirements for one side of a leg, timed against the
/// scheduled departure or arrival.
pub fn evaluate_slot_ppr(
    profile: &SlotPprProfile,
    leg: &LegContext,
    side: Side,
    now: DateTime<Utc>,
) -> CategoryResult {
    let mut result = CategoryResult::pass("No slot/PPR requirement");

    let event = match side {
        Side::Departure => leg.departure_utc,
        Side::Arrival => leg.arrival_utc,
    };
    let hours_until = event.map(|at| (at - now).num_seconds() as f64 / 3600.0);

    let requirements = [
        (
            profile.slot_required,
            "Slot",
            Lead::from_parts(profile.slot_lead_days, profile.slot_lead_hours),
        ),
        (
            profile.ppr_required,
            "PPR",
            Lead::from_parts(profile.ppr_lead_days, profile.ppr_lead_hours),
        ),
    ];

    let mut summaries = Vec::new();
    for (required, label, lead) in requirements {
        if !required {
            continue;
        }
        result.push_issue(format!("{label} required for {}.", profile.icao));
        match (lead, hours_until) {
            (Some(lead), Some(hours_until)) if hours_until < lead.hours() => {
                result.raise(Status::Fail);
                summaries.push(format!("{label} required"));
                result.push_issue(format!(
                    "Inside {} {} window; action immediately.",
                    lead.window_label(),
                    label.to_lowercase()
                ));
            }
            (Some(lead), Some(_)) => {
                summaries.push(format!("{label} can only be obtained {}", lead.out_label()));
            }
            _ => {
                result.raise(Status::Caution);
                summaries.push(format!("{label} required"));
            }
        }
    }
    if !summaries.is_empty() {
        result.set_summary(summaries.join("; "));
    }

    if let Some(notes) = &profile.notes {
        result.push_issue(notes.clone());
    }

    result
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::domain::Icao;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    fn profile() -> SlotPprProfile {
        SlotPprProfile {
            icao: Icao::parse("KASE").unwrap(),
            slot_required: false,
            ppr_required: false,
            slot_lead_days: None,
            slot_lead_hours: None,
            ppr_lead_days: None,
            ppr_lead_hours: None,
            notes: None,
        }
    }

    fn leg_departing_in(days: i64) -> LegContext {
        let mut leg = LegContext::new(Icao::parse("KASE").unwrap(), Icao::parse("KDEN").unwrap());
        leg.departure_utc = Some(now() + Duration::days(days));
        leg.arrival_utc = Some(now() + Duration::days(days) + Duration::hours(1));
        leg
    }

    #[test]
    fn nothing_required_passes() {
        let result = evaluate_slot_ppr(&profile(), &leg_departing_in(2), Side::Departure, now());
        assert_eq!(result.status, Status::Pass);
        assert_eq!(result.summary, "No slot/PPR requirement");
    }

    #[test]
    fn slot_outside_lead_window_passes() {
        let profile = SlotPprProfile {
            slot_required: true,
            slot_lead_days: Some(10),
            ..profile()
        };
        let result = evaluate_slot_ppr(&profile, &leg_departing_in(15), Side::Departure, now());
        assert_eq!(result.status, Status::Pass);
        assert_eq!(result.summary, "Slot can only be obtained 10 days out");
    }

    #[test]
    fn slot_inside_lead_window_fails() {
        let profile = SlotPprProfile {
            slot_required: true,
            slot_lead_days: Some(10),
            ..profile()
        };
        let result = evaluate_slot_ppr(&profile, &leg_departing_in(5), Side::Departure, now());
        assert_eq!(result.status, Status::Fail);
        assert!(result.issues.iter().any(|i| i.contains("Inside 10-day")));
    }

    #[test]
    fn unknown_lead_cautions() {
        let profile = SlotPprProfile {
            ppr_required: true,
            ..profile()
        };
        let result = evaluate_slot_ppr(&profile, &leg_departing_in(5), Side::Arrival, now());
        assert_eq!(result.status, Status::Caution);
        assert_eq!(result.summary, "PPR required");
        assert_eq!(result.issues, vec!["PPR required for KASE."]);
    }

    #[test]
    fn unknown_time_cautions() {
        let profile = SlotPprProfile {
            slot_required: true,
            slot_lead_days: Some(3),
            ..profile()
        };
        let leg = LegContext::new(Icao::parse("KASE").unwrap(), Icao::parse("KDEN").unwrap());
        let result = evaluate_slot_ppr(&profile, &leg, Side::Departure, now());
        assert_eq!(result.status, Status::Caution);
    }

    #[test]
    fn hour_leads_use_hours() {
        let profile = SlotPprProfile {
            ppr_required: true,
            ppr_lead_hours: Some(48),
            ..profile()
        };
        let result = evaluate_slot_ppr(&profile, &leg_departing_in(1), Side::Departure, now());
        assert_eq!(result.status, Status::Fail);
        assert!(result.issues.iter().any(|i| i.contains("Inside 48-hour ppr window")));
    }
}
