//! Overflight permit lead times.

use chrono::{DateTime, Utc};

use crate::config::{EngineConfig, OverflightStrategy};
use crate::domain::{CategoryResult, LegContext, Status};

/// ISO country codes for countries listed by name in the permit tables.
const ISO_NAMES: &[(&str, &str)] = &[
    ("CU", "CUBA"),
    ("MX", "MEXICO"),
    ("RU", "RUSSIA"),
    ("CN", "CHINA"),
    ("GL", "GREENLAND"),
    ("SA", "SAUDI ARABIA"),
];

fn country_name(country: &str) -> String {
    let upper = country.trim().to_uppercase();
    ISO_NAMES
        .iter()
        .find(|(code, _)| *code == upper)
        .map_or(upper, |(_, name)| (*name).to_string())
}

/// Countries the leg touches: the route list when present, otherwise the
/// departure and arrival countries.
fn route_countries(leg: &LegContext) -> Vec<String> {
    let listed: Vec<String> = if leg.route_countries.is_empty() {
        [&leg.departure_country, &leg.arrival_country]
            .into_iter()
            .flatten()
            .map(|c| country_name(c))
            .collect()
    } else {
        leg.route_countries.iter().map(|c| country_name(c)).collect()
    };
    let mut countries = Vec::new();
    for country in listed {
        if !country.is_empty() && !countries.contains(&country) {
            countries.push(country);
        }
    }
    countries
}

/// `hours` in the unit of the configured permit table.
fn span(hours: f64, strategy: OverflightStrategy) -> String {
    match strategy {
        OverflightStrategy::LeadDays => format!("{:.1} day(s)", hours / 24.0),
        OverflightStrategy::LeadHours => format!("{hours:.0}h"),
    }
}

fn requirement(lead_hours: i64, strategy: OverflightStrategy) -> String {
    match strategy {
        OverflightStrategy::LeadDays => format!("{} day(s)", lead_hours / 24),
        OverflightStrategy::LeadHours => format!("{lead_hours}h"),
    }
}

/// Permit lead time for every permit country on the route, measured from
/// `now` to the scheduled departure.
pub fn evaluate_overflight(
    leg: &LegContext,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> CategoryResult {
    let leads = config.overflight_leads_hours();
    let flagged: Vec<(String, i64)> = route_countries(leg)
        .into_iter()
        .filter_map(|country| leads.get(&country).map(|lead| (country.clone(), *lead)))
        .collect();

    if flagged.is_empty() {
        return CategoryResult::pass("No overflight permits detected");
    }

    let strategy = config.overflight_strategy;
    let mut result = CategoryResult::pass("Overflight permits required");
    let Some(departure) = leg.departure_utc else {
        result.raise(Status::Caution);
        result.set_summary("Departure time unknown");
        for (country, lead) in &flagged {
            result.push_issue(format!(
                "{country} permit requires {} lead; departure time unknown.",
                requirement(*lead, strategy)
            ));
        }
        return result;
    };

    let hours_until = (departure - now).num_seconds() as f64 / 3600.0;
    let buffer = config.overflight_tight_buffer_hours;
    for (country, lead) in flagged {
        let lead_hours = lead as f64;
        if hours_until < lead_hours {
            result.raise(Status::Fail);
            result.push_issue(format!(
                "{country} permit short by {}",
                span(lead_hours - hours_until, strategy)
            ));
        } else if hours_until < (lead + buffer) as f64 {
            result.raise(Status::Caution);
            result.push_issue(format!(
                "{country} permit lead time tight ({} vs {})",
                span(hours_until, strategy),
                requirement(lead, strategy)
            ));
        } else {
            result.push_issue(format!(
                "{country} permit lead time satisfied ({} requirement)",
                requirement(lead, strategy)
            ));
        }
    }
    result
}
