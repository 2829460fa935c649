//! Passenger and cargo payload against the aircraft's seasonal limit.
//!
//! Pax-details payloads come from the booking system in several shapes:
//! tickets and cargo may sit at the top level or under `pax`,
//! `paxDetails`, `paxPayload` or `payload.paxPayload`. Each ticket uses an
//! explicit body weight when present and a seasonal standard weight
//! otherwise.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use serde_json::{Value, json};

use super::AircraftProfile;
use crate::config::EngineConfig;
use crate::domain::{CategoryResult, Status};
use crate::payload;

/// Max pax plus cargo payload in pounds: (type, summer, winter).
const MAX_PAYLOAD_LB: &[(&str, u32, u32)] = &[
    ("C25A", 1086, 1034),
    ("C25B", 1602, 1550),
    ("E545", 2116, 2104),
];

const HIGH_RISK_KEYWORDS: &[&str] = &["SKI", "GOLF", "BIKE", "PET"];

const CONTAINERS: &[&[&str]] = &[
    &[],
    &["pax"],
    &["paxDetails"],
    &["paxPayload"],
    &["payload"],
    &["payload", "paxPayload"],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Season {
    Summer,
    Winter,
}

impl Season {
    /// April through October is summer.
    pub fn from_month(month: u32) -> Self {
        if (4..=10).contains(&month) {
            Season::Summer
        } else {
            Season::Winter
        }
    }

    /// Season of the departure date, winter when unknown.
    pub fn for_departure(departure: Option<DateTime<Utc>>) -> Self {
        departure.map_or(Season::Winter, |at| Season::from_month(at.month()))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Season::Summer => "Summer",
            Season::Winter => "Winter",
        }
    }

    fn standard_weight_lb(self, category: PaxCategory) -> f64 {
        match (self, category) {
            (Season::Summer, PaxCategory::Male) => 193.0,
            (Season::Summer, PaxCategory::Female) => 159.0,
            (Season::Winter, PaxCategory::Male) => 199.0,
            (Season::Winter, PaxCategory::Female) => 165.0,
            (_, PaxCategory::Child) => 75.0,
            (_, PaxCategory::Infant) => 30.0,
        }
    }
}

/// Where the payload figures came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadSource {
    Api,
    ApiError,
    Estimate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PaxCategory {
    Male,
    Female,
    Child,
    Infant,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaxBreakdown {
    #[serde(rename = "Male")]
    pub male: u32,
    #[serde(rename = "Female")]
    pub female: u32,
    #[serde(rename = "Child")]
    pub child: u32,
    #[serde(rename = "Infant")]
    pub infant: u32,
}

impl PaxBreakdown {
    fn count(&mut self, category: PaxCategory) {
        match category {
            PaxCategory::Male => self.male += 1,
            PaxCategory::Female => self.female += 1,
            PaxCategory::Child => self.child += 1,
            PaxCategory::Infant => self.infant += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightBalanceDetails {
    pub season: Season,
    pub payload_source: PayloadSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_error: Option<String>,
    pub pax_weight: f64,
    pub cargo_weight: f64,
    pub total_payload: f64,
    pub pax_count: u32,
    pub max_allowed: Option<u32>,
    pub pax_breakdown: PaxBreakdown,
    pub high_risk_cargo: bool,
}

impl WeightBalanceDetails {
    fn empty(season: Season, source: PayloadSource) -> Self {
        Self {
            season,
            payload_source: source,
            payload_error: None,
            pax_weight: 0.0,
            cargo_weight: 0.0,
            total_payload: 0.0,
            pax_count: 0,
            max_allowed: None,
            pax_breakdown: PaxBreakdown::default(),
            high_risk_cargo: false,
        }
    }
}

/// A [`CategoryResult`] with the payload figures behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightBalanceResult {
    #[serde(flatten)]
    pub result: CategoryResult,
    pub details: WeightBalanceDetails,
}

impl WeightBalanceResult {
    pub fn status(&self) -> Status {
        self.result.status
    }
}

/// A pax-details payload of `pax` standard adult tickets.
pub fn estimate_pax_payload(pax: u32) -> Value {
    let tickets: Vec<Value> = (0..pax).map(|_| json!({"paxType": "ADULT"})).collect();
    json!({ "tickets": tickets })
}

pub fn evaluate_weight_balance(
    pax_payload: Option<&Value>,
    aircraft_type: &str,
    season: Season,
    source: PayloadSource,
    config: &EngineConfig,
) -> WeightBalanceResult {
    let mut details = WeightBalanceDetails::empty(season, source);
    let Some(pax_payload) = pax_payload else {
        return WeightBalanceResult {
            result: CategoryResult::with_issue(
                Status::Caution,
                "No weight data available",
                "Could not retrieve pax/cargo details.",
            ),
            details,
        };
    };

    let mut pax_weight = 0.0;
    for ticket in containers(pax_payload).flat_map(|c| payload::objects(c.get("tickets"))) {
        let category = pax_category(ticket);
        pax_weight += ticket_weight(ticket, season, category);
        details.pax_breakdown.count(category);
        details.pax_count += 1;
    }

    let cargo: Vec<&Value> = containers(pax_payload)
        .flat_map(|c| payload::objects(c.get("cargo")).chain(payload::objects(c.get("cargoItems"))))
        .collect();
    let weights: Vec<f64> = cargo
        .iter()
        .filter_map(|item| item.get("weightQty").and_then(payload::scalar_f64))
        .collect();
    let cargo_weight = if weights.is_empty() {
        config.default_cargo_per_pax_lb * f64::from(details.pax_count)
    } else {
        weights.iter().sum()
    };
    let total = pax_weight + cargo_weight;

    details.pax_weight = round2(pax_weight);
    details.cargo_weight = round2(cargo_weight);
    details.total_payload = round2(total);

    let Some((type_code, max_allowed)) = payload_limit(aircraft_type, season) else {
        let label = Some(aircraft_type.trim()).filter(|t| !t.is_empty()).unwrap_or("aircraft");
        return WeightBalanceResult {
            result: CategoryResult::with_issue(
                Status::Caution,
                format!("Missing payload limits for {label}"),
                "Unsupported aircraft type for payload table.",
            ),
            details,
        };
    };
    details.max_allowed = Some(max_allowed);

    let high_risk = cargo.iter().any(|item| {
        let note = item
            .get("note")
            .and_then(payload::scalar_str)
            .unwrap_or_default()
            .to_uppercase();
        HIGH_RISK_KEYWORDS.iter().any(|k| note.contains(k))
    });
    details.high_risk_cargo = high_risk;

    let overage = total - f64::from(max_allowed);
    let mut result = CategoryResult::pass("");
    if overage > 0.0 {
        result.raise(if overage <= config.overweight_caution_lb {
            Status::Caution
        } else {
            Status::Fail
        });
        result.push_issue(format!("Overweight by {overage:.1} lb"));
    }
    if high_risk {
        result.raise(Status::Caution);
        result.push_issue("High-risk cargo detected; verify fit");
    }

    let season = season.as_str();
    let summary = match result.status {
        Status::Fail => format!("Payload exceeds {type_code} {season} limit"),
        Status::Caution if overage > 0.0 => format!("Near payload limit for {type_code} {season}"),
        Status::Caution => "Payload ok but cargo needs review".to_string(),
        _ => format!("Within payload limits ({type_code} {season})"),
    };
    result.set_summary(summary);

    WeightBalanceResult { result, details }
}

fn containers(root: &Value) -> impl Iterator<Item = &Value> {
    CONTAINERS
        .iter()
        .filter_map(move |path| payload::path(root, path))
        .filter(|value| value.is_object())
}

/// Payload table code and limit for a free-text aircraft type.
fn payload_limit(aircraft_type: &str, season: Season) -> Option<(&'static str, u32)> {
    let upper = aircraft_type.to_uppercase();
    let code = MAX_PAYLOAD_LB
        .iter()
        .map(|(code, _, _)| *code)
        .find(|code| upper.contains(code))
        .or_else(|| match AircraftProfile::parse(aircraft_type)? {
            AircraftProfile::Cj2 => Some("C25A"),
            AircraftProfile::Cj3 => Some("C25B"),
            AircraftProfile::Praetor500 | AircraftProfile::Praetor600 => Some("E545"),
            _ => None,
        })?;
    MAX_PAYLOAD_LB
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|(c, summer, winter)| match season {
            Season::Summer => (*c, *summer),
            Season::Winter => (*c, *winter),
        })
}

fn label(value: Option<&Value>, keys: &[&str]) -> Option<String> {
    let value = value?;
    payload::scalar_str(value).or_else(|| payload::first_str(value, keys))
}

fn gender(text: &str) -> Option<PaxCategory> {
    match text.trim().to_lowercase().chars().next()? {
        'f' => Some(PaxCategory::Female),
        'm' => Some(PaxCategory::Male),
        _ => None,
    }
}

fn pax_category(ticket: &Value) -> PaxCategory {
    let pax_type = label(ticket.get("paxType"), &["code", "type", "name", "label"])
        .or_else(|| label(ticket.get("type"), &[]))
        .or_else(|| label(ticket.get("pax_type"), &[]))
        .unwrap_or_else(|| "ADULT".to_string())
        .to_uppercase();
    if pax_type.contains("INFANT") {
        return PaxCategory::Infant;
    }
    if pax_type.contains("CHILD") {
        return PaxCategory::Child;
    }

    let user = ticket.get("paxUser");
    payload::first_str(ticket, &["gender"])
        .or_else(|| user.and_then(|u| payload::first_str(u, &["gender", "sex"])))
        .and_then(|g| gender(&g))
        .or_else(|| gender(&pax_type))
        .unwrap_or(PaxCategory::Male)
}

fn ticket_weight(ticket: &Value, season: Season, category: PaxCategory) -> f64 {
    let explicit = ["bodyWeight", "weight"]
        .iter()
        .filter_map(|key| ticket.get(*key))
        .chain(ticket.get("paxUser").and_then(|u| u.get("bodyWeight")))
        .filter_map(payload::scalar_f64)
        .find(|w| *w > 0.0);
    let luggage = ["luggageWeight", "luggage_weight"]
        .iter()
        .filter_map(|key| ticket.get(*key))
        .find_map(payload::scalar_f64)
        .unwrap_or(0.0);
    explicit.unwrap_or_else(|| season.standard_weight_lb(category)) + luggage
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
