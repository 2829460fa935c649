//! Immutable per-leg snapshot built from a flight payload.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::{DomainError, Icao};
use crate::payload;
use crate::reference::ReferenceData;

const DEPARTURE_KEYS: &[&str] = &[
    "departureAirport",
    "departure_airport",
    "dep_airport",
    "airportFrom",
    "fromAirport",
];
const ARRIVAL_KEYS: &[&str] = &[
    "arrivalAirport",
    "arrival_airport",
    "arr_airport",
    "airportTo",
    "toAirport",
];
const DEPARTURE_TIME_KEYS: &[&str] = &["departureDateUTC", "dep_time", "departureTime"];
const ARRIVAL_TIME_KEYS: &[&str] = &["arrivalDateUTC", "arrivalTime", "arrivalDate"];
const PAX_KEYS: &[&str] = &["pax", "paxCount", "pax_count"];
const BLOCK_KEYS: &[&str] = &[
    "blockTime",
    "plannedBlockTime",
    "block_time",
    "planned_block_time",
];
const FLIGHT_TIME_KEYS: &[&str] = &["flightTime", "flight_time"];
const AIRCRAFT_TYPE_KEYS: &[&str] = &["aircraftType", "aircraft_type", "aircraft", "aircraftName"];
const AIRCRAFT_CATEGORY_KEYS: &[&str] = &["aircraftCategory", "aircraft_category"];

/// Everything the evaluators need to know about one leg.
///
/// Built once from the flight payload and never mutated afterwards. Fields
/// the payload lacks are `None` or empty; evaluators decide what unknown
/// means for their category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegContext {
    pub leg_id: String,
    /// Identifier used when fetching pax details (may differ from `leg_id`).
    pub flight_id: Option<String>,
    pub departure_icao: Icao,
    pub arrival_icao: Icao,
    pub departure_utc: Option<DateTime<Utc>>,
    pub arrival_utc: Option<DateTime<Utc>>,
    pub pax: Option<u32>,
    pub block_minutes: Option<u32>,
    pub flight_minutes: Option<u32>,
    pub aircraft_type: String,
    /// Uppercased category label, e.g. `LIGHT_JET`.
    pub aircraft_category: String,
    pub workflow: String,
    pub workflow_custom_name: String,
    pub notes: String,
    pub planning_notes: String,
    pub route_countries: Vec<String>,
    pub departure_country: Option<String>,
    pub arrival_country: Option<String>,
    pub is_international: bool,
}

impl LegContext {
    /// A leg between two airports with every other field unknown.
    pub fn new(departure_icao: Icao, arrival_icao: Icao) -> Self {
        Self {
            leg_id: String::new(),
            flight_id: None,
            departure_icao,
            arrival_icao,
            departure_utc: None,
            arrival_utc: None,
            pax: None,
            block_minutes: None,
            flight_minutes: None,
            aircraft_type: String::new(),
            aircraft_category: String::new(),
            workflow: String::new(),
            workflow_custom_name: String::new(),
            notes: String::new(),
            planning_notes: String::new(),
            route_countries: Vec::new(),
            departure_country: None,
            arrival_country: None,
            is_international: false,
        }
    }

    /// Build a leg from a flight payload, or `None` when either airport is
    /// missing or malformed.
    pub fn from_flight(flight: &Value, reference: &ReferenceData) -> Option<Self> {
        match Self::try_from_flight(flight, reference) {
            Ok(leg) => Some(leg),
            Err(e) => {
                tracing::debug!(error = %e, "skipping flight payload");
                None
            }
        }
    }

    /// Build a leg from a flight payload, reporting why it was rejected.
    pub fn try_from_flight(flight: &Value, reference: &ReferenceData) -> Result<Self, DomainError> {
        let departure_icao = airport(flight, DEPARTURE_KEYS, "departureAirportObj", "departure")?;
        let arrival_icao = airport(flight, ARRIVAL_KEYS, "arrivalAirportObj", "arrival")?;

        let departure_country = reference.country(&departure_icao).map(str::to_string);
        let arrival_country = reference.country(&arrival_icao).map(str::to_string);
        let is_international = match (&departure_country, &arrival_country) {
            (Some(dep), Some(arr)) => !dep.eq_ignore_ascii_case(arr),
            _ => false,
        };

        Ok(Self {
            leg_id: text(flight, &["flightId", "id"]),
            flight_id: payload::path(flight, &["flightInfo", "flightId"])
                .and_then(payload::scalar_str)
                .or_else(|| payload::first_str(flight, &["flightId", "id"])),
            departure_icao,
            arrival_icao,
            departure_utc: payload::first_timestamp(flight, DEPARTURE_TIME_KEYS),
            arrival_utc: payload::first_timestamp(flight, ARRIVAL_TIME_KEYS),
            pax: payload::first_u32(flight, PAX_KEYS),
            block_minutes: payload::first_minutes(flight, BLOCK_KEYS),
            flight_minutes: payload::first_minutes(flight, FLIGHT_TIME_KEYS),
            aircraft_type: text(flight, AIRCRAFT_TYPE_KEYS),
            aircraft_category: text(flight, AIRCRAFT_CATEGORY_KEYS).to_uppercase(),
            workflow: text(flight, &["workflow"]),
            workflow_custom_name: text(flight, &["workflowCustomName"]),
            notes: text(flight, &["notes", "legNotes"]),
            planning_notes: text(flight, &["planningNotes", "planningNote"]),
            route_countries: payload::upper_list(flight.get("routeCountries")),
            departure_country,
            arrival_country,
            is_international,
        })
    }

    /// Fill in aircraft type and category when the leg payload carried none.
    #[must_use]
    pub fn inherit_aircraft(mut self, aircraft_type: &str, aircraft_category: &str) -> Self {
        if self.aircraft_type.is_empty() {
            self.aircraft_type = aircraft_type.trim().to_string();
        }
        if self.aircraft_category.is_empty() {
            self.aircraft_category = aircraft_category.trim().to_uppercase();
        }
        self
    }

    /// `DEP→ARR` label.
    pub fn route_label(&self) -> String {
        format!("{}→{}", self.departure_icao, self.arrival_icao)
    }
}

fn text(flight: &Value, keys: &[&str]) -> String {
    payload::first_str(flight, keys).unwrap_or_default()
}

fn airport(
    flight: &Value,
    keys: &[&str],
    object_key: &str,
    side: &'static str,
) -> Result<Icao, DomainError> {
    let code = payload::first_str(flight, keys).or_else(|| {
        flight
            .get(object_key)
            .and_then(|obj| payload::first_str(obj, &["icao", "iata", "lid", "code"]))
    });
    let code = code.ok_or(DomainError::MissingAirport(side))?;
    Icao::parse(&code).map_err(|source| DomainError::InvalidAirport { side, source })
}
