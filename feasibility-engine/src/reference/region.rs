//! Routing-region classification (Regular / SSA / OSA).
//!
//! Canada outside Nunavut and the contiguous United States form the regular
//! service area. Nunavut, the non-contiguous US, Mexico and the Caribbean are
//! the secondary service area. Everything else, including airports with no
//! country metadata, is outside the service area.

use std::fmt;

use serde::Serialize;

use super::ReferenceData;
use crate::domain::Icao;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoutingRegion {
    Regular,
    Ssa,
    Osa,
}

impl RoutingRegion {
    pub fn as_str(self) -> &'static str {
        match self {
            RoutingRegion::Regular => "REGULAR",
            RoutingRegion::Ssa => "SSA",
            RoutingRegion::Osa => "OSA",
        }
    }
}

impl fmt::Display for RoutingRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const CARIBBEAN: &[&str] = &[
    "AG", "AI", "AW", "BB", "BL", "BQ", "BS", "CU", "CW", "DM", "DO", "GD", "GP", "HT", "JM",
    "KN", "KY", "LC", "MF", "MQ", "MS", "SX", "TC", "TT", "VC", "VG", "VI",
];

const SSA_US_SUBDIVISIONS: &[&str] = &["ALASKA", "HAWAII", "PUERTO RICO", "VIRGIN ISLANDS"];

const CONTIGUOUS_US: &[&str] = &[
    "ALABAMA",
    "ARIZONA",
    "ARKANSAS",
    "CALIFORNIA",
    "COLORADO",
    "CONNECTICUT",
    "DELAWARE",
    "DISTRICT OF COLUMBIA",
    "FLORIDA",
    "GEORGIA",
    "IDAHO",
    "ILLINOIS",
    "INDIANA",
    "IOWA",
    "KANSAS",
    "KENTUCKY",
    "LOUISIANA",
    "MAINE",
    "MARYLAND",
    "MASSACHUSETTS",
    "MICHIGAN",
    "MINNESOTA",
    "MISSISSIPPI",
    "MISSOURI",
    "MONTANA",
    "NEBRASKA",
    "NEVADA",
    "NEW HAMPSHIRE",
    "NEW JERSEY",
    "NEW MEXICO",
    "NEW YORK",
    "NORTH CAROLINA",
    "NORTH DAKOTA",
    "OHIO",
    "OKLAHOMA",
    "OREGON",
    "PENNSYLVANIA",
    "RHODE ISLAND",
    "SOUTH CAROLINA",
    "SOUTH DAKOTA",
    "TENNESSEE",
    "TEXAS",
    "UTAH",
    "VERMONT",
    "VIRGINIA",
    "WASHINGTON",
    "WEST VIRGINIA",
    "WISCONSIN",
    "WYOMING",
];

/// Region of a single airport with human-readable reasons.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirportRegion {
    pub airport: Icao,
    pub region: RoutingRegion,
    pub reasons: Vec<String>,
    pub country: Option<String>,
    pub subdivision: Option<String>,
}

/// Region of a leg with the reasons that decided it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightRegion {
    pub region: RoutingRegion,
    pub reasons: Vec<String>,
}

/// Classify one airport from its country and subdivision metadata.
pub fn classify_airport(icao: &Icao, reference: &ReferenceData) -> AirportRegion {
    let country = reference.country(icao).map(str::to_ascii_uppercase);
    let subdivision = reference.subdivision(icao).map(str::to_uppercase);

    let (region, reason) = match (country.as_deref(), subdivision.as_deref()) {
        (None, _) => (
            RoutingRegion::Osa,
            format!("No country metadata for {icao}; defaulting to OSA."),
        ),
        (Some("CA"), Some("NUNAVUT")) => (
            RoutingRegion::Ssa,
            format!("{icao} is in Nunavut; SSA handling applies."),
        ),
        (Some("CA"), _) => (
            RoutingRegion::Regular,
            format!("{icao} is in Canada (core service area)."),
        ),
        (Some("US"), Some(sub)) if SSA_US_SUBDIVISIONS.contains(&sub) => (
            RoutingRegion::Ssa,
            format!("{icao} is in {}; SSA handling applies.", title_case(sub)),
        ),
        (Some("US"), Some(sub)) if CONTIGUOUS_US.contains(&sub) => (
            RoutingRegion::Regular,
            format!("{icao} is in the contiguous United States."),
        ),
        (Some("US"), sub) => (
            RoutingRegion::Osa,
            format!(
                "{icao} is in {}; treat as OSA.",
                sub.map(title_case).unwrap_or_else(|| "unknown region".into())
            ),
        ),
        (Some("MX"), _) => (
            RoutingRegion::Ssa,
            format!("{icao} is in Mexico; SSA handling applies."),
        ),
        (Some(code), _) if CARIBBEAN.contains(&code) => (
            RoutingRegion::Ssa,
            format!("{icao} is in the Caribbean ({code})."),
        ),
        (Some(_), _) => (
            RoutingRegion::Osa,
            format!("{icao} is outside Canada and the contiguous United States."),
        ),
    };

    AirportRegion {
        airport: icao.clone(),
        region,
        reasons: vec![reason],
        country,
        subdivision,
    }
}

/// Classify a leg. SSA at either end wins; a Canada/US cross-border leg
/// between two regular airports is OSA.
pub fn classify_flight(dep: &Icao, arr: &Icao, reference: &ReferenceData) -> FlightRegion {
    let dep = classify_airport(dep, reference);
    let arr = classify_airport(arr, reference);

    let reasons_for = |region: RoutingRegion| -> Vec<String> {
        [&dep, &arr]
            .into_iter()
            .filter(|a| a.region == region)
            .flat_map(|a| a.reasons.iter().cloned())
            .collect()
    };

    if dep.region == RoutingRegion::Ssa || arr.region == RoutingRegion::Ssa {
        return FlightRegion {
            region: RoutingRegion::Ssa,
            reasons: reasons_for(RoutingRegion::Ssa),
        };
    }

    let both_regular = dep.region == RoutingRegion::Regular && arr.region == RoutingRegion::Regular;
    if both_regular && dep.country == arr.country {
        let reason = if dep.country.as_deref() == Some("CA") {
            "Both airports are in Canada (excluding Nunavut)."
        } else {
            "Both airports are in the contiguous United States."
        };
        return FlightRegion {
            region: RoutingRegion::Regular,
            reasons: vec![reason.to_string()],
        };
    }

    let mut reasons = reasons_for(RoutingRegion::Osa);
    if reasons.is_empty() {
        reasons.push(if both_regular {
            "Cross-border Canada/U.S. sector falls outside the Regular definition.".to_string()
        } else {
            "Flight extends outside the Regular/SSA definitions.".to_string()
        });
    }
    FlightRegion {
        region: RoutingRegion::Osa,
        reasons,
    }
}

/// Day-level flight category over every airport touched.
pub fn day_category_label<'a, I>(airports: I, reference: &ReferenceData) -> &'static str
where
    I: IntoIterator<Item = &'a Icao>,
{
    let mut any_ssa = false;
    let mut all_us = true;
    let mut any = false;

    for icao in airports {
        any = true;
        match classify_airport(icao, reference).region {
            RoutingRegion::Osa => return "OSA",
            RoutingRegion::Ssa => any_ssa = true,
            RoutingRegion::Regular => {}
        }
        if reference.country(icao) != Some("US") {
            all_us = false;
        }
    }

    if any_ssa {
        "SSA"
    } else if any && all_us {
        "US point-to-point"
    } else {
        "Regular"
    }
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
