//! Aircraft endurance.
//!
//! Free-text aircraft labels are canonicalized to a closed set of profiles.
//! Profiles with a pax-indexed endurance table are checked against the
//! limit for the booked pax count; everything else falls back to a flat
//! per-type limit.

use std::fmt;

use serde::Serialize;

use crate::config::EngineConfig;
use crate::domain::{CategoryResult, LegContext, Status};

/// Endurance minutes by pax count, index 0 is one passenger.
const CJ2_PAX_ENDURANCE: &[u32] = &[250, 245, 240, 230, 220, 210];
const CJ3_PAX_ENDURANCE: &[u32] = &[290, 280, 270, 260, 250, 235, 220];
const PRAETOR_PAX_ENDURANCE: &[u32] = &[465, 450, 435, 420, 405, 390, 375, 360, 345];

const DEFAULT_FLAT_LIMIT: u32 = 240;

/// Exact aliases after normalization (uppercase, no spaces, hyphens, `+`
/// or "CITATION").
const ALIASES: &[(&str, AircraftKind)] = &[
    ("CJ2", AircraftKind::Cj2),
    ("C25A", AircraftKind::Cj2),
    ("CJ3", AircraftKind::Cj3),
    ("C25B", AircraftKind::Cj3),
    ("CJ4", AircraftKind::Cj4),
    ("C25C", AircraftKind::Cj4),
    ("PC12", AircraftKind::Pc12),
    ("PILATUSPC12", AircraftKind::Pc12),
    ("E545", AircraftKind::Praetor500),
    ("P500", AircraftKind::Praetor500),
    ("PRAETOR500", AircraftKind::Praetor500),
    ("LEGACY450", AircraftKind::Praetor500),
    ("LEGACY500", AircraftKind::Praetor500),
    ("E550", AircraftKind::Praetor600),
    ("P600", AircraftKind::Praetor600),
    ("PRAETOR600", AircraftKind::Praetor600),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AircraftKind {
    Cj2,
    Cj3,
    Cj4,
    Pc12,
    Praetor500,
    Praetor600,
}

impl From<AircraftKind> for AircraftProfile {
    fn from(kind: AircraftKind) -> Self {
        match kind {
            AircraftKind::Cj2 => AircraftProfile::Cj2,
            AircraftKind::Cj3 => AircraftProfile::Cj3,
            AircraftKind::Cj4 => AircraftProfile::Cj4,
            AircraftKind::Pc12 => AircraftProfile::Pc12,
            AircraftKind::Praetor500 => AircraftProfile::Praetor500,
            AircraftKind::Praetor600 => AircraftProfile::Praetor600,
        }
    }
}

/// A canonical aircraft type, or the trimmed label when it matches none.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum AircraftProfile {
    Cj2,
    Cj3,
    Cj4,
    Pc12,
    Praetor500,
    Praetor600,
    Unknown(String),
}

impl AircraftProfile {
    /// Canonicalize a free-text label. Returns `None` for a blank label.
    ///
    /// ```
    /// use feasibility_engine::evaluate::AircraftProfile;
    ///
    /// assert_eq!(AircraftProfile::parse("Citation CJ3+"), Some(AircraftProfile::Cj3));
    /// assert_eq!(AircraftProfile::parse("e545"), Some(AircraftProfile::Praetor500));
    /// assert_eq!(
    ///     AircraftProfile::parse("King Air 350"),
    ///     Some(AircraftProfile::Unknown("King Air 350".into()))
    /// );
    /// assert_eq!(AircraftProfile::parse("  "), None);
    /// ```
    pub fn parse(label: &str) -> Option<Self> {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return None;
        }
        let compact: String = trimmed
            .to_uppercase()
            .replace("CITATION", "")
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        let kind = ALIASES
            .iter()
            .find(|(alias, _)| *alias == compact)
            .map(|(_, kind)| *kind)
            .or_else(|| keyword_kind(&compact));
        Some(kind.map_or_else(|| AircraftProfile::Unknown(trimmed.to_string()), Self::from))
    }

    /// Pax-indexed endurance minutes, when this type has them.
    pub fn pax_endurance(&self) -> Option<&'static [u32]> {
        match self {
            AircraftProfile::Cj2 => Some(CJ2_PAX_ENDURANCE),
            AircraftProfile::Cj3 => Some(CJ3_PAX_ENDURANCE),
            AircraftProfile::Praetor500 | AircraftProfile::Praetor600 => {
                Some(PRAETOR_PAX_ENDURANCE)
            }
            _ => None,
        }
    }

    pub fn flat_limit_minutes(&self) -> u32 {
        match self {
            AircraftProfile::Cj2 => 210,
            AircraftProfile::Cj3 => 220,
            AircraftProfile::Cj4 => 230,
            AircraftProfile::Pc12 => 240,
            _ => DEFAULT_FLAT_LIMIT,
        }
    }
}

impl fmt::Display for AircraftProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AircraftProfile::Cj2 => f.write_str("CJ2"),
            AircraftProfile::Cj3 => f.write_str("CJ3"),
            AircraftProfile::Cj4 => f.write_str("CJ4"),
            AircraftProfile::Pc12 => f.write_str("PC-12"),
            AircraftProfile::Praetor500 => f.write_str("Praetor 500"),
            AircraftProfile::Praetor600 => f.write_str("Praetor 600"),
            AircraftProfile::Unknown(label) => f.write_str(label),
        }
    }
}

fn keyword_kind(compact: &str) -> Option<AircraftKind> {
    if compact.contains("PRAETOR") {
        return Some(if compact.contains("600") {
            AircraftKind::Praetor600
        } else {
            AircraftKind::Praetor500
        });
    }
    if compact.contains("LEGACY") {
        return Some(AircraftKind::Praetor500);
    }
    if compact.contains("PC12") || compact.contains("PILATUS") {
        return Some(AircraftKind::Pc12);
    }
    [
        ("CJ2", AircraftKind::Cj2),
        ("CJ3", AircraftKind::Cj3),
        ("CJ4", AircraftKind::Cj4),
    ]
    .into_iter()
    .find(|(token, _)| compact.contains(token))
    .map(|(_, kind)| kind)
}

/// Planned block time against the endurance of the leg's aircraft.
pub fn evaluate_aircraft(leg: &LegContext, config: &EngineConfig) -> CategoryResult {
    let Some(profile) = AircraftProfile::parse(&leg.aircraft_type) else {
        return CategoryResult::with_issue(
            Status::Caution,
            "Missing aircraft type",
            "Cannot verify performance without aircraft type information.",
        );
    };
    let label = leg.aircraft_type.trim();

    let Some(block) = leg.block_minutes.or(leg.flight_minutes) else {
        return CategoryResult::with_issue(
            Status::Caution,
            format!("{label} block time unknown"),
            "Provide planned block time to validate endurance margins.",
        );
    };

    match profile.pax_endurance() {
        Some(table) => match leg.pax {
            Some(pax) => pax_check(label, table, pax, block, config),
            None => {
                let mut result = flat_check(label, &profile, block, config);
                result.raise(Status::Caution);
                result.set_summary(format!("{label} passenger count unknown"));
                result.push_issue("Confirm pax count to apply the pax endurance profile.");
                result
            }
        },
        None => flat_check(label, &profile, block, config),
    }
}

fn pax_check(
    label: &str,
    table: &[u32],
    pax: u32,
    block: u32,
    config: &EngineConfig,
) -> CategoryResult {
    let index = pax.max(1) as usize - 1;
    let Some(limit) = table.get(index).copied() else {
        return CategoryResult::with_issue(
            Status::Fail,
            format!("{label} cannot accommodate {pax} pax"),
            format!("Endurance profile covers at most {} pax.", table.len()),
        );
    };

    let margin = i64::from(limit) - i64::from(block);
    let mut result = CategoryResult::pass(format!("{label} within pax endurance"));
    result.push_issue(format!("Planned block time: {block} minutes"));
    result.push_issue(format!("Limit for {pax} pax: {limit} minutes"));
    result.push_issue(format!("Margin: {margin} minutes"));

    if margin >= config.endurance_pass_margin_mins {
        return result;
    }
    if margin >= config.endurance_caution_margin_mins {
        result.raise(Status::Caution);
        result.set_summary(format!("{label} near pax endurance"));
    } else {
        result.raise(Status::Fail);
        result.set_summary(format!("{label} exceeds pax endurance"));
    }
    result
}

fn flat_check(
    label: &str,
    profile: &AircraftProfile,
    block: u32,
    config: &EngineConfig,
) -> CategoryResult {
    let limit = i64::from(profile.flat_limit_minutes());
    let block = i64::from(block);
    let caution_at = (limit - config.flat_endurance_caution_band_mins)
        .max((limit as f64 * config.flat_endurance_caution_ratio) as i64);

    let mut result = CategoryResult::pass(format!("{label} within endurance"));
    result.push_issue(format!("Planned block time: {block} minutes"));
    result.push_issue(format!("Assumed endurance limit: {limit} minutes"));
    if block >= limit {
        result.raise(Status::Fail);
        result.set_summary(format!("{label} exceeds endurance"));
    } else if block >= caution_at {
        result.raise(Status::Caution);
        result.set_summary(format!("{label} near endurance limit"));
    }
    result
}
