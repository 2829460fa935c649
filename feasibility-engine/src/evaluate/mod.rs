//! Category evaluators.
//!
//! Each evaluator is a pure function from profiles, leg context and
//! extracted note facts to a [`CategoryResult`]. Evaluators never fail: a
//! missing input degrades to `CAUTION` with an issue explaining what is
//! unknown.
//!
//! [`CategoryResult`]: crate::domain::CategoryResult

mod aircraft;
mod customs;
mod deice;
mod operational_notes;
mod osa_ssa;
mod overflight;
mod slot_ppr;
mod suitability;
mod weight_balance;

use std::fmt;

use serde::Serialize;

pub use aircraft::{AircraftProfile, evaluate_aircraft};
pub use customs::evaluate_customs;
pub use deice::evaluate_deice;
pub use operational_notes::evaluate_operational_notes;
pub use osa_ssa::evaluate_osa_ssa;
pub use overflight::evaluate_overflight;
pub use slot_ppr::evaluate_slot_ppr;
pub use suitability::evaluate_suitability;
pub use weight_balance::{
    PaxBreakdown, PayloadSource, Season, WeightBalanceDetails, WeightBalanceResult,
    estimate_pax_payload, evaluate_weight_balance,
};

/// Which end of a leg an airport is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    #[serde(rename = "DEP")]
    Departure,
    #[serde(rename = "ARR")]
    Arrival,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Departure => "DEP",
            Side::Arrival => "ARR",
        }
    }

    /// `Departure` / `Arrival`, as used in issue prefixes.
    pub fn label(self) -> &'static str {
        match self {
            Side::Departure => "Departure",
            Side::Arrival => "Arrival",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `12,345` style grouping for feet and pounds in issue text.
pub(crate) fn thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
