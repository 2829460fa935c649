//! Domain types for the feasibility engine.
//!
//! This module holds the severity scale, airport identifiers, per-category
//! results and the per-leg snapshot every evaluator reads from. Validated
//! types enforce their invariants at construction time.

mod category;
mod error;
mod icao;
mod leg;
mod status;
mod time;

pub use category::CategoryResult;
pub use error::DomainError;
pub use icao::{Icao, InvalidIcao};
pub use leg::LegContext;
pub use status::{Status, worst};
pub use time::{
    format_hhmm, from_epoch, localize, minutes_from_number, parse_minutes, parse_utc, zone_or_utc,
};
