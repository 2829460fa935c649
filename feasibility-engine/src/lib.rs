//! Pre-dispatch feasibility engine.
//!
//! Given a quote for one or more flight legs, answers: "can we operate
//! this day as booked, and if not, what gets in the way?" Static airport
//! reference data and free-text operational/customs notes are turned into
//! a severity-ranked set of findings per leg, plus a duty-day legality
//! check across the whole itinerary.

pub mod config;
pub mod domain;
pub mod evaluate;
pub mod feasibility;
pub mod notes;
pub mod payload;
pub mod reference;
pub mod sources;
