//! Leg and day orchestration.
//!
//! [`FeasibilityEngine`] runs every category evaluator for both ends of a
//! leg, then evaluates a quote's legs together with the duty day they
//! form. Planning notes are mined for owner hints, requested aircraft and
//! route lines, and cross-checked against the booking.

mod airport;
mod day;
mod duty;
mod planning_notes;
mod validation;

#[cfg(test)]
mod day_tests;

pub use airport::{AirportFeasibilityResult, AirportSideResult, Collaborators, FeasibilityEngine};
pub use day::{DayContext, FeasibilityError, FullFeasibilityResult};
pub use duty::{DutyFeasibilityResult, TurnTime, evaluate_duty};
pub use planning_notes::{OwnerHint, RouteEntry, owner_hint, parse_route_entries, requested_aircraft};
pub use validation::{
    ValidationReport, WorkflowClass, aircraft_family, validate_requested_aircraft, validate_routes,
    validate_workflow,
};
