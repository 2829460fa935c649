//! Domain error types.
//!
//! These describe payloads that cannot become a leg at all. Anything softer
//! (unknown pax, unparseable time) is carried as `None` on the leg and
//! reported by the evaluators instead.

use super::InvalidIcao;

/// Domain-level errors raised while building legs from payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Payload has no usable airport code for one side of the leg
    #[error("missing {0} airport")]
    MissingAirport(&'static str),

    /// Airport code present but malformed
    #[error("{side} airport: {source}")]
    InvalidAirport {
        side: &'static str,
        #[source]
        source: InvalidIcao,
    },
}
