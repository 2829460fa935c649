//! Airport identifier type.

use std::fmt;

use serde::Serialize;

/// Error returned when parsing an invalid airport identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid ICAO code: {reason}")]
pub struct InvalidIcao {
    reason: &'static str,
}

/// A normalized airport identifier.
///
/// Standard ICAO codes are four letters, but flight-ops payloads also carry
/// three-character FAA/TC identifiers and codes with digits (`CPZ3`), so any
/// 3-4 ASCII alphanumerics are accepted. Input is trimmed and uppercased.
///
/// # Examples
///
/// ```
/// use feasibility_engine::domain::Icao;
///
/// let cyyc = Icao::parse(" cyyc ").unwrap();
/// assert_eq!(cyyc.as_str(), "CYYC");
///
/// assert!(Icao::parse("").is_err());
/// assert!(Icao::parse("CY-C").is_err());
/// assert!(Icao::parse("CYYCX").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Icao(String);

impl Icao {
    /// Parse an identifier, normalizing whitespace and case.
    pub fn parse(s: &str) -> Result<Self, InvalidIcao> {
        let trimmed = s.trim();

        if !(3..=4).contains(&trimmed.len()) {
            return Err(InvalidIcao {
                reason: "must be 3 or 4 characters",
            });
        }

        if !trimmed.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(InvalidIcao {
                reason: "must be ASCII letters or digits",
            });
        }

        Ok(Icao(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Icao {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Icao({})", self.0)
    }
}

impl fmt::Display for Icao {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Icao {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
