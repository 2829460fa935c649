//! Facts mined from free-text planning notes.
//!
//! Dispatchers leave three kinds of signal in planning notes: the aircraft
//! the client asked for ("requesting CJ3"), an owner hint ("CLUB CJ3 OWNER
//! REQUESTING CJ3") and date-tagged route lines ("22DEC CYYC - CYVR").

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use super::validation::aircraft_family;

static REQUESTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\brequest(?:ing|ed)\s+(?:interchange\s+(?:to\s+)?)?([A-Z0-9]{2,6})\b")
        .expect("valid regex")
});

static OWNER_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b([A-Z0-9]+)\s+([A-Z0-9]+)\s+owner\s+request(?:ing|ed|s)?\s+(interchange\s+(?:to\s+)?)?([A-Z0-9]+)",
    )
    .expect("valid regex")
});

static ROUTE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})([A-Z]{3})(\d{2})?\s+(.*)$").expect("valid regex")
});

static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]|\([^)]*\)").expect("valid regex"));

static POINT_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*-\s*").expect("valid regex"));

static ROUTE_POINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{3,4}$").expect("valid regex"));

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// First aircraft type named after "requesting" / "requested".
///
/// ```
/// use feasibility_engine::feasibility::requested_aircraft;
///
/// assert_eq!(requested_aircraft("Client requesting CJ3 for return"), Some("CJ3".into()));
/// assert_eq!(requested_aircraft("owner requesting interchange to EMB"), Some("EMB".into()));
/// assert_eq!(requested_aircraft("no request here"), None);
/// ```
pub fn requested_aircraft(text: &str) -> Option<String> {
    REQUESTED
        .captures(text)
        .map(|caps| caps[1].to_uppercase())
}

/// An owner's request as written in planning notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerHint {
    /// Ownership programme, e.g. `CLUB` or `INFINITY`.
    pub program: String,
    pub owner_type: String,
    pub requested_type: String,
    /// The note asked for an interchange explicitly.
    pub interchange: bool,
}

impl OwnerHint {
    /// An interchange is either explicit or implied by asking for a
    /// different aircraft family than the one owned.
    pub fn is_interchange(&self) -> bool {
        self.interchange || aircraft_family(&self.owner_type) != aircraft_family(&self.requested_type)
    }
}

pub fn owner_hint(text: &str) -> Option<OwnerHint> {
    let caps = OWNER_HINT.captures(text)?;
    Some(OwnerHint {
        program: caps[1].to_uppercase(),
        owner_type: caps[2].to_uppercase(),
        requested_type: caps[4].to_uppercase(),
        interchange: caps.get(3).is_some(),
    })
}

/// A date-tagged route line such as `22DEC CYKF-KSRQ`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    pub date: NaiveDate,
    pub points: Vec<String>,
}

impl RouteEntry {
    /// Route points joined with `-`.
    pub fn route(&self) -> String {
        self.points.join("-")
    }

    /// Whether `dep` is immediately followed by `arr` somewhere on the route.
    pub fn covers(&self, dep: &str, arr: &str) -> bool {
        self.points.windows(2).any(|pair| pair[0] == dep && pair[1] == arr)
    }
}

/// Every route line in `text`. Lines without a year take `default_year`.
pub fn parse_route_entries(text: &str, default_year: i32) -> Vec<RouteEntry> {
    text.lines()
        .filter_map(|line| parse_route_line(line, default_year))
        .collect()
}

fn parse_route_line(line: &str, default_year: i32) -> Option<RouteEntry> {
    let line = line
        .trim()
        .trim_matches(|c: char| c == '-' || c == '=' || c.is_whitespace())
        .to_uppercase();
    let caps = ROUTE_LINE.captures(&line)?;

    let day: u32 = caps[1].parse().ok()?;
    let month = MONTHS.iter().position(|m| *m == &caps[2])? as u32 + 1;
    let year = match caps.get(3) {
        Some(yy) => 2000 + yy.as_str().parse::<i32>().ok()?,
        None => default_year,
    };
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    let route = BRACKETED.replace_all(&caps[4], " ").replace('→', "-");
    let points: Vec<String> = POINT_SEPARATOR
        .split(route.trim())
        .map(str::trim)
        .filter(|p| ROUTE_POINT.is_match(p))
        .map(str::to_string)
        .collect();
    if points.len() < 2 {
        return None;
    }
    Some(RouteEntry { date, points })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn requested_type_is_uppercased() {
        assert_eq!(requested_aircraft("requested e545").as_deref(), Some("E545"));
        assert_eq!(requested_aircraft("REQUESTED C25B"), Some("C25B".to_string()));
        // Words longer than a type code are not aircraft.
        assert_eq!(requested_aircraft("requested praetor"), None);
    }

    #[test]
    fn owner_hint_same_type() {
        let hint = owner_hint("CLUB CJ3 OWNER REQUESTING CJ3").unwrap();
        assert_eq!(hint.program, "CLUB");
        assert_eq!(hint.owner_type, "CJ3");
        assert_eq!(hint.requested_type, "CJ3");
        assert!(!hint.interchange);
        assert!(!hint.is_interchange());
    }

    #[test]
    fn owner_hint_different_type_is_interchange() {
        let hint = owner_hint("INFINITY CJ2 OWNER REQUESTING CJ3").unwrap();
        assert!(!hint.interchange);
        assert!(hint.is_interchange());
    }

    #[test]
    fn owner_hint_explicit_interchange_tolerates_typos() {
        let hint = owner_hint("24Club CJ3 owner requesting interchange to EMB").unwrap();
        assert_eq!(hint.program, "24CLUB");
        assert_eq!(hint.requested_type, "EMB");
        assert!(hint.interchange);
        assert!(hint.is_interchange());
    }

    #[test]
    fn owner_hint_alias_is_not_interchange() {
        let hint = owner_hint("CLUB C25B OWNER REQUESTING CJ3").unwrap();
        assert!(!hint.is_interchange());
    }

    #[test]
    fn no_owner_hint() {
        assert_eq!(owner_hint("Catering for 4, no special requests"), None);
    }

    #[test]
    fn parses_route_lines() {
        let notes = "Trip notes\n22DEC CYKF-KSRQ [ONE-WAY]\n05DEC KPSP - CYEG\n-= 03JAN26 CYYC → CYVR (pos) =-";
        let entries = parse_route_entries(notes, 2025);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].date, date(2025, 12, 22));
        assert_eq!(entries[0].route(), "CYKF-KSRQ");
        assert_eq!(entries[1].points, vec!["KPSP", "CYEG"]);
        assert_eq!(entries[2].date, date(2026, 1, 3));
        assert_eq!(entries[2].route(), "CYYC-CYVR");
    }

    #[test]
    fn ignores_non_route_lines() {
        let notes = "24Club CJ3 owner requesting CJ3\n31FEB CYYC-CYVR\n12XYZ CYYC-CYVR\n10DEC CYYC";
        assert!(parse_route_entries(notes, 2025).is_empty());
    }

    #[test]
    fn covers_consecutive_points_only() {
        let entry = parse_route_entries("19NOV CYYC-CYEG-CYYC", 2025).remove(0);
        assert!(entry.covers("CYYC", "CYEG"));
        assert!(entry.covers("CYEG", "CYYC"));
        assert!(!entry.covers("CYYC", "CYVR"));
    }
}
