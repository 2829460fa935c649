//! Customs-note extraction.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::rules::{CustomsRules, contains_any, contains_word, find_word};
use super::tags::{CustomsTag, select_primary};

static AOE_CANPASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\baoe\s*/\s*canpass\b").expect("valid regex"));
static AOE_15: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\baoe\s*/\s*15\b").expect("valid regex"));
static AOE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\baoe\b").expect("valid regex"));

static ROUND_THE_CLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b24\s*(?:hrs|hours)\b").expect("valid regex"));
static NOTICE_FOLLOWS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:of\s+)?(?:notice|prior|advance|in\b)").expect("valid regex")
});
static NOTICE_HOURS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\d{1,3})\s*-?\s*(?:hours?|hrs?|hr|h)\b\.?\s*(?:of\s+)?(?:prior\s+)?(?:notice|prior|advance|in advance)",
    )
    .expect("valid regex")
});
static NOTICE_DAYS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\d{1,2})\s*-?\s*(?:business\s+)?days?\b\.?\s*(?:of\s+)?(?:prior\s+)?(?:notice|prior|advance|in advance)",
    )
    .expect("valid regex")
});
static HOURS_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{4})\s*(?:-|–|to)\s*(\d{4})\b").expect("valid regex")
});
static TRAILING_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*-\s*\d").expect("valid regex"));
static LEADING_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d\s*-\s*$").expect("valid regex"));

const WEEKDAY_PATTERN: &str =
    r"(mon(?:day)?|tue(?:s|sday)?|wed(?:nesday)?|thu(?:r|rs|rsday)?|fri(?:day)?|sat(?:urday)?|sun(?:day)?)";

static WEEKDAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\b{WEEKDAY_PATTERN}\b")).expect("valid regex"));
static WEEKDAY_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b{WEEKDAY_PATTERN}\.?\s*(?:-|–|to|through|thru)\s*{WEEKDAY_PATTERN}\b"
    ))
    .expect("valid regex")
});
static PRIMARY_LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)primary\s+location\s*:\s*([^.;\n]+)").expect("valid regex")
});
static SECONDARY_LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)secondary\s+location\s*:\s*([^.;\n]+)").expect("valid regex")
});

pub const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Placeholder day list when a window names no weekdays.
pub const UNKNOWN_DAYS: &str = "unknown";

/// One customs service window. Times are `HHMM`; `end` may precede `start`
/// for an overnight window, and `2400` is the end of day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomsHours {
    pub start: String,
    pub end: String,
    pub days: Vec<String>,
}

impl CustomsHours {
    fn all_week(start: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
            days: WEEKDAYS.iter().map(|d| (*d).to_string()).collect(),
        }
    }

    pub fn start_minutes(&self) -> Option<u32> {
        hhmm_minutes(&self.start)
    }

    pub fn end_minutes(&self) -> Option<u32> {
        hhmm_minutes(&self.end)
    }

    /// True when the window applies on `weekday` (a [`WEEKDAYS`] label).
    pub fn applies_on(&self, weekday: &str) -> bool {
        self.days
            .iter()
            .any(|d| d == UNKNOWN_DAYS || d.eq_ignore_ascii_case(weekday))
    }

    /// True when `minute_of_day` falls inside the window, wrapping past
    /// midnight when the end precedes the start.
    pub fn contains_minute(&self, minute_of_day: u32) -> bool {
        let (Some(start), Some(end)) = (self.start_minutes(), self.end_minutes()) else {
            return false;
        };
        if start <= end {
            (start..=end).contains(&minute_of_day)
        } else {
            minute_of_day >= start || minute_of_day <= end
        }
    }

    /// `Mon/Tue 0800-1700` style label.
    pub fn label(&self) -> String {
        if self.days.len() == WEEKDAYS.len() {
            format!("Daily {}-{}", self.start, self.end)
        } else if self.days.iter().all(|d| d == UNKNOWN_DAYS) {
            format!("{}-{}", self.start, self.end)
        } else {
            format!("{} {}-{}", self.days.join("/"), self.start, self.end)
        }
    }
}

/// Structured facts extracted from customs notes for one airport side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedCustoms {
    pub customs_available: bool,
    pub aoe_type: Option<String>,
    pub customs_hours: Vec<CustomsHours>,

    pub canpass_only: bool,
    pub canpass_notes: Vec<String>,

    pub customs_afterhours_available: bool,
    pub customs_afterhours_not_available: bool,
    pub customs_afterhours_requirements: Vec<String>,

    pub customs_prior_notice_hours: Option<u32>,
    pub customs_prior_notice_days: Option<u32>,

    pub location_to_clear: Option<String>,
    pub location_notes: Vec<String>,

    pub customs_contact_required: bool,
    pub customs_contact_notes: Vec<String>,

    pub pax_requirements: Vec<String>,
    pub crew_requirements: Vec<String>,
    pub general_customs_notes: Vec<String>,

    pub raw_notes: Vec<String>,
}

impl ParsedCustoms {
    fn evidence_mut(&mut self, tag: CustomsTag) -> &mut Vec<String> {
        match tag {
            CustomsTag::Canpass => &mut self.canpass_notes,
            CustomsTag::Afterhours => &mut self.customs_afterhours_requirements,
            CustomsTag::Notice | CustomsTag::Hours | CustomsTag::General => {
                &mut self.general_customs_notes
            }
            CustomsTag::Location => &mut self.location_notes,
            CustomsTag::Contact => &mut self.customs_contact_notes,
            CustomsTag::Pax => &mut self.pax_requirements,
            CustomsTag::Crew => &mut self.crew_requirements,
        }
    }

    /// True when any prior-notice requirement was found.
    pub fn has_prior_notice(&self) -> bool {
        self.customs_prior_notice_hours.is_some() || self.customs_prior_notice_days.is_some()
    }
}

/// Extracts [`ParsedCustoms`] from customs note text.
#[derive(Debug, Clone, Default)]
pub struct CustomsExtractor {
    rules: CustomsRules,
}

#[derive(Default)]
struct LocationState {
    primary_seen: bool,
}

impl CustomsExtractor {
    pub fn new(rules: CustomsRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &CustomsRules {
        &self.rules
    }

    pub fn extract<S: AsRef<str>>(&self, notes: &[S]) -> ParsedCustoms {
        let mut parsed = ParsedCustoms::default();
        let mut location = LocationState::default();
        for note in notes {
            self.extract_one(note.as_ref(), &mut parsed, &mut location);
        }
        parsed
    }

    fn extract_one(&self, note: &str, parsed: &mut ParsedCustoms, location: &mut LocationState) {
        let text = note.trim();
        if text.is_empty() {
            return;
        }
        let lowered = text.to_lowercase();
        parsed.raw_notes.push(text.to_string());
        let mut tags = Vec::new();

        if lowered.contains("customs") || AOE.is_match(&lowered) {
            parsed.customs_available = true;
        }
        if parsed.aoe_type.is_none() {
            parsed.aoe_type = aoe_type(&lowered).map(str::to_string);
        }

        if lowered.contains("canpass") {
            tags.push(CustomsTag::Canpass);
            if contains_word(&lowered, &["only"])
                || contains_any(&lowered, &self.rules.canpass_arrival_phrases)
            {
                parsed.canpass_only = true;
            }
        }

        if contains_any(&lowered, &self.rules.afterhours_negative_phrases) {
            tags.push(CustomsTag::Afterhours);
            parsed.customs_afterhours_not_available = true;
        } else if contains_any(&lowered, &self.rules.afterhours_phrases) {
            tags.push(CustomsTag::Afterhours);
            parsed.customs_afterhours_available = true;
        }

        let notice_hours = max_capture(&NOTICE_HOURS, &lowered);
        let notice_days = max_capture(&NOTICE_DAYS, &lowered);
        if notice_hours.is_some() || notice_days.is_some() || contains_word(&lowered, &["notice"]) {
            tags.push(CustomsTag::Notice);
        }
        max_into(&mut parsed.customs_prior_notice_hours, notice_hours);
        max_into(&mut parsed.customs_prior_notice_days, notice_days);

        let windows = self.hours_windows(&lowered);
        if !windows.is_empty() {
            tags.push(CustomsTag::Hours);
            for window in windows {
                if !parsed.customs_hours.contains(&window) {
                    parsed.customs_hours.push(window);
                }
            }
        }

        if contains_any(&lowered, &self.rules.location_phrases) {
            tags.push(CustomsTag::Location);
        }
        if let Some(caps) = PRIMARY_LOCATION.captures(text) {
            if !location.primary_seen {
                parsed.location_to_clear = Some(caps[1].trim().to_string());
                location.primary_seen = true;
            }
        } else if let Some(caps) = SECONDARY_LOCATION.captures(text) {
            if !location.primary_seen && parsed.location_to_clear.is_none() {
                parsed.location_to_clear = Some(caps[1].trim().to_string());
            }
        }

        if self.requires_contact(&lowered) {
            tags.push(CustomsTag::Contact);
            parsed.customs_contact_required = true;
        }
        if contains_word(&lowered, &self.rules.pax_terms) {
            tags.push(CustomsTag::Pax);
        }
        if contains_word(&lowered, &self.rules.crew_terms) {
            tags.push(CustomsTag::Crew);
        }

        let primary = select_primary(&CustomsTag::PRIORITY, &tags).unwrap_or(CustomsTag::General);
        parsed.evidence_mut(primary).push(text.to_string());
    }

    /// Service windows in one note. Each window takes the weekdays named
    /// just before it, else those in its own clause, else those anywhere in
    /// the note.
    fn hours_windows(&self, lowered: &str) -> Vec<CustomsHours> {
        let mut windows = Vec::new();
        if lowered.contains("24/7") || self.round_the_clock(lowered) {
            windows.push(CustomsHours::all_week("0000", "2400"));
        }

        let note_days = self.weekdays(lowered);
        let mut previous_end = 0;
        for caps in HOURS_RANGE.captures_iter(lowered) {
            let (Some(whole), Some(start), Some(end)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            if TRAILING_DIGITS.is_match(&lowered[whole.end()..])
                || LEADING_DIGITS.is_match(&lowered[..whole.start()])
            {
                continue;
            }
            if hhmm_minutes(start.as_str()).is_none() || hhmm_minutes(end.as_str()).is_none() {
                continue;
            }

            let (clause_start, clause_end) = clause_bounds(lowered, whole.start(), whole.end());
            let lead_in = &lowered[clause_start.max(previous_end)..whole.start()];
            let days = self
                .weekdays(lead_in)
                .or_else(|| self.weekdays(&lowered[clause_start..clause_end]))
                .or_else(|| note_days.clone())
                .unwrap_or_else(|| vec![UNKNOWN_DAYS.to_string()]);
            previous_end = whole.end();

            let window = CustomsHours {
                start: start.as_str().to_string(),
                end: end.as_str().to_string(),
                days,
            };
            if !windows.contains(&window) {
                windows.push(window);
            }
        }
        windows
    }

    fn round_the_clock(&self, lowered: &str) -> bool {
        ROUND_THE_CLOCK
            .find_iter(lowered)
            .any(|m| !NOTICE_FOLLOWS.is_match(&lowered[m.end()..]))
    }

    /// Weekdays named in `text`, or `None` when it names none.
    fn weekdays(&self, text: &str) -> Option<Vec<String>> {
        if contains_any(text, &self.rules.daily_phrases) {
            return Some(WEEKDAYS.iter().map(|d| (*d).to_string()).collect());
        }

        let mut indices: Vec<usize> = Vec::new();
        let mut push = |index: usize| {
            if !indices.contains(&index) {
                indices.push(index);
            }
        };
        for caps in WEEKDAY_RANGE.captures_iter(text) {
            let (Some(from), Some(to)) = (weekday_index(&caps[1]), weekday_index(&caps[2])) else {
                continue;
            };
            let mut day = from;
            loop {
                push(day);
                if day == to {
                    break;
                }
                day = (day + 1) % WEEKDAYS.len();
            }
        }
        for caps in WEEKDAY.captures_iter(text) {
            if let Some(index) = weekday_index(&caps[1]) {
                push(index);
            }
        }

        if indices.is_empty() {
            return None;
        }
        indices.sort_unstable();
        Some(indices.into_iter().map(|i| WEEKDAYS[i].to_string()).collect())
    }

    /// A contact verb followed by a customs term in the same sentence.
    fn requires_contact(&self, lowered: &str) -> bool {
        lowered.split(['.', ';', '\n']).any(|segment| {
            find_word(segment, &self.rules.contact_verbs)
                .is_some_and(|at| contains_word(&segment[at..], &self.rules.contact_terms))
        })
    }
}

static DEFAULT_EXTRACTOR: LazyLock<CustomsExtractor> = LazyLock::new(CustomsExtractor::default);

/// Extract customs facts with the default rule tables.
pub fn parse_customs_notes<S: AsRef<str>>(notes: &[S]) -> ParsedCustoms {
    DEFAULT_EXTRACTOR.extract(notes)
}

fn aoe_type(lowered: &str) -> Option<&'static str> {
    if AOE_CANPASS.is_match(lowered) {
        Some("AOE/CANPASS")
    } else if AOE_15.is_match(lowered) {
        Some("AOE/15")
    } else if AOE.is_match(lowered) {
        Some("AOE")
    } else {
        None
    }
}

/// Byte range of the `,`/`;`/newline-delimited clause around `start..end`.
fn clause_bounds(text: &str, start: usize, end: usize) -> (usize, usize) {
    let separators = [',', ';', '\n'];
    let from = text[..start].rfind(separators).map_or(0, |at| at + 1);
    let to = text[end..].find(separators).map_or(text.len(), |at| end + at);
    (from, to)
}

fn weekday_index(token: &str) -> Option<usize> {
    let prefix = token.get(..3)?;
    WEEKDAYS
        .iter()
        .position(|d| d.eq_ignore_ascii_case(prefix))
}

/// Minutes past midnight for a plausible `HHMM`; `2400` is allowed.
fn hhmm_minutes(hhmm: &str) -> Option<u32> {
    if hhmm.len() != 4 || !hhmm.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: u32 = hhmm[..2].parse().ok()?;
    let minutes: u32 = hhmm[2..].parse().ok()?;
    if hours > 24 || minutes > 59 || (hours == 24 && minutes != 0) {
        return None;
    }
    Some(hours * 60 + minutes)
}

fn max_capture(re: &Regex, text: &str) -> Option<u32> {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse().ok())
        .max()
}

fn max_into(slot: &mut Option<u32>, candidate: Option<u32>) {
    if let Some(value) = candidate {
        *slot = Some(slot.map_or(value, |current| current.max(value)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(notes: &[&str]) -> ParsedCustoms {
        parse_customs_notes(notes)
    }

    #[test]
    fn phone_numbers_are_not_hours() {
        let parsed = parse(&["Customs Shack phone 760-318-3880"]);
        assert!(parsed.customs_hours.is_empty());
        assert!(!parsed.customs_contact_required);
    }

    #[test]
    fn long_phone_number_is_rejected() {
        let parsed = parse(&["Customs line 1-403-2345-6789"]);
        assert!(parsed.customs_hours.is_empty());
    }

    #[test]
    fn daily_window_covers_all_weekdays() {
        let parsed = parse(&["Customs 0600 - 2200, 7 days a week"]);
        assert_eq!(parsed.customs_hours.len(), 1);
        let window = &parsed.customs_hours[0];
        assert_eq!((window.start.as_str(), window.end.as_str()), ("0600", "2200"));
        assert_eq!(window.days, WEEKDAYS);
    }

    #[test]
    fn weekday_range_expands() {
        let parsed = parse(&["Customs Mon-Fri 0800-1700, Sat 1000-1400"]);
        assert_eq!(parsed.customs_hours.len(), 2);
        assert_eq!(parsed.customs_hours[0].days, ["Mon", "Tue", "Wed", "Thu", "Fri"]);
        assert_eq!(parsed.customs_hours[1].days, ["Sat"]);
        assert!(!parsed.customs_hours[0].applies_on("Sat"));
    }

    #[test]
    fn days_bind_to_the_window_they_precede() {
        let parsed = parse(&["Customs Mon-Fri 0800-1700 Sat 1000-1400"]);
        assert_eq!(parsed.customs_hours[0].days, ["Mon", "Tue", "Wed", "Thu", "Fri"]);
        assert_eq!(parsed.customs_hours[1].days, ["Sat"]);
    }

    #[test]
    fn implausible_times_are_rejected() {
        let parsed = parse(&["Customs ref 2575-9999"]);
        assert!(parsed.customs_hours.is_empty());
    }

    #[test]
    fn unnamed_days_are_unknown() {
        let parsed = parse(&["Customs available 0800 to 1600"]);
        assert_eq!(parsed.customs_hours[0].days, [UNKNOWN_DAYS]);
        assert!(parsed.customs_hours[0].applies_on("Sun"));
    }

    #[test]
    fn round_the_clock_service() {
        let parsed = parse(&["AOE/15 customs 24/7"]);
        assert_eq!(parsed.aoe_type.as_deref(), Some("AOE/15"));
        assert_eq!(parsed.customs_hours, vec![CustomsHours::all_week("0000", "2400")]);
        assert!(parsed.customs_available);
    }

    #[test]
    fn twenty_four_hours_notice_is_not_round_the_clock() {
        let parsed = parse(&["Customs requires 24 hours notice"]);
        assert!(parsed.customs_hours.is_empty());
        assert_eq!(parsed.customs_prior_notice_hours, Some(24));
    }

    #[test]
    fn notice_note_files_under_general() {
        let note = "Customs requires 2 hours prior notice";
        let parsed = parse(&[note]);
        assert_eq!(parsed.customs_prior_notice_hours, Some(2));
        assert_eq!(parsed.general_customs_notes, vec![note]);
        assert!(parsed.has_prior_notice());
    }

    #[test]
    fn notice_hours_and_days_independent() {
        let parsed = parse(&["CBSA 48 hrs notice; overseas arrivals 3 days prior notice"]);
        assert_eq!(parsed.customs_prior_notice_hours, Some(48));
        assert_eq!(parsed.customs_prior_notice_days, Some(3));
    }

    #[test]
    fn canpass_only() {
        let parsed = parse(&["CANPASS only"]);
        assert!(parsed.canpass_only);
        assert_eq!(parsed.canpass_notes, vec!["CANPASS only"]);

        let arrival = parse(&["Arrive via CANPASS, call 2 hrs prior"]);
        assert!(arrival.canpass_only);

        let plain = parse(&["CANPASS and AOE/15 service"]);
        assert!(!plain.canpass_only);
    }

    #[test]
    fn aoe_subtype_priority() {
        assert_eq!(
            parse(&["AOE/CANPASS site"]).aoe_type.as_deref(),
            Some("AOE/CANPASS")
        );
        let first_wins = parse(&["AOE", "AOE/15"]);
        assert_eq!(first_wins.aoe_type.as_deref(), Some("AOE"));
    }

    #[test]
    fn afterhours_positive_and_negative() {
        let note = "After hours customs available with 24 hrs notice";
        let positive = parse(&[note]);
        assert!(positive.customs_afterhours_available);
        assert!(!positive.customs_afterhours_not_available);
        assert_eq!(positive.customs_afterhours_requirements, vec![note]);
        assert!(positive.customs_hours.is_empty());

        let negative = parse(&["No after hours customs service"]);
        assert!(!negative.customs_afterhours_available);
        assert!(negative.customs_afterhours_not_available);
    }

    #[test]
    fn primary_location_is_authoritative() {
        let parsed = parse(&[
            "Secondary location: Hangar 4",
            "Primary location: Main terminal. Report to desk",
            "Primary location: Somewhere else",
        ]);
        assert_eq!(parsed.location_to_clear.as_deref(), Some("Main terminal"));
        assert_eq!(parsed.location_notes.len(), 3);
    }

    #[test]
    fn secondary_location_fills_in() {
        let parsed = parse(&["Secondary location: Hangar 4"]);
        assert_eq!(parsed.location_to_clear.as_deref(), Some("Hangar 4"));
    }

    #[test]
    fn contact_needs_verb_and_term_in_same_sentence() {
        assert!(parse(&["Call CBSA on arrival"]).customs_contact_required);
        assert!(!parse(&["Customs at FBO. Call the FBO for fuel"]).customs_contact_required);
    }

    #[test]
    fn pax_and_crew_evidence_only_when_primary() {
        let pax = parse(&["All passengers must carry passports for CBSA"]);
        assert_eq!(pax.pax_requirements.len(), 1);

        let crew = parse(&["Crew declarations to CBSA"]);
        assert_eq!(crew.crew_requirements.len(), 1);

        let both = parse(&["Crew and pax report to customs desk"]);
        assert!(both.crew_requirements.is_empty());
        assert!(both.pax_requirements.is_empty());
        assert_eq!(both.location_notes.len(), 1);
    }

    #[test]
    fn window_wraps_midnight() {
        let window = CustomsHours {
            start: "2200".into(),
            end: "0600".into(),
            days: vec![UNKNOWN_DAYS.into()],
        };
        assert!(window.contains_minute(23 * 60));
        assert!(window.contains_minute(5 * 60));
        assert!(!window.contains_minute(12 * 60));
    }

    proptest::proptest! {
        #[test]
        fn never_panics_on_arbitrary_text(text in "\\PC{0,200}") {
            let parsed = parse_customs_notes(&[text.as_str()]);
            proptest::prop_assert!(parsed.raw_notes.len() <= 1);
        }
    }
}
