//! Operational-note restriction extraction.
//!
//! Each note is tagged with every restriction kind it mentions. Flags are
//! set for all of them, but the verbatim text is filed only under the
//! primary tag (see [`RestrictionTag::PRIORITY`]) so a single note is never
//! reported twice.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::rules::{RestrictionRules, contains_any, contains_word};
use super::tags::{RestrictionTag, select_primary};

static SLOT_DAYS_OUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*days?\s*out\b").expect("valid regex"));
static SLOT_HOURS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s*(?:hours?|hrs?)\s*(?:before|prior)").expect("valid regex")
});
static SLOT_VALIDITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\+/-|±)\s*(\d+)\s*min").expect("valid regex"));
static PPR_DAYS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s*days?\s*(?:notice|prior|in advance)").expect("valid regex")
});
static PPR_HOURS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s*(?:hours?|hrs?)\s*(?:notice|prior|in advance)").expect("valid regex")
});
static CAUTION_MARK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)caution:").expect("valid regex"));
static CLOSED_WINDOW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"closed\s+(?:between\s+)?(\d{4})\s*(?:-|–|to)\s*(\d{4})").expect("valid regex")
});
static LIMITED_DEICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\blimited\s+(?:de-?\s?ic(?:e|ing)|anti-?\s?ice)").expect("valid regex")
});
static LIMITED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\blimited\b").expect("valid regex"));
static HOLDOVER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*hold\s*-?\s*over").expect("valid regex"));
static AIRCRAFT_MODEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:cj[1-4]\+?|citation|praetor|legacy|phenom|challenger|gulfstream|learjet|king\s*air|pc-?12|pilatus|hawker|falcon|e5[45]\d|c25[abc])\b",
    )
    .expect("valid regex")
});

/// Distance in bytes within which "limited" must sit from a deice token.
const LIMITED_PROXIMITY: usize = 30;

/// Structured facts extracted from operational notes for one airport side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedRestrictions {
    pub slot_required: bool,
    pub slot_notes: Vec<String>,
    pub slot_lead_days: Option<u32>,
    pub slot_lead_hours: Option<u32>,
    pub slot_validity_minutes: Option<u32>,

    pub ppr_required: bool,
    pub ppr_notes: Vec<String>,
    pub ppr_lead_days: Option<u32>,
    pub ppr_lead_hours: Option<u32>,

    pub deice_unavailable: bool,
    pub deice_limited: bool,
    pub deice_notes: Vec<String>,

    pub winter_sensitivity: bool,
    pub winter_notes: Vec<String>,
    pub surface_contamination: bool,

    pub fuel_unavailable: bool,
    pub fuel_notes: Vec<String>,

    /// `Some(false)` blocked, `Some(true)` explicitly allowed, `None` unknown.
    pub night_ops_allowed: Option<bool>,
    pub hour_notes: Vec<String>,
    /// Closure windows as `HHMM-HHMM`.
    pub hours_of_operation: Vec<String>,
    pub curfew_notes: Vec<String>,

    pub weather_limitations: Vec<String>,
    pub runway_restrictions: Vec<String>,
    pub aircraft_type_restrictions: Vec<String>,
    pub generic_restrictions: Vec<String>,

    pub raw_notes: Vec<String>,
}

impl ParsedRestrictions {
    fn evidence_mut(&mut self, tag: RestrictionTag) -> Option<&mut Vec<String>> {
        match tag {
            RestrictionTag::Slot => Some(&mut self.slot_notes),
            RestrictionTag::Ppr => Some(&mut self.ppr_notes),
            RestrictionTag::Deice => Some(&mut self.deice_notes),
            RestrictionTag::Winter => Some(&mut self.winter_notes),
            RestrictionTag::Fuel => Some(&mut self.fuel_notes),
            RestrictionTag::Night => Some(&mut self.hour_notes),
            // Weather text is always recorded when tagged.
            RestrictionTag::Weather => None,
            RestrictionTag::Runway => Some(&mut self.runway_restrictions),
        }
    }
}

/// Extracts [`ParsedRestrictions`] from operational note text.
#[derive(Debug, Clone, Default)]
pub struct RestrictionExtractor {
    rules: RestrictionRules,
}

impl RestrictionExtractor {
    pub fn new(rules: RestrictionRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RestrictionRules {
        &self.rules
    }

    pub fn extract<S: AsRef<str>>(&self, notes: &[S]) -> ParsedRestrictions {
        let mut parsed = ParsedRestrictions::default();
        for note in notes {
            self.extract_one(note.as_ref(), &mut parsed);
        }
        parsed
    }

    /// Every restriction tag `lowered` matches, in no particular order.
    pub fn classify(&self, lowered: &str) -> Vec<RestrictionTag> {
        let rules = &self.rules;
        let mut tags = Vec::new();
        if contains_any(lowered, &rules.slot_keywords) {
            tags.push(RestrictionTag::Slot);
        }
        if contains_word(lowered, &rules.ppr_keywords) {
            tags.push(RestrictionTag::Ppr);
        }
        if contains_any(lowered, &rules.deice_keywords) {
            tags.push(RestrictionTag::Deice);
        }
        if contains_any(lowered, &rules.winter_keywords) {
            tags.push(RestrictionTag::Winter);
        }
        if contains_any(lowered, &rules.fuel_unavailable_phrases) {
            tags.push(RestrictionTag::Fuel);
        }
        if contains_any(lowered, &rules.night_blocked_phrases)
            || contains_any(lowered, &rules.night_allowed_phrases)
            || CLOSED_WINDOW.is_match(lowered)
            || lowered.contains("curfew")
        {
            tags.push(RestrictionTag::Night);
        }
        if contains_any(lowered, &rules.weather_phrases) {
            tags.push(RestrictionTag::Weather);
        }
        if self.is_runway_restriction(lowered) {
            tags.push(RestrictionTag::Runway);
        }
        tags
    }

    fn extract_one(&self, note: &str, parsed: &mut ParsedRestrictions) {
        let text = note.trim();
        if text.is_empty() {
            return;
        }
        let lowered = text.to_lowercase();
        parsed.raw_notes.push(text.to_string());

        if lowered.contains("contaminated") {
            parsed.surface_contamination = true;
        }
        if AIRCRAFT_MODEL.is_match(&lowered)
            && (contains_word(&lowered, &["only"]) || lowered.contains("restricted"))
        {
            parsed.aircraft_type_restrictions.push(text.to_string());
        }

        let tags = self.classify(&lowered);
        if tags.is_empty() {
            if self.is_generic_restriction(text, &lowered) {
                parsed.generic_restrictions.push(text.to_string());
            }
            return;
        }

        for tag in &tags {
            self.apply_flags(*tag, text, &lowered, parsed);
        }

        let Some(primary) = select_primary(&RestrictionTag::PRIORITY, &tags) else {
            return;
        };
        let evidence = match primary {
            RestrictionTag::Slot => self.slot_evidence(text),
            RestrictionTag::Runway => self.runway_evidence(text),
            _ => text.to_string(),
        };
        if let Some(list) = parsed.evidence_mut(primary) {
            list.push(evidence);
        }
    }

    fn apply_flags(
        &self,
        tag: RestrictionTag,
        text: &str,
        lowered: &str,
        parsed: &mut ParsedRestrictions,
    ) {
        match tag {
            RestrictionTag::Slot => {
                parsed.slot_required = true;
                max_into(&mut parsed.slot_lead_days, max_capture(&SLOT_DAYS_OUT, lowered));
                max_into(&mut parsed.slot_lead_hours, max_capture(&SLOT_HOURS, lowered));
                if let Some(minutes) = max_capture(&SLOT_VALIDITY, lowered) {
                    parsed.slot_validity_minutes = Some(minutes);
                } else if lowered.contains("within the hour") {
                    parsed.slot_validity_minutes = Some(60);
                }
            }
            RestrictionTag::Ppr => {
                parsed.ppr_required = true;
                max_into(&mut parsed.ppr_lead_days, max_capture(&PPR_DAYS, lowered));
                max_into(&mut parsed.ppr_lead_hours, max_capture(&PPR_HOURS, lowered));
            }
            RestrictionTag::Deice => {
                if contains_any(lowered, &self.rules.deice_unavailable_phrases) {
                    parsed.deice_unavailable = true;
                }
                if self.is_deice_limited(lowered) {
                    parsed.deice_limited = true;
                }
            }
            RestrictionTag::Winter => parsed.winter_sensitivity = true,
            RestrictionTag::Fuel => parsed.fuel_unavailable = true,
            RestrictionTag::Night => {
                if contains_any(lowered, &self.rules.night_blocked_phrases) {
                    parsed.night_ops_allowed = Some(false);
                } else if contains_any(lowered, &self.rules.night_allowed_phrases)
                    && parsed.night_ops_allowed.is_none()
                {
                    parsed.night_ops_allowed = Some(true);
                }
                for caps in CLOSED_WINDOW.captures_iter(lowered) {
                    let window = format!("{}-{}", &caps[1], &caps[2]);
                    if !parsed.hours_of_operation.contains(&window) {
                        parsed.hours_of_operation.push(window);
                    }
                }
                if lowered.contains("curfew") {
                    parsed.curfew_notes.push(text.to_string());
                }
            }
            RestrictionTag::Weather => parsed.weather_limitations.push(text.to_string()),
            RestrictionTag::Runway => {}
        }
    }

    fn is_runway_restriction(&self, lowered: &str) -> bool {
        let rules = &self.rules;
        if !contains_word(lowered, &["rwy", "runway", "runways"]) {
            return false;
        }
        let weight_limited =
            lowered.contains("weight") && contains_any(lowered, &rules.runway_weight_qualifiers);
        contains_any(lowered, &rules.runway_restriction_terms)
            || weight_limited
            || contains_any(lowered, &rules.runway_contamination_terms)
    }

    /// "limited" counts only as an explicit deice phrase or near a deice
    /// token, and never when it qualifies hold-over times.
    fn is_deice_limited(&self, lowered: &str) -> bool {
        if LIMITED_DEICE.is_match(lowered) {
            return true;
        }
        LIMITED.find_iter(lowered).any(|m| {
            if HOLDOVER.is_match(&lowered[m.end()..]) {
                return false;
            }
            let start = floor_boundary(lowered, m.start().saturating_sub(LIMITED_PROXIMITY));
            let end = ceil_boundary(lowered, m.end() + LIMITED_PROXIMITY);
            contains_any(&lowered[start..end], &self.rules.deice_keywords)
        })
    }

    fn is_generic_restriction(&self, text: &str, lowered: &str) -> bool {
        let rules = &self.rules;
        if text.split_whitespace().count() <= rules.generic_min_words {
            return false;
        }
        let boilerplate = contains_any(lowered, &rules.generic_boilerplate_phrases)
            || rules
                .generic_boilerplate_prefixes
                .iter()
                .any(|prefix| lowered.starts_with(prefix.as_str()));
        !boilerplate
    }

    /// Only the slot-bearing lines, with any trailing caution text removed.
    fn slot_evidence(&self, text: &str) -> String {
        let head = match CAUTION_MARK.find(text) {
            Some(m) => &text[..m.start()],
            None => text,
        };
        let lines: Vec<&str> = head
            .lines()
            .map(str::trim)
            .filter(|line| contains_any(&line.to_lowercase(), &self.rules.slot_keywords))
            .collect();
        if lines.is_empty() {
            text.to_string()
        } else {
            lines.join("\n")
        }
    }

    fn runway_evidence(&self, text: &str) -> String {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| contains_any(&line.to_lowercase(), &self.rules.runway_line_markers))
            .collect();
        if lines.is_empty() {
            text.to_string()
        } else {
            lines.join("\n")
        }
    }
}

static DEFAULT_EXTRACTOR: LazyLock<RestrictionExtractor> =
    LazyLock::new(RestrictionExtractor::default);

/// Extract restrictions with the default rule tables.
pub fn parse_operational_restrictions<S: AsRef<str>>(notes: &[S]) -> ParsedRestrictions {
    DEFAULT_EXTRACTOR.extract(notes)
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

fn floor_boundary(s: &str, mut index: usize) -> usize {
    while !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_boundary(s: &str, index: usize) -> usize {
    let mut index = index.min(s.len());
    while !s.is_char_boundary(index) {
        index += 1;
    }
    index
}
