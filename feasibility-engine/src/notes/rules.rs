//! Keyword tables for note classification and extraction.
//!
//! These are plain data: the extractors receive them at construction and
//! never mutate them. All phrases are matched against lowercased note text.

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Keyword tables for operational-note handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictionRules {
    /// Notes starting with any of these are dropped before classification.
    pub ignore_prefixes: Vec<String>,
    /// Notes containing any of these are dropped before classification.
    pub ignore_phrases: Vec<String>,

    pub slot_keywords: Vec<String>,
    pub ppr_keywords: Vec<String>,
    pub deice_keywords: Vec<String>,
    pub deice_unavailable_phrases: Vec<String>,
    pub winter_keywords: Vec<String>,
    pub fuel_unavailable_phrases: Vec<String>,
    pub night_blocked_phrases: Vec<String>,
    pub night_allowed_phrases: Vec<String>,
    pub weather_phrases: Vec<String>,
    pub runway_line_markers: Vec<String>,
    pub runway_restriction_terms: Vec<String>,
    pub runway_weight_qualifiers: Vec<String>,
    pub runway_contamination_terms: Vec<String>,

    /// Unclassified notes matching these are not generic restrictions.
    pub generic_boilerplate_phrases: Vec<String>,
    pub generic_boilerplate_prefixes: Vec<String>,
    /// Minimum word count (exclusive) for a generic restriction.
    pub generic_min_words: usize,
}

impl Default for RestrictionRules {
    fn default() -> Self {
        Self {
            ignore_prefixes: owned(&["crew notes", "contact instructions"]),
            ignore_phrases: owned(&[
                "repositioning flight",
                "reposition aircraft to",
                "vendor preference",
                "preferred vendor",
            ]),
            slot_keywords: owned(&["slot"]),
            ppr_keywords: owned(&["ppr", "prior permission"]),
            deice_keywords: owned(&["deice", "de-ice", "de ice", "anti-ice", "anti ice", "deicing", "de-icing"]),
            deice_unavailable_phrases: owned(&[
                "not available",
                "unavailable",
                "no deice",
                "no de-ice",
                "no de ice",
            ]),
            winter_keywords: owned(&["winter", "snow", "freezing rain", "slush"]),
            fuel_unavailable_phrases: owned(&[
                "fuel not available",
                "fuel is not available",
                "fuel unavailable",
                "no fuel",
            ]),
            night_blocked_phrases: owned(&[
                "day operations only",
                "day ops only",
                "daylight operations only",
                "no night ops",
                "no night operations",
                "no night landings",
                "night landings prohibited",
                "night operations prohibited",
            ]),
            night_allowed_phrases: owned(&[
                "night operations permitted",
                "night ops permitted",
                "night operations allowed",
                "night ops allowed",
            ]),
            weather_phrases: owned(&[
                "good weather only",
                "vfr only",
                "vfr weather",
                "day vfr",
                "vmc only",
                "visual conditions only",
            ]),
            runway_line_markers: owned(&["rwy", "runway", "caution", "hot spot", "hold short"]),
            runway_restriction_terms: owned(&[
                "closed",
                "unavailable",
                "not available",
                "restricted",
                "restriction",
                "limitation",
            ]),
            runway_weight_qualifiers: owned(&["limit", "max", "restricted", "pcn"]),
            runway_contamination_terms: owned(&[
                "contaminated",
                "slush",
                "braking action",
                "standing water",
                "wet runway",
            ]),
            generic_boilerplate_phrases: owned(&[
                "turn time",
                "turn-time",
                "turnaround time",
                "closest airport",
                "fbo information",
            ]),
            generic_boilerplate_prefixes: owned(&["notes:", "fbo:", "fbo info"]),
            generic_min_words: 3,
        }
    }
}

/// Keyword tables for customs-note handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomsRules {
    /// Any of these marks a note as customs-relevant.
    pub customs_keywords: Vec<String>,
    /// Required in addition when a note mentions crew.
    pub customs_specific_terms: Vec<String>,
    pub canpass_arrival_phrases: Vec<String>,
    pub afterhours_phrases: Vec<String>,
    pub afterhours_negative_phrases: Vec<String>,
    pub contact_verbs: Vec<String>,
    pub contact_terms: Vec<String>,
    pub location_phrases: Vec<String>,
    pub pax_terms: Vec<String>,
    pub crew_terms: Vec<String>,
    pub daily_phrases: Vec<String>,
}

impl Default for CustomsRules {
    fn default() -> Self {
        Self {
            customs_keywords: owned(&[
                "customs",
                "canpass",
                "aoe",
                "cbsa",
                "cbp",
                "eapis",
                "landing rights",
                "immigration",
            ]),
            customs_specific_terms: owned(&["customs", "canpass", "cbsa", "cbp", "eapis", "aoe"]),
            canpass_arrival_phrases: owned(&[
                "arrive via canpass",
                "arrival via canpass",
                "arrive by canpass",
                "arrival by canpass",
                "arrivals by canpass",
                "canpass arrival",
            ]),
            afterhours_phrases: owned(&["after hours", "after-hours", "afterhours", "call-out", "callout"]),
            afterhours_negative_phrases: owned(&[
                "no after hours",
                "no after-hours",
                "no afterhours",
                "after hours not available",
                "after-hours not available",
                "afterhours not available",
                "after hours unavailable",
                "no call-out",
                "no callout",
            ]),
            contact_verbs: owned(&["call", "phone", "contact", "notify"]),
            contact_terms: owned(&["customs", "cbsa", "cbp", "officer", "border"]),
            location_phrases: owned(&[
                "primary location",
                "secondary location",
                "clear customs at",
                "report to",
                "customs located",
            ]),
            pax_terms: owned(&["passenger", "passengers", "pax", "passport", "passports"]),
            crew_terms: owned(&["crew"]),
            daily_phrases: owned(&["7 days a week", "7 days/wk", "7 days/week", "7 days", "daily"]),
        }
    }
}

/// True when `text` contains any of `phrases`.
pub(crate) fn contains_any<S: AsRef<str>>(text: &str, phrases: &[S]) -> bool {
    phrases.iter().any(|p| text.contains(p.as_ref()))
}

/// True when any of `words` occurs in `text` on word boundaries.
pub(crate) fn contains_word<S: AsRef<str>>(text: &str, words: &[S]) -> bool {
    find_word(text, words).is_some()
}

/// Byte offset of the earliest whole-word occurrence of any of `words`.
pub(crate) fn find_word<S: AsRef<str>>(text: &str, words: &[S]) -> Option<usize> {
    words
        .iter()
        .filter_map(|word| {
            text.match_indices(word.as_ref())
                .find(|(start, matched)| {
                    let before = text[..*start].chars().next_back();
                    let after = text[start + matched.len()..].chars().next();
                    !before.is_some_and(char::is_alphanumeric)
                        && !after.is_some_and(char::is_alphanumeric)
                })
                .map(|(start, _)| start)
        })
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_word_respects_boundaries() {
        let words = ["aoe", "cbp"];
        assert!(contains_word("aoe/15 available", &words));
        assert!(contains_word("call cbp.", &words));
        assert!(!contains_word("canoe rental", &words));
        assert!(!contains_word("", &words));
    }

    #[test]
    fn find_word_returns_earliest() {
        assert_eq!(find_word("notify cbp or call", &["call", "notify"]), Some(0));
        assert_eq!(find_word("recall", &["call"]), None);
    }

    #[test]
    fn contains_any_is_substring() {
        let phrases = ["no fuel"];
        assert!(contains_any("warning: no fuel on weekends", &phrases));
        assert!(!contains_any("fuel available", &phrases));
    }

    #[test]
    fn defaults_are_lowercase() {
        let r = RestrictionRules::default();
        let c = CustomsRules::default();
        let all = r
            .slot_keywords
            .iter()
            .chain(&r.weather_phrases)
            .chain(&r.night_blocked_phrases)
            .chain(&c.customs_keywords)
            .chain(&c.afterhours_negative_phrases);
        for phrase in all {
            assert_eq!(phrase, &phrase.to_lowercase());
        }
    }
}
