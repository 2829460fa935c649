//! Per-airport profiles derived from reference data.
//!
//! Each evaluator reads one of these rather than the raw datasets. Profiles
//! are plain values; the slot/PPR profile can additionally absorb facts
//! extracted from operational notes.

use std::sync::LazyLock;

use regex::Regex;

use super::ReferenceData;
use crate::domain::Icao;
use crate::notes::ParsedRestrictions;

const SLOT_KEYWORDS: &[&str] = &["SLOT", "COORDINATION", "ATC SLOT"];
const PPR_KEYWORDS: &[&str] = &["PPR", "PRIOR PERMISSION"];

static LEAD_DAYS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2})\s*(?:days?)\b").expect("valid regex"));
static LEAD_HOURS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,3})\s*(?:hrs?|hours?)\b").expect("valid regex"));

/// Static per-airport routing overrides: (ICAO, region, requires Jeppesen).
const OSA_SSA_OVERRIDES: &[(&str, &str, bool)] =
    &[("CYEG", "CANADA_DOMESTIC", false), ("KPSP", "SSA", false)];

#[derive(Debug, Clone, PartialEq)]
pub struct AirportProfile {
    pub icao: Icao,
    pub name: Option<String>,
    pub longest_runway_ft: Option<u32>,
    pub is_approved_for_ops: bool,
    pub category: Option<String>,
    pub country: Option<String>,
}

impl AirportProfile {
    pub fn build(icao: &Icao, reference: &ReferenceData) -> Self {
        let metadata = reference.airport(icao);
        Self {
            icao: icao.clone(),
            name: metadata.and_then(|m| m.name.clone()),
            longest_runway_ft: reference.longest_runway_ft(icao),
            is_approved_for_ops: metadata.and_then(|m| m.approved).unwrap_or(true),
            category: reference.category(icao).and_then(|c| c.category.clone()),
            country: reference.country(icao).map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeiceProfile {
    pub icao: Icao,
    /// `None` when the deice programme has no record for this airport.
    pub deice_available: Option<bool>,
    pub notes: Option<String>,
    pub latitude: Option<f64>,
}

impl DeiceProfile {
    pub fn build(icao: &Icao, reference: &ReferenceData) -> Self {
        let record = reference.deice_record(icao);
        Self {
            icao: icao.clone(),
            deice_available: record.and_then(|r| r.available),
            notes: record
                .and_then(|r| r.info.as_deref())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            latitude: reference.latitude(icao),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomsProfile {
    pub icao: Icao,
    pub service_type: Option<String>,
    pub notes: Option<String>,
}

impl CustomsProfile {
    /// `None` when there is no customs record at all.
    pub fn build(icao: &Icao, reference: &ReferenceData) -> Option<Self> {
        reference.customs_rule(icao).map(|rule| Self {
            icao: icao.clone(),
            service_type: rule.service_type.clone(),
            notes: rule.notes.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsaSsaProfile {
    pub icao: Icao,
    /// Uppercased region label, `DOMESTIC` when uncategorised.
    pub region: String,
    pub requires_jepp: bool,
}

impl OsaSsaProfile {
    pub fn build(icao: &Icao, reference: &ReferenceData) -> Self {
        let mut region = reference
            .category(icao)
            .and_then(|c| c.category.as_deref())
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or("DOMESTIC")
            .to_uppercase();
        let mut requires_jepp = region == "OSA";

        if let Some((_, override_region, jepp)) = OSA_SSA_OVERRIDES
            .iter()
            .find(|(code, _, _)| *code == icao.as_str())
        {
            region = (*override_region).to_string();
            requires_jepp = *jepp;
        }

        Self {
            icao: icao.clone(),
            region,
            requires_jepp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotPprProfile {
    pub icao: Icao,
    pub slot_required: bool,
    pub ppr_required: bool,
    pub slot_lead_days: Option<u32>,
    pub slot_lead_hours: Option<u32>,
    pub ppr_lead_days: Option<u32>,
    pub ppr_lead_hours: Option<u32>,
    pub notes: Option<String>,
}

impl SlotPprProfile {
    /// Build from the airport category record. OSA/SSA airports always
    /// require both.
    pub fn build(icao: &Icao, reference: &ReferenceData) -> Self {
        let record = reference.category(icao);
        let notes = record
            .and_then(|r| r.notes.as_deref())
            .map(str::trim)
            .filter(|n| !n.is_empty());
        let upper = notes.map(str::to_uppercase).unwrap_or_default();

        let coordinated = record
            .and_then(|r| r.category.as_deref())
            .is_some_and(|c| matches!(c.trim().to_uppercase().as_str(), "OSA" | "SSA"));

        let lead_days = notes.and_then(|n| capture_u32(&LEAD_DAYS, n));
        let lead_hours = notes.and_then(|n| capture_u32(&LEAD_HOURS, n));

        Self {
            icao: icao.clone(),
            slot_required: coordinated || SLOT_KEYWORDS.iter().any(|k| upper.contains(k)),
            ppr_required: coordinated || PPR_KEYWORDS.iter().any(|k| upper.contains(k)),
            slot_lead_days: lead_days,
            slot_lead_hours: lead_hours,
            ppr_lead_days: lead_days,
            ppr_lead_hours: lead_hours,
            notes: notes.map(str::to_string),
        }
    }

    /// Overlay facts extracted from operational notes. Note-derived lead
    /// times take precedence over the category record.
    #[must_use]
    pub fn with_restrictions(mut self, parsed: &ParsedRestrictions) -> Self {
        self.slot_required |= parsed.slot_required;
        self.ppr_required |= parsed.ppr_required;
        self.slot_lead_days = parsed.slot_lead_days.or(self.slot_lead_days);
        self.slot_lead_hours = parsed.slot_lead_hours.or(self.slot_lead_hours);
        self.ppr_lead_days = parsed.ppr_lead_days.or(self.ppr_lead_days);
        self.ppr_lead_hours = parsed.ppr_lead_hours.or(self.ppr_lead_hours);
        self
    }
}

fn capture_u32(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> ReferenceData {
        ReferenceData::from_json_str(
            r#"{
                "airports": {
                    "CYYC": {"country": "CA", "lat": 51.1},
                    "CZNA": {"country": "CA", "approved": false}
                },
                "categories": {
                    "KASE": {"category": "ssa", "notes": "Slot coordination 3 days prior"},
                    "LFMN": {"category": "OSA"},
                    "KTEB": {"category": "REGULAR", "notes": "PPR required 48 hrs"},
                    "CYEG": {"category": "OSA"}
                },
                "customs": {"CYYC": {"service_type": "AOE", "notes": "  "}},
                "runways": {"CYYC": 14000},
                "deice": {"CYYC": {"available": true, "info": " Type I "}}
            }"#,
        )
        .unwrap()
    }

    fn icao(s: &str) -> Icao {
        Icao::parse(s).unwrap()
    }

    #[test]
    fn airport_profile_defaults_to_approved() {
        let data = reference();
        let cyyc = AirportProfile::build(&icao("CYYC"), &data);
        assert!(cyyc.is_approved_for_ops);
        assert_eq!(cyyc.longest_runway_ft, Some(14000));
        assert_eq!(cyyc.country.as_deref(), Some("CA"));

        let czna = AirportProfile::build(&icao("CZNA"), &data);
        assert!(!czna.is_approved_for_ops);
        assert_eq!(czna.longest_runway_ft, None);
    }

    #[test]
    fn deice_profile_trims_info() {
        let data = reference();
        let profile = DeiceProfile::build(&icao("CYYC"), &data);
        assert_eq!(profile.deice_available, Some(true));
        assert_eq!(profile.notes.as_deref(), Some("Type I"));
        assert_eq!(profile.latitude, Some(51.1));

        let unknown = DeiceProfile::build(&icao("KPSP"), &data);
        assert_eq!(unknown.deice_available, None);
    }

    #[test]
    fn customs_profile_absent_without_record() {
        let data = reference();
        assert!(CustomsProfile::build(&icao("CYYC"), &data).is_some());
        assert!(CustomsProfile::build(&icao("CYEG"), &data).is_none());
    }

    #[test]
    fn osa_ssa_overrides_win() {
        let data = reference();
        let cyeg = OsaSsaProfile::build(&icao("CYEG"), &data);
        assert_eq!(cyeg.region, "CANADA_DOMESTIC");
        assert!(!cyeg.requires_jepp);

        let kpsp = OsaSsaProfile::build(&icao("KPSP"), &data);
        assert_eq!(kpsp.region, "SSA");

        let lfmn = OsaSsaProfile::build(&icao("LFMN"), &data);
        assert!(lfmn.requires_jepp);

        let cyyc = OsaSsaProfile::build(&icao("CYYC"), &data);
        assert_eq!(cyyc.region, "DOMESTIC");
        assert!(!cyyc.requires_jepp);
    }

    #[test]
    fn slot_profile_from_category() {
        let data = reference();
        let kase = SlotPprProfile::build(&icao("KASE"), &data);
        assert!(kase.slot_required);
        assert!(kase.ppr_required);
        assert_eq!(kase.slot_lead_days, Some(3));

        let kteb = SlotPprProfile::build(&icao("KTEB"), &data);
        assert!(!kteb.slot_required);
        assert!(kteb.ppr_required);
        assert_eq!(kteb.ppr_lead_days, None);
        assert_eq!(kteb.ppr_lead_hours, Some(48));

        let cyyc = SlotPprProfile::build(&icao("CYYC"), &data);
        assert!(!cyyc.slot_required && !cyyc.ppr_required);
    }

    #[test]
    fn parsed_restrictions_overlay() {
        let data = reference();
        let parsed = ParsedRestrictions {
            slot_required: true,
            slot_lead_days: Some(10),
            ..Default::default()
        };
        let profile = SlotPprProfile::build(&icao("CYYC"), &data).with_restrictions(&parsed);
        assert!(profile.slot_required);
        assert!(!profile.ppr_required);
        assert_eq!(profile.slot_lead_days, Some(10));
    }
}
