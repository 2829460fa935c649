//! Engine configuration.
//!
//! Every numeric rule constant the evaluators compare against lives here.
//! Defaults match current dispatch policy; a deployment can override any of
//! them from JSON.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Which overflight permit table the leg evaluator consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflightStrategy {
    /// Lead time in days per country name.
    #[default]
    LeadDays,
    /// Lead time in hours per country name.
    LeadHours,
}

/// Tunable thresholds for the feasibility engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum runway length (ft) by aircraft category.
    pub runway_minimums_ft: BTreeMap<String, u32>,

    /// Minimum runway length (ft) when the category is unknown.
    pub default_runway_minimum_ft: u32,

    /// Runway surplus (ft) below which the margin is flagged as tight.
    pub runway_tight_margin_ft: u32,

    /// Latitude band (degrees either side of the equator) where deice is
    /// never needed.
    pub warm_region_latitude: f64,

    /// Duty length (minutes) up to which the day is within standard limits.
    pub duty_standard_max_mins: i64,

    /// Duty length (minutes) at or beyond which the day is illegal.
    pub duty_hard_max_mins: i64,

    /// Ground time (minutes) that allows a split duty.
    pub split_duty_turn_mins: i64,

    /// Ground time (minutes) that allows a duty reset.
    pub reset_duty_turn_mins: i64,

    /// Endurance surplus (minutes) at or above which a leg passes.
    pub endurance_pass_margin_mins: i64,

    /// Endurance surplus (minutes) at or above which a leg is a caution
    /// rather than a failure. Negative means over the limit.
    pub endurance_caution_margin_mins: i64,

    /// Fraction of a flat endurance limit where the caution band starts.
    pub flat_endurance_caution_ratio: f64,

    /// Minutes below a flat endurance limit where the caution band starts.
    pub flat_endurance_caution_band_mins: i64,

    pub overflight_strategy: OverflightStrategy,

    /// Permit lead time in days by country name.
    pub overflight_lead_days: BTreeMap<String, u32>,

    /// Permit lead time in hours by country name.
    pub overflight_lead_hours: BTreeMap<String, u32>,

    /// Hours beyond the permit lead that still count as tight.
    pub overflight_tight_buffer_hours: i64,

    /// Payload overage (lb) up to which a leg is a caution.
    pub overweight_caution_lb: f64,

    /// Assumed cargo (lb) per passenger when no cargo is listed.
    pub default_cargo_per_pax_lb: f64,
}

impl EngineConfig {
    /// Parse a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Minimum runway length for an aircraft category label. Spaces and
    /// hyphens are treated as underscores.
    pub fn runway_minimum_ft(&self, category: Option<&str>) -> u32 {
        category
            .map(|c| c.trim().to_uppercase().replace([' ', '-'], "_"))
            .and_then(|c| self.runway_minimums_ft.get(&c).copied())
            .unwrap_or(self.default_runway_minimum_ft)
    }

    /// Permit lead table for the configured strategy, with its unit in hours.
    pub fn overflight_leads_hours(&self) -> BTreeMap<String, i64> {
        match self.overflight_strategy {
            OverflightStrategy::LeadDays => self
                .overflight_lead_days
                .iter()
                .map(|(country, days)| (country.clone(), i64::from(*days) * 24))
                .collect(),
            OverflightStrategy::LeadHours => self
                .overflight_lead_hours
                .iter()
                .map(|(country, hours)| (country.clone(), i64::from(*hours)))
                .collect(),
        }
    }
}

fn table<V: Copy>(entries: &[(&str, V)]) -> BTreeMap<String, V> {
    entries
        .iter()
        .map(|(key, value)| ((*key).to_string(), *value))
        .collect()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            runway_minimums_ft: table(&[
                ("VERY_LIGHT_JET", 3500),
                ("LIGHT_JET", 4000),
                ("MIDSIZE_JET", 4500),
                ("SUPER_MIDSIZE_JET", 5000),
                ("HEAVY_JET", 5500),
                ("ULTRA_LONG_RANGE_JET", 6000),
            ]),
            default_runway_minimum_ft: 4300,
            runway_tight_margin_ft: 500,
            warm_region_latitude: 27.0,
            duty_standard_max_mins: 14 * 60,
            duty_hard_max_mins: 17 * 60,
            split_duty_turn_mins: 6 * 60,
            reset_duty_turn_mins: 11 * 60 + 15,
            endurance_pass_margin_mins: 10,
            endurance_caution_margin_mins: -15,
            flat_endurance_caution_ratio: 0.9,
            flat_endurance_caution_band_mins: 20,
            overflight_strategy: OverflightStrategy::LeadDays,
            overflight_lead_days: table(&[
                ("CUBA", 3),
                ("MEXICO", 1),
                ("RUSSIA", 7),
                ("CHINA", 7),
                ("GREENLAND", 3),
            ]),
            overflight_lead_hours: table(&[
                ("CUBA", 72),
                ("RUSSIA", 72),
                ("CHINA", 96),
                ("SAUDI ARABIA", 72),
                ("MEXICO", 24),
            ]),
            overflight_tight_buffer_hours: 12,
            overweight_caution_lb: 50.0,
            default_cargo_per_pax_lb: 30.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.duty_standard_max_mins, 840);
        assert_eq!(config.duty_hard_max_mins, 1020);
        assert_eq!(config.split_duty_turn_mins, 360);
        assert_eq!(config.reset_duty_turn_mins, 675);
        assert_eq!(config.default_runway_minimum_ft, 4300);
    }

    #[test]
    fn runway_minimum_normalizes_category() {
        let config = EngineConfig::default();
        assert_eq!(config.runway_minimum_ft(Some("light jet")), 4000);
        assert_eq!(config.runway_minimum_ft(Some("Ultra-Long-Range-Jet")), 6000);
        assert_eq!(config.runway_minimum_ft(Some("TURBOPROP")), 4300);
        assert_eq!(config.runway_minimum_ft(None), 4300);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            EngineConfig::from_json_str(r#"{"duty_hard_max_mins": 960, "overflight_strategy": "lead_hours"}"#)
                .unwrap();
        assert_eq!(config.duty_hard_max_mins, 960);
        assert_eq!(config.duty_standard_max_mins, 840);
        assert_eq!(config.overflight_strategy, OverflightStrategy::LeadHours);
        assert_eq!(config.overflight_leads_hours()["SAUDI ARABIA"], 72);
    }

    #[test]
    fn lead_days_convert_to_hours() {
        let leads = EngineConfig::default().overflight_leads_hours();
        assert_eq!(leads["RUSSIA"], 168);
        assert!(!leads.contains_key("SAUDI ARABIA"));
    }
}
