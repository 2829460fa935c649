//! Leg orchestration: every category for both ends of one leg.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::domain::{CategoryResult, Icao, LegContext, Status, localize, worst};
use crate::evaluate::{
    PayloadSource, Season, Side, WeightBalanceResult, estimate_pax_payload, evaluate_aircraft,
    evaluate_customs, evaluate_deice, evaluate_operational_notes, evaluate_osa_ssa,
    evaluate_overflight, evaluate_slot_ppr, evaluate_suitability, evaluate_weight_balance,
};
use crate::notes::{
    CustomsExtractor, ParsedCustoms, ParsedRestrictions, RestrictionExtractor, note_text,
    split_customs_operational_notes,
};
use crate::reference::{
    AirportProfile, CustomsProfile, DeiceProfile, OsaSsaProfile, ReferenceData, SlotPprProfile,
};
use crate::sources::{NoteSource, PaxDetailsSource, TimezoneLookup};

/// External collaborators consulted while evaluating legs.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub notes: &'a dyn NoteSource,
    pub timezones: &'a dyn TimezoneLookup,
    /// Without a pax-details source, payload is estimated from the pax count.
    pub pax_details: Option<&'a dyn PaxDetailsSource>,
}

impl<'a> Collaborators<'a> {
    pub fn new(notes: &'a dyn NoteSource, timezones: &'a dyn TimezoneLookup) -> Self {
        Self {
            notes,
            timezones,
            pax_details: None,
        }
    }

    #[must_use]
    pub fn with_pax_details(mut self, source: &'a dyn PaxDetailsSource) -> Self {
        self.pax_details = Some(source);
        self
    }
}

/// Category results for one airport on one leg.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirportSideResult {
    pub icao: Icao,
    pub side: Side,
    pub suitability: CategoryResult,
    pub deice: CategoryResult,
    pub customs: CategoryResult,
    pub slot_ppr: CategoryResult,
    pub osa_ssa: CategoryResult,
    /// Shared with the other side of the same leg.
    pub overflight: CategoryResult,
    pub operational_notes: CategoryResult,
    pub parsed_operational_restrictions: ParsedRestrictions,
    pub parsed_customs_notes: ParsedCustoms,
    pub raw_operational_notes: Vec<String>,
}

impl AirportSideResult {
    /// The seven categories with their display labels.
    pub fn categories(&self) -> [(&'static str, &CategoryResult); 7] {
        [
            ("Suitability", &self.suitability),
            ("Deice", &self.deice),
            ("Customs", &self.customs),
            ("Slot / PPR", &self.slot_ppr),
            ("OSA / SSA", &self.osa_ssa),
            ("Overflight", &self.overflight),
            ("Operational Notes", &self.operational_notes),
        ]
    }

    pub fn status(&self) -> Status {
        worst(self.categories().iter().map(|(_, result)| result.status))
    }
}

/// Both ends of one leg plus the leg-wide aircraft checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirportFeasibilityResult {
    pub leg_id: String,
    pub route: String,
    pub departure: AirportSideResult,
    pub arrival: AirportSideResult,
    pub aircraft: CategoryResult,
    pub weight_balance: WeightBalanceResult,
}

impl AirportFeasibilityResult {
    /// Every category result on the leg, labelled with its side where it
    /// has one. Overflight appears once.
    pub fn categories(&self) -> Vec<(String, &CategoryResult)> {
        let mut entries = Vec::with_capacity(15);
        for side in [&self.departure, &self.arrival] {
            for (label, result) in side.categories() {
                if label == "Overflight" {
                    continue;
                }
                entries.push((format!("{} {label}", side.side.label()), result));
            }
        }
        entries.push(("Overflight".to_string(), &self.departure.overflight));
        entries.push(("Aircraft".to_string(), &self.aircraft));
        entries.push(("Weight & Balance".to_string(), &self.weight_balance.result));
        entries
    }

    pub fn status(&self) -> Status {
        worst(self.categories().iter().map(|(_, result)| result.status))
    }
}

/// Runs every evaluator for a leg against reference data, configuration
/// and the external collaborators.
pub struct FeasibilityEngine<'a> {
    pub(super) reference: &'a ReferenceData,
    pub(super) config: &'a EngineConfig,
    pub(super) sources: Collaborators<'a>,
    restrictions: RestrictionExtractor,
    customs: CustomsExtractor,
    /// Reference instant for lead-time checks.
    pub(super) now: DateTime<Utc>,
}

impl<'a> FeasibilityEngine<'a> {
    pub fn new(
        reference: &'a ReferenceData,
        config: &'a EngineConfig,
        sources: Collaborators<'a>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            reference,
            config,
            sources,
            restrictions: RestrictionExtractor::default(),
            customs: CustomsExtractor::default(),
            now,
        }
    }

    /// Replace the default note extractors.
    #[must_use]
    pub fn with_extractors(mut self, restrictions: RestrictionExtractor, customs: CustomsExtractor) -> Self {
        self.restrictions = restrictions;
        self.customs = customs;
        self
    }

    pub fn evaluate_leg(&self, leg: &LegContext) -> AirportFeasibilityResult {
        let overflight = evaluate_overflight(leg, self.config, self.now);
        let departure = self.evaluate_side(leg, Side::Departure, &overflight);
        let arrival = self.evaluate_side(leg, Side::Arrival, &overflight);

        AirportFeasibilityResult {
            leg_id: leg.leg_id.clone(),
            route: leg.route_label(),
            departure,
            arrival,
            aircraft: evaluate_aircraft(leg, self.config),
            weight_balance: self.weight_balance(leg),
        }
    }

    fn evaluate_side(&self, leg: &LegContext, side: Side, overflight: &CategoryResult) -> AirportSideResult {
        let (icao, at) = match side {
            Side::Departure => (&leg.departure_icao, leg.departure_utc),
            Side::Arrival => (&leg.arrival_icao, leg.arrival_utc),
        };
        let zone = self.sources.timezones.tz_for(icao);
        let local = at.map(|dt| localize(dt, zone.as_deref()));

        let records = self
            .sources
            .notes
            .fetch_notes(icao, local.map(|dt| dt.date_naive()));
        let split =
            split_customs_operational_notes(&records, self.restrictions.rules(), self.customs.rules());
        let parsed_restrictions = self.restrictions.extract(&split.operational);
        let parsed_customs = self.customs.extract(&split.customs);
        let raw_operational_notes = records
            .iter()
            .filter_map(note_text)
            .map(str::to_string)
            .collect();

        let slot_profile =
            SlotPprProfile::build(icao, self.reference).with_restrictions(&parsed_restrictions);
        let customs_profile = CustomsProfile::build(icao, self.reference);
        let arrival_local = match side {
            Side::Arrival => local,
            Side::Departure => None,
        };

        let result = AirportSideResult {
            icao: icao.clone(),
            side,
            suitability: evaluate_suitability(
                &AirportProfile::build(icao, self.reference),
                leg,
                &split.retained,
                self.config,
            ),
            deice: evaluate_deice(
                &DeiceProfile::build(icao, self.reference),
                &parsed_restrictions,
                self.config,
            ),
            customs: evaluate_customs(
                customs_profile.as_ref(),
                leg,
                side,
                &parsed_customs,
                arrival_local,
            ),
            slot_ppr: evaluate_slot_ppr(&slot_profile, leg, side, self.now),
            osa_ssa: evaluate_osa_ssa(&OsaSsaProfile::build(icao, self.reference)),
            overflight: overflight.clone(),
            operational_notes: evaluate_operational_notes(&parsed_restrictions, &parsed_customs),
            parsed_operational_restrictions: parsed_restrictions,
            parsed_customs_notes: parsed_customs,
            raw_operational_notes,
        };

        debug!(
            icao = %icao,
            side = %side,
            notes = records.len(),
            suitability = %result.suitability.status,
            deice = %result.deice.status,
            customs = %result.customs.status,
            slot_ppr = %result.slot_ppr.status,
            osa_ssa = %result.osa_ssa.status,
            operational_notes = %result.operational_notes.status,
            "evaluated airport side"
        );
        result
    }

    fn weight_balance(&self, leg: &LegContext) -> WeightBalanceResult {
        let season = Season::for_departure(leg.departure_utc);
        let flight_id = leg
            .flight_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or(Some(leg.leg_id.as_str()).filter(|id| !id.is_empty()));

        if let (Some(source), Some(flight_id)) = (self.sources.pax_details, flight_id) {
            return match source.fetch_pax_details(flight_id) {
                Ok(details) => evaluate_weight_balance(
                    Some(&details),
                    &leg.aircraft_type,
                    season,
                    PayloadSource::Api,
                    self.config,
                ),
                Err(e) => {
                    warn!(flight_id, error = %e, "pax details unavailable");
                    let mut result = evaluate_weight_balance(
                        None,
                        &leg.aircraft_type,
                        season,
                        PayloadSource::ApiError,
                        self.config,
                    );
                    result.details.payload_error = Some(e.to_string());
                    result
                }
            };
        }

        let estimate = leg.pax.map(estimate_pax_payload);
        evaluate_weight_balance(
            estimate.as_ref(),
            &leg.aircraft_type,
            season,
            PayloadSource::Estimate,
            self.config,
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};

    use super::*;
    use crate::notes::NoteRecord;
    use crate::sources::{NoNotes, SourceError};

    fn reference() -> ReferenceData {
        ReferenceData::from_json_str(
            r#"{
                "airports": {
                    "CYYC": {"country": "CA", "subdivision": "Alberta", "tz": "America/Edmonton", "latitude": 51.1},
                    "KPSP": {"country": "US", "subdivision": "California", "tz": "America/Los_Angeles", "latitude": 33.8}
                },
                "customs": {"CYYC": {"service_type": "AOE"}},
                "runways": {"CYYC": 12675, "KPSP": 10000},
                "deice": {"CYYC": {"available": true}}
            }"#,
        )
        .unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn leg(reference: &ReferenceData) -> LegContext {
        let flight = serde_json::json!({
            "id": "L1",
            "departureAirport": "KPSP",
            "arrivalAirport": "CYYC",
            "departureDateUTC": "2025-01-15T18:00:00Z",
            "arrivalDateUTC": "2025-01-15T21:00:00Z",
            "pax": 2,
            "blockTime": 180,
            "aircraftType": "CJ3",
            "aircraftCategory": "LIGHT_JET"
        });
        LegContext::from_flight(&flight, reference).unwrap()
    }

    #[test]
    fn clean_international_leg() {
        let reference = reference();
        let config = EngineConfig::default();
        let engine = FeasibilityEngine::new(
            &reference,
            &config,
            Collaborators::new(&NoNotes, &reference),
            now(),
        );
        let result = engine.evaluate_leg(&leg(&reference));

        assert_eq!(result.route, "KPSP→CYYC");
        assert_eq!(result.departure.customs.summary, "Not required for departure");
        assert_eq!(result.arrival.customs.status, Status::Pass);
        assert_eq!(result.arrival.suitability.status, Status::Pass);
        assert_eq!(result.aircraft.status, Status::Pass);
        assert_eq!(result.weight_balance.details.payload_source, PayloadSource::Estimate);
        // KPSP has no deice record and sits north of the warm band.
        assert_eq!(result.departure.deice.status, Status::Caution);
        assert_eq!(result.departure.deice.summary, "Unknown deice status");
        assert_eq!(result.arrival.deice.summary, "Deice available");
        assert_eq!(result.categories().len(), 15);
    }

    #[test]
    fn notes_are_fetched_for_local_date() {
        let reference = reference();
        let config = EngineConfig::default();
        let notes = |icao: &Icao, date: Option<NaiveDate>| -> Vec<NoteRecord> {
            assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 15));
            if icao.as_str() == "CYYC" {
                vec![
                    NoteRecord::from_text("Customs available 0600-1800 daily"),
                    NoteRecord::from_text("Slot required, 2 days out"),
                ]
            } else {
                Vec::new()
            }
        };
        let engine = FeasibilityEngine::new(
            &reference,
            &config,
            Collaborators::new(&notes, &reference),
            now(),
        );
        let result = engine.evaluate_leg(&leg(&reference));

        // 21:00Z is 14:00 in Calgary, inside the customs window.
        assert_eq!(result.arrival.customs.status, Status::Pass);
        assert!(result.arrival.customs.summary.contains("0600-1800"));
        assert!(result.arrival.parsed_operational_restrictions.slot_required);
        assert_eq!(result.arrival.raw_operational_notes.len(), 2);
        assert!(result.departure.raw_operational_notes.is_empty());
    }

    #[test]
    fn closure_in_customs_note_fails_suitability() {
        let reference = reference();
        let config = EngineConfig::default();
        let notes = |icao: &Icao, _: Option<NaiveDate>| -> Vec<NoteRecord> {
            if icao.as_str() == "CYYC" {
                vec![NoteRecord::from_text(
                    "Airport closed to GA Sundays; customs AOE available",
                )]
            } else {
                Vec::new()
            }
        };
        let engine = FeasibilityEngine::new(
            &reference,
            &config,
            Collaborators::new(&notes, &reference),
            now(),
        );
        let result = engine.evaluate_leg(&leg(&reference));

        assert_eq!(result.arrival.parsed_customs_notes.raw_notes.len(), 1);
        assert_eq!(result.arrival.suitability.status, Status::Fail);
        assert!(result
            .arrival
            .suitability
            .issues
            .iter()
            .any(|i| i.contains("closures or curfews")));
        assert_eq!(result.departure.suitability.status, Status::Pass);
    }

    #[test]
    fn pax_details_error_degrades() {
        let reference = reference();
        let config = EngineConfig::default();
        let pax = |id: &str| -> Result<serde_json::Value, SourceError> {
            Err(SourceError::Failed(format!("timeout fetching {id}")))
        };
        let engine = FeasibilityEngine::new(
            &reference,
            &config,
            Collaborators::new(&NoNotes, &reference).with_pax_details(&pax),
            now(),
        );
        let result = engine.evaluate_leg(&leg(&reference));

        assert_eq!(result.weight_balance.status(), Status::Caution);
        assert_eq!(result.weight_balance.details.payload_source, PayloadSource::ApiError);
        assert_eq!(
            result.weight_balance.details.payload_error.as_deref(),
            Some("collaborator failed: timeout fetching L1")
        );
    }

    #[test]
    fn pax_details_payload_is_used() {
        let reference = reference();
        let config = EngineConfig::default();
        let pax = |_: &str| -> Result<serde_json::Value, SourceError> {
            Ok(serde_json::json!({"tickets": [{"paxType": "ADULT", "bodyWeight": 180}]}))
        };
        let engine = FeasibilityEngine::new(
            &reference,
            &config,
            Collaborators::new(&NoNotes, &reference).with_pax_details(&pax),
            now(),
        );
        let result = engine.evaluate_leg(&leg(&reference));
        assert_eq!(result.weight_balance.details.payload_source, PayloadSource::Api);
        assert_eq!(result.weight_balance.details.pax_count, 1);
        assert_eq!(result.weight_balance.status(), Status::Pass);
    }
}
