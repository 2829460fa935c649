//! End-to-end tests for day orchestration.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

use super::*;
use crate::config::EngineConfig;
use crate::domain::{Icao, Status};
use crate::notes::NoteRecord;
use crate::reference::ReferenceData;
use crate::sources::{NoNotes, NoteSource, PaxDetailsSource, SourceError};

const REFERENCE: &str = r#"{
    "airports": {
        "CYYC": {"country": "CA", "subdivision": "Alberta", "tz": "America/Edmonton", "latitude": 51.13},
        "CYEG": {"country": "CA", "subdivision": "Alberta", "tz": "America/Edmonton", "latitude": 53.31}
    },
    "runways": {"CYYC": 14000, "CYEG": 11000},
    "deice": {
        "CYYC": {"available": true},
        "CYEG": {"available": true}
    }
}"#;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 1, 12, 0, 0).unwrap()
}

fn base_quote() -> Value {
    json!({
        "bookingIdentifier": "QX7Y2",
        "aircraftObj": {"type": "CJ3", "category": "LIGHT_JET"},
        "legs": [
            {
                "id": "LEG-1",
                "departureAirport": "CYYC",
                "arrivalAirport": "CYEG",
                "departureDateUTC": "2025-11-19T15:00:00Z",
                "arrivalDateUTC": "2025-11-19T16:15:00Z",
                "pax": 4,
                "blockTime": 75
            },
            {
                "id": "LEG-2",
                "departureAirport": "CYEG",
                "arrivalAirport": "CYYC",
                "departureDateUTC": "2025-11-19T17:00:00Z",
                "arrivalDateUTC": "2025-11-19T18:15:00Z",
                "pax": 4,
                "blockTime": 75
            }
        ]
    })
}

fn quote_with(fields: Value) -> Value {
    let mut quote = base_quote();
    if let (Some(target), Value::Object(extra)) = (quote.as_object_mut(), fields) {
        target.extend(extra);
    }
    quote
}

fn run_with(
    quote: &Value,
    notes: &dyn NoteSource,
    pax: Option<&dyn PaxDetailsSource>,
) -> FullFeasibilityResult {
    init_tracing();
    let reference = ReferenceData::from_json_str(REFERENCE).unwrap();
    let config = EngineConfig::default();
    let mut sources = Collaborators::new(notes, &reference);
    if let Some(pax) = pax {
        sources = sources.with_pax_details(pax);
    }
    FeasibilityEngine::new(&reference, &config, sources, now())
        .run_feasibility(quote)
        .unwrap()
}

fn run(quote: &Value) -> FullFeasibilityResult {
    run_with(quote, &NoNotes, None)
}

#[test]
fn two_leg_domestic_day_passes() {
    let result = run(&base_quote());

    assert_eq!(result.overall_status, Status::Pass);
    assert_eq!(result.duty.total_duty, Some(195));
    assert_eq!(result.duty.status, Status::Pass);
    assert_eq!(result.leg_results.len(), 2);
    assert_eq!(result.flight_category, "Regular");
    assert!(result.issues.is_empty(), "unexpected issues: {:?}", result.issues);
    assert!(result.validation_checks.is_empty());

    let lines: Vec<&str> = result.summary.lines().collect();
    assert_eq!(lines[0], "Quote QX7Y2 (CJ3)");
    assert_eq!(lines[1], "2-leg sequence CYYC→CYEG→CYYC on 19 Nov 2025");
    assert!(lines.contains(&"- Total duty 03:15 within 14:00 limit"));
    assert!(lines.contains(&"Leg 2 (CYEG→CYYC):"));
    assert_eq!(
        lines.iter().filter(|l| **l == "- All checks PASS.").count(),
        2
    );
}

#[test]
fn projection_is_plain_json() {
    let value = run(&base_quote()).to_value();

    assert_eq!(value["overall_status"], "PASS");
    assert_eq!(value["duty"]["total_duty"], 195);
    assert_eq!(value["leg_results"][0]["route"], "CYYC→CYEG");
    assert_eq!(value["leg_results"][0]["arrival"]["side"], "ARR");
    assert_eq!(value["leg_results"][0]["weight_balance"]["status"], "PASS");
    assert_eq!(
        value["leg_results"][0]["weight_balance"]["details"]["payloadSource"],
        "estimate"
    );
}

#[test]
fn long_duty_day_cautions() {
    let mut quote = base_quote();
    // 07:00Z is midnight in Edmonton, so the legs fall on two local dates.
    quote["legs"][1]["departureDateUTC"] = json!("2025-11-20T07:00:00Z");
    quote["legs"][1]["arrivalDateUTC"] = json!("2025-11-20T07:30:00Z");
    let result = run(&quote);

    assert_eq!(result.duty.total_duty, Some(990));
    assert_eq!(result.overall_status, Status::Caution);
    assert_eq!(result.issues[0], "Duty: Total duty 16:30 exceeds 14:00 limit");
    assert!(result.duty.split_duty_possible);
    assert!(result.duty.reset_duty_possible);
    assert!(result.summary.contains("from 19 Nov 2025 - 20 Nov 2025"));
    assert!(result.summary.contains("- Split duty possible (≥6h ground)."));
}

#[test]
fn info_notes_do_not_raise_the_day() {
    let notes = |icao: &Icao, _: Option<NaiveDate>| -> Vec<NoteRecord> {
        if icao.as_str() == "CYEG" {
            vec![NoteRecord::from_text("Contact duty pilot prior to departure")]
        } else {
            Vec::new()
        }
    };
    let result = run_with(&base_quote(), &notes, None);

    assert_eq!(result.leg_results[0].arrival.operational_notes.status, Status::Info);
    assert_eq!(result.overall_status, Status::Pass);
    assert!(result.issues.is_empty());
    assert!(result
        .summary
        .contains("- Arrival Operational Notes: PIC/duty pilot contact (INFO)"));
}

#[test]
fn pax_details_failure_surfaces_as_key_issue() {
    let pax = |id: &str| -> Result<Value, SourceError> { Err(SourceError::NotFound(id.to_string())) };
    let result = run_with(&base_quote(), &NoNotes, Some(&pax));

    assert_eq!(result.overall_status, Status::Caution);
    assert!(result
        .issues
        .contains(&"Leg 1 CYYC→CYEG: Weight & Balance - No weight data available".to_string()));
    assert_eq!(
        result.leg_results[1].weight_balance.details.payload_error.as_deref(),
        Some("no details for flight LEG-2")
    );
}

#[test]
fn guaranteed_workflow_aligns_with_owner_hint() {
    let result = run(&quote_with(json!({
        "workflowCustomName": "Club Guaranteed",
        "planningNotes": "CLUB CJ3 OWNER REQUESTING CJ3"
    })));

    assert!(result
        .validation_checks
        .contains(&"Workflow 'Club Guaranteed' aligns with planning notes (Guaranteed)".to_string()));
    assert!(result.issues.is_empty());
}

#[test]
fn guaranteed_workflow_with_interchange_hint_is_an_issue() {
    let result = run(&quote_with(json!({
        "workflowCustomName": "Club Guaranteed",
        "planningNotes": "INFINITY CJ2 OWNER REQUESTING CJ3"
    })));

    let expected = "Workflow 'Club Guaranteed' is Guaranteed but planning notes indicate Interchange";
    assert!(result.validation_checks.contains(&expected.to_string()));
    assert!(result.issues.contains(&expected.to_string()));
    assert_eq!(result.overall_status, Status::Pass);
}

#[test]
fn interchange_hint_with_typo_validates() {
    let result = run(&quote_with(json!({
        "workflowCustomName": "Club Interchange",
        "planningNotes": "24Club CJ3 owner requesting interchange to EMB"
    })));

    assert!(!result.issues.iter().any(|i| i.contains("Workflow")));
    assert!(result
        .issues
        .contains(&"Requested aircraft type EMB does not match quoted CJ3.".to_string()));
}

#[test]
fn as_available_workflow_is_validated() {
    let result = run(&quote_with(json!({"workflow": "FEX As Available"})));
    assert_eq!(
        result.validation_checks,
        vec!["Workflow 'FEX As Available' validated as As Available."]
    );
}

#[test]
fn requested_aircraft_synonym_is_not_flagged() {
    let result = run(&quote_with(json!({"requestedAircraftType": "C25B"})));
    assert!(!result
        .validation_checks
        .iter()
        .any(|c| c.contains("Requested aircraft type")));
}

#[test]
fn requested_aircraft_mismatch_is_flagged() {
    let result = run(&quote_with(json!({"requestedAircraftType": "Praetor 500"})));
    assert!(result
        .issues
        .contains(&"Requested aircraft type Praetor 500 does not match quoted CJ3.".to_string()));
}

#[test]
fn planning_route_mismatch_is_flagged() {
    let result = run(&quote_with(json!({"planningNotes": "19NOV CYKF-KSRQ [ONE-WAY]"})));
    assert!(result.issues.contains(
        &"Planning notes route for 2025-11-19 (CYKF-KSRQ) does not match booked CYYC→CYEG.".to_string()
    ));
}

#[test]
fn planning_route_match_is_confirmed() {
    let result = run(&quote_with(json!({"planningNotes": "-= 19NOV CYYC - CYEG - CYYC =-"})));
    assert!(result.issues.is_empty());
    assert_eq!(
        result
            .validation_checks
            .iter()
            .filter(|c| c.contains("Planning notes route") && c.contains("matches booked"))
            .count(),
        2
    );
}

#[test]
fn planning_route_on_wrong_date_is_flagged() {
    let result = run(&quote_with(json!({"planningNotes": "20NOV CYYC-CYEG"})));
    assert!(result.issues.iter().any(|i| i.contains("route date")));
}

#[test]
fn quote_errors_are_reported() {
    let reference = ReferenceData::from_json_str(REFERENCE).unwrap();
    let config = EngineConfig::default();
    let engine = FeasibilityEngine::new(
        &reference,
        &config,
        Collaborators::new(&NoNotes, &reference),
        now(),
    );

    assert_eq!(
        engine.run_feasibility(&json!("QX7Y2")).unwrap_err(),
        FeasibilityError::InvalidQuote
    );
    assert_eq!(
        engine.run_feasibility(&json!({"legs": []})).unwrap_err(),
        FeasibilityError::NoLegs("UNKNOWN".into())
    );
}
