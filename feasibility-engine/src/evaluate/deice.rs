use crate::config::EngineConfig;
use crate::domain::{CategoryResult, Status};
use crate::notes::ParsedRestrictions;
use crate::reference::DeiceProfile;

/// Deice availability from the deice programme, layered with what the
/// operational notes say.
pub fn evaluate_deice(
    profile: &DeiceProfile,
    parsed: &ParsedRestrictions,
    config: &EngineConfig,
) -> CategoryResult {
    let mut result = CategoryResult::pass("Deice available");

    match profile.deice_available {
        Some(true) => {}
        Some(false) => {
            result.raise(Status::Caution);
            result.set_summary("Deice unavailable");
            result.push_issue("Deice program indicates no deice at this airport.");
        }
        None if profile
            .latitude
            .is_some_and(|lat| lat.abs() <= config.warm_region_latitude) =>
        {
            result.set_summary("Deice not required (warm region)");
        }
        None => {
            result.raise(Status::Caution);
            result.set_summary("Unknown deice status");
            result.push_issue("No deice intel available; confirm if icing conditions likely.");
        }
    }

    if parsed.deice_unavailable {
        result.raise(Status::Caution);
        result.set_summary("Operational note: deice unavailable");
        result.push_issue("Operational notes report deice unavailable; confirm support.");
    } else if parsed.deice_limited {
        result.raise(Status::Caution);
        result.set_summary("Operational note: deice limited");
        result.push_issue("Operational notes report limited deice; confirm capacity.");
    }
    if parsed.winter_sensitivity {
        result.push_unique("Operational notes highlight winter sensitivity.");
    }
    for note in &parsed.deice_notes {
        result.push_unique(format!("Deice note: {note}"));
    }

    if let Some(notes) = &profile.notes {
        result.push_unique(notes.clone());
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Icao;
    use crate::notes::parse_operational_restrictions;

    fn profile(available: Option<bool>, latitude: Option<f64>) -> DeiceProfile {
        DeiceProfile {
            icao: Icao::parse("CYYC").unwrap(),
            deice_available: available,
            notes: None,
            latitude,
        }
    }

    fn evaluate(profile: &DeiceProfile, notes: &[&str]) -> CategoryResult {
        evaluate_deice(
            profile,
            &parse_operational_restrictions(notes),
            &EngineConfig::default(),
        )
    }

    #[test]
    fn available_passes() {
        let result = evaluate(&profile(Some(true), Some(51.1)), &[]);
        assert_eq!(result.status, Status::Pass);
        assert_eq!(result.summary, "Deice available");
    }

    #[test]
    fn unavailable_cautions() {
        let result = evaluate(&profile(Some(false), None), &[]);
        assert_eq!(result.status, Status::Caution);
        assert_eq!(result.summary, "Deice unavailable");
    }

    #[test]
    fn unknown_cautions_with_issue() {
        let result = evaluate(&profile(None, Some(60.0)), &[]);
        assert_eq!(result.status, Status::Caution);
        assert_eq!(result.summary, "Unknown deice status");
        assert_eq!(result.issues.len(), 1);
    }

    #[test]
    fn warm_region_needs_no_deice() {
        let result = evaluate(&profile(None, Some(-18.5)), &[]);
        assert_eq!(result.status, Status::Pass);
        assert_eq!(result.summary, "Deice not required (warm region)");
    }

    #[test]
    fn note_overrides_available_profile() {
        let result = evaluate(&profile(Some(true), None), &["No deice after 2200, snow likely"]);
        assert_eq!(result.status, Status::Caution);
        assert_eq!(result.summary, "Operational note: deice unavailable");
        assert!(result.issues.contains(&"Operational notes highlight winter sensitivity.".to_string()));
        assert!(result.issues.contains(&"Deice note: No deice after 2200, snow likely".to_string()));
    }

    #[test]
    fn limited_note_cautions() {
        let result = evaluate(&profile(Some(true), None), &["limited deice"]);
        assert_eq!(result.status, Status::Caution);
        assert_eq!(result.summary, "Operational note: deice limited");
    }
}
