use crate::domain::{CategoryResult, Status};
use crate::reference::OsaSsaProfile;

/// Routing region from the airport category, flagging legs that need a
/// Jeppesen trip-planning task.
pub fn evaluate_osa_ssa(profile: &OsaSsaProfile) -> CategoryResult {
    if profile.requires_jepp {
        return CategoryResult::with_issue(
            Status::Caution,
            format!("{} - Jeppesen required", profile.region),
            "Jeppesen ITP task required for this leg.",
        );
    }
    CategoryResult::pass(format!(
        "Routing classified as {}. Jeppesen not required by profile.",
        profile.region
    ))
}
