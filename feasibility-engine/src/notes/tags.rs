//! Classification tags and primary-tag selection.
//!
//! A note can match several tags, and every matched tag still sets its
//! flags, but the verbatim note is filed under exactly one: the first
//! matched tag in priority order.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RestrictionTag {
    Slot,
    Ppr,
    Deice,
    Winter,
    Fuel,
    Night,
    Weather,
    Runway,
}

impl RestrictionTag {
    pub const PRIORITY: [RestrictionTag; 8] = [
        RestrictionTag::Slot,
        RestrictionTag::Ppr,
        RestrictionTag::Deice,
        RestrictionTag::Winter,
        RestrictionTag::Fuel,
        RestrictionTag::Night,
        RestrictionTag::Weather,
        RestrictionTag::Runway,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomsTag {
    Canpass,
    Afterhours,
    Notice,
    Hours,
    Location,
    Contact,
    Pax,
    Crew,
    General,
}

impl CustomsTag {
    pub const PRIORITY: [CustomsTag; 9] = [
        CustomsTag::Canpass,
        CustomsTag::Afterhours,
        CustomsTag::Notice,
        CustomsTag::Hours,
        CustomsTag::Location,
        CustomsTag::Contact,
        CustomsTag::Pax,
        CustomsTag::Crew,
        CustomsTag::General,
    ];
}

/// The first entry of `priority` present in `tags`.
///
/// ```
/// use feasibility_engine::notes::{RestrictionTag, select_primary};
///
/// let tags = [RestrictionTag::Winter, RestrictionTag::Slot];
/// assert_eq!(
///     select_primary(&RestrictionTag::PRIORITY, &tags),
///     Some(RestrictionTag::Slot)
/// );
/// assert_eq!(select_primary(&RestrictionTag::PRIORITY, &[]), None);
/// ```
pub fn select_primary<T: Copy + PartialEq>(priority: &[T], tags: &[T]) -> Option<T> {
    priority.iter().copied().find(|tag| tags.contains(tag))
}
