//! Airport note handling: records, classification and fact extraction.
//!
//! All extraction is pure and total. Malformed or unexpected text yields no
//! signal for that note rather than an error.

mod classify;
mod customs;
mod record;
mod restrictions;
mod rules;
mod tags;

pub use classify::{
    NoteSplit, is_customs_note, should_ignore_operational_note, split_customs_operational_notes,
};
pub use customs::{
    CustomsExtractor, CustomsHours, ParsedCustoms, UNKNOWN_DAYS, WEEKDAYS, parse_customs_notes,
};
pub use record::{NoteRecord, note_text};
pub use restrictions::{ParsedRestrictions, RestrictionExtractor, parse_operational_restrictions};
pub use rules::{CustomsRules, RestrictionRules};
pub use tags::{CustomsTag, RestrictionTag, select_primary};

pub(crate) use rules::{contains_any, contains_word};
