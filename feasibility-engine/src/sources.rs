//! Collaborators the engine reads from but does not own.
//!
//! Note fetching, timezone lookup and passenger details all live outside
//! the engine. Each is a small trait with a blanket impl for plain
//! closures, so callers and tests can pass a function directly.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::sync::Cache as MokaCache;
use serde_json::Value;

use crate::domain::Icao;
use crate::notes::NoteRecord;

/// Errors from collaborator calls. These are always degraded to a
/// CAUTION finding rather than propagated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("no details for flight {0}")]
    NotFound(String),

    #[error("collaborator failed: {0}")]
    Failed(String),
}

/// Fetches airport notes valid on a local date.
pub trait NoteSource {
    fn fetch_notes(&self, icao: &Icao, local_date: Option<NaiveDate>) -> Vec<NoteRecord>;
}

impl<F> NoteSource for F
where
    F: Fn(&Icao, Option<NaiveDate>) -> Vec<NoteRecord>,
{
    fn fetch_notes(&self, icao: &Icao, local_date: Option<NaiveDate>) -> Vec<NoteRecord> {
        self(icao, local_date)
    }
}

/// Resolves an airport to its IANA timezone name.
pub trait TimezoneLookup {
    fn tz_for(&self, icao: &Icao) -> Option<String>;
}

impl<F> TimezoneLookup for F
where
    F: Fn(&Icao) -> Option<String>,
{
    fn tz_for(&self, icao: &Icao) -> Option<String> {
        self(icao)
    }
}

/// Fetches the passenger/cargo payload for a flight.
pub trait PaxDetailsSource {
    fn fetch_pax_details(&self, flight_id: &str) -> Result<Value, SourceError>;
}

impl<F> PaxDetailsSource for F
where
    F: Fn(&str) -> Result<Value, SourceError>,
{
    fn fetch_pax_details(&self, flight_id: &str) -> Result<Value, SourceError> {
        self(flight_id)
    }
}

/// A note source with no notes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNotes;

impl NoteSource for NoNotes {
    fn fetch_notes(&self, _icao: &Icao, _local_date: Option<NaiveDate>) -> Vec<NoteRecord> {
        Vec::new()
    }
}

/// Cache key for note fetches: (airport, local date).
type NoteKey = (Icao, Option<NaiveDate>);

/// Configuration for the note cache.
#[derive(Debug, Clone)]
pub struct NoteCacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for NoteCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 1000,
        }
    }
}

/// Note source that memoizes another per (ICAO, local date).
pub struct CachedNoteSource<S> {
    inner: S,
    cache: MokaCache<NoteKey, Arc<Vec<NoteRecord>>>,
}

impl<S: NoteSource> CachedNoteSource<S> {
    pub fn new(inner: S, config: &NoteCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        Self { inner, cache }
    }

    /// Access the wrapped source for fetches that bypass the cache.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

impl<S: NoteSource> NoteSource for CachedNoteSource<S> {
    fn fetch_notes(&self, icao: &Icao, local_date: Option<NaiveDate>) -> Vec<NoteRecord> {
        let key = (icao.clone(), local_date);
        let notes = self
            .cache
            .get_with(key, || Arc::new(self.inner.fetch_notes(icao, local_date)));
        notes.as_ref().clone()
    }
}
