//! Static airport reference data.
//!
//! ICAO-keyed datasets (airport metadata, categories, customs rules, runway
//! lengths, deice records) loaded once from JSON and then shared read-only.
//! A process-wide copy can be installed with [`install_global`]; it is never
//! invalidated.

mod profiles;
mod region;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, OnceLock};

use serde::Deserialize;

use crate::domain::Icao;
use crate::sources::TimezoneLookup;

pub use profiles::{AirportProfile, CustomsProfile, DeiceProfile, OsaSsaProfile, SlotPprProfile};
pub use region::{
    AirportRegion, FlightRegion, RoutingRegion, classify_airport, classify_flight,
    day_category_label,
};

/// Errors loading reference data.
#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    /// Reference file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reference document is not valid JSON for the expected shape
    #[error("invalid reference data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Per-airport metadata.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AirportMetadata {
    pub name: Option<String>,
    /// ISO 3166 alpha-2 country code.
    pub country: Option<String>,
    /// State / province name.
    #[serde(alias = "subd")]
    pub subdivision: Option<String>,
    pub tz: Option<String>,
    #[serde(alias = "lat")]
    pub latitude: Option<f64>,
    #[serde(alias = "lon")]
    pub longitude: Option<f64>,
    /// Explicit operations approval. Absent means approved.
    pub approved: Option<bool>,
}

/// Airport category record with free-text notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AirportCategoryRecord {
    pub category: Option<String>,
    pub notes: Option<String>,
}

/// Customs service record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CustomsRule {
    #[serde(alias = "serviceType")]
    pub service_type: Option<String>,
    pub notes: Option<String>,
}

/// Deice programme record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeiceRecord {
    #[serde(alias = "has_deice")]
    pub available: Option<bool>,
    #[serde(alias = "deice_info")]
    pub info: Option<String>,
    #[serde(alias = "lat")]
    pub latitude: Option<f64>,
    #[serde(alias = "lon")]
    pub longitude: Option<f64>,
}

/// All reference datasets, keyed by uppercase ICAO.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReferenceData {
    pub airports: HashMap<String, AirportMetadata>,
    pub categories: HashMap<String, AirportCategoryRecord>,
    pub customs: HashMap<String, CustomsRule>,
    /// Longest runway in feet.
    pub runways: HashMap<String, u32>,
    pub deice: HashMap<String, DeiceRecord>,
}

static GLOBAL: OnceLock<ReferenceData> = OnceLock::new();
static EMPTY: LazyLock<ReferenceData> = LazyLock::new(ReferenceData::default);

/// Install the process-wide reference data.
///
/// The first install wins; returns `false` if data was already installed.
pub fn install_global(data: ReferenceData) -> bool {
    let installed = GLOBAL.set(data).is_ok();
    if installed {
        tracing::debug!("installed global reference data");
    } else {
        tracing::warn!("global reference data already installed; ignoring");
    }
    installed
}

/// The installed reference data, or an empty dataset.
pub fn global() -> &'static ReferenceData {
    GLOBAL.get().unwrap_or_else(|| &*EMPTY)
}

impl ReferenceData {
    /// Parse reference data from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ReferenceError> {
        let data: ReferenceData = serde_json::from_str(json)?;
        Ok(data.normalized())
    }

    /// Load reference data from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ReferenceError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ReferenceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let data = Self::from_json_str(&contents)?;
        tracing::debug!(
            path = %path.display(),
            airports = data.airports.len(),
            runways = data.runways.len(),
            "loaded reference data"
        );
        Ok(data)
    }

    fn normalized(self) -> Self {
        fn upper_keys<V>(map: HashMap<String, V>) -> HashMap<String, V> {
            map.into_iter()
                .map(|(k, v)| (k.trim().to_ascii_uppercase(), v))
                .collect()
        }
        Self {
            airports: upper_keys(self.airports),
            categories: upper_keys(self.categories),
            customs: upper_keys(self.customs),
            runways: upper_keys(self.runways),
            deice: upper_keys(self.deice),
        }
    }

    pub fn airport(&self, icao: &Icao) -> Option<&AirportMetadata> {
        self.airports.get(icao.as_str())
    }

    pub fn category(&self, icao: &Icao) -> Option<&AirportCategoryRecord> {
        self.categories.get(icao.as_str())
    }

    pub fn customs_rule(&self, icao: &Icao) -> Option<&CustomsRule> {
        self.customs.get(icao.as_str())
    }

    pub fn deice_record(&self, icao: &Icao) -> Option<&DeiceRecord> {
        self.deice.get(icao.as_str())
    }

    pub fn longest_runway_ft(&self, icao: &Icao) -> Option<u32> {
        self.runways.get(icao.as_str()).copied().filter(|ft| *ft > 0)
    }

    /// Country code for an airport, if known.
    pub fn country(&self, icao: &Icao) -> Option<&str> {
        self.airport(icao)
            .and_then(|m| non_blank(m.country.as_deref()))
    }

    pub fn subdivision(&self, icao: &Icao) -> Option<&str> {
        self.airport(icao)
            .and_then(|m| non_blank(m.subdivision.as_deref()))
    }

    /// Latitude from the deice record, falling back to airport metadata.
    pub fn latitude(&self, icao: &Icao) -> Option<f64> {
        self.deice_record(icao)
            .and_then(|d| d.latitude)
            .or_else(|| self.airport(icao).and_then(|m| m.latitude))
    }
}

impl TimezoneLookup for ReferenceData {
    fn tz_for(&self, icao: &Icao) -> Option<String> {
        self.airport(icao)
            .and_then(|m| non_blank(m.tz.as_deref()))
            .map(str::to_string)
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "airports": {
            "cyyc": {"country": "CA", "subd": "Alberta", "tz": "America/Edmonton", "lat": 51.13},
            "MYAM": {"country": "BS", "tz": " "}
        },
        "categories": {"KASE": {"category": "SSA", "notes": "Slot required"}},
        "customs": {"CYYC": {"serviceType": "AOE"}},
        "runways": {"CYYC": 14000, "CZZZ": 0},
        "deice": {"CYYC": {"has_deice": true, "deice_info": "Type I/IV"}}
    }"#;

    fn icao(s: &str) -> Icao {
        Icao::parse(s).unwrap()
    }

    #[test]
    fn parses_and_normalizes_keys() {
        let data = ReferenceData::from_json_str(SAMPLE).unwrap();
        assert_eq!(data.country(&icao("CYYC")), Some("CA"));
        assert_eq!(data.subdivision(&icao("CYYC")), Some("Alberta"));
        assert_eq!(data.longest_runway_ft(&icao("CYYC")), Some(14000));
        assert_eq!(data.longest_runway_ft(&icao("CZZZ")), None);
        assert_eq!(
            data.customs_rule(&icao("CYYC")).unwrap().service_type.as_deref(),
            Some("AOE")
        );
        assert_eq!(data.deice_record(&icao("CYYC")).unwrap().available, Some(true));
        assert_eq!(data.latitude(&icao("CYYC")), Some(51.13));
    }

    #[test]
    fn timezone_lookup_skips_blank() {
        let data = ReferenceData::from_json_str(SAMPLE).unwrap();
        assert_eq!(data.tz_for(&icao("CYYC")).as_deref(), Some("America/Edmonton"));
        assert_eq!(data.tz_for(&icao("MYAM")), None);
        assert_eq!(data.tz_for(&icao("EGLL")), None);
    }

    #[test]
    fn empty_document_is_empty_data() {
        let data = ReferenceData::from_json_str("{}").unwrap();
        assert_eq!(data, ReferenceData::default());
    }

    #[test]
    fn invalid_json_is_error() {
        let err = ReferenceData::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ReferenceError::Json(_)));
        assert!(err.to_string().starts_with("invalid reference data"));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let data = ReferenceData::from_path(file.path()).unwrap();
        assert_eq!(data.runways.len(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReferenceData::from_path(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ReferenceError::Io { .. }));
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn first_global_install_wins() {
        let mut first = ReferenceData::default();
        first.runways.insert("ZZZZ".into(), 1234);
        let mut second = ReferenceData::default();
        second.runways.insert("ZZZZ".into(), 9999);

        assert!(install_global(first));
        assert!(!install_global(second));
        assert_eq!(global().longest_runway_ft(&icao("ZZZZ")), Some(1234));
    }
}
