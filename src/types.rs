use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Number of bursts a regular IW subswath is expected to carry
pub const NOMINAL_BURSTS_PER_SUBSWATH: u32 = 9;

/// Polarization modes for Sentinel-1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarization {
    VV,
    VH,
    HV,
    HH,
}

impl std::fmt::Display for Polarization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Polarization::VV => write!(f, "VV"),
            Polarization::VH => write!(f, "VH"),
            Polarization::HV => write!(f, "HV"),
            Polarization::HH => write!(f, "HH"),
        }
    }
}

impl FromStr for Polarization {
    type Err = SarError;

    fn from_str(s: &str) -> SarResult<Self> {
        match s.trim().to_uppercase().as_str() {
            "VV" => Ok(Polarization::VV),
            "VH" => Ok(Polarization::VH),
            "HV" => Ok(Polarization::HV),
            "HH" => Ok(Polarization::HH),
            other => Err(SarError::InvalidInput(format!("Invalid polarization: {}", other))),
        }
    }
}

/// Interferometric Wide swath sub-swaths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Subswath {
    IW1,
    IW2,
    IW3,
}

impl Subswath {
    /// All IW sub-swaths in acquisition order
    pub const ALL: [Subswath; 3] = [Subswath::IW1, Subswath::IW2, Subswath::IW3];

    /// Lower-case token used in SAFE file names (`s1a-iw1-slc-...`)
    pub fn file_token(&self) -> &'static str {
        match self {
            Subswath::IW1 => "iw1",
            Subswath::IW2 => "iw2",
            Subswath::IW3 => "iw3",
        }
    }
}

impl std::fmt::Display for Subswath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Subswath::IW1 => write!(f, "IW1"),
            Subswath::IW2 => write!(f, "IW2"),
            Subswath::IW3 => write!(f, "IW3"),
        }
    }
}

impl FromStr for Subswath {
    type Err = SarError;

    fn from_str(s: &str) -> SarResult<Self> {
        match s.trim().to_uppercase().as_str() {
            "IW1" => Ok(Subswath::IW1),
            "IW2" => Ok(Subswath::IW2),
            "IW3" => Ok(Subswath::IW3),
            other => Err(SarError::InvalidInput(format!("Invalid subswath: {}", other))),
        }
    }
}

/// Satellite pass direction.
///
/// Unrecognised values are kept verbatim so that burst correction can
/// report them instead of failing the whole scene.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrbitDirection {
    Ascending,
    Descending,
    Unknown(String),
}

impl OrbitDirection {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_uppercase().as_str() {
            "A" | "ASCENDING" => OrbitDirection::Ascending,
            "D" | "DESCENDING" => OrbitDirection::Descending,
            _ => OrbitDirection::Unknown(value.to_string()),
        }
    }
}

impl std::fmt::Display for OrbitDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrbitDirection::Ascending => write!(f, "A"),
            OrbitDirection::Descending => write!(f, "D"),
            OrbitDirection::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}

/// Closed exterior ring of (longitude, latitude) vertices in EPSG:4326
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurstPolygon {
    pub exterior: Vec<[f64; 2]>,
}

impl BurstPolygon {
    /// Build a polygon from a ring, closing it if the last vertex differs from the first
    pub fn new(mut exterior: Vec<[f64; 2]>) -> Self {
        if let (Some(first), Some(last)) = (exterior.first().copied(), exterior.last().copied()) {
            if first != last {
                exterior.push(first);
            }
        }
        Self { exterior }
    }

    /// Axis-aligned rectangle in lon/lat
    pub fn rectangle(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self::new(vec![
            [min_lon, min_lat],
            [max_lon, min_lat],
            [max_lon, max_lat],
            [min_lon, max_lat],
        ])
    }

    pub fn to_wkt(&self) -> String {
        let coords = self
            .exterior
            .iter()
            .map(|[x, y]| format!("{} {}", x, y))
            .collect::<Vec<_>>()
            .join(", ");
        format!("POLYGON (({}))", coords)
    }
}

/// Scene-level acquisition metadata read from a product container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneMetadata {
    pub sensor: String,
    pub polarizations: Vec<Polarization>,
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
    pub acquisition_mode: String,
    pub product_type: String,
    pub orbit_direction: OrbitDirection,
    pub rel_orbit: u32,
}

/// One burst polygon as delivered by a geometry reader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurstRecord {
    pub subswath: Subswath,
    pub burst: u32,
    pub geometry: BurstPolygon,
}

/// One burst of one scene, annotated with the scene's metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurstFootprint {
    pub subswath: Subswath,
    pub burst: u32,
    pub geometry: BurstPolygon,
    pub id: String,
    pub name: String,
    pub path: PathBuf,
    pub sensor: String,
    pub polarizations: String,
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
    pub mode: String,
    pub product: String,
    pub orbit_direction: OrbitDirection,
    pub rel_orbit: u32,
    /// Serialized as 1 (nominal burst pattern) or 0
    #[serde(with = "bool_as_int")]
    pub regular_burst_pattern: bool,
}

/// Serde adapter writing a flag as the integer 1 or 0
pub mod bool_as_int {
    use serde::de::{Deserializer, Error, Unexpected};
    use serde::{Deserialize, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(D::Error::invalid_value(
                Unexpected::Unsigned(other as u64),
                &"0 or 1",
            )),
        }
    }
}

/// Ordered collection of burst footprints.
///
/// Used both for a single scene and for the accumulated reference table;
/// deduplication across appends is left to the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FootprintTable {
    pub rows: Vec<BurstFootprint>,
}

impl FootprintTable {
    pub fn new(rows: Vec<BurstFootprint>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&BurstFootprint> {
        self.rows.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BurstFootprint> {
        self.rows.iter()
    }

    /// Append all rows of another table (e.g. a freshly ingested scene)
    pub fn append(&mut self, other: FootprintTable) {
        self.rows.extend(other.rows);
    }

    /// Ordered `burst` column
    pub fn burst_sequence(&self) -> Vec<u32> {
        self.rows.iter().map(|row| row.burst).collect()
    }

    /// Rows acquired on the given relative orbit and pass direction
    pub fn same_orbit(&self, rel_orbit: u32, orbit_direction: &OrbitDirection) -> FootprintTable {
        FootprintTable::new(
            self.rows
                .iter()
                .filter(|row| row.rel_orbit == rel_orbit && &row.orbit_direction == orbit_direction)
                .cloned()
                .collect(),
        )
    }

    /// Distinct scene ids in order of first appearance
    pub fn scene_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for row in &self.rows {
            if !ids.contains(&row.id) {
                ids.push(row.id.clone());
            }
        }
        ids
    }
}

impl IntoIterator for FootprintTable {
    type Item = BurstFootprint;
    type IntoIter = std::vec::IntoIter<BurstFootprint>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// Error types for archive handling and reference search
#[derive(Debug, thiserror::Error)]
pub enum SarError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read archive {path}: {reason}")]
    ArchiveRead { path: PathBuf, reason: String },

    #[error("XML parsing error: {0}")]
    XmlParsing(String),

    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SarError {
    pub fn archive_read<P: Into<PathBuf>>(path: P, reason: impl std::fmt::Display) -> Self {
        SarError::ArchiveRead {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for SAR operations
pub type SarResult<T> = Result<T, SarError>;
