use crate::io::safe_reader::{BurstGeometryReader, MetadataReader};
use crate::types::{
    BurstFootprint, BurstRecord, FootprintTable, OrbitDirection, SarResult, Subswath,
    NOMINAL_BURSTS_PER_SUBSWATH,
};
use std::path::{Path, PathBuf};

/// Length of the archive suffix stripped from the file name (`.zip`)
const ARCHIVE_SUFFIX_LEN: usize = 4;

/// Length of the scene identifier at the end of the product name
const SCENE_ID_LEN: usize = 4;

/// Descending scenes keep bursts up to this index (exclusive); one extra
/// burst beyond the nominal nine is kept for visual inspection
const DESCENDING_BURST_LIMIT: u32 = 11;

/// Options for building the footprint table of one scene
#[derive(Debug, Clone, Default)]
pub struct SceneOptions {
    /// Product name; derived from the archive file name when absent
    pub name: Option<String>,
    /// 4-character scene id; derived from the name when absent
    pub id: Option<String>,
    /// Drop extra bursts where the orbit direction allows it
    pub make_regular: bool,
}

/// Non-fatal findings of burst correction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BurstDiagnostic {
    /// Orbit direction other than ascending or descending; no correction applied
    InvalidOrbitValue { id: String, value: String },
    /// Ascending subswath with a burst count other than nine; rows left untouched
    BurstCountMismatch { id: String, subswath: Subswath, count: usize },
}

impl std::fmt::Display for BurstDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BurstDiagnostic::InvalidOrbitValue { id, value } => {
                write!(f, "scene {}: incorrect orbit given ({})", id, value)
            }
            BurstDiagnostic::BurstCountMismatch { id, subswath, count } => {
                write!(f, "scene {}, {}, has {} bursts", id, subswath, count)
            }
        }
    }
}

/// Burst order of a complete IW scene: 1..9 for each of the three subswaths
pub fn nominal_burst_pattern() -> Vec<u32> {
    Subswath::ALL
        .iter()
        .flat_map(|_| 1..=NOMINAL_BURSTS_PER_SUBSWATH)
        .collect()
}

/// True when the ordered burst column matches the nominal pattern exactly
pub fn has_regular_burst_pattern(bursts: &[u32]) -> bool {
    bursts == nominal_burst_pattern().as_slice()
}

/// Derive the product name from `<dir>/<name>.zip`
pub fn derive_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    let keep = file_name.chars().count().saturating_sub(ARCHIVE_SUFFIX_LEN);
    file_name.chars().take(keep).collect()
}

/// Derive the scene id as the last four characters of the product name
pub fn derive_id(name: &str) -> String {
    let count = name.chars().count();
    name.chars().skip(count.saturating_sub(SCENE_ID_LEN)).collect()
}

/// Best-effort removal of extra bursts.
///
/// Descending scenes drop bursts with index 11 and above. Ascending scenes
/// are only checked: subswaths with a burst count other than nine are
/// reported but not corrected. Missing bursts are never filled in.
pub fn regularize_bursts(
    bursts: Vec<BurstRecord>,
    orbit_direction: &OrbitDirection,
    id: &str,
) -> (Vec<BurstRecord>, Vec<BurstDiagnostic>) {
    let mut diagnostics = Vec::new();

    let bursts = match orbit_direction {
        OrbitDirection::Descending => bursts
            .into_iter()
            .filter(|record| record.burst < DESCENDING_BURST_LIMIT)
            .collect(),
        OrbitDirection::Ascending => {
            for subswath in Subswath::ALL {
                let count = bursts.iter().filter(|record| record.subswath == subswath).count();
                if count != NOMINAL_BURSTS_PER_SUBSWATH as usize {
                    diagnostics.push(BurstDiagnostic::BurstCountMismatch {
                        id: id.to_string(),
                        subswath,
                        count,
                    });
                }
            }
            // TODO: cut extra bursts from the subswath they belong to
            bursts
        }
        OrbitDirection::Unknown(value) => {
            diagnostics.push(BurstDiagnostic::InvalidOrbitValue {
                id: id.to_string(),
                value: value.clone(),
            });
            bursts
        }
    };

    (bursts, diagnostics)
}

/// Build the burst footprint table of one scene archive.
///
/// Reader failures are returned unchanged; the path is not checked before
/// it is handed to the readers.
pub fn build_scene_geometry<R>(reader: &R, path: &Path, options: &SceneOptions) -> SarResult<FootprintTable>
where
    R: MetadataReader + BurstGeometryReader + ?Sized,
{
    let name = options.name.clone().unwrap_or_else(|| derive_name(path));
    let id = options.id.clone().unwrap_or_else(|| derive_id(&name));
    log::info!("Building burst footprints for scene {} ({})", id, name);

    let metadata = reader.read_metadata(path)?;
    let mut bursts = reader.read_bursts(path, &Subswath::ALL)?;
    log::debug!("Scene {}: {} bursts read", id, bursts.len());

    if options.make_regular {
        let (kept, diagnostics) = regularize_bursts(bursts, &metadata.orbit_direction, &id);
        for diagnostic in &diagnostics {
            log::warn!("{}", diagnostic);
        }
        bursts = kept;
    }

    let sequence: Vec<u32> = bursts.iter().map(|record| record.burst).collect();
    let regular = has_regular_burst_pattern(&sequence);
    if !regular {
        log::debug!("Scene {} has an irregular burst pattern: {:?}", id, sequence);
    }

    let polarizations = metadata
        .polarizations
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(",");

    let rows = bursts
        .into_iter()
        .map(|record| BurstFootprint {
            subswath: record.subswath,
            burst: record.burst,
            geometry: record.geometry,
            id: id.clone(),
            name: name.clone(),
            path: path.to_path_buf(),
            sensor: metadata.sensor.clone(),
            polarizations: polarizations.clone(),
            start: metadata.start,
            stop: metadata.stop,
            mode: metadata.acquisition_mode.clone(),
            product: metadata.product_type.clone(),
            orbit_direction: metadata.orbit_direction.clone(),
            rel_orbit: metadata.rel_orbit,
            regular_burst_pattern: regular,
        })
        .collect();

    Ok(FootprintTable::new(rows))
}

/// Build footprint tables for many archives, one result per path in input order
pub fn build_scene_geometries<R>(
    reader: &R,
    paths: &[PathBuf],
    make_regular: bool,
) -> Vec<(PathBuf, SarResult<FootprintTable>)>
where
    R: MetadataReader + BurstGeometryReader + Sync,
{
    let options = SceneOptions {
        make_regular,
        ..SceneOptions::default()
    };

    #[cfg(feature = "parallel")]
    let results = {
        use rayon::prelude::*;
        paths
            .par_iter()
            .map(|path| (path.clone(), build_scene_geometry(reader, path, &options)))
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let results = paths
        .iter()
        .map(|path| (path.clone(), build_scene_geometry(reader, path, &options)))
        .collect();

    results
}

/// Merge successfully built tables into one reference table, logging failures
pub fn collect_reference_table(results: Vec<(PathBuf, SarResult<FootprintTable>)>) -> FootprintTable {
    let mut table = FootprintTable::default();
    for (path, result) in results {
        match result {
            Ok(scene) => table.append(scene),
            Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
        }
    }
    table
}
