use crate::core::footprint::{
    dissolve_by_scene_subswath, dissolve_by_subswath, overlay_intersection, AreaProjector,
};
use crate::types::{FootprintTable, SarError, SarResult};
use std::collections::BTreeSet;

/// Minimum overlap in m² for a cross-sensor reference; roughly one burst.
/// Full-subswath side overlaps (~1.57e9) fall below it, single bursts (~1.81e9) above.
pub const BURST_AREA_THRESHOLD: f64 = 1_800_000_000.0;

/// Parameters of the reference scene search
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Sensor the reference table was built from
    pub ref_sensor: String,
    /// Projected EPSG code used for the overlap area
    pub epsg: u32,
    /// Cross-sensor overlaps must exceed this area (m²)
    pub min_overlap_area: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            ref_sensor: "S1A".to_string(),
            epsg: 32631, // UTM 31N
            min_overlap_area: BURST_AREA_THRESHOLD,
        }
    }
}

/// How the scene relates to the reference table's sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorMatch {
    /// One fully overlapping reference is expected
    Same,
    /// Up to two partially overlapping references are expected
    Cross,
}

impl SensorMatch {
    pub fn between(scene_sensor: &str, ref_sensor: &str) -> Self {
        if scene_sensor == ref_sensor {
            SensorMatch::Same
        } else {
            SensorMatch::Cross
        }
    }
}

/// Overlap of one reference footprint with the scene, with its projected area
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceOverlap {
    pub reference_id: String,
    pub area: f64,
}

/// Find the reference scene ids eligible for coregistering `scene`.
///
/// An empty result means no reference is available and needs manual
/// attention. An empty scene table is rejected.
pub fn search_for_reference(
    scene: &FootprintTable,
    reference: &FootprintTable,
    config: &SearchConfig,
) -> SarResult<Vec<String>> {
    let overlaps = reference_overlaps(scene, reference, config)?;
    if overlaps.is_empty() {
        return Ok(Vec::new());
    }

    let scene_sensor = scene
        .first()
        .map(|row| row.sensor.as_str())
        .unwrap_or_default();

    let ids = match SensorMatch::between(scene_sensor, &config.ref_sensor) {
        SensorMatch::Same => select_largest(&overlaps).into_iter().collect(),
        SensorMatch::Cross => select_above(&overlaps, config.min_overlap_area),
    };

    if ids.is_empty() {
        log::warn!(
            "No reference found for scene {}",
            scene.first().map(|row| row.id.as_str()).unwrap_or_default()
        );
    }
    Ok(ids)
}

/// All non-degenerate overlaps between same-orbit reference footprints and the scene
pub fn reference_overlaps(
    scene: &FootprintTable,
    reference: &FootprintTable,
    config: &SearchConfig,
) -> SarResult<Vec<ReferenceOverlap>> {
    let first = scene
        .first()
        .ok_or_else(|| SarError::InvalidInput("Scene footprint table is empty".to_string()))?;

    let scene_footprints = dissolve_by_subswath(scene)?;

    let candidates = reference.same_orbit(first.rel_orbit, &first.orbit_direction);
    log::debug!(
        "Scene {}: {} candidate bursts on relative orbit {} ({})",
        first.id,
        candidates.len(),
        first.rel_orbit,
        first.orbit_direction
    );
    if candidates.is_empty() {
        log::warn!(
            "No reference bursts on relative orbit {} ({}) for scene {}",
            first.rel_orbit,
            first.orbit_direction,
            first.id
        );
        return Ok(Vec::new());
    }

    let reference_footprints = dissolve_by_scene_subswath(&candidates)?;
    let intersections = overlay_intersection(&reference_footprints, &scene_footprints)?;
    if intersections.is_empty() {
        log::warn!("Scene {} does not intersect any reference footprint", first.id);
        return Ok(Vec::new());
    }

    let projector = AreaProjector::new(config.epsg)?;
    let mut overlaps = Vec::with_capacity(intersections.len());
    for intersection in &intersections {
        let area = projector.area(&intersection.geometry)?;
        log::debug!(
            "Reference {} {} x scene {}: {:.4e} m²",
            intersection.reference_id,
            intersection.reference_subswath,
            intersection.scene_subswath,
            area
        );
        overlaps.push(ReferenceOverlap {
            reference_id: intersection.reference_id.clone(),
            area,
        });
    }
    Ok(overlaps)
}

/// Id of the largest overlap; equal areas go to the lexicographically smallest id
fn select_largest(overlaps: &[ReferenceOverlap]) -> Option<String> {
    overlaps
        .iter()
        .fold(None::<&ReferenceOverlap>, |best, candidate| match best {
            Some(current)
                if current.area > candidate.area
                    || (current.area == candidate.area
                        && current.reference_id <= candidate.reference_id) =>
            {
                Some(current)
            }
            _ => Some(candidate),
        })
        .map(|overlap| overlap.reference_id.clone())
}

/// Distinct ids whose overlap exceeds `threshold`, in ascending order
fn select_above(overlaps: &[ReferenceOverlap], threshold: f64) -> Vec<String> {
    overlaps
        .iter()
        .filter(|overlap| overlap.area > threshold)
        .map(|overlap| overlap.reference_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
