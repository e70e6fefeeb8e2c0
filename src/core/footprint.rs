use crate::types::{BurstPolygon, FootprintTable, SarError, SarResult, Subswath};
use gdal::spatial_ref::{CoordTransform, SpatialRef};
use gdal::vector::Geometry;
use std::collections::BTreeMap;

/// EPSG code of the geographic system burst polygons are expressed in
pub const GEOGRAPHIC_EPSG: u32 = 4326;

/// Union of the burst polygons of one subswath, optionally of one scene
pub struct DissolvedFootprint {
    pub id: Option<String>,
    pub subswath: Subswath,
    pub geometry: Geometry,
}

/// Intersection of a reference footprint with a scene footprint
pub struct FootprintIntersection {
    pub reference_id: String,
    pub reference_subswath: Subswath,
    pub scene_subswath: Subswath,
    pub geometry: Geometry,
}

pub fn to_geometry(polygon: &BurstPolygon) -> SarResult<Geometry> {
    Ok(Geometry::from_wkt(&polygon.to_wkt())?)
}

/// Union of all polygons; `None` for an empty input
fn union_all<'a, I>(polygons: I) -> SarResult<Option<Geometry>>
where
    I: IntoIterator<Item = &'a BurstPolygon>,
{
    let mut merged: Option<Geometry> = None;
    for polygon in polygons {
        let geometry = to_geometry(polygon)?;
        merged = Some(match merged {
            None => geometry,
            Some(current) => current
                .union(&geometry)
                .ok_or_else(|| SarError::Geometry("Burst polygon union failed".to_string()))?,
        });
    }
    Ok(merged)
}

/// Dissolve a scene table into one geometry per subswath
pub fn dissolve_by_subswath(table: &FootprintTable) -> SarResult<Vec<DissolvedFootprint>> {
    let mut groups: BTreeMap<Subswath, Vec<&BurstPolygon>> = BTreeMap::new();
    for row in table.iter() {
        groups.entry(row.subswath).or_default().push(&row.geometry);
    }

    let mut dissolved = Vec::with_capacity(groups.len());
    for (subswath, polygons) in groups {
        if let Some(geometry) = union_all(polygons)? {
            dissolved.push(DissolvedFootprint { id: None, subswath, geometry });
        }
    }
    Ok(dissolved)
}

/// Dissolve a reference table into one geometry per (scene id, subswath)
pub fn dissolve_by_scene_subswath(table: &FootprintTable) -> SarResult<Vec<DissolvedFootprint>> {
    let mut groups: BTreeMap<(String, Subswath), Vec<&BurstPolygon>> = BTreeMap::new();
    for row in table.iter() {
        groups
            .entry((row.id.clone(), row.subswath))
            .or_default()
            .push(&row.geometry);
    }

    let mut dissolved = Vec::with_capacity(groups.len());
    for ((id, subswath), polygons) in groups {
        if let Some(geometry) = union_all(polygons)? {
            dissolved.push(DissolvedFootprint { id: Some(id), subswath, geometry });
        }
    }
    Ok(dissolved)
}

/// Pairwise intersection of reference and scene footprints.
///
/// Pairs are matched by location, not by subswath label. Pairs that do
/// not overlap, or only touch along an edge, are left out.
pub fn overlay_intersection(
    references: &[DissolvedFootprint],
    scene: &[DissolvedFootprint],
) -> SarResult<Vec<FootprintIntersection>> {
    let mut intersections = Vec::new();

    for reference in references {
        let reference_id = reference.id.clone().ok_or_else(|| {
            SarError::Geometry("Reference footprint without scene id".to_string())
        })?;

        for target in scene {
            let geometry = require_intersection(
                reference.geometry.intersection(&target.geometry),
                &reference_id,
                reference.subswath,
                target.subswath,
            )?;
            if geometry.area() <= 0.0 {
                continue;
            }
            intersections.push(FootprintIntersection {
                reference_id: reference_id.clone(),
                reference_subswath: reference.subswath,
                scene_subswath: target.subswath,
                geometry,
            });
        }
    }

    log::debug!(
        "Overlay of {} reference and {} scene footprints: {} intersections",
        references.len(),
        scene.len(),
        intersections.len()
    );
    Ok(intersections)
}

/// OGR yields an empty geometry for disjoint inputs; a missing result means the overlay itself failed
fn require_intersection(
    result: Option<Geometry>,
    reference_id: &str,
    reference_subswath: Subswath,
    scene_subswath: Subswath,
) -> SarResult<Geometry> {
    result.ok_or_else(|| {
        SarError::Geometry(format!(
            "Footprint intersection failed for reference {} {} and scene {}",
            reference_id, reference_subswath, scene_subswath
        ))
    })
}

/// Transforms lon/lat geometries into a projected system for area computation
pub struct AreaProjector {
    transform: CoordTransform,
}

impl AreaProjector {
    pub fn new(epsg: u32) -> SarResult<Self> {
        let source = SpatialRef::from_epsg(GEOGRAPHIC_EPSG)?;
        let target = SpatialRef::from_epsg(epsg)?;
        source.set_axis_mapping_strategy(gdal_sys::OSRAxisMappingStrategy::OAMS_TRADITIONAL_GIS_ORDER);
        target.set_axis_mapping_strategy(gdal_sys::OSRAxisMappingStrategy::OAMS_TRADITIONAL_GIS_ORDER);

        let transform = CoordTransform::new(&source, &target)?;
        Ok(Self { transform })
    }

    /// Area in square units of the target system (m² for UTM)
    pub fn area(&self, geometry: &Geometry) -> SarResult<f64> {
        let projected = geometry.transform(&self.transform)?;
        Ok(projected.area())
    }
}
