//! Burst footprint construction and reference scene search

pub mod footprint;
pub mod reference_search;
pub mod scene_geometry;

// Re-export main types
pub use footprint::{AreaProjector, DissolvedFootprint, FootprintIntersection};
pub use reference_search::{
    reference_overlaps, search_for_reference, ReferenceOverlap, SearchConfig, SensorMatch,
    BURST_AREA_THRESHOLD,
};
pub use scene_geometry::{
    build_scene_geometries, build_scene_geometry, collect_reference_table,
    has_regular_burst_pattern, nominal_burst_pattern, regularize_bursts, BurstDiagnostic,
    SceneOptions,
};
