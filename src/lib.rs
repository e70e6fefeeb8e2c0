//! sarref: Sentinel-1 burst footprints and coregistration reference search
//!
//! This library locates Sentinel-1 SAFE archives by acquisition date, builds
//! per-burst footprint tables from them, and selects which previously
//! processed scenes can serve as coregistration reference for a new scene.

pub mod types;
pub mod io;
pub mod core;

#[cfg(feature = "python")]
mod python;

// Re-export main types and functions for easier access
pub use types::{
    BurstFootprint, BurstPolygon, BurstRecord, FootprintTable, OrbitDirection, Polarization,
    SarError, SarResult, SceneMetadata, Subswath,
};

pub use io::{list_days, list_products_by_time, BurstGeometryReader, MetadataReader, SafeReader};
pub use crate::core::{build_scene_geometry, search_for_reference, SceneOptions, SearchConfig};
