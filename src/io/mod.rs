//! I/O modules for locating SAFE archives and reading their metadata and burst geometry

pub mod archive_locator;
pub mod annotation;
pub mod manifest;
pub mod safe_reader;

pub use archive_locator::{list_days, list_products_by_time};
pub use safe_reader::{BurstGeometryReader, MetadataReader, SafeReader};
