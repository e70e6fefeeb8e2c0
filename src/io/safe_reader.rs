use crate::io::annotation::AnnotationParser;
use crate::io::manifest::ManifestParser;
use crate::types::{BurstRecord, SarError, SarResult, SceneMetadata, Subswath};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// Source of scene-level acquisition metadata
pub trait MetadataReader {
    fn read_metadata(&self, path: &Path) -> SarResult<SceneMetadata>;
}

/// Source of per-burst footprint polygons
pub trait BurstGeometryReader {
    fn read_bursts(&self, path: &Path, subswaths: &[Subswath]) -> SarResult<Vec<BurstRecord>>;
}

/// Reader for Sentinel-1 SAFE products packed as ZIP archives.
///
/// Metadata comes from `manifest.safe`, burst footprints from the
/// geolocation grid of one annotation file per subswath.
#[derive(Debug, Clone, Copy, Default)]
pub struct SafeReader;

impl SafeReader {
    pub fn new() -> Self {
        Self
    }

    fn open_archive(path: &Path) -> SarResult<ZipArchive<File>> {
        let file = File::open(path).map_err(|e| SarError::archive_read(path, e))?;
        ZipArchive::new(file)
            .map_err(|e| SarError::archive_read(path, format!("Failed to open ZIP: {}", e)))
    }

    /// Names of all entries in the archive
    fn entry_names(archive: &ZipArchive<File>) -> Vec<String> {
        archive.file_names().map(|name| name.to_string()).collect()
    }

    fn read_entry(archive: &mut ZipArchive<File>, path: &Path, name: &str) -> SarResult<String> {
        let mut entry = archive
            .by_name(name)
            .map_err(|e| SarError::archive_read(path, format!("Failed to access {}: {}", name, e)))?;

        let mut content = String::new();
        entry
            .read_to_string(&mut content)
            .map_err(|e| SarError::archive_read(path, format!("Failed to read {}: {}", name, e)))?;
        Ok(content)
    }

    /// Find the manifest, which sits in the `.SAFE` folder of the archive
    fn find_manifest(files: &[String]) -> Option<&String> {
        files
            .iter()
            .filter(|file| file.ends_with("manifest.safe"))
            .min_by_key(|file| file.len())
    }

    /// Find one annotation XML for the subswath, ignoring calibration and noise files
    fn find_annotation(files: &[String], subswath: Subswath) -> Option<&String> {
        let token = format!("-{}-", subswath.file_token());
        let mut candidates: Vec<&String> = files
            .iter()
            .filter(|file| {
                file.ends_with(".xml")
                    && file.contains("annotation/")
                    && !file.contains("calibration/")
                    && !file.contains("rfi/")
                    && Path::new(file.as_str())
                        .file_name()
                        .and_then(|name| name.to_str())
                        .map(|name| name.contains(&token))
                        .unwrap_or(false)
            })
            .collect();
        candidates.sort();
        candidates.into_iter().next()
    }
}

impl MetadataReader for SafeReader {
    fn read_metadata(&self, path: &Path) -> SarResult<SceneMetadata> {
        log::debug!("Reading manifest of {}", path.display());
        let mut archive = Self::open_archive(path)?;
        let files = Self::entry_names(&archive);

        let manifest = Self::find_manifest(&files)
            .ok_or_else(|| SarError::archive_read(path, "No manifest.safe in archive"))?
            .clone();

        let xml = Self::read_entry(&mut archive, path, &manifest)?;
        ManifestParser::parse_manifest(&xml).map_err(|e| SarError::archive_read(path, e))
    }
}

impl BurstGeometryReader for SafeReader {
    fn read_bursts(&self, path: &Path, subswaths: &[Subswath]) -> SarResult<Vec<BurstRecord>> {
        let mut archive = Self::open_archive(path)?;
        let files = Self::entry_names(&archive);
        let mut bursts = Vec::new();

        for &subswath in subswaths {
            let annotation_file = Self::find_annotation(&files, subswath)
                .ok_or_else(|| {
                    SarError::archive_read(path, format!("No annotation found for {}", subswath))
                })?
                .clone();

            let xml = Self::read_entry(&mut archive, path, &annotation_file)?;
            let annotation = AnnotationParser::parse_annotation(&xml)
                .map_err(|e| SarError::archive_read(path, e))?;
            let records = AnnotationParser::extract_burst_polygons(&annotation)
                .map_err(|e| SarError::archive_read(path, e))?;

            if records.iter().any(|record| record.subswath != subswath) {
                return Err(SarError::archive_read(
                    path,
                    format!("{} declares a different swath", annotation_file),
                ));
            }
            bursts.extend(records);
        }

        Ok(bursts)
    }
}
