use crate::types::{BurstPolygon, BurstRecord, SarError, SarResult, Subswath};
use quick_xml::de::from_str;
use serde::Deserialize;

/// Subset of a Sentinel-1 product annotation needed for burst footprints.
/// This represents the root <product> element directly
#[derive(Debug, Deserialize)]
pub struct AnnotationRoot {
    #[serde(rename = "adsHeader")]
    pub ads_header: AdsHeader,
    #[serde(rename = "swathTiming")]
    pub swath_timing: SwathTiming,
    #[serde(rename = "geolocationGrid")]
    pub geolocation_grid: GeolocationGrid,
}

#[derive(Debug, Deserialize)]
pub struct AdsHeader {
    #[serde(rename = "swath")]
    pub swath: String,
}

#[derive(Debug, Deserialize)]
pub struct SwathTiming {
    #[serde(rename = "linesPerBurst", default)]
    pub lines_per_burst: Option<u64>,
    #[serde(rename = "burstList")]
    pub burst_list: BurstList,
}

#[derive(Debug, Deserialize)]
pub struct BurstList {
    #[serde(rename = "burst", default)]
    pub bursts: Vec<Burst>,
}

/// Only the number of bursts is used; their content is ignored
#[derive(Debug, Deserialize)]
pub struct Burst {}

#[derive(Debug, Deserialize)]
pub struct GeolocationGrid {
    #[serde(rename = "geolocationGridPointList")]
    pub point_list: GeolocationGridPointList,
}

#[derive(Debug, Deserialize)]
pub struct GeolocationGridPointList {
    #[serde(rename = "geolocationGridPoint", default)]
    pub points: Vec<GeolocationGridPoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeolocationGridPoint {
    pub line: u64,
    pub pixel: u64,
    pub latitude: f64,
    pub longitude: f64,
}

/// Parser for Sentinel-1 annotation XML files
pub struct AnnotationParser;

impl AnnotationParser {
    /// Parse the parts of an annotation XML used for footprints
    pub fn parse_annotation(xml_content: &str) -> SarResult<AnnotationRoot> {
        from_str::<AnnotationRoot>(xml_content)
            .map_err(|e| SarError::XmlParsing(format!("Failed to parse annotation XML: {}", e)))
    }

    /// Build one polygon per burst from the geolocation grid.
    ///
    /// Grid rows are sorted by line; burst `k` (1-based) spans grid rows
    /// `k-1` and `k`. The ring runs along the upper row by ascending pixel
    /// and back along the lower row by descending pixel.
    pub fn extract_burst_polygons(annotation: &AnnotationRoot) -> SarResult<Vec<BurstRecord>> {
        let subswath: Subswath = annotation.ads_header.swath.parse()?;
        let points = &annotation.geolocation_grid.point_list.points;

        let mut lines: Vec<u64> = points.iter().map(|p| p.line).collect();
        lines.sort_unstable();
        lines.dedup();

        let burst_count = annotation.swath_timing.burst_list.bursts.len();
        if lines.len() < 2 {
            return Err(SarError::XmlParsing(format!(
                "Geolocation grid of {} has {} lines, need at least 2",
                subswath,
                lines.len()
            )));
        }

        let available = lines.len() - 1;
        if available < burst_count {
            log::warn!(
                "{}: geolocation grid covers {} of {} bursts",
                subswath,
                available,
                burst_count
            );
        }

        let mut bursts = Vec::with_capacity(burst_count.min(available));
        for (index, bounds) in lines.windows(2).take(burst_count).enumerate() {
            let upper = Self::grid_row(points, bounds[0]);
            let lower = Self::grid_row(points, bounds[1]);

            let mut ring: Vec<[f64; 2]> = upper.iter().map(|p| [p.longitude, p.latitude]).collect();
            ring.extend(lower.iter().rev().map(|p| [p.longitude, p.latitude]));

            if ring.len() < 3 {
                return Err(SarError::XmlParsing(format!(
                    "{} burst {} has a degenerate footprint",
                    subswath,
                    index + 1
                )));
            }

            bursts.push(BurstRecord {
                subswath,
                burst: (index + 1) as u32,
                geometry: BurstPolygon::new(ring),
            });
        }

        log::debug!(
            "{}: {} bursts from {} grid points ({:?} lines per burst)",
            subswath,
            bursts.len(),
            points.len(),
            annotation.swath_timing.lines_per_burst
        );
        Ok(bursts)
    }

    /// Grid points of one line, sorted by pixel
    fn grid_row(points: &[GeolocationGridPoint], line: u64) -> Vec<GeolocationGridPoint> {
        let mut row: Vec<GeolocationGridPoint> =
            points.iter().filter(|p| p.line == line).cloned().collect();
        row.sort_by_key(|p| p.pixel);
        row
    }
}
