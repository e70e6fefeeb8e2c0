#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use sarref::io::annotation::GeolocationGridPoint;
use sarref::types::{
    BurstFootprint, BurstPolygon, BurstRecord, FootprintTable, OrbitDirection, Polarization,
    SarError, SarResult, SceneMetadata, Subswath,
};
use sarref::{BurstGeometryReader, MetadataReader};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::ZipWriter;

/// Latitude extent of one synthetic burst in degrees
pub const BURST_HEIGHT_DEG: f64 = 0.2;

/// Southern edge of the synthetic scenes
pub const BASE_LAT: f64 = 50.0;

/// Western edge of IW1; each subswath is one degree wide
pub const BASE_LON: f64 = 2.0;

fn subswath_offset(subswath: Subswath) -> f64 {
    match subswath {
        Subswath::IW1 => 0.0,
        Subswath::IW2 => 1.0,
        Subswath::IW3 => 2.0,
    }
}

/// Burst polygon of a synthetic scene whose southern edge is shifted by `lat_shift`
pub fn burst_polygon(subswath: Subswath, burst: u32, lat_shift: f64, lon_shift: f64) -> BurstPolygon {
    let west = BASE_LON + lon_shift + subswath_offset(subswath);
    let south = BASE_LAT + lat_shift + (burst - 1) as f64 * BURST_HEIGHT_DEG;
    let north = BASE_LAT + lat_shift + burst as f64 * BURST_HEIGHT_DEG;
    BurstPolygon::rectangle(west, south, west + 1.0, north)
}

#[derive(Debug, Clone)]
pub struct SceneFixture {
    pub id: &'static str,
    pub sensor: &'static str,
    pub rel_orbit: u32,
    pub orbit_direction: OrbitDirection,
    pub lat_shift: f64,
    pub lon_shift: f64,
}

impl SceneFixture {
    pub fn new(id: &'static str, sensor: &'static str) -> Self {
        Self {
            id,
            sensor,
            rel_orbit: 37,
            orbit_direction: OrbitDirection::Descending,
            lat_shift: 0.0,
            lon_shift: 0.0,
        }
    }

    pub fn shifted(mut self, lat_shift: f64) -> Self {
        self.lat_shift = lat_shift;
        self
    }

    pub fn moved_east(mut self, lon_shift: f64) -> Self {
        self.lon_shift = lon_shift;
        self
    }

    pub fn on_orbit(mut self, rel_orbit: u32) -> Self {
        self.rel_orbit = rel_orbit;
        self
    }
}

/// Complete 27-burst footprint table of a synthetic scene
pub fn scene_table(fixture: &SceneFixture) -> FootprintTable {
    let start = Utc.with_ymd_and_hms(2021, 8, 21, 5, 41, 28).unwrap();
    let stop = Utc.with_ymd_and_hms(2021, 8, 21, 5, 41, 55).unwrap();
    let name = format!("{}_IW_SLC__1SDV_20210821T054128_20210821T054155_028340_0361A3_{}", fixture.sensor, fixture.id);

    let mut rows = Vec::new();
    for subswath in Subswath::ALL {
        for burst in 1..=9 {
            rows.push(BurstFootprint {
                subswath,
                burst,
                geometry: burst_polygon(subswath, burst, fixture.lat_shift, fixture.lon_shift),
                id: fixture.id.to_string(),
                name: name.clone(),
                path: PathBuf::from(format!("/archive/2021/08/21/{0}/{0}.zip", name)),
                sensor: fixture.sensor.to_string(),
                polarizations: "VV,VH".to_string(),
                start,
                stop,
                mode: "IW".to_string(),
                product: "SLC".to_string(),
                orbit_direction: fixture.orbit_direction.clone(),
                rel_orbit: fixture.rel_orbit,
                regular_burst_pattern: true,
            });
        }
    }
    FootprintTable::new(rows)
}

/// Reference table accumulated from several synthetic scenes
pub fn reference_table(fixtures: &[SceneFixture]) -> FootprintTable {
    let mut table = FootprintTable::default();
    for fixture in fixtures {
        table.append(scene_table(fixture));
    }
    table
}

/// In-memory reader returning canned metadata and bursts
pub struct FakeReader {
    pub metadata: SceneMetadata,
    pub bursts: Vec<BurstRecord>,
    pub fail: bool,
}

impl FakeReader {
    pub fn new(orbit_direction: OrbitDirection, burst_counts: [u32; 3]) -> Self {
        let mut bursts = Vec::new();
        for (subswath, count) in Subswath::ALL.iter().zip(burst_counts) {
            for burst in 1..=count {
                bursts.push(BurstRecord {
                    subswath: *subswath,
                    burst,
                    geometry: burst_polygon(*subswath, burst, 0.0, 0.0),
                });
            }
        }

        Self {
            metadata: SceneMetadata {
                sensor: "S1A".to_string(),
                polarizations: vec![Polarization::VV, Polarization::VH],
                start: Utc.with_ymd_and_hms(2021, 8, 21, 17, 41, 7).unwrap(),
                stop: Utc.with_ymd_and_hms(2021, 8, 21, 17, 41, 34).unwrap(),
                acquisition_mode: "IW".to_string(),
                product_type: "SLC".to_string(),
                orbit_direction,
                rel_orbit: 88,
            },
            bursts,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        let mut reader = Self::new(OrbitDirection::Descending, [9, 9, 9]);
        reader.fail = true;
        reader
    }
}

impl MetadataReader for FakeReader {
    fn read_metadata(&self, path: &Path) -> SarResult<SceneMetadata> {
        if self.fail {
            return Err(SarError::archive_read(path, "corrupt archive"));
        }
        Ok(self.metadata.clone())
    }
}

impl BurstGeometryReader for FakeReader {
    fn read_bursts(&self, path: &Path, subswaths: &[Subswath]) -> SarResult<Vec<BurstRecord>> {
        if self.fail {
            return Err(SarError::archive_read(path, "corrupt archive"));
        }
        Ok(self
            .bursts
            .iter()
            .filter(|record| subswaths.contains(&record.subswath))
            .cloned()
            .collect())
    }
}

/// Create `<month>/<day>/<scene>/<scene>.zip` with empty content
pub fn touch_archive(month_path: &Path, day: &str, scene: &str) -> PathBuf {
    let folder = month_path.join(day).join(scene);
    fs::create_dir_all(&folder).expect("Failed to create scene folder");
    let archive = folder.join(format!("{}.zip", scene));
    File::create(&archive).expect("Failed to create archive");
    archive
}

pub fn manifest_xml(number: &str, pass: &str, rel_orbit: u32) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<xfdu:XFDU xmlns:xfdu="urn:ccsds:schema:xfdu:1">
  <metadataSection>
    <safe:platform>
      <safe:familyName>SENTINEL-1</safe:familyName>
      <safe:number>{number}</safe:number>
      <s1sarl1:mode>IW</s1sarl1:mode>
    </safe:platform>
    <safe:acquisitionPeriod>
      <safe:startTime>2021-08-21T17:41:07.704587</safe:startTime>
      <safe:stopTime>2021-08-21T17:41:34.631484</safe:stopTime>
    </safe:acquisitionPeriod>
    <safe:orbitReference>
      <safe:relativeOrbitNumber type="start">{rel_orbit}</safe:relativeOrbitNumber>
      <safe:relativeOrbitNumber type="stop">{rel_orbit}</safe:relativeOrbitNumber>
      <s1:pass>{pass}</s1:pass>
    </safe:orbitReference>
    <s1sarl1:productType>SLC</s1sarl1:productType>
    <s1sarl1:transmitterReceiverPolarisation>VV</s1sarl1:transmitterReceiverPolarisation>
    <s1sarl1:transmitterReceiverPolarisation>VH</s1sarl1:transmitterReceiverPolarisation>
  </metadataSection>
</xfdu:XFDU>"#
    )
}

/// Geolocation grid with one row per burst boundary and three pixels per row
pub fn geolocation_grid(subswath: Subswath, burst_count: u32, lines_per_burst: u64) -> Vec<GeolocationGridPoint> {
    let west = BASE_LON + subswath_offset(subswath);
    let mut points = Vec::new();
    for row in 0..=burst_count {
        for (col, pixel) in [0u64, 10_000, 20_000].iter().enumerate() {
            points.push(GeolocationGridPoint {
                line: row as u64 * lines_per_burst,
                pixel: *pixel,
                latitude: BASE_LAT + row as f64 * BURST_HEIGHT_DEG,
                longitude: west + col as f64 * 0.5,
            });
        }
    }
    points
}

/// Minimal annotation document with a burst list and geolocation grid
pub fn render_annotation(
    subswath: Subswath,
    lines_per_burst: u64,
    burst_count: usize,
    grid: &[GeolocationGridPoint],
) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<product>\n");
    xml.push_str(&format!("  <adsHeader>\n    <swath>{}</swath>\n  </adsHeader>\n", subswath));
    xml.push_str(&format!(
        "  <swathTiming>\n    <linesPerBurst>{}</linesPerBurst>\n    <burstList count=\"{}\">\n",
        lines_per_burst, burst_count
    ));
    for i in 0..burst_count {
        xml.push_str(&format!(
            "      <burst>\n        <azimuthTime>2021-08-21T17:41:{:02}.000000</azimuthTime>\n      </burst>\n",
            7 + i * 3
        ));
    }
    xml.push_str("    </burstList>\n  </swathTiming>\n");
    xml.push_str(&format!(
        "  <geolocationGrid>\n    <geolocationGridPointList count=\"{}\">\n",
        grid.len()
    ));
    for p in grid {
        xml.push_str(&format!(
            "      <geolocationGridPoint>\n        <line>{}</line>\n        <pixel>{}</pixel>\n        <latitude>{}</latitude>\n        <longitude>{}</longitude>\n      </geolocationGridPoint>\n",
            p.line, p.pixel, p.latitude, p.longitude
        ));
    }
    xml.push_str("    </geolocationGridPointList>\n  </geolocationGrid>\n</product>\n");
    xml
}

/// Write a minimal SAFE zip holding a manifest and one annotation per subswath
pub fn write_safe_archive(path: &Path, manifest: &str, burst_counts: [u32; 3]) {
    let safe = format!(
        "{}.SAFE",
        path.file_stem().and_then(|s| s.to_str()).unwrap_or("product")
    );
    let file = File::create(path).expect("Failed to create archive");
    let mut writer = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Stored);

    writer
        .start_file(format!("{}/manifest.safe", safe), options)
        .expect("Failed to add manifest");
    writer.write_all(manifest.as_bytes()).expect("Failed to write manifest");

    for (subswath, count) in Subswath::ALL.iter().zip(burst_counts) {
        let xml = render_annotation(*subswath, 1500, count as usize, &geolocation_grid(*subswath, count, 1500));
        let token = subswath.file_token();

        writer
            .start_file(format!("{}/annotation/s1a-{}-slc-vv-00{}.xml", safe, token, count), options)
            .expect("Failed to add annotation");
        writer.write_all(xml.as_bytes()).expect("Failed to write annotation");

        writer
            .start_file(
                format!("{}/annotation/calibration/calibration-s1a-{}-slc-vv-001.xml", safe, token),
                options,
            )
            .expect("Failed to add calibration");
        writer.write_all(b"<calibration/>").expect("Failed to write calibration");
    }

    writer.finish().expect("Failed to finish archive");
}
