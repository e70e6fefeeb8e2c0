use crate::types::{OrbitDirection, Polarization, SarError, SarResult, SceneMetadata};
use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

/// Parser for the `manifest.safe` file at the root of a SAFE product
pub struct ManifestParser;

impl ManifestParser {
    /// Extract scene-level acquisition metadata from manifest XML
    pub fn parse_manifest(xml: &str) -> SarResult<SceneMetadata> {
        let family = Self::required_value(xml, "safe:familyName")?;
        let number = Self::required_value(xml, "safe:number")?;
        let sensor = Self::sensor_code(&family, &number)?;

        let polarizations = Self::extract_all(xml, "s1sarl1:transmitterReceiverPolarisation")
            .iter()
            .map(|value| value.parse::<Polarization>())
            .collect::<SarResult<Vec<_>>>()?;
        if polarizations.is_empty() {
            return Err(SarError::XmlParsing(
                "No polarisation found in manifest".to_string(),
            ));
        }

        let start = Self::parse_time(&Self::required_value(xml, "safe:startTime")?)?;
        let stop = Self::parse_time(&Self::required_value(xml, "safe:stopTime")?)?;

        let acquisition_mode = Self::required_value(xml, "s1sarl1:mode")?;
        let product_type = Self::required_value(xml, "s1sarl1:productType")?;
        let orbit_direction = OrbitDirection::parse(&Self::required_value(xml, "s1:pass")?);

        let rel_orbit = Self::relative_orbit(xml)?;

        Ok(SceneMetadata {
            sensor,
            polarizations,
            start,
            stop,
            acquisition_mode,
            product_type,
            orbit_direction,
            rel_orbit,
        })
    }

    /// Mission short code such as `S1A` from `SENTINEL-1` and `A`
    fn sensor_code(family: &str, number: &str) -> SarResult<String> {
        let mission = family
            .trim()
            .strip_prefix("SENTINEL-")
            .ok_or_else(|| SarError::XmlParsing(format!("Unexpected platform family: {}", family)))?;
        Ok(format!("S{}{}", mission, number.trim()))
    }

    /// Relative orbit at the start of the acquisition
    fn relative_orbit(xml: &str) -> SarResult<u32> {
        let pattern = Regex::new(
            r#"<safe:relativeOrbitNumber[^>]*type="start"[^>]*>\s*([0-9]+)\s*</safe:relativeOrbitNumber>"#,
        )
        .map_err(|e| SarError::XmlParsing(e.to_string()))?;

        let value = pattern
            .captures(xml)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| SarError::XmlParsing("No start relative orbit in manifest".to_string()))?;

        value
            .parse::<u32>()
            .map_err(|e| SarError::XmlParsing(format!("Invalid relative orbit '{}': {}", value, e)))
    }

    /// Parse manifest timestamps, which usually come without a zone suffix
    fn parse_time(value: &str) -> SarResult<DateTime<Utc>> {
        let value = value.trim();
        if let Ok(time) = DateTime::parse_from_rfc3339(value) {
            return Ok(time.with_timezone(&Utc));
        }

        let naive = value.trim_end_matches('Z');
        NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|time| time.and_utc())
            .map_err(|e| SarError::XmlParsing(format!("Invalid timestamp '{}': {}", value, e)))
    }

    fn required_value(xml: &str, tag: &str) -> SarResult<String> {
        Self::extract_all(xml, tag)
            .into_iter()
            .next()
            .ok_or_else(|| SarError::XmlParsing(format!("Missing <{}> in manifest", tag)))
    }

    /// Text content of every `<tag ...>text</tag>` occurrence
    fn extract_all(xml: &str, tag: &str) -> Vec<String> {
        let escaped = regex::escape(tag);
        let pattern = format!(r"<{0}(?:\s[^>]*)?>([^<]*)</{0}>", escaped);
        match Regex::new(&pattern) {
            Ok(re) => re
                .captures_iter(xml)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
                .collect(),
            Err(e) => {
                log::warn!("Could not build pattern for <{}>: {}", tag, e);
                Vec::new()
            }
        }
    }
}
