use crate::types::{SarError, SarResult};
use chrono::{Datelike, NaiveDate};
use glob::glob;
use std::path::{Path, PathBuf};

/// Extension of Sentinel-1 SAFE product archives
pub const ARCHIVE_EXTENSION: &str = "zip";

/// List the scene archives of the given days inside a month directory.
///
/// Archives are expected one scene folder below each day folder, i.e.
/// `<month_path>/<day>/<scene>/<scene>.zip`. Days without any archive
/// contribute nothing. The order of the result is not meaningful.
pub fn list_days<S: AsRef<str>, P: AsRef<Path>>(days: &[S], month_path: P) -> SarResult<Vec<PathBuf>> {
    let month_path = month_path.as_ref();
    let mut archives = Vec::new();

    for day in days {
        let pattern = month_path
            .join(day.as_ref())
            .join("*")
            .join(format!("*.{}", ARCHIVE_EXTENSION));
        let pattern = pattern.to_string_lossy().to_string();
        log::debug!("Searching archives with pattern: {}", pattern);

        let mut found = 0usize;
        for entry in glob(&pattern)? {
            match entry {
                Ok(path) => {
                    archives.push(path);
                    found += 1;
                }
                Err(e) => log::warn!("Skipping unreadable entry: {}", e),
            }
        }
        log::debug!("Day {}: {} archives", day.as_ref(), found);
    }

    Ok(archives)
}

/// List all scene archives acquired between `start` and `end` (inclusive).
///
/// Dates are given as `YYYY/MM/DD`; the archive root is organised as
/// `<root>/<YYYY>/<MM>/<DD>/<scene>/<scene>.zip`.
pub fn list_products_by_time<P: AsRef<Path>>(start: &str, end: &str, root: P) -> SarResult<Vec<PathBuf>> {
    let start_date = parse_archive_date(start)?;
    let end_date = parse_archive_date(end)?;

    if start_date > end_date {
        return Err(SarError::InvalidInput(format!(
            "Start date {} is after end date {}",
            start, end
        )));
    }

    let root = root.as_ref();
    let mut archives = Vec::new();

    for ((year, month), days) in days_by_month(start_date, end_date) {
        let month_path = root.join(format!("{:04}", year)).join(format!("{:02}", month));
        archives.extend(list_days(&days, &month_path)?);
    }

    log::info!(
        "Found {} archives between {} and {} in {}",
        archives.len(),
        start,
        end,
        root.display()
    );
    Ok(archives)
}

fn parse_archive_date(value: &str) -> SarResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y/%m/%d")
        .map_err(|e| SarError::InvalidInput(format!("Invalid date '{}': {}", value, e)))
}

/// Group the inclusive date range into (year, month) -> two-digit day strings
fn days_by_month(start: NaiveDate, end: NaiveDate) -> Vec<((i32, u32), Vec<String>)> {
    let mut months: Vec<((i32, u32), Vec<String>)> = Vec::new();

    for date in start.iter_days().take_while(|date| *date <= end) {
        let key = (date.year(), date.month());
        let day = format!("{:02}", date.day());
        match months.last_mut() {
            Some((last_key, days)) if *last_key == key => days.push(day),
            _ => months.push((key, vec![day])),
        }
    }

    months
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_by_month_crosses_month_boundary() {
        let start = NaiveDate::from_ymd_opt(2017, 6, 28).unwrap();
        let end = NaiveDate::from_ymd_opt(2017, 7, 3).unwrap();
        let months = days_by_month(start, end);

        assert_eq!(months.len(), 2);
        assert_eq!(months[0].0, (2017, 6));
        assert_eq!(months[0].1, vec!["28", "29", "30"]);
        assert_eq!(months[1].0, (2017, 7));
        assert_eq!(months[1].1, vec!["01", "02", "03"]);
    }

    #[test]
    fn test_invalid_dates_are_rejected() {
        assert!(parse_archive_date("2021-04-04").is_err());
        assert!(list_products_by_time("2021/04/07", "2021/04/04", "/nonexistent").is_err());
    }
}
