//! Structured Batch Construction

use crate::encoder::LabelEncoding;
use crate::FrameError;
use chrono::{Datelike, NaiveDateTime, Timelike};
use report_schema::RawRecord;
use tracing::debug;

/// Timestamp layout of the incident dataset
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One micro-batch after encoding and calendar derivation, column-major
#[derive(Debug, Clone)]
pub struct ReportFrame {
    /// Longitude column
    pub x: Vec<f64>,
    /// Latitude column
    pub y: Vec<f64>,
    /// Encoded crime category (the label column)
    pub category_code: Vec<usize>,
    /// Encoded day of week
    pub day_of_week_code: Vec<usize>,
    /// Encoded police district
    pub district_code: Vec<usize>,
    /// Hour of day, 0-23
    pub hour: Vec<u32>,
    /// Month, 1-12
    pub month: Vec<u32>,
    /// Calendar year
    pub year: Vec<i32>,
    /// Encoding used for the category column
    pub category_encoding: LabelEncoding,
    /// Encoding used for the day-of-week column
    pub day_of_week_encoding: LabelEncoding,
    /// Encoding used for the district column
    pub district_encoding: LabelEncoding,
}

impl ReportFrame {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// True when the frame has no rows (never produced by `build_frame`)
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Build a structured frame from one non-empty micro-batch.
///
/// Encodings are fitted on this batch alone; a single unparseable timestamp
/// fails the whole batch.
pub fn build_frame(records: &[RawRecord]) -> Result<ReportFrame, FrameError> {
    if records.is_empty() {
        return Err(FrameError::EmptyBatch);
    }

    let categories: Vec<&str> = records.iter().map(|r| r.category.as_str()).collect();
    let days: Vec<&str> = records.iter().map(|r| r.day_of_week.as_str()).collect();
    let districts: Vec<&str> = records.iter().map(|r| r.district.as_str()).collect();

    let (category_encoding, category_code) = LabelEncoding::fit_transform(&categories);
    let (day_of_week_encoding, day_of_week_code) = LabelEncoding::fit_transform(&days);
    let (district_encoding, district_code) = LabelEncoding::fit_transform(&districts);

    let mut hour = Vec::with_capacity(records.len());
    let mut month = Vec::with_capacity(records.len());
    let mut year = Vec::with_capacity(records.len());
    for (row, record) in records.iter().enumerate() {
        let parsed = NaiveDateTime::parse_from_str(&record.timestamp, TIMESTAMP_FORMAT).map_err(
            |source| FrameError::Timestamp {
                row,
                value: record.timestamp.clone(),
                source,
            },
        )?;
        hour.push(parsed.hour());
        month.push(parsed.month());
        year.push(parsed.year());
    }

    debug!(
        rows = records.len(),
        categories = category_encoding.len(),
        days = day_of_week_encoding.len(),
        districts = district_encoding.len(),
        "built report frame"
    );

    Ok(ReportFrame {
        x: records.iter().map(|r| r.x).collect(),
        y: records.iter().map(|r| r.y).collect(),
        category_code,
        day_of_week_code,
        district_code,
        hour,
        month,
        year,
        category_encoding,
        day_of_week_encoding,
        district_encoding,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ts: &str, category: &str, day: &str, district: &str) -> RawRecord {
        RawRecord {
            timestamp: ts.to_string(),
            category: category.to_string(),
            day_of_week: day.to_string(),
            district: district.to_string(),
            x: -122.42,
            y: 37.77,
        }
    }

    #[test]
    fn test_frame_shape() {
        let records = vec![
            record("2015-05-13 23:53:00", "WARRANTS", "Wednesday", "NORTHERN"),
            record("2015-05-13 23:33:00", "ASSAULT", "Wednesday", "SOUTHERN"),
            record("2015-05-14 00:01:00", "WARRANTS", "Thursday", "NORTHERN"),
        ];
        let frame = build_frame(&records).unwrap();
        assert_eq!(frame.len(), 3);
        assert_eq!(frame.category_code.len(), 3);
        assert_eq!(frame.hour.len(), 3);
        assert_eq!(frame.year.len(), 3);
    }

    #[test]
    fn test_calendar_features() {
        let records = vec![record(
            "2014-12-31 23:15:00",
            "THEFT",
            "Wednesday",
            "MISSION",
        )];
        let frame = build_frame(&records).unwrap();
        assert_eq!(frame.hour, vec![23]);
        assert_eq!(frame.month, vec![12]);
        assert_eq!(frame.year, vec![2014]);
    }

    #[test]
    fn test_category_codes_are_frequency_ordered() {
        let records = vec![
            record("2015-05-13 10:00:00", "THEFT", "Monday", "MISSION"),
            record("2015-05-13 11:00:00", "THEFT", "Monday", "MISSION"),
            record("2015-05-13 12:00:00", "ASSAULT", "Monday", "MISSION"),
        ];
        let frame = build_frame(&records).unwrap();
        assert_eq!(frame.category_encoding.encode("THEFT"), Some(0));
        assert_eq!(frame.category_code, vec![0, 0, 1]);
    }

    #[test]
    fn test_bad_timestamp_fails_whole_batch() {
        let records = vec![
            record("2015-05-13 10:00:00", "THEFT", "Monday", "MISSION"),
            record("13/05/2015", "ASSAULT", "Monday", "MISSION"),
        ];
        let err = build_frame(&records).unwrap_err();
        assert!(matches!(err, FrameError::Timestamp { row: 1, .. }));
    }

    #[test]
    fn test_empty_batch_rejected() {
        let err = build_frame(&[]).unwrap_err();
        assert!(matches!(err, FrameError::EmptyBatch));
    }
}
