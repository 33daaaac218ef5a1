//! Schema Contract
//!
//! Fixed at process start: names the JSON keys carrying each role.

use serde::{Deserialize, Serialize};

/// Column schema for incoming crime reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSchema {
    /// Timestamp column (incident date/time string)
    pub timestamp: String,
    /// Label column: crime category (also the first categorical field)
    pub category: String,
    /// Categorical field: day of week
    pub day_of_week: String,
    /// Categorical field: police district
    pub district: String,
    /// Numeric pair: longitude
    pub x: String,
    /// Numeric pair: latitude
    pub y: String,
}

impl Default for ReportSchema {
    fn default() -> Self {
        // San Francisco incident dataset column names
        Self {
            timestamp: "Dates".to_string(),
            category: "Category".to_string(),
            day_of_week: "DayOfWeek".to_string(),
            district: "PdDistrict".to_string(),
            x: "X".to_string(),
            y: "Y".to_string(),
        }
    }
}

impl ReportSchema {
    /// Ordered list of all required column names
    pub fn columns(&self) -> [&str; 6] {
        [
            &self.timestamp,
            &self.category,
            &self.day_of_week,
            &self.district,
            &self.x,
            &self.y,
        ]
    }

    /// The three categorical column names
    pub fn categorical_columns(&self) -> [&str; 3] {
        [&self.category, &self.day_of_week, &self.district]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema_columns() {
        let schema = ReportSchema::default();
        assert_eq!(schema.columns().len(), 6);
        assert_eq!(schema.timestamp, "Dates");
        assert_eq!(schema.category, "Category");
    }

    #[test]
    fn test_schema_roundtrip() {
        let schema = ReportSchema::default();
        let json = serde_json::to_string(&schema).unwrap();
        let back: ReportSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(back.district, schema.district);
    }

    #[test]
    fn test_categorical_columns() {
        let schema = ReportSchema::default();
        assert_eq!(
            schema.categorical_columns(),
            ["Category", "DayOfWeek", "PdDistrict"]
        );
    }
}
