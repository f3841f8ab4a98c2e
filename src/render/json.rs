//! JSON rendering for measurement tables.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{MeasurementTable, Status, TableRow};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serializable report wrapping a table.
#[derive(Debug, Clone, Serialize)]
pub struct Report<'a> {
    pub title: &'a str,
    pub generated_at: DateTime<Utc>,
    pub row_count: usize,
    pub abnormal_count: usize,
    pub measurements: Vec<ReportRow<'a>>,
}

/// One measurement row with its evaluated status.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow<'a> {
    #[serde(flatten)]
    pub row: TableRow<'a>,
    pub status: Status,
}

impl<'a> Report<'a> {
    /// Build a report stamped with the current time.
    pub fn new(table: &'a MeasurementTable) -> Self {
        Self::at(table, Utc::now())
    }

    /// Build a report with an explicit timestamp.
    pub fn at(table: &'a MeasurementTable, generated_at: DateTime<Utc>) -> Self {
        let measurements: Vec<_> = table
            .rows()
            .map(|row| ReportRow {
                status: row.status(),
                row,
            })
            .collect();
        Self {
            title: &table.title,
            generated_at,
            row_count: measurements.len(),
            abnormal_count: measurements.iter().filter(|r| r.status.is_abnormal()).count(),
            measurements,
        }
    }

    /// Serialize the report.
    pub fn render(&self, format: JsonFormat) -> Result<String> {
        let result = match format {
            JsonFormat::Pretty => serde_json::to_string_pretty(self),
            JsonFormat::Compact => serde_json::to_string(self),
        };
        result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
    }
}

/// Convert a table to a JSON report.
pub fn to_json(table: &MeasurementTable, format: JsonFormat) -> Result<String> {
    Report::new(table).render(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Measurement;
    use chrono::TimeZone;

    fn table() -> MeasurementTable {
        MeasurementTable::from_measurements(
            &[
                Measurement::new("Lactic acid", 5.116, "mmol/mol creat.").with_reference(4.5, 9.0),
                Measurement::new("Pyruvic acid", 12.0, "mmol/mol creat.").with_reference(0.5, 6.3),
                Measurement::new("Oxalic acid", 40.0, "mmol/mol creat."),
            ],
            "Organic acids",
        )
    }

    #[test]
    fn test_report_rows_and_counts() {
        let table = table();
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let json = Report::at(&table, ts).render(JsonFormat::Compact).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["title"], "Organic acids");
        assert_eq!(value["generated_at"], "2024-05-01T12:00:00Z");
        assert_eq!(value["row_count"], 3);
        assert_eq!(value["abnormal_count"], 1);

        let rows = value["measurements"].as_array().unwrap();
        assert_eq!(rows[0]["name"], "Lactic acid");
        assert_eq!(rows[0]["value"], 5.116);
        assert_eq!(rows[0]["ref_min"], 4.5);
        assert_eq!(rows[0]["status"], "normal");
        assert_eq!(rows[1]["status"], "high");
        assert!(rows[2]["ref_min"].is_null());
        assert_eq!(rows[2]["status"], "no_reference");
    }

    #[test]
    fn test_to_json_pretty_and_compact() {
        let table = table();
        assert!(to_json(&table, JsonFormat::Pretty).unwrap().contains('\n'));
        assert!(!to_json(&table, JsonFormat::Compact).unwrap().contains('\n'));
    }

    #[test]
    fn test_empty_table_report() {
        let json = to_json(&MeasurementTable::new(), JsonFormat::Compact).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["row_count"], 0);
        assert_eq!(value["measurements"].as_array().unwrap().len(), 0);
    }
}
