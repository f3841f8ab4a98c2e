//! Columnar measurement table.

use super::{Measurement, Status};
use serde::Serialize;

/// Column names, in table order.
pub const COLUMNS: [&str; 5] = ["name", "value", "ref_min", "ref_max", "unit"];

/// A cell that may still hold text before numeric coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Already numeric
    Number(f64),
    /// Text to be parsed (may be a sentinel like `"n/a"`)
    Text(String),
    /// No value
    Missing,
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Number(v)
    }
}

impl From<Option<f64>> for RawValue {
    fn from(v: Option<f64>) -> Self {
        v.map_or(RawValue::Missing, RawValue::Number)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

/// Coerce a raw cell to a number, mapping anything unusable to `None`.
///
/// Non-finite numbers and text that does not parse with plain
/// decimal-point syntax are treated as missing.
pub fn coerce_numeric(value: &RawValue) -> Option<f64> {
    let v = match value {
        RawValue::Number(v) => *v,
        RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
        RawValue::Missing => return None,
    };
    v.is_finite().then_some(v)
}

/// One untyped input row for [`TableBuilder`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub name: String,
    pub value: RawValue,
    pub ref_min: RawValue,
    pub ref_max: RawValue,
    pub unit: String,
}

impl RawRow {
    /// Create a raw row from loose cell values.
    pub fn new(
        name: impl Into<String>,
        value: impl Into<RawValue>,
        ref_min: impl Into<RawValue>,
        ref_max: impl Into<RawValue>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ref_min: ref_min.into(),
            ref_max: ref_max.into(),
            unit: unit.into(),
        }
    }
}

impl From<&Measurement> for RawRow {
    fn from(m: &Measurement) -> Self {
        RawRow::new(
            m.name.clone(),
            m.value,
            m.ref_min(),
            m.ref_max(),
            m.unit.clone(),
        )
    }
}

impl From<Measurement> for RawRow {
    fn from(m: Measurement) -> Self {
        let (ref_min, ref_max) = (m.ref_min(), m.ref_max());
        RawRow::new(m.name, m.value, ref_min, ref_max, m.unit)
    }
}

/// Builds a [`MeasurementTable`] from ordered rows.
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    title: String,
    rows: Vec<RawRow>,
}

impl TableBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Append one row.
    pub fn push(&mut self, row: impl Into<RawRow>) -> &mut Self {
        self.rows.push(row.into());
        self
    }

    /// Append rows in order.
    pub fn extend<I, R>(&mut self, rows: I) -> &mut Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RawRow>,
    {
        self.rows.extend(rows.into_iter().map(Into::into));
        self
    }

    /// Coerce every row and produce the table.
    pub fn build(self) -> MeasurementTable {
        let mut table = MeasurementTable::with_capacity(self.rows.len());
        table.title = self.title;
        for row in self.rows {
            table.names.push(row.name);
            table.values.push(coerce_numeric(&row.value));
            table.ref_mins.push(coerce_numeric(&row.ref_min));
            table.ref_maxs.push(coerce_numeric(&row.ref_max));
            table.units.push(row.unit);
        }
        table
    }
}

/// Typed five-column table of measurements plus the document title.
///
/// A zero-row table means "no measurements found" and is not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementTable {
    /// Analysis name taken from the report header (may be empty)
    pub title: String,
    pub names: Vec<String>,
    pub values: Vec<Option<f64>>,
    pub ref_mins: Vec<Option<f64>>,
    pub ref_maxs: Vec<Option<f64>>,
    pub units: Vec<String>,
}

impl MeasurementTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_capacity(rows: usize) -> Self {
        Self {
            title: String::new(),
            names: Vec::with_capacity(rows),
            values: Vec::with_capacity(rows),
            ref_mins: Vec::with_capacity(rows),
            ref_maxs: Vec::with_capacity(rows),
            units: Vec::with_capacity(rows),
        }
    }

    /// Build a table directly from classified measurements.
    pub fn from_measurements(measurements: &[Measurement], title: impl Into<String>) -> Self {
        let mut builder = TableBuilder::new().with_title(title);
        builder.extend(measurements);
        builder.build()
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.names.len()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        COLUMNS.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Get a row view by index.
    pub fn row(&self, index: usize) -> Option<TableRow<'_>> {
        Some(TableRow {
            name: self.names.get(index)?,
            value: *self.values.get(index)?,
            ref_min: *self.ref_mins.get(index)?,
            ref_max: *self.ref_maxs.get(index)?,
            unit: self.units.get(index)?,
        })
    }

    /// Iterate rows in extraction order.
    pub fn rows(&self) -> impl Iterator<Item = TableRow<'_>> + '_ {
        (0..self.row_count()).filter_map(move |i| self.row(i))
    }

    /// Count rows outside their reference interval.
    pub fn abnormal_count(&self) -> usize {
        self.rows().filter(|r| r.status().is_abnormal()).count()
    }
}

/// Borrowed view of one table row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TableRow<'a> {
    pub name: &'a str,
    pub value: Option<f64>,
    pub ref_min: Option<f64>,
    pub ref_max: Option<f64>,
    pub unit: &'a str,
}

impl TableRow<'_> {
    /// Judge the value against the row's interval.
    pub fn status(&self) -> Status {
        Status::evaluate(self.value, self.ref_min, self.ref_max)
    }
}
