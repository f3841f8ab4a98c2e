//! Measurement model types.
//!
//! This module defines the records produced by line classification and
//! the columnar table that downstream renderers consume. A [`Measurement`]
//! is created once per matching line and never mutated; the
//! [`MeasurementTable`] only changes numeric typing.

mod measurement;
mod table;

pub use measurement::{LineMatch, LineShape, Measurement, ReferenceInterval, Status};
pub use table::{coerce_numeric, MeasurementTable, RawRow, RawValue, TableBuilder, TableRow, COLUMNS};
