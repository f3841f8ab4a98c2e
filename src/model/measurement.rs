//! Measurement types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A clinically normal `[min, max]` band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceInterval {
    /// Lower bound
    pub min: f64,
    /// Upper bound
    pub max: f64,
}

impl ReferenceInterval {
    /// Create an interval from its bounds.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// The `[0, 0]` interval reports use for "not detected".
    pub fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Check whether both bounds are zero.
    pub fn is_zero(&self) -> bool {
        self.min == 0.0 && self.max == 0.0
    }

    /// Width of the band.
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Check whether a value lies inside the band (inclusive).
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// One named, valued lab result.
///
/// The reference interval is either fully present or absent; there is no
/// way to carry only one bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Trimmed analyte name, may contain parenthetical qualifiers
    pub name: String,

    /// Numeric reading
    pub value: f64,

    /// Reference interval, if the report defines one
    pub reference: Option<ReferenceInterval>,

    /// Unit of measure (empty for dimensionless ratios)
    pub unit: String,
}

impl Measurement {
    /// Create a measurement without a reference interval.
    pub fn new(name: impl Into<String>, value: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            reference: None,
            unit: unit.into(),
        }
    }

    /// Attach a reference interval.
    pub fn with_reference(mut self, min: f64, max: f64) -> Self {
        self.reference = Some(ReferenceInterval::new(min, max));
        self
    }

    /// Lower reference bound.
    pub fn ref_min(&self) -> Option<f64> {
        self.reference.map(|r| r.min)
    }

    /// Upper reference bound.
    pub fn ref_max(&self) -> Option<f64> {
        self.reference.map(|r| r.max)
    }

    /// Whether the report defines a reference interval.
    pub fn has_reference(&self) -> bool {
        self.reference.is_some()
    }

    /// Whether this is a "not detected" reading.
    pub fn is_not_detected(&self) -> bool {
        self.value == 0.0 && self.reference.is_some_and(|r| r.is_zero())
    }

    /// Judge the value against the reference interval.
    pub fn status(&self) -> Status {
        Status::evaluate(Some(self.value), self.ref_min(), self.ref_max())
    }
}

/// The line shapes the classifier recognizes, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineShape {
    /// `<name> <value> [<unit>] <min> - <max>`
    Ranged,
    /// Line carrying the "not detected" marker
    NotDetected,
    /// `<name> <value> <unit> <no reference marker>`
    NoReference,
    /// `<name> <value> <min> - <max>`, unitless
    Ratio,
}

impl LineShape {
    /// Short name used in logs and CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            LineShape::Ranged => "ranged",
            LineShape::NotDetected => "not-detected",
            LineShape::NoReference => "no-reference",
            LineShape::Ratio => "ratio",
        }
    }
}

impl fmt::Display for LineShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed result of classifying one line, one variant per line shape.
#[derive(Debug, Clone, PartialEq)]
pub enum LineMatch {
    /// Value with optional unit and optional interval
    Ranged {
        name: String,
        value: f64,
        unit: Option<String>,
        reference: Option<ReferenceInterval>,
    },
    /// Analyte below detection limit
    NotDetected { name: String, unit: String },
    /// Value whose report explicitly states there is no interval
    NoReference {
        name: String,
        value: f64,
        unit: String,
    },
    /// Dimensionless ratio with an interval
    Ratio {
        name: String,
        value: f64,
        reference: ReferenceInterval,
    },
}

impl LineMatch {
    /// Which recognizer produced this match.
    pub fn shape(&self) -> LineShape {
        match self {
            LineMatch::Ranged { .. } => LineShape::Ranged,
            LineMatch::NotDetected { .. } => LineShape::NotDetected,
            LineMatch::NoReference { .. } => LineShape::NoReference,
            LineMatch::Ratio { .. } => LineShape::Ratio,
        }
    }

    /// Flatten into the common measurement record.
    pub fn into_measurement(self) -> Measurement {
        match self {
            LineMatch::Ranged {
                name,
                value,
                unit,
                reference,
            } => Measurement {
                name,
                value,
                reference,
                unit: unit.unwrap_or_default(),
            },
            LineMatch::NotDetected { name, unit } => Measurement {
                name,
                value: 0.0,
                reference: Some(ReferenceInterval::zero()),
                unit,
            },
            LineMatch::NoReference { name, value, unit } => Measurement::new(name, value, unit),
            LineMatch::Ratio {
                name,
                value,
                reference,
            } => Measurement {
                name,
                value,
                reference: Some(reference),
                unit: String::new(),
            },
        }
    }
}

impl From<LineMatch> for Measurement {
    fn from(m: LineMatch) -> Self {
        m.into_measurement()
    }
}

/// How a reading compares to its reference interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Value itself is missing
    Missing,
    /// No interval is defined
    NoReference,
    /// Interval is `[0, 0]`
    NotDetected,
    /// Below the lower bound
    Low,
    /// Inside the interval
    Normal,
    /// Above the upper bound
    High,
}

impl Status {
    /// Evaluate a table row. A row missing either bound counts as having
    /// no reference.
    pub fn evaluate(value: Option<f64>, ref_min: Option<f64>, ref_max: Option<f64>) -> Self {
        let Some(value) = value else {
            return Status::Missing;
        };
        let (Some(min), Some(max)) = (ref_min, ref_max) else {
            return Status::NoReference;
        };
        if min == 0.0 && max == 0.0 {
            Status::NotDetected
        } else if value < min {
            Status::Low
        } else if value > max {
            Status::High
        } else {
            Status::Normal
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Missing => "missing",
            Status::NoReference => "reference values not defined",
            Status::NotDetected => "not detected",
            Status::Low => "low",
            Status::Normal => "normal",
            Status::High => "high",
        }
    }

    /// Whether the reading falls outside its interval.
    pub fn is_abnormal(&self) -> bool {
        matches!(self, Status::Low | Status::High)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurement_reference_pairing() {
        let m = Measurement::new("Glucose", 5.4, "mmol/l");
        assert_eq!(m.ref_min(), None);
        assert_eq!(m.ref_max(), None);
        assert!(!m.has_reference());

        let m = m.with_reference(3.9, 6.1);
        assert_eq!(m.ref_min(), Some(3.9));
        assert_eq!(m.ref_max(), Some(6.1));
    }

    #[test]
    fn test_not_detected_match_flattens_to_zero_interval() {
        let m = LineMatch::NotDetected {
            name: "Benzoic acid".to_string(),
            unit: "mmol/mol".to_string(),
        }
        .into_measurement();

        assert!(m.is_not_detected());
        assert_eq!(m.value, 0.0);
        assert_eq!(m.reference, Some(ReferenceInterval::zero()));
        assert_eq!(m.status(), Status::NotDetected);
    }

    #[test]
    fn test_ranged_without_unit_gets_empty_unit() {
        let m = LineMatch::Ranged {
            name: "Index".to_string(),
            value: 1.0,
            unit: None,
            reference: None,
        }
        .into_measurement();
        assert_eq!(m.unit, "");
    }

    #[test]
    fn test_status_evaluate() {
        assert_eq!(Status::evaluate(None, Some(1.0), Some(2.0)), Status::Missing);
        assert_eq!(Status::evaluate(Some(1.0), None, None), Status::NoReference);
        assert_eq!(Status::evaluate(Some(1.0), Some(1.0), None), Status::NoReference);
        assert_eq!(Status::evaluate(Some(0.0), Some(0.0), Some(0.0)), Status::NotDetected);
        assert_eq!(Status::evaluate(Some(0.5), Some(1.0), Some(2.0)), Status::Low);
        assert_eq!(Status::evaluate(Some(2.0), Some(1.0), Some(2.0)), Status::Normal);
        assert_eq!(Status::evaluate(Some(2.5), Some(1.0), Some(2.0)), Status::High);
        assert!(Status::High.is_abnormal());
        assert!(!Status::NotDetected.is_abnormal());
    }

    #[test]
    fn test_shape_display() {
        assert_eq!(LineShape::NotDetected.to_string(), "not-detected");
        assert_eq!(
            LineMatch::Ratio {
                name: "A/B".to_string(),
                value: 1.0,
                reference: ReferenceInterval::new(0.5, 1.5),
            }
            .shape(),
            LineShape::Ratio
        );
    }
}
