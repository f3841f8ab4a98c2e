//! Line classification.
//!
//! A [`LineClassifier`] holds an ordered list of [`Recognizer`]s. Each line
//! is offered to them in order and the first one that matches decides the
//! line's shape; later recognizers are never consulted for that line. Lines
//! nobody recognizes are dropped without error.
//!
//! The default cascade, built from a [`Grammar`], is:
//!
//! 1. [`RangedRecognizer`]: `<name> <value> [<unit>] [<min>] - [<max>]`
//! 2. [`NotDetectedRecognizer`]: lines carrying the not-detected marker
//! 3. [`NoReferenceRecognizer`]: `<name> <value> <unit> <no-reference marker>`
//! 4. [`RatioRecognizer`]: `<name> <value> <min> - <max>` without a unit

use log::trace;
use regex::{Captures, Regex};
use std::fmt;

use super::Grammar;
use crate::error::{Error, Result};
use crate::model::{LineMatch, LineShape, Measurement, ReferenceInterval};

/// Characters allowed in an analyte name: Latin and Cyrillic letters,
/// digits, hyphens, parentheses, commas and whitespace.
const NAME_CHARS: &str = r"A-Za-zА-Яа-яЁё0-9\-(),\s";

/// Plain decimal-point number. Deliberately loose: a capture like `1.2.3`
/// is reported as a classification error rather than silently skipped.
const NUMBER: &str = r"[0-9.]+";

/// One entry in the classification cascade.
pub trait Recognizer: Send + Sync {
    /// Shape this recognizer produces.
    fn shape(&self) -> LineShape;

    /// Try to recognize a line.
    ///
    /// Returns `Ok(None)` when the line does not have this shape, and an
    /// error when it does but a captured field cannot be converted.
    fn recognize(&self, line: &str) -> Result<Option<LineMatch>>;
}

/// Ordered cascade of recognizers.
pub struct LineClassifier {
    recognizers: Vec<Box<dyn Recognizer>>,
}

impl LineClassifier {
    /// Build the standard four-step cascade for a grammar.
    pub fn new(grammar: &Grammar) -> Result<Self> {
        grammar.validate()?;
        Ok(Self::from_recognizers(vec![
            Box::new(RangedRecognizer::new(grammar)?),
            Box::new(NotDetectedRecognizer::new(grammar)),
            Box::new(NoReferenceRecognizer::new(grammar)?),
            Box::new(RatioRecognizer::new()?),
        ]))
    }

    /// Build a cascade from explicit recognizers, in priority order.
    pub fn from_recognizers(recognizers: Vec<Box<dyn Recognizer>>) -> Self {
        Self { recognizers }
    }

    /// Append a recognizer with the lowest priority.
    pub fn push(&mut self, recognizer: Box<dyn Recognizer>) {
        self.recognizers.push(recognizer);
    }

    /// Shapes in the order they are tried.
    pub fn shapes(&self) -> Vec<LineShape> {
        self.recognizers.iter().map(|r| r.shape()).collect()
    }

    /// Classify a line, keeping the shape-specific result.
    pub fn classify_match(&self, line: &str) -> Result<Option<LineMatch>> {
        for recognizer in &self.recognizers {
            if let Some(found) = recognizer.recognize(line)? {
                trace!("{} line: {:?}", found.shape(), line);
                return Ok(Some(found));
            }
        }
        trace!("dropped line: {:?}", line);
        Ok(None)
    }

    /// Classify a line into a measurement.
    pub fn classify(&self, line: &str) -> Result<Option<Measurement>> {
        Ok(self.classify_match(line)?.map(LineMatch::into_measurement))
    }
}

impl fmt::Debug for LineClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineClassifier")
            .field("shapes", &self.shapes())
            .finish()
    }
}

/// `<name> <value> [<unit>] [<min>] - [<max>]`.
///
/// The dash is required; the interval is kept only when both bounds are
/// present.
pub struct RangedRecognizer {
    pattern: Regex,
}

impl RangedRecognizer {
    pub fn new(grammar: &Grammar) -> Result<Self> {
        let pattern = Regex::new(&format!(
            r"^(?P<name>[{name}]+?)\s+(?P<value>{num})\s*(?P<unit>{units})?\s*(?P<min>{num})?\s*-\s*(?P<max>{num})?",
            name = NAME_CHARS,
            num = NUMBER,
            units = unit_alternation(grammar),
        ))?;
        Ok(Self { pattern })
    }
}

impl Recognizer for RangedRecognizer {
    fn shape(&self) -> LineShape {
        LineShape::Ranged
    }

    fn recognize(&self, line: &str) -> Result<Option<LineMatch>> {
        let Some(caps) = self.pattern.captures(line) else {
            return Ok(None);
        };
        let shape = self.shape();
        let reference = match (caps.name("min"), caps.name("max")) {
            (Some(min), Some(max)) => Some(ReferenceInterval::new(
                parse_number(min.as_str(), "ref_min", shape, line)?,
                parse_number(max.as_str(), "ref_max", shape, line)?,
            )),
            _ => None,
        };
        Ok(Some(LineMatch::Ranged {
            name: capture_name(&caps),
            value: capture_number(&caps, "value", shape, line)?,
            unit: caps.name("unit").map(|m| m.as_str().to_string()),
            reference,
        }))
    }
}

/// Lines containing the not-detected marker.
///
/// The line is split at the first occurrence of the split token (`"0.00"`
/// in known reports); the name is everything before it and the unit is the
/// first word after it. A name or unit that itself contains the split
/// token will be cut in the wrong place.
pub struct NotDetectedRecognizer {
    marker: String,
    split: String,
}

impl NotDetectedRecognizer {
    pub fn new(grammar: &Grammar) -> Self {
        Self {
            marker: grammar.not_detected.clone(),
            split: grammar.not_detected_split.clone(),
        }
    }
}

impl Recognizer for NotDetectedRecognizer {
    fn shape(&self) -> LineShape {
        LineShape::NotDetected
    }

    fn recognize(&self, line: &str) -> Result<Option<LineMatch>> {
        if !line.contains(&self.marker) {
            return Ok(None);
        }
        let mut parts = line.split(self.split.as_str());
        let name = parts.next().unwrap_or_default();
        let after = parts
            .next()
            .ok_or_else(|| Error::classification(self.shape(), "split", &self.split, line))?;
        let unit = after
            .split_whitespace()
            .next()
            .ok_or_else(|| Error::classification(self.shape(), "unit", after, line))?;

        Ok(Some(LineMatch::NotDetected {
            name: name.trim().to_string(),
            unit: unit.to_string(),
        }))
    }
}

/// `<name> <value> <unit> <no-reference marker>`.
pub struct NoReferenceRecognizer {
    pattern: Regex,
}

impl NoReferenceRecognizer {
    pub fn new(grammar: &Grammar) -> Result<Self> {
        let pattern = Regex::new(&format!(
            r"^(?P<name>[{name}]+?)\s+(?P<value>{num})\s+(?P<unit>{units})\s+{marker}",
            name = NAME_CHARS,
            num = NUMBER,
            units = unit_alternation(grammar),
            marker = regex::escape(&grammar.no_reference),
        ))?;
        Ok(Self { pattern })
    }
}

impl Recognizer for NoReferenceRecognizer {
    fn shape(&self) -> LineShape {
        LineShape::NoReference
    }

    fn recognize(&self, line: &str) -> Result<Option<LineMatch>> {
        let Some(caps) = self.pattern.captures(line) else {
            return Ok(None);
        };
        Ok(Some(LineMatch::NoReference {
            name: capture_name(&caps),
            value: capture_number(&caps, "value", self.shape(), line)?,
            unit: caps["unit"].to_string(),
        }))
    }
}

/// `<name> <value> <min> - <max>` with no unit; names may contain `/`.
pub struct RatioRecognizer {
    pattern: Regex,
}

impl RatioRecognizer {
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(&format!(
            r"^(?P<name>[{name}/]+?)\s+(?P<value>{num})\s+(?P<min>{num})\s*-\s*(?P<max>{num})",
            name = NAME_CHARS,
            num = NUMBER,
        ))?;
        Ok(Self { pattern })
    }
}

impl Recognizer for RatioRecognizer {
    fn shape(&self) -> LineShape {
        LineShape::Ratio
    }

    fn recognize(&self, line: &str) -> Result<Option<LineMatch>> {
        let Some(caps) = self.pattern.captures(line) else {
            return Ok(None);
        };
        let shape = self.shape();
        Ok(Some(LineMatch::Ratio {
            name: capture_name(&caps),
            value: capture_number(&caps, "value", shape, line)?,
            reference: ReferenceInterval::new(
                capture_number(&caps, "min", shape, line)?,
                capture_number(&caps, "max", shape, line)?,
            ),
        }))
    }
}

/// Regex alternation of the grammar's units, in vocabulary order.
fn unit_alternation(grammar: &Grammar) -> String {
    grammar
        .units
        .iter()
        .map(|u| regex::escape(u))
        .collect::<Vec<_>>()
        .join("|")
}

fn capture_name(caps: &Captures<'_>) -> String {
    caps["name"].trim().to_string()
}

fn capture_number(
    caps: &Captures<'_>,
    group: &'static str,
    shape: LineShape,
    line: &str,
) -> Result<f64> {
    let raw = caps.name(group).map(|m| m.as_str()).unwrap_or_default();
    parse_number(raw, group, shape, line)
}

fn parse_number(raw: &str, field: &'static str, shape: LineShape, line: &str) -> Result<f64> {
    raw.parse::<f64>()
        .map_err(|_| Error::classification(shape, field, raw, line))
}
