//! Gauge geometry shared by the renderers.

use crate::model::ReferenceInterval;

/// Padding added around the interval and the value, as a fraction.
const MARGIN: f64 = 0.2;

/// Axis range for drawing one measurement against its interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub min: f64,
    pub max: f64,
}

impl Scale {
    /// Compute the axis so that both the interval and the value are
    /// visible with some margin.
    pub fn new(value: f64, reference: ReferenceInterval) -> Self {
        let width = reference.width();
        let min = f64::min(
            reference.min - MARGIN * width,
            value - MARGIN * (value - reference.min).abs(),
        );
        let max = f64::max(
            reference.max + MARGIN * width,
            value + MARGIN * (value - reference.max).abs(),
        );
        Self { min, max }
    }

    /// Map a value onto `0..width` cells.
    pub fn position(&self, x: f64, width: usize) -> usize {
        if width == 0 {
            return 0;
        }
        let span = self.max - self.min;
        if span <= 0.0 || !span.is_finite() {
            return width / 2;
        }
        let ratio = ((x - self.min) / span).clamp(0.0, 1.0);
        ((ratio * (width - 1) as f64).round() as usize).min(width - 1)
    }
}

/// Draw a one-line gauge: `-` outside the interval, `=` inside, `*` at
/// the value.
pub fn gauge_bar(value: f64, reference: ReferenceInterval, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let scale = Scale::new(value, reference);
    let a = scale.position(reference.min, width);
    let b = scale.position(reference.max, width);
    let (lo, hi) = (a.min(b), a.max(b));

    let mut cells = vec!['-'; width];
    for cell in &mut cells[lo..=hi] {
        *cell = '=';
    }
    cells[scale.position(value, width)] = '*';

    let mut bar = String::with_capacity(width + 2);
    bar.push('|');
    bar.extend(cells);
    bar.push('|');
    bar
}

/// Break a title into lines of at most `max_words` words.
pub fn split_title(title: &str, max_words: usize) -> String {
    let words: Vec<&str> = title.split_whitespace().collect();
    if max_words == 0 {
        return words.join(" ");
    }
    words
        .chunks(max_words)
        .map(|chunk| chunk.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a number without trailing noise.
pub fn format_number(value: f64) -> String {
    let s = format!("{}", value);
    if s.len() > 12 {
        format!("{:.4}", value)
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_value_inside_interval() {
        let scale = Scale::new(5.0, ReferenceInterval::new(4.0, 9.0));
        assert!((scale.min - 3.0).abs() < 1e-9);
        assert!((scale.max - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_scale_value_above_interval() {
        let scale = Scale::new(20.0, ReferenceInterval::new(4.0, 9.0));
        assert!((scale.min - 3.0).abs() < 1e-9);
        assert!((scale.max - 22.2).abs() < 1e-9);
    }

    #[test]
    fn test_position_degenerate_scale() {
        let scale = Scale { min: 1.0, max: 1.0 };
        assert_eq!(scale.position(1.0, 11), 5);
        assert_eq!(scale.position(1.0, 0), 0);
    }

    #[test]
    fn test_gauge_bar_marks_value_and_interval() {
        let bar = gauge_bar(5.0, ReferenceInterval::new(4.0, 9.0), 15);
        assert_eq!(bar.chars().count(), 17);
        assert!(bar.starts_with('|') && bar.ends_with('|'));
        assert_eq!(bar.matches('*').count(), 1);
        assert!(bar.contains('='));
        assert!(bar.contains('-'));
        assert_eq!(gauge_bar(5.0, ReferenceInterval::new(4.0, 9.0), 0), "");
    }

    #[test]
    fn test_gauge_bar_value_below_interval() {
        let bar = gauge_bar(0.0, ReferenceInterval::new(4.0, 9.0), 20);
        let star = bar.find('*').unwrap();
        let first_eq = bar.find('=').unwrap();
        assert!(star < first_eq);
    }

    #[test]
    fn test_split_title() {
        let title = "one two three four five six seven eight nine ten";
        assert_eq!(
            split_title(title, 8),
            "one two three four five six seven eight\nnine ten"
        );
        assert_eq!(split_title("a  b", 0), "a b");
        assert_eq!(split_title("", 8), "");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(5.116), "5.116");
        assert_eq!(format_number(9.0), "9");
        assert_eq!(format_number(1.0 / 3.0), "0.3333");
    }
}
