//! Plain text rendering with one gauge line per measurement.

use crate::error::Result;
use crate::model::{MeasurementTable, ReferenceInterval, Status, TableRow};

use super::gauge::{format_number, gauge_bar, split_title};
use super::RenderOptions;

/// Convert a table to plain text.
pub fn to_text(table: &MeasurementTable, options: &RenderOptions) -> Result<String> {
    let mut output = String::new();

    if options.include_title && !table.title.is_empty() {
        output.push_str(&split_title(&table.title, options.max_words_per_title_line));
        output.push_str("\n\n");
    }

    if table.is_empty() {
        output.push_str("No measurements found.");
        return Ok(output);
    }

    let name_width = table.rows().map(|r| r.name.chars().count()).max().unwrap_or(0);
    let value_width = table
        .rows()
        .map(|r| value_cell(&r).chars().count())
        .max()
        .unwrap_or(0);

    for row in table.rows() {
        let mut line = format!(
            "{:<nw$}  {:>vw$}",
            row.name,
            value_cell(&row),
            nw = name_width,
            vw = value_width
        );
        let detail = gauge_cell(&row, options);
        if !detail.is_empty() {
            line.push_str("  ");
            line.push_str(&detail);
        }
        output.push_str(line.trim_end());
        output.push('\n');
    }

    Ok(output.trim_end().to_string())
}

fn value_cell(row: &TableRow<'_>) -> String {
    match row.value {
        Some(v) if row.unit.is_empty() => format_number(v),
        Some(v) => format!("{} {}", format_number(v), row.unit),
        None => "n/a".to_string(),
    }
}

fn gauge_cell(row: &TableRow<'_>, options: &RenderOptions) -> String {
    let status = row.status();
    match (row.value, row.ref_min, row.ref_max, status) {
        (Some(value), Some(min), Some(max), Status::Low | Status::Normal | Status::High) => {
            let reference = ReferenceInterval::new(min, max);
            let mut cell = format!(
                "[{} - {}] {}",
                format_number(min),
                format_number(max),
                gauge_bar(value, reference, options.gauge_width)
            );
            if options.include_status {
                cell.push(' ');
                cell.push_str(status.label());
            }
            cell
        }
        // Rows without a usable interval get their status in place of the gauge.
        _ => status.label().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Measurement, RawRow, TableBuilder};

    #[test]
    fn test_text_rows() {
        let table = MeasurementTable::from_measurements(
            &[
                Measurement::new("Lactic acid", 5.116, "mmol/mol creat.").with_reference(4.5, 9.0),
                Measurement::new("Benzoic acid", 0.0, "mmol/mol").with_reference(0.0, 0.0),
                Measurement::new("Oxalic acid", 40.0, "mmol/mol creat."),
            ],
            "Organic acids",
        );
        let text = to_text(&table, &RenderOptions::default()).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "Organic acids");
        assert_eq!(lines[1], "");
        assert!(lines[2].starts_with("Lactic acid "));
        assert!(lines[2].contains("[4.5 - 9] |"));
        assert!(lines[2].ends_with("| normal"));
        assert!(lines[3].ends_with("not detected"));
        assert!(lines[4].ends_with("reference values not defined"));
    }

    #[test]
    fn test_text_missing_value() {
        let mut builder = TableBuilder::new();
        builder.push(RawRow::new("Odd", "n/a", 1.0, 2.0, "u"));
        let text = to_text(&builder.build(), &RenderOptions::default()).unwrap();
        assert_eq!(text, "Odd  n/a  missing");
    }

    #[test]
    fn test_text_empty_table() {
        let text = to_text(&MeasurementTable::new(), &RenderOptions::default()).unwrap();
        assert_eq!(text, "No measurements found.");
    }

    #[test]
    fn test_text_without_gauge() {
        let table = MeasurementTable::from_measurements(
            &[Measurement::new("A", 1.5, "").with_reference(1.0, 2.0)],
            "",
        );
        let options = RenderOptions::new().with_gauge_width(0).with_status(false);
        let text = to_text(&table, &options).unwrap();
        assert_eq!(text, "A  1.5  [1 - 2]");
    }
}
