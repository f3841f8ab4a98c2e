//! Markdown rendering for measurement tables.

use crate::error::Result;
use crate::model::{MeasurementTable, TableRow};

use super::gauge::{format_number, split_title};
use super::RenderOptions;

/// Convert a table to Markdown.
pub fn to_markdown(table: &MeasurementTable, options: &RenderOptions) -> Result<String> {
    let mut output = String::new();

    if options.include_title && !table.title.is_empty() {
        for line in split_title(&table.title, options.max_words_per_title_line).lines() {
            output.push_str("## ");
            output.push_str(&escape(line));
            output.push('\n');
        }
        output.push('\n');
    }

    if table.is_empty() {
        output.push_str("_No measurements found._\n");
        return Ok(output.trim().to_string());
    }

    let mut header = vec!["Name", "Value", "Unit", "Reference"];
    if options.include_status {
        header.push("Status");
    }
    push_row(&mut output, header.iter().map(|h| h.to_string()));
    push_row(&mut output, header.iter().map(|_| "---".to_string()));

    for row in table.rows() {
        let mut cells = vec![
            escape(row.name),
            row.value.map(format_number).unwrap_or_else(|| "n/a".to_string()),
            escape(row.unit),
            reference_cell(&row),
        ];
        if options.include_status {
            let status = row.status();
            let label = if status.is_abnormal() {
                format!("**{}**", status)
            } else {
                status.to_string()
            };
            cells.push(label);
        }
        push_row(&mut output, cells.into_iter());
    }

    Ok(output.trim().to_string())
}

fn push_row(output: &mut String, cells: impl Iterator<Item = String>) {
    output.push('|');
    for cell in cells {
        output.push(' ');
        output.push_str(&cell);
        output.push_str(" |");
    }
    output.push('\n');
}

fn reference_cell(row: &TableRow<'_>) -> String {
    match (row.ref_min, row.ref_max) {
        (Some(min), Some(max)) => format!("{} - {}", format_number(min), format_number(max)),
        _ => String::new(),
    }
}

fn escape(text: &str) -> String {
    text.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Measurement;

    #[test]
    fn test_markdown_table() {
        let table = MeasurementTable::from_measurements(
            &[
                Measurement::new("Lactic acid", 5.116, "mmol/mol creat.").with_reference(4.5, 9.0),
                Measurement::new("A|B", 3.0, "").with_reference(0.5, 1.5),
            ],
            "Organic acids",
        );
        let md = to_markdown(&table, &RenderOptions::default()).unwrap();

        assert!(md.starts_with("## Organic acids\n"));
        assert!(md.contains("| Name | Value | Unit | Reference | Status |"));
        assert!(md.contains("| Lactic acid | 5.116 | mmol/mol creat. | 4.5 - 9 | normal |"));
        assert!(md.contains("| A\\|B | 3 |  | 0.5 - 1.5 | **high** |"));
    }

    #[test]
    fn test_markdown_without_status_or_title() {
        let table = MeasurementTable::from_measurements(
            &[Measurement::new("Oxalic acid", 40.0, "mmol/l")],
            "Panel",
        );
        let options = RenderOptions::new().with_status(false).with_title(false);
        let md = to_markdown(&table, &options).unwrap();

        assert!(!md.contains("Panel"));
        assert!(md.starts_with("| Name | Value | Unit | Reference |\n"));
        assert!(md.contains("| Oxalic acid | 40 | mmol/l |  |"));
    }

    #[test]
    fn test_markdown_empty_table() {
        let md = to_markdown(&MeasurementTable::new(), &RenderOptions::default()).unwrap();
        assert_eq!(md, "_No measurements found._");
    }

    #[test]
    fn test_markdown_wraps_long_title() {
        let mut table = MeasurementTable::new();
        table.title = "one two three four five".to_string();
        let md = to_markdown(&table, &RenderOptions::new().with_title_wrap(3)).unwrap();
        assert!(md.starts_with("## one two three\n## four five\n"));
    }
}
