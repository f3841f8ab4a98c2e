//! labscan CLI - lab report measurement extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;

use labscan::{
    open_source, render, DocumentAggregator, ExtractOptions, Grammar, JsonFormat, LineClassifier,
    LineMatch, MeasurementTable, PageSelection, PageSource, RenderOptions,
};

#[derive(Parser)]
#[command(name = "labscan")]
#[command(version)]
#[command(about = "Extract lab measurements from report PDFs to JSON, Markdown, and text", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract measurements from one or more reports
    Extract {
        /// Input PDF or text files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output file, or directory when several inputs are given
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Report grammar
        #[arg(short, long, value_enum, default_value = "helix", env = "LABSCAN_GRAMMAR")]
        grammar: GrammarPreset,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Maximum input file size in MB (0 = unlimited)
        #[arg(long, default_value = "10", env = "LABSCAN_MAX_FILE_SIZE_MB")]
        max_size: u32,
    },

    /// Classify a single line and print what it yields
    Classify {
        /// Line of report text
        #[arg(value_name = "LINE")]
        line: String,

        /// Report grammar
        #[arg(short, long, value_enum, default_value = "helix", env = "LABSCAN_GRAMMAR")]
        grammar: GrammarPreset,
    },

    /// Show report information
    Info {
        /// Input PDF or text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Report grammar
        #[arg(short, long, value_enum, default_value = "helix", env = "LABSCAN_GRAMMAR")]
        grammar: GrammarPreset,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Plain text with gauges
    Text,
    /// Markdown table
    #[value(alias = "md")]
    Markdown,
    /// JSON report
    Json,
}

impl OutputFormat {
    fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum GrammarPreset {
    /// Russian-language Helix layout
    Helix,
    /// English rendition of the same layout
    English,
}

impl From<GrammarPreset> for Grammar {
    fn from(preset: GrammarPreset) -> Self {
        match preset {
            GrammarPreset::Helix => Grammar::helix(),
            GrammarPreset::English => Grammar::english(),
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Extract {
            inputs,
            output,
            format,
            grammar,
            pages,
            compact,
            max_size,
        }) => {
            let json_format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            extract_options(grammar, pages.as_deref(), max_size).and_then(|options| {
                cmd_extract(&inputs, output.as_deref(), format, json_format, &options)
            })
        }
        Some(Commands::Classify { line, grammar }) => cmd_classify(&line, grammar),
        Some(Commands::Info { input, grammar }) => cmd_info(&input, grammar),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: labscan extract <FILE>...".yellow());
            println!("       labscan --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn extract_options(
    grammar: GrammarPreset,
    pages: Option<&str>,
    max_size: u32,
) -> Result<ExtractOptions, Box<dyn std::error::Error>> {
    let page_selection = if let Some(p) = pages {
        PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?
    } else {
        PageSelection::All
    };

    Ok(ExtractOptions::new()
        .with_grammar(grammar.into())
        .with_pages(page_selection)
        .with_max_file_size(max_size))
}

fn render_table(
    table: &MeasurementTable,
    format: OutputFormat,
    json_format: JsonFormat,
) -> labscan::Result<String> {
    let options = RenderOptions::default();
    match format {
        OutputFormat::Text => render::to_text(table, &options),
        OutputFormat::Markdown => render::to_markdown(table, &options),
        OutputFormat::Json => render::to_json(table, json_format),
    }
}

/// Where the rendering of `input` goes when several files are extracted.
fn batch_output_path(dir: &Path, input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    dir.join(format!("{}.{}", stem, format.extension()))
}

fn cmd_extract(
    inputs: &[PathBuf],
    output: Option<&Path>,
    format: OutputFormat,
    json_format: JsonFormat,
    options: &ExtractOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    if let [input] = inputs {
        let table = labscan::extract_file_with_options(input, options)?;
        if table.is_empty() {
            eprintln!("{} {}", "No measurements found in".yellow(), input.display());
        }
        let rendered = render_table(&table, format, json_format)?;
        return write_output(output, &rendered);
    }

    if let Some(dir) = output {
        fs::create_dir_all(dir)?;
    }

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut failures = 0usize;
    for input in inputs {
        pb.set_message(input.display().to_string());
        match labscan::extract_file_with_options(input, options) {
            Ok(table) => {
                if table.is_empty() {
                    pb.println(format!(
                        "{} {}",
                        "No measurements found in".yellow(),
                        input.display()
                    ));
                }
                let rendered = render_table(&table, format, json_format)?;
                match output {
                    Some(dir) => {
                        let path = batch_output_path(dir, input, format);
                        fs::write(&path, &rendered)?;
                        debug!("wrote {}", path.display());
                    }
                    None => pb.suspend(|| {
                        println!("{}", format!("== {} ==", input.display()).cyan().bold());
                        println!("{}\n", rendered);
                    }),
                }
            }
            Err(e) => {
                failures += 1;
                pb.println(format!("{} {}: {}", "Failed".red(), input.display(), e));
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Done!");

    if let Some(dir) = output {
        println!("{} {}", "Saved to".green(), dir.display());
    }
    if failures > 0 {
        return Err(format!("{} of {} files failed", failures, inputs.len()).into());
    }
    Ok(())
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_classify(line: &str, grammar: GrammarPreset) -> Result<(), Box<dyn std::error::Error>> {
    let classifier = LineClassifier::new(&grammar.into())?;

    let Some(found) = classifier.classify_match(line)? else {
        println!("{}", "No match".yellow());
        return Ok(());
    };

    println!("{}: {}", "Shape".bold(), found.shape().to_string().cyan());
    match &found {
        LineMatch::Ranged {
            name,
            value,
            unit,
            reference,
        } => {
            println!("{}: {}", "Name".bold(), name);
            println!("{}: {}", "Value".bold(), value);
            if let Some(unit) = unit {
                println!("{}: {}", "Unit".bold(), unit);
            }
            if let Some(r) = reference {
                println!("{}: {} - {}", "Reference".bold(), r.min, r.max);
            }
        }
        LineMatch::NotDetected { name, unit } => {
            println!("{}: {}", "Name".bold(), name);
            println!("{}: {}", "Unit".bold(), unit);
        }
        LineMatch::NoReference { name, value, unit } => {
            println!("{}: {}", "Name".bold(), name);
            println!("{}: {}", "Value".bold(), value);
            println!("{}: {}", "Unit".bold(), unit);
        }
        LineMatch::Ratio {
            name,
            value,
            reference,
        } => {
            println!("{}: {}", "Name".bold(), name);
            println!("{}: {}", "Value".bold(), value);
            println!("{}: {} - {}", "Reference".bold(), reference.min, reference.max);
        }
    }

    let measurement = found.into_measurement();
    println!("{}: {}", "Status".bold(), measurement.status());

    Ok(())
}

fn cmd_info(input: &Path, grammar: GrammarPreset) -> Result<(), Box<dyn std::error::Error>> {
    let options = ExtractOptions::new().with_grammar(grammar.into());
    let source = open_source(input, options.max_file_size_bytes())?;
    let pages = source.pages()?;
    let doc = DocumentAggregator::new(&options)?.aggregate(&pages)?;
    let table = doc.to_table();

    println!("{}", "Report Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), source.format());
    println!("{}: {}", "Pages".bold(), pages.len());
    if doc.title.is_empty() {
        println!("{}: {}", "Title".bold(), "(none)".dimmed());
    } else {
        println!("{}: {}", "Title".bold(), doc.title);
    }

    println!();
    println!("{}", "Measurements".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Rows".bold(), table.row_count());
    let abnormal = table.abnormal_count();
    if abnormal > 0 {
        println!("{}: {}", "Out of range".bold(), abnormal.to_string().red());
    } else {
        println!("{}: {}", "Out of range".bold(), abnormal);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "labscan".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Lab report measurement extraction tool");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_output_path() {
        let path = batch_output_path(Path::new("out"), Path::new("in/report.pdf"), OutputFormat::Json);
        assert_eq!(path, PathBuf::from("out/report.json"));
    }

    #[test]
    fn test_extract_options_from_args() {
        let options = extract_options(GrammarPreset::English, Some("1-2"), 5).unwrap();
        assert_eq!(options.grammar, Grammar::english());
        assert_eq!(options.pages, PageSelection::Range(1..=2));
        assert_eq!(options.max_file_size_mb, 5);

        assert!(extract_options(GrammarPreset::Helix, Some("3-1"), 10).is_err());
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        write_output(Some(&path), "| Name |").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "| Name |");
    }

    #[test]
    fn test_cli_parses_extract() {
        let cli = Cli::try_parse_from([
            "labscan", "extract", "a.pdf", "b.txt", "--format", "md", "--grammar", "english",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Extract {
                inputs,
                format,
                grammar,
                ..
            }) => {
                assert_eq!(inputs.len(), 2);
                assert_eq!(format, OutputFormat::Markdown);
                assert_eq!(grammar, GrammarPreset::English);
            }
            _ => panic!("expected extract command"),
        }
    }
}
