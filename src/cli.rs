use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{charts::ChartKind, continent::Continent};

#[derive(Debug, Parser)]
#[command(author, version, about = "Prepare country demographic CSV data for map and chart views", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List raw headers, their canonical keys, and which are metrics
    Columns(ColumnsArgs),
    /// Count rows per continent
    Continents(InputArgs),
    /// Show the first rows of the filtered table
    Preview(PreviewArgs),
    /// List the metric columns of the filtered rows
    Metrics(SelectionArgs),
    /// Emit a bar or line chart series for one metric
    Chart(ChartArgs),
    /// Print the correlation matrix of the filtered metrics
    Correlate(SelectionArgs),
    /// Emit the geographic view (codes plus hover payload) as JSON
    Map(MapArgs),
    /// Emit every view as a single JSON report
    Report(ReportArgs),
    /// Write the filtered, normalized table as CSV
    Export(ExportArgs),
}

#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Input CSV file (`-` for stdin); the bundled dataset is used when omitted
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct SelectionArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// YAML pipeline configuration; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Continent to include, by exact label (repeatable, defaults to Asia)
    #[arg(
        short = 'c',
        long = "continent",
        action = clap::ArgAction::Append,
        value_parser = parse_continent
    )]
    pub continents: Vec<Continent>,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,
    /// Number of rows to display
    #[arg(long)]
    pub rows: Option<usize>,
}

#[derive(Debug, Args)]
pub struct ChartArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,
    /// Chart kind
    #[arg(long, value_enum, default_value_t = ChartKind::Bar)]
    pub kind: ChartKind,
    /// Metric column (defaults to the first metric)
    #[arg(short = 'm', long)]
    pub metric: Option<String>,
    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct MapArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,
    /// Metric used for the colour scale (defaults to the first metric)
    #[arg(short = 'm', long)]
    pub metric: Option<String>,
    /// Additional metrics for hover text, in display order
    #[arg(long = "hover", action = clap::ArgAction::Append, value_delimiter = ',')]
    pub hover: Vec<String>,
    /// Output JSON file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,
    /// Output JSON file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,
    /// Output CSV file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Delimiter to use for output (defaults to comma)
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

pub fn parse_continent(value: &str) -> Result<Continent, String> {
    value.parse::<Continent>().map_err(|err| {
        let known: Vec<&str> = Continent::ALL.iter().map(|c| c.label()).collect();
        format!("{err}; expected one of: {}", known.join(", "))
    })
}
