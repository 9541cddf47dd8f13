pub mod charts;
pub mod cli;
pub mod config;
pub mod continent;
pub mod correlation;
pub mod data;
pub mod dataset;
pub mod error;
pub mod export;
pub mod format;
pub mod geocode;
pub mod hover;
pub mod io_utils;
pub mod metrics;
pub mod pipeline;
pub mod schema;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    charts::category_series,
    cli::{Cli, Commands, InputArgs, SelectionArgs},
    config::PipelineConfig,
    correlation::{CorrelationView, correlate},
    data::Value,
    dataset::{Dataset, IngestOptions, Source},
    format::{format_display, metric_label},
    geocode::{GeoReference, IsoCountryTable},
    metrics::{choose_metric, metric_columns},
    table::Align,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("popmap", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Columns(args) => handle_columns(&args.input),
        Commands::Continents(args) => handle_continents(&args),
        Commands::Preview(args) => handle_preview(&args),
        Commands::Metrics(args) => handle_metrics(&args),
        Commands::Chart(args) => handle_chart(&args),
        Commands::Correlate(args) => handle_correlate(&args),
        Commands::Map(args) => handle_map(&args),
        Commands::Report(args) => handle_report(&args),
        Commands::Export(args) => handle_export(&args),
    }
}

fn load_dataset(args: &InputArgs) -> Result<Dataset> {
    let source = Source::from_optional_path(args.input.as_deref());
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let options = IngestOptions {
        delimiter: args.delimiter,
        encoding,
    };
    if let Some(delimiter) = args.delimiter {
        debug!("Using delimiter '{}'", printable_delimiter(delimiter));
    }
    Dataset::ingest(&source, &options).with_context(|| format!("Loading {}", source.describe()))
}

fn resolve_config(args: &SelectionArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    if !args.continents.is_empty() {
        config.continents = args.continents.clone();
    }
    debug!("Pipeline configuration: {config:?}");
    Ok(config)
}

fn handle_columns(args: &InputArgs) -> Result<()> {
    let dataset = load_dataset(args)?;
    let catalog = metric_columns(&dataset.full());
    let rows: Vec<Vec<String>> = dataset
        .schema()
        .columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let metric = if catalog.contains(&column.key) { "yes" } else { "" };
            vec![
                (idx + 1).to_string(),
                column.source.clone(),
                column.key.clone(),
                metric.to_string(),
            ]
        })
        .collect();
    let headers = strings(&["#", "source", "key", "metric"]);
    table::print_table(&headers, &rows, &[Align::Right]);
    info!(
        "Listed {} column(s); {} metric column(s) across all rows",
        rows.len(),
        catalog.len()
    );
    Ok(())
}

fn handle_continents(args: &InputArgs) -> Result<()> {
    let dataset = load_dataset(args)?;
    let rows: Vec<Vec<String>> = dataset
        .available_continents()
        .into_iter()
        .map(|continent| {
            let count = dataset.filter_continents(&[continent]).len();
            vec![continent.label().to_string(), count.to_string()]
        })
        .collect();
    table::print_table(&strings(&["continent", "rows"]), &rows, &[Align::Left, Align::Right]);
    Ok(())
}

fn handle_preview(args: &cli::PreviewArgs) -> Result<()> {
    let dataset = load_dataset(&args.selection.input)?;
    let config = resolve_config(&args.selection)?;
    let subset = dataset.filter_continents(&config.continents);
    let preview = subset.head(args.rows.unwrap_or(config.preview_rows));

    let headers = dataset.schema().keys();
    let rows: Vec<Vec<String>> = preview
        .rows()
        .map(|row| {
            row.cells()
                .iter()
                .map(|cell| cell.as_ref().map(Value::as_display).unwrap_or_default())
                .collect()
        })
        .collect();
    let aligns: Vec<Align> = headers
        .iter()
        .map(|key| {
            let numeric = preview
                .rows()
                .any(|row| row.get(key).is_some_and(Value::is_numeric));
            if numeric { Align::Right } else { Align::Left }
        })
        .collect();
    table::print_table(&headers, &rows, &aligns);
    info!(
        "Displayed {} of {} filtered row(s)",
        preview.len(),
        subset.len()
    );
    Ok(())
}

fn handle_metrics(args: &SelectionArgs) -> Result<()> {
    let dataset = load_dataset(&args.input)?;
    let config = resolve_config(args)?;
    let subset = dataset.filter_continents(&config.continents);
    let catalog = metric_columns(&subset);
    let rows: Vec<Vec<String>> = catalog
        .iter()
        .map(|key| vec![key.clone(), metric_label(key)])
        .collect();
    table::print_table(&strings(&["metric", "label"]), &rows, &[]);
    info!(
        "{} metric column(s) for {} selected row(s)",
        catalog.len(),
        subset.len()
    );
    Ok(())
}

fn handle_chart(args: &cli::ChartArgs) -> Result<()> {
    let dataset = load_dataset(&args.selection.input)?;
    let config = resolve_config(&args.selection)?;
    let subset = dataset.filter_continents(&config.continents);
    let catalog = metric_columns(&subset);
    let Some(metric) = choose_metric(&catalog, args.metric.as_deref())? else {
        info!("No metric columns for the selected rows; nothing to chart");
        return Ok(());
    };
    let series = category_series(&subset, args.kind, &metric)?;
    if args.json {
        let rendered = serde_json::to_string_pretty(&series)?;
        return io_utils::write_text(None, &rendered);
    }
    println!("{}", series.title);
    let rows: Vec<Vec<String>> = series
        .points
        .iter()
        .map(|p| {
            vec![
                p.country.clone(),
                p.continent.label().to_string(),
                format_display(&metric, p.value),
            ]
        })
        .collect();
    let headers = vec!["country".to_string(), "continent".to_string(), metric.clone()];
    table::print_table(&headers, &rows, &[Align::Left, Align::Left, Align::Right]);
    info!("Charted {} as a {} series of {} point(s)", metric, args.kind, rows.len());
    Ok(())
}

fn handle_correlate(args: &SelectionArgs) -> Result<()> {
    let dataset = load_dataset(&args.input)?;
    let config = resolve_config(args)?;
    let subset = dataset.filter_continents(&config.continents);
    let catalog = metric_columns(&subset);
    match correlate(&subset, &catalog) {
        CorrelationView::InsufficientMetrics { notice } => println!("{notice}"),
        CorrelationView::Matrix(matrix) => {
            let mut headers = vec![String::new()];
            headers.extend(matrix.columns.iter().cloned());
            let rows: Vec<Vec<String>> = matrix
                .columns
                .iter()
                .zip(&matrix.values)
                .map(|(column, values)| {
                    let mut row = vec![column.clone()];
                    row.extend(values.iter().map(|v| match v {
                        Some(r) => format!("{r:.2}"),
                        None => "n/a".to_string(),
                    }));
                    row
                })
                .collect();
            let mut aligns = vec![Align::Left];
            aligns.extend(std::iter::repeat_n(Align::Right, matrix.columns.len()));
            table::print_table(&headers, &rows, &aligns);
        }
    }
    Ok(())
}

fn handle_map(args: &cli::MapArgs) -> Result<()> {
    let dataset = load_dataset(&args.selection.input)?;
    let mut config = resolve_config(&args.selection)?;
    if args.metric.is_some() {
        config.map_metric = args.metric.clone();
    }
    if !args.hover.is_empty() {
        config.hover_metrics = args.hover.clone();
    }
    let subset = dataset.filter_continents(&config.continents);
    let catalog = metric_columns(&subset);
    let view = pipeline::geo_view(
        &subset,
        &catalog,
        config.map_metric.as_deref(),
        &config.hover_metrics,
        &IsoCountryTable,
    )?;
    let rendered = serde_json::to_string_pretty(&view)?;
    io_utils::write_text(args.output.as_deref(), &rendered)?;
    if let pipeline::GeoView::Ready { resolved_rows, .. } = &view {
        info!(
            "Map payload for {} of {} row(s) written",
            resolved_rows,
            subset.len()
        );
    }
    Ok(())
}

fn handle_report(args: &cli::ReportArgs) -> Result<()> {
    let dataset = load_dataset(&args.selection.input)?;
    let config = resolve_config(&args.selection)?;
    let reference: &dyn GeoReference = &IsoCountryTable;
    let views = pipeline::derive_views(&dataset, &config, Some(reference))?;
    let rendered = serde_json::to_string_pretty(&views.report())?;
    io_utils::write_text(args.output.as_deref(), &rendered)
}

fn handle_export(args: &cli::ExportArgs) -> Result<()> {
    let dataset = load_dataset(&args.selection.input)?;
    let config = resolve_config(&args.selection)?;
    let subset = dataset.filter_continents(&config.continents);
    let delimiter = args
        .output_delimiter
        .unwrap_or(io_utils::DEFAULT_CSV_DELIMITER);
    let mut writer = io_utils::open_csv_writer(args.output.as_deref(), delimiter)?;
    let written = export::write_subset(&mut writer, &subset)?;
    info!("Exported {written} row(s)");
    Ok(())
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        other => (other as char).to_string(),
    }
}
