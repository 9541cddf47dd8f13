//! One derivation pass from an ingested dataset to every consumer view.
//!
//! Each view is a pure function of the dataset and the [`PipelineConfig`]. The
//! metric catalog is computed once per pass against the filtered subset and
//! shared by all consumers.

use std::collections::HashSet;

use log::info;
use serde::Serialize;

use crate::{
    charts::{CategorySeries, ChartKind, category_series},
    config::PipelineConfig,
    continent::Continent,
    correlation::{CorrelationView, correlate},
    dataset::{Dataset, PreviewRecord, Subset},
    error::SelectionError,
    geocode::{CodeResolver, GeoReference},
    hover::{HoverMetrics, HoverPayload, build_hover_payload},
    metrics::{choose_metric, metric_columns, require_metric},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GeoView {
    /// No geographic reference was supplied.
    Unavailable,
    /// The active subset has no metric to colour by.
    NoMetric,
    Ready {
        /// Rows of the filtered subset that resolved to a code.
        resolved_rows: usize,
        /// Rows dropped from this view only.
        unresolved: Vec<String>,
        payload: HoverPayload,
    },
}

#[derive(Debug, Clone)]
pub struct Views<'a> {
    pub available_continents: Vec<Continent>,
    pub subset: Subset<'a>,
    pub metrics: Vec<String>,
    pub bar: Option<CategorySeries>,
    pub line: Option<CategorySeries>,
    pub correlation: CorrelationView,
    pub geo: GeoView,
    preview_rows: usize,
}

impl<'a> Views<'a> {
    pub fn preview(&self) -> Subset<'a> {
        self.subset.head(self.preview_rows)
    }

    pub fn report(&self) -> ViewReport {
        ViewReport {
            available_continents: self.available_continents.clone(),
            row_count: self.subset.len(),
            preview: self.preview().rows().map(|row| row.to_record()).collect(),
            metrics: self.metrics.clone(),
            bar: self.bar.clone(),
            line: self.line.clone(),
            correlation: self.correlation.clone(),
            geo: self.geo.clone(),
        }
    }
}

/// Owned, serializable snapshot of [`Views`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewReport {
    pub available_continents: Vec<Continent>,
    pub row_count: usize,
    pub preview: Vec<PreviewRecord>,
    pub metrics: Vec<String>,
    pub bar: Option<CategorySeries>,
    pub line: Option<CategorySeries>,
    pub correlation: CorrelationView,
    pub geo: GeoView,
}

pub fn derive_views<'a>(
    dataset: &'a Dataset,
    config: &PipelineConfig,
    reference: Option<&dyn GeoReference>,
) -> Result<Views<'a>, SelectionError> {
    let subset = dataset.filter_continents(&config.continents);
    let metrics = metric_columns(&subset);
    info!(
        "Selected {} of {} row(s) across {} continent(s); {} metric column(s)",
        subset.len(),
        dataset.row_count(),
        config.continents.len(),
        metrics.len()
    );

    let bar = chart(&subset, &metrics, ChartKind::Bar, config.bar_metric.as_deref())?;
    let line = chart(&subset, &metrics, ChartKind::Line, config.line_metric.as_deref())?;
    let correlation = correlate(&subset, &metrics);
    let geo = match reference {
        Some(reference) => geo_view(
            &subset,
            &metrics,
            config.map_metric.as_deref(),
            &config.hover_metrics,
            reference,
        )?,
        None => GeoView::Unavailable,
    };

    Ok(Views {
        available_continents: dataset.available_continents(),
        subset,
        metrics,
        bar,
        line,
        correlation,
        geo,
        preview_rows: config.preview_rows,
    })
}

fn chart(
    subset: &Subset<'_>,
    metrics: &[String],
    kind: ChartKind,
    requested: Option<&str>,
) -> Result<Option<CategorySeries>, SelectionError> {
    match choose_metric(metrics, requested)? {
        Some(metric) => category_series(subset, kind, &metric).map(Some),
        None => Ok(None),
    }
}

/// Resolves codes, drops unresolved rows from this view only, and builds the hover payload.
pub fn geo_view(
    subset: &Subset<'_>,
    metrics: &[String],
    map_metric: Option<&str>,
    hover_metrics: &[String],
    reference: &dyn GeoReference,
) -> Result<GeoView, SelectionError> {
    let Some(primary) = choose_metric(metrics, map_metric)? else {
        return Ok(GeoView::NoMetric);
    };
    for extra in hover_metrics {
        require_metric(metrics, extra)?;
    }
    let selection = HoverMetrics::new(&primary, hover_metrics);

    let resolver = CodeResolver::new(reference);
    let geo_rows = resolver.geo_rows(subset);
    let resolved: HashSet<usize> = geo_rows.iter().map(|g| g.row.index()).collect();
    let unresolved: Vec<String> = subset
        .rows()
        .filter(|row| !resolved.contains(&row.index()))
        .map(|row| row.country().to_string())
        .collect();
    if !unresolved.is_empty() {
        info!(
            "{} row(s) without a country code left out of the map",
            unresolved.len()
        );
    }
    let payload = build_hover_payload(&geo_rows, &selection)?;
    Ok(GeoView::Ready {
        resolved_rows: geo_rows.len(),
        unresolved,
        payload,
    })
}
