//! Series for the categorical (bar and line) chart consumers.

use std::fmt;

use clap::ValueEnum;
use serde::Serialize;

use crate::{continent::Continent, dataset::Subset, error::SelectionError, format::metric_label};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[value(rename_all = "kebab-case")]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Line,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::Bar => f.write_str("bar"),
            ChartKind::Line => f.write_str("line"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPoint {
    pub country: String,
    pub continent: Continent,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySeries {
    pub kind: ChartKind,
    pub metric: String,
    pub title: String,
    pub points: Vec<CategoryPoint>,
}

pub fn chart_title(kind: ChartKind, metric: &str) -> String {
    let label = metric_label(metric);
    match kind {
        ChartKind::Bar => format!("{label} by Country and Continent"),
        ChartKind::Line => format!("{label} Trend by Country"),
    }
}

/// One (country, continent, value) triple per subset row, in row order.
pub fn category_series(
    subset: &Subset<'_>,
    kind: ChartKind,
    metric: &str,
) -> Result<CategorySeries, SelectionError> {
    let points = subset
        .rows()
        .map(|row| {
            let value = row
                .number(metric)
                .ok_or_else(|| SelectionError::NotAMetric(metric.to_string()))?;
            Ok(CategoryPoint {
                country: row.country().to_string(),
                continent: row.continent(),
                value,
            })
        })
        .collect::<Result<Vec<_>, SelectionError>>()?;
    Ok(CategorySeries {
        kind,
        metric: metric.to_string(),
        title: chart_title(kind, metric),
        points,
    })
}
