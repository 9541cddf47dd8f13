//! Per-point hover annotations for the map-rendering collaborator.
//!
//! The hover template and each point's formatted values are derived in one pass
//! from the same ordered metric list, so `customdata[i]` in the template always
//! refers to `values[i]` of every point.

use std::fmt::Write as _;

use log::warn;
use serde::Serialize;

use crate::{
    error::SelectionError,
    format::{format_display, metric_label},
    geocode::{GeoCode, GeoRow},
};

/// Ordered metric selection: the primary (colour) metric first, then extra hover metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoverMetrics {
    ordered: Vec<String>,
}

impl HoverMetrics {
    /// Repeated metrics, or extras naming the primary, are dropped.
    pub fn new(primary: &str, additional: &[String]) -> Self {
        let mut ordered = vec![primary.to_string()];
        for metric in additional {
            if ordered.contains(metric) {
                warn!("Ignoring repeated hover metric '{metric}'");
                continue;
            }
            ordered.push(metric.clone());
        }
        Self { ordered }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.ordered
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoverPoint {
    pub country: String,
    pub geo_code: GeoCode,
    /// Raw value of the primary metric, used for the colour scale.
    pub color_value: f64,
    /// Formatted values aligned with [`HoverPayload::metrics`].
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoverPayload {
    pub metrics: Vec<String>,
    pub template: String,
    pub points: Vec<HoverPoint>,
}

pub fn hover_template(metrics: &HoverMetrics) -> String {
    let mut template = String::from("<b>%{hovertext}</b><br><br>");
    for (idx, metric) in metrics.as_slice().iter().enumerate() {
        let _ = write!(
            template,
            "{}: %{{customdata[{idx}]}}<br>",
            metric_label(metric)
        );
    }
    template
}

/// Builds one point per input row; rows are never dropped here.
///
/// Fails when a selected metric is not numeric for some row, which means the
/// caller passed a metric outside the subset's catalog.
pub fn build_hover_payload(
    rows: &[GeoRow<'_>],
    metrics: &HoverMetrics,
) -> Result<HoverPayload, SelectionError> {
    let mut points = Vec::with_capacity(rows.len());
    for geo in rows {
        let mut values = Vec::with_capacity(metrics.as_slice().len());
        let mut color_value = None;
        for metric in metrics.as_slice() {
            let value = geo
                .row
                .number(metric)
                .filter(|v| v.is_finite())
                .ok_or_else(|| SelectionError::NotAMetric(metric.clone()))?;
            if color_value.is_none() {
                color_value = Some(value);
            }
            values.push(format_display(metric, value));
        }
        points.push(HoverPoint {
            country: geo.row.country().to_string(),
            geo_code: geo.code.clone(),
            color_value: color_value.unwrap_or_default(),
            values,
        });
    }
    Ok(HoverPayload {
        metrics: metrics.as_slice().to_vec(),
        template: hover_template(metrics),
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_metrics_keeps_primary_first_and_drops_repeats() {
        let metrics = HoverMetrics::new(
            "population",
            &[
                "urban_pct".to_string(),
                "population".to_string(),
                "urban_pct".to_string(),
                "median_age".to_string(),
            ],
        );
        assert_eq!(metrics.as_slice(), ["population", "urban_pct", "median_age"]);
    }

    #[test]
    fn template_indices_follow_metric_order() {
        let metrics = HoverMetrics::new("urban_pct", &["population".to_string()]);
        assert_eq!(
            hover_template(&metrics),
            "<b>%{hovertext}</b><br><br>Urban Pct: %{customdata[0]}<br>Population: %{customdata[1]}<br>"
        );
    }
}
