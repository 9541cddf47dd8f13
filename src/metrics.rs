//! Metric catalog: the columns usable as quantitative metrics for a subset.

use crate::{dataset::Subset, error::SelectionError};

/// Column keys, in schema order, whose value is numeric in every row of `subset`.
///
/// The result is scoped to this subset only. A missing or textual cell in any
/// selected row disqualifies the column; an empty subset yields no metrics.
pub fn metric_columns(subset: &Subset<'_>) -> Vec<String> {
    if subset.is_empty() {
        return Vec::new();
    }
    let schema = subset.dataset().schema();
    schema
        .columns
        .iter()
        .enumerate()
        .filter(|(idx, _)| {
            subset
                .rows()
                .all(|row| matches!(row.cells().get(*idx), Some(Some(value)) if value.is_numeric()))
        })
        .map(|(_, column)| column.key.clone())
        .collect()
}

/// Confirms `key` belongs to `catalog`.
pub fn require_metric<'c>(catalog: &'c [String], key: &str) -> Result<&'c str, SelectionError> {
    catalog
        .iter()
        .find(|m| m.as_str() == key)
        .map(String::as_str)
        .ok_or_else(|| SelectionError::NotAMetric(key.to_string()))
}

/// Resolves an optional choice against the catalog, defaulting to its first entry.
///
/// An empty catalog yields `None` even for an explicit request: there is nothing
/// to select from.
pub fn choose_metric(
    catalog: &[String],
    requested: Option<&str>,
) -> Result<Option<String>, SelectionError> {
    if catalog.is_empty() {
        return Ok(None);
    }
    match requested {
        Some(key) => require_metric(catalog, key).map(|m| Some(m.to_string())),
        None => Ok(catalog.first().cloned()),
    }
}
