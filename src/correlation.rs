//! Pearson correlation over the active metric columns.

use serde::Serialize;

use crate::dataset::Subset;

pub const INSUFFICIENT_METRICS_NOTICE: &str = "Not enough numeric columns for correlation heatmap.";

/// Square matrix indexed by `columns`; `None` where a coefficient is undefined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, left: &str, right: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == left)?;
        let j = self.columns.iter().position(|c| c == right)?;
        self.values[i][j]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CorrelationView {
    Matrix(CorrelationMatrix),
    InsufficientMetrics { notice: String },
}

/// Correlates every pair of `metrics` across the rows of `subset`.
///
/// Fewer than two metrics degrades to [`CorrelationView::InsufficientMetrics`].
pub fn correlate(subset: &Subset<'_>, metrics: &[String]) -> CorrelationView {
    if metrics.len() < 2 {
        return CorrelationView::InsufficientMetrics {
            notice: INSUFFICIENT_METRICS_NOTICE.to_string(),
        };
    }
    let n = metrics.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        for j in i..n {
            // Pairwise complete observations.
            let (xs, ys): (Vec<f64>, Vec<f64>) = subset
                .rows()
                .filter_map(|row| Some((row.number(&metrics[i])?, row.number(&metrics[j])?)))
                .unzip();
            let r = pearson(&xs, &ys);
            values[i][j] = r;
            values[j][i] = r;
        }
    }
    CorrelationView::Matrix(CorrelationMatrix {
        columns: metrics.to_vec(),
        values,
    })
}

/// Sample Pearson coefficient; undefined for fewer than two points or zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;
    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}
