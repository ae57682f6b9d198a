//! Descriptive statistics over dataset columns

use serde::Serialize;

use super::Dataset;

/// Summary of one numeric column (count, mean, spread, quartiles)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub missing: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    #[serde(rename = "25%")]
    pub q25: Option<f64>,
    #[serde(rename = "50%")]
    pub q50: Option<f64>,
    #[serde(rename = "75%")]
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Summarize every column, ignoring missing cells
pub fn describe(dataset: &Dataset) -> Vec<ColumnSummary> {
    (0..dataset.n_columns())
        .map(|index| {
            let mut values = dataset.present_values(index);
            values.sort_by(f64::total_cmp);

            ColumnSummary {
                column: dataset.columns()[index].clone(),
                count: values.len(),
                missing: dataset.null_count(index),
                mean: mean(&values),
                std: sample_std(&values),
                min: values.first().copied(),
                q25: quantile(&values, 0.25),
                q50: quantile(&values, 0.5),
                q75: quantile(&values, 0.75),
                max: values.last().copied(),
            }
        })
        .collect()
}

/// Pearson correlation between every pair of columns.
///
/// Only rows where both cells are present contribute. A pair with fewer
/// than two such rows, or with a constant column, has no correlation.
pub fn correlation_matrix(dataset: &Dataset) -> Vec<Vec<Option<f64>>> {
    let n = dataset.n_columns();
    let mut matrix = vec![vec![None; n]; n];

    for i in 0..n {
        for j in i..n {
            let pairs: Vec<(f64, f64)> = dataset
                .rows()
                .iter()
                .filter_map(|row| Some((row[i]?, row[j]?)))
                .collect();

            let r = pearson(&pairs);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }

    matrix
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Linear-interpolated quantile of already sorted values
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in pairs {
        covariance += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
        var_y += (y - mean_y).powi(2);
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some(covariance / (var_x.sqrt() * var_y.sqrt()))
}
