//! Missing-value imputation by per-column median

use super::Dataset;
use crate::domain::error::DomainError;

/// Record of one column that had missing values filled
#[derive(Debug, Clone, PartialEq)]
pub struct ImputedColumn {
    pub column: String,
    pub filled: usize,
    pub median: f64,
}

/// Median of a slice of values; `None` when empty.
///
/// An even number of values yields the mean of the two middle values.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Replace every missing cell with its column's median.
///
/// Columns without missing cells are left untouched. A column with no
/// present values at all cannot be imputed and fails the whole run.
pub fn impute_median(dataset: &mut Dataset) -> Result<Vec<ImputedColumn>, DomainError> {
    let mut imputed = Vec::new();

    for index in 0..dataset.n_columns() {
        let filled = dataset.null_count(index);
        if filled == 0 {
            continue;
        }

        let column = dataset.columns()[index].clone();
        let fill_value = median(&dataset.present_values(index)).ok_or_else(|| {
            DomainError::dataset(format!(
                "Column '{}' has no values to compute a median from",
                column
            ))
        })?;

        for row in dataset.rows_mut() {
            if row[index].is_none() {
                row[index] = Some(fill_value);
            }
        }

        imputed.push(ImputedColumn {
            column,
            filled,
            median: fill_value,
        });
    }

    Ok(imputed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_impute_fills_nulls_and_keeps_present_values() {
        let mut dataset = Dataset::new(
            vec!["ph".into(), "Sulfate".into()],
            vec![
                vec![Some(7.0), None],
                vec![None, Some(300.0)],
                vec![Some(5.0), Some(320.0)],
                vec![Some(9.0), None],
            ],
        )
        .unwrap();
        let original = dataset.clone();

        let report = impute_median(&mut dataset).unwrap();

        assert_eq!(report.len(), 2);
        assert_eq!(report[0].column, "ph");
        assert_eq!(report[0].filled, 1);
        assert_eq!(report[0].median, 7.0);
        assert_eq!(report[1].median, 310.0);

        for index in 0..dataset.n_columns() {
            assert_eq!(dataset.null_count(index), 0);
        }

        for (before, after) in original.rows().iter().zip(dataset.rows()) {
            for (b, a) in before.iter().zip(after) {
                if let Some(value) = b {
                    assert_eq!(Some(*value), *a);
                }
            }
        }
    }

    #[test]
    fn test_impute_skips_complete_columns() {
        let mut dataset = Dataset::new(
            vec!["ph".into()],
            vec![vec![Some(7.0)], vec![Some(8.0)]],
        )
        .unwrap();

        let report = impute_median(&mut dataset).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_impute_fails_on_empty_column() {
        let mut dataset =
            Dataset::new(vec!["ph".into()], vec![vec![None], vec![None]]).unwrap();

        let err = impute_median(&mut dataset).unwrap_err();
        assert!(err.to_string().contains("no values"));
    }
}
