//! Column-oriented view over a numeric CSV table

use crate::domain::error::DomainError;
use crate::domain::prediction::Potability;

/// A table of optional numeric cells with named columns.
///
/// A `None` cell is a missing value (empty field or NaN in the source file).
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Option<f64>>>,
}

/// Features and labels separated from a dataset, ready for the classifier
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledData {
    pub feature_names: Vec<String>,
    pub features: Vec<Vec<f64>>,
    pub labels: Vec<Potability>,
}

impl Dataset {
    /// Create a dataset, checking every row has one cell per column
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<f64>>>) -> Result<Self, DomainError> {
        if columns.is_empty() {
            return Err(DomainError::dataset("Dataset has no columns"));
        }

        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(DomainError::dataset(format!(
                "Row {} has {} cells, expected {}",
                index,
                row.len(),
                columns.len()
            )));
        }

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<f64>>] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Vec<Option<f64>>] {
        &mut self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All cells of one column, top to bottom
    pub fn column(&self, index: usize) -> impl Iterator<Item = Option<f64>> + '_ {
        self.rows.iter().map(move |row| row[index])
    }

    /// Present values of one column, missing cells skipped
    pub fn present_values(&self, index: usize) -> Vec<f64> {
        self.column(index).flatten().collect()
    }

    pub fn null_count(&self, index: usize) -> usize {
        self.column(index).filter(Option::is_none).count()
    }

    /// New dataset containing the given rows in the given order
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// Separate the label column from the features.
    ///
    /// Fails if the label column is absent, any cell is missing, or a label
    /// is not exactly 0 or 1.
    pub fn split_label(&self, label: &str) -> Result<LabeledData, DomainError> {
        let label_index = self.column_index(label).ok_or_else(|| {
            DomainError::validation(format!(
                "Label column '{}' not found (columns: {})",
                label,
                self.columns.join(", ")
            ))
        })?;

        let feature_names: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != label_index)
            .map(|(_, name)| name.clone())
            .collect();

        let mut features = Vec::with_capacity(self.rows.len());
        let mut labels = Vec::with_capacity(self.rows.len());

        for (row_index, row) in self.rows.iter().enumerate() {
            let mut values = Vec::with_capacity(feature_names.len());

            for (col_index, cell) in row.iter().enumerate() {
                let value = cell.ok_or_else(|| {
                    DomainError::dataset(format!(
                        "Missing value in row {} column '{}'; run preprocessing first",
                        row_index, self.columns[col_index]
                    ))
                })?;

                if col_index == label_index {
                    labels.push(parse_label(value, row_index)?);
                } else {
                    values.push(value);
                }
            }

            features.push(values);
        }

        Ok(LabeledData {
            feature_names,
            features,
            labels,
        })
    }
}

fn parse_label(value: f64, row_index: usize) -> Result<Potability, DomainError> {
    if value == 0.0 {
        Ok(Potability::NotPotable)
    } else if value == 1.0 {
        Ok(Potability::Potable)
    } else {
        Err(DomainError::validation(format!(
            "Row {} has label {}: expected 0 or 1",
            row_index, value
        )))
    }
}
