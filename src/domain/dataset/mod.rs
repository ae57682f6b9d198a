//! Dataset domain - tabular water quality data and the cleaning steps
//! applied to it before training

mod imputation;
mod split;
mod stats;
mod table;

pub use imputation::{impute_median, median, ImputedColumn};
pub use split::{train_test_split, DEFAULT_SEED};
pub use stats::{correlation_matrix, describe, ColumnSummary};
pub use table::{Dataset, LabeledData};
