//! Dataset file formats and sources

mod csv_store;
mod downloader;

pub use csv_store::{parse_csv, read_csv, stage_csv, to_csv_bytes, write_csv};
pub use downloader::{fetch_dataset, DatasetSource};
