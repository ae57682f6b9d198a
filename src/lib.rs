//! AquaSafe - water potability prediction
//!
//! An end-to-end pipeline and serving stack:
//! - Dataset collection, median imputation and train/test splitting
//! - Random Forest training with a schema-stamped JSON artifact
//! - Evaluation metrics and a JSON summary report
//! - A prediction HTTP API and a server-rendered UI

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;

pub use crate::config::AppConfig;
