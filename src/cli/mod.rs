//! CLI module for AquaSafe
//!
//! Provides subcommands for serving predictions and running the ML pipeline:
//! - `serve`: prediction API + UI combined (UI under `/ui`)
//! - `api`: prediction API only
//! - `ui`: UI server backed by the remote API or an in-process model
//! - `collect`, `preprocess`, `train`, `evaluate`, `report`: single pipeline stages
//! - `pipeline`: every stage in order

pub mod api;
pub mod pipeline;
pub mod serve;
pub mod ui;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// AquaSafe - water potability prediction
#[derive(Parser)]
#[command(name = "aquasafe")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run prediction API + UI combined
    Serve,

    /// Run prediction API only
    Api,

    /// Run the UI server
    Ui(ui::UiArgs),

    /// Download the dataset and write the raw train/test splits
    Collect(pipeline::CollectArgs),

    /// Impute missing values in the raw splits
    Preprocess,

    /// Fit the Random Forest and save the model artifact
    Train(pipeline::TrainArgs),

    /// Score the saved model on the processed test split
    Evaluate,

    /// Write the JSON summary report
    Report,

    /// Run collect, preprocess, train, evaluate and report in order
    Pipeline(pipeline::PipelineArgs),
}

/// Load `.env` and the layered configuration, then install logging
pub(crate) fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init_logging(&config.logging);

    Ok(config)
}
