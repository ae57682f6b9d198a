//! Pipeline commands - one function per stage plus the full run

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Args;
use tracing::{error, info};

use crate::config::{AppConfig, PipelineParams};
use crate::domain::dataset::DEFAULT_SEED;
use crate::domain::{DomainError, ExperimentTracker, ForestParams};
use crate::infrastructure::artifact::ArtifactStore;
use crate::infrastructure::dataset::DatasetSource;
use crate::infrastructure::observability::record_pipeline_stage;
use crate::infrastructure::services::{
    CollectionReport, CollectionService, EvaluationOutcome, EvaluationService, METRICS_FILE,
    PreprocessingReport, PreprocessingService, ReportService, ReportSummary, TrainingReport,
    TrainingService,
};
use crate::infrastructure::tracking::create_tracker;

#[derive(Args, Debug, Clone, Default)]
pub struct CollectArgs {
    /// Dataset URL or local CSV path (overrides config)
    #[arg(long)]
    pub source: Option<String>,

    /// Held-out fraction (overrides params.yaml)
    #[arg(long)]
    pub test_size: Option<f64>,
}

#[derive(Args, Debug, Clone)]
pub struct TrainArgs {
    /// Number of trees (overrides params.yaml)
    #[arg(long)]
    pub n_estimators: Option<usize>,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

impl Default for TrainArgs {
    fn default() -> Self {
        Self {
            n_estimators: None,
            seed: DEFAULT_SEED,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct PipelineArgs {
    #[command(flatten)]
    pub collect: CollectArgs,

    #[command(flatten)]
    pub train: TrainArgs,
}

pub async fn collect(args: CollectArgs) -> anyhow::Result<()> {
    Pipeline::new(super::bootstrap()?).collect(&args).await?;
    Ok(())
}

pub fn preprocess() -> anyhow::Result<()> {
    Pipeline::new(super::bootstrap()?).preprocess()?;
    Ok(())
}

pub fn train(args: TrainArgs) -> anyhow::Result<()> {
    Pipeline::new(super::bootstrap()?).train(&args)?;
    Ok(())
}

pub fn evaluate() -> anyhow::Result<()> {
    Pipeline::new(super::bootstrap()?).evaluate()?;
    Ok(())
}

pub fn report() -> anyhow::Result<()> {
    Pipeline::new(super::bootstrap()?).report()?;
    Ok(())
}

pub async fn run(args: PipelineArgs) -> anyhow::Result<()> {
    Pipeline::new(super::bootstrap()?).run_all(&args).await
}

/// Stage runner sharing one configuration and tracker
pub struct Pipeline {
    config: AppConfig,
    tracker: Arc<dyn ExperimentTracker>,
    store: ArtifactStore,
    preprocessing: PreprocessingService,
}

impl Pipeline {
    pub fn new(config: AppConfig) -> Self {
        let tracker = create_tracker(&config.tracking);
        let store = ArtifactStore::from_config(&config.model);
        let preprocessing =
            PreprocessingService::new(&config.data.raw_dir, &config.data.processed_dir);

        Self {
            config,
            tracker,
            store,
            preprocessing,
        }
    }

    fn params(&self) -> Result<PipelineParams, DomainError> {
        PipelineParams::load(&self.config.data.params_path)
    }

    fn metrics_path(&self) -> PathBuf {
        Path::new(&self.config.data.reports_dir).join(METRICS_FILE)
    }

    pub async fn collect(&self, args: &CollectArgs) -> anyhow::Result<CollectionReport> {
        timed_async("collect", async {
            let test_size = match args.test_size {
                Some(test_size) => test_size,
                None => self.params()?.data_collection.test_size,
            };
            let source = DatasetSource::parse(
                args.source.as_deref().unwrap_or(&self.config.data.source),
            );

            CollectionService::new(
                &self.config.data.raw_dir,
                Duration::from_secs(self.config.data.download_timeout_secs),
            )
            .collect(&source, test_size)
            .await
        })
        .await
    }

    pub fn preprocess(&self) -> anyhow::Result<PreprocessingReport> {
        timed("preprocess", || self.preprocessing.preprocess())
    }

    pub fn train(&self, args: &TrainArgs) -> anyhow::Result<TrainingReport> {
        timed("train", || {
            let n_estimators = match args.n_estimators {
                Some(n) => n,
                None => self.params()?.model_building.n_estimators,
            };
            let params = ForestParams::new(n_estimators).with_seed(args.seed);

            TrainingService::new(self.store.clone(), self.tracker.clone())
                .train(&self.preprocessing.train_output(), &params)
        })
    }

    pub fn evaluate(&self) -> anyhow::Result<EvaluationOutcome> {
        timed("evaluate", || {
            let artifact = ArtifactStore::read(self.store.primary_path())?;
            EvaluationService::new(self.tracker.clone()).evaluate(
                &artifact,
                &self.preprocessing.test_output(),
                &self.metrics_path(),
            )
        })
    }

    pub fn report(&self) -> anyhow::Result<ReportSummary> {
        timed("report", || {
            let artifact = ArtifactStore::read(self.store.primary_path())?;
            let service = ReportService::new(&self.config.data.reports_dir);
            let summary = service.report(
                &artifact,
                &self.preprocessing.test_output(),
                &self.metrics_path(),
            )?;
            info!("Report written to {}", service.summary_path().display());
            Ok(summary)
        })
    }

    /// Every stage in order; the first failure aborts the run
    pub async fn run_all(&self, args: &PipelineArgs) -> anyhow::Result<()> {
        let started = Instant::now();

        self.collect(&args.collect).await?;
        self.preprocess()?;
        self.train(&args.train)?;
        let outcome = self.evaluate()?;
        self.report()?;

        info!(
            "Pipeline completed in {:.1}s (test accuracy {:.4})",
            started.elapsed().as_secs_f64(),
            outcome.metrics.accuracy
        );
        Ok(())
    }
}

fn timed<T>(stage: &'static str, run: impl FnOnce() -> Result<T, DomainError>) -> anyhow::Result<T> {
    let started = Instant::now();
    info!(stage, "Stage started");
    let result = run();
    conclude(stage, started, result)
}

async fn timed_async<T>(
    stage: &'static str,
    run: impl Future<Output = Result<T, DomainError>>,
) -> anyhow::Result<T> {
    let started = Instant::now();
    info!(stage, "Stage started");
    let result = run.await;
    conclude(stage, started, result)
}

fn conclude<T>(
    stage: &'static str,
    started: Instant,
    result: Result<T, DomainError>,
) -> anyhow::Result<T> {
    let elapsed = started.elapsed();
    record_pipeline_stage(stage, result.is_ok(), elapsed);

    match &result {
        Ok(_) => info!(stage, elapsed_ms = elapsed.as_millis() as u64, "Stage completed"),
        Err(e) => error!(stage, kind = e.kind(), "Stage failed: {}", e),
    }
    result.with_context(|| format!("{} stage failed", stage))
}
