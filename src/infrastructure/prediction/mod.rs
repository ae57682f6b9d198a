//! Prediction providers backed by infrastructure

mod remote_client;

pub use remote_client::{RemotePredictionClient, HEALTH_TIMEOUT, PREDICT_TIMEOUT};
