//! Infrastructure layer - File stores, HTTP clients, trackers and services

pub mod artifact;
pub mod dataset;
pub mod files;
pub mod logging;
pub mod observability;
pub mod prediction;
pub mod services;
pub mod tracking;
