//! API middleware components

pub mod logging;
pub mod metrics;

pub use logging::{RequestId, REQUEST_ID_HEADER, logging_middleware};
pub use self::metrics::metrics_middleware;

use axum::{body::Body, extract::MatchedPath, http::Request};

/// Label used for requests that matched no route
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Route template of the request (`/predict`), never the raw URI
pub(crate) fn route_label(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}
