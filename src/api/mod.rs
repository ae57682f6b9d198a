//! HTTP prediction API

pub mod health;
pub mod middleware;
pub mod predict;
pub mod router;
pub mod state;
pub mod types;

pub use router::create_router;
pub use state::AppState;
