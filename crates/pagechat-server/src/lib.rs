//! PageChat host — runs the coordinator, page scripts and panels behind an
//! HTTP API standing in for the browser's extension messaging.

pub mod bridge;
pub mod panels;
pub mod routes;
pub mod state;

pub use state::AppState;
