//! Chat-completions client for the external model endpoint.
//!
//! The whole response is retrieved in one request; there is no token
//! streaming. Requests are cancellable through a `CancellationToken`.

pub mod config;
pub mod providers;
pub mod types;

pub use config::ModelConfig;
pub use providers::{ChatModel, HttpChatModel};
pub use types::*;
