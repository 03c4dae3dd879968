//! PageChat Core — shared errors, data paths, configuration, credential and
//! panel capability types.

pub mod capabilities;
pub mod config;
pub mod credential;
pub mod error;

pub use capabilities::PanelCapabilities;
pub use config::{DataPaths, PageChatConfig};
pub use credential::{Credential, CREDENTIAL_MASK};
pub use error::{Error, Result};
