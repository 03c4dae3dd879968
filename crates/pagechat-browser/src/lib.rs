//! Browser side of PageChat — the cross-context message protocol, the
//! long-lived per-tab content cache with navigation invalidation, the page
//! script handler and the native credential handler.

pub mod config;
pub mod coordinator;
pub mod native;
pub mod page;
pub mod protocol;
pub mod types;

pub use config::BrowserConfig;
pub use coordinator::{ContentCoordinator, PanelSurface};
pub use native::{handle_native_message, CredentialVault, FileVault, MemoryVault};
pub use page::PageScript;
pub use protocol::{parse_message, IncomingMessage, MessageResponse};
pub use types::*;
