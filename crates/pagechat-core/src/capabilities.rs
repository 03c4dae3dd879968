//! Panel capability set.
//!
//! One conversation controller serves every panel flavour; what differs
//! between them is which of these features are switched on.

use serde::{Deserialize, Serialize};

/// Features a panel instance supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelCapabilities {
    /// Detect Italian/English per user turn and localize replies.
    #[serde(default = "default_true")]
    pub localization: bool,
    /// Persist history through the session store.
    #[serde(default = "default_true")]
    pub persistence: bool,
    /// Allow the in-flight model request to be cancelled.
    #[serde(default = "default_true")]
    pub cancellation: bool,
}

fn default_true() -> bool {
    true
}

impl PanelCapabilities {
    /// Everything enabled (the sidebar panel).
    pub fn full() -> Self {
        Self {
            localization: true,
            persistence: true,
            cancellation: true,
        }
    }

    /// English only, ephemeral history, no stop button (the toolbar popup).
    pub fn minimal() -> Self {
        Self {
            localization: false,
            persistence: false,
            cancellation: false,
        }
    }
}

impl Default for PanelCapabilities {
    fn default() -> Self {
        Self::full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_on() {
        let caps: PanelCapabilities = serde_json::from_str(r#"{"persistence": false}"#).unwrap();
        assert!(caps.localization);
        assert!(!caps.persistence);
        assert!(caps.cancellation);
    }

    #[test]
    fn test_presets() {
        assert_eq!(PanelCapabilities::default(), PanelCapabilities::full());
        assert!(!PanelCapabilities::minimal().cancellation);
    }
}
