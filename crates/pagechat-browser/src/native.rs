//! Native host message handler and the credential vault behind it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use pagechat_core::{Credential, Result};

const VAULT_ACCOUNT: &str = "deepseek-api-key";

/// Secure storage for the single active credential.
pub trait CredentialVault: Send + Sync {
    fn store(&self, credential: &Credential) -> bool;
    fn get(&self) -> Option<Credential>;
    fn delete(&self) -> bool;
}

/// Process-local vault.
#[derive(Default)]
pub struct MemoryVault {
    slot: Mutex<Option<Credential>>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialVault for MemoryVault {
    fn store(&self, credential: &Credential) -> bool {
        *self.slot.lock() = Some(credential.clone());
        true
    }

    fn get(&self) -> Option<Credential> {
        self.slot.lock().clone()
    }

    fn delete(&self) -> bool {
        self.slot.lock().take().is_some()
    }
}

/// Vault backed by an owner-only JSON file keyed by account name.
pub struct FileVault {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileVault {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn read_accounts(&self) -> Result<HashMap<String, Credential>> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(e.into()),
        };
        let raw: HashMap<String, String> = serde_json::from_str(&data)?;
        Ok(raw
            .into_iter()
            .filter_map(|(account, key)| Credential::parse(&key).map(|c| (account, c)))
            .collect())
    }

    fn accounts(&self) -> HashMap<String, Credential> {
        self.read_accounts().unwrap_or_else(|e| {
            warn!("Ignoring unreadable vault {}: {}", self.path.display(), e);
            HashMap::new()
        })
    }

    fn write_accounts(&self, accounts: &HashMap<String, Credential>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(accounts)?)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }
}

impl CredentialVault for FileVault {
    fn store(&self, credential: &Credential) -> bool {
        let _guard = self.lock.lock();
        let mut accounts = self.accounts();
        accounts.insert(VAULT_ACCOUNT.to_string(), credential.clone());
        match self.write_accounts(&accounts) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to store credential: {}", e);
                false
            }
        }
    }

    fn get(&self) -> Option<Credential> {
        let _guard = self.lock.lock();
        self.accounts().remove(VAULT_ACCOUNT)
    }

    fn delete(&self) -> bool {
        let _guard = self.lock.lock();
        let mut accounts = self.accounts();
        if accounts.remove(VAULT_ACCOUNT).is_none() {
            return false;
        }
        match self.write_accounts(&accounts) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to delete credential: {}", e);
                false
            }
        }
    }
}

/// Requests accepted by the native host.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum NativeRequest {
    StoreApiKey {
        #[serde(rename = "apiKey")]
        api_key: Option<String>,
    },
    GetApiKey,
    DeleteApiKey,
}

impl NativeRequest {
    pub const ACTIONS: &'static [&'static str] = &["storeApiKey", "getApiKey", "deleteApiKey"];
}

/// Native host response. The key itself is never returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NativeResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "hasApiKey")]
    pub has_api_key: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NativeResponse {
    fn done(action: &str, success: bool) -> Self {
        Self {
            success,
            action: Some(action.to_string()),
            has_api_key: None,
            error: None,
        }
    }

    fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            action: None,
            has_api_key: None,
            error: Some(error.into()),
        }
    }
}

/// Handle one raw native message. Unknown actions are rejected.
pub fn handle_native_message(vault: &dyn CredentialVault, raw: serde_json::Value) -> NativeResponse {
    let action = raw.get("action").and_then(|a| a.as_str()).unwrap_or_default();
    if !NativeRequest::ACTIONS.contains(&action) {
        return NativeResponse::error(format!("Unrecognized action: {}", action));
    }

    let request: NativeRequest = match serde_json::from_value(raw) {
        Ok(r) => r,
        Err(e) => return NativeResponse::error(format!("Malformed request: {}", e)),
    };

    match request {
        NativeRequest::StoreApiKey { api_key } => {
            match api_key.as_deref().and_then(Credential::parse) {
                Some(credential) => {
                    let stored = vault.store(&credential);
                    info!("Native host stored credential: {}", stored);
                    NativeResponse::done("storeApiKey", stored)
                }
                None => NativeResponse::error("Missing API key"),
            }
        }
        NativeRequest::GetApiKey => {
            let present = vault.get().is_some();
            let mut response = NativeResponse::done("getApiKey", present);
            response.has_api_key = Some(present);
            response
        }
        NativeRequest::DeleteApiKey => NativeResponse::done("deleteApiKey", vault.delete()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_store_get_delete() {
        let vault = MemoryVault::new();

        let r = handle_native_message(&vault, json!({"action": "getApiKey"}));
        assert_eq!(r.has_api_key, Some(false));
        assert!(!r.success);

        let r = handle_native_message(&vault, json!({"action": "storeApiKey", "apiKey": "sk-1"}));
        assert!(r.success);

        let r = handle_native_message(&vault, json!({"action": "getApiKey"}));
        assert_eq!(r.has_api_key, Some(true));
        let wire = serde_json::to_string(&r).unwrap();
        assert!(!wire.contains("sk-1"));

        let r = handle_native_message(&vault, json!({"action": "deleteApiKey"}));
        assert!(r.success);
        assert!(vault.get().is_none());
    }

    #[test]
    fn test_missing_key_and_unknown_action() {
        let vault = MemoryVault::new();
        let r = handle_native_message(&vault, json!({"action": "storeApiKey"}));
        assert_eq!(r.error.as_deref(), Some("Missing API key"));

        let r = handle_native_message(&vault, json!({"action": "ping", "x": 1}));
        assert!(!r.success);
        assert_eq!(r.error.as_deref(), Some("Unrecognized action: ping"));
    }

    #[test]
    fn test_file_vault_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");

        let vault = FileVault::new(&path);
        assert!(vault.get().is_none());
        assert!(vault.store(&Credential::parse("sk-file").unwrap()));

        let reopened = FileVault::new(&path);
        assert_eq!(reopened.get().unwrap().expose(), "sk-file");
        assert!(reopened.delete());
        assert!(!reopened.delete());
    }

    #[test]
    fn test_file_vault_skips_blank_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, r#"{"deepseek-api-key": "   "}"#).unwrap();

        let vault = FileVault::new(&path);
        assert!(vault.get().is_none());
        let r = handle_native_message(&vault, serde_json::json!({"action": "getApiKey"}));
        assert_eq!(r.has_api_key, Some(false));
    }
}
