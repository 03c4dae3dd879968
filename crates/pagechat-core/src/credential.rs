//! Opaque model-endpoint credential.

use serde::{Deserialize, Deserializer, Serialize};

/// What any display or log surface shows in place of a credential.
pub const CREDENTIAL_MASK: &str = "••••••••••••••••";

/// An API key. `Debug` and `Display` only ever print the mask.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    /// Accept a user-entered key. Blank input and the mask itself are rejected.
    pub fn parse(input: &str) -> Option<Self> {
        let key = input.trim();
        if key.is_empty() || key == CREDENTIAL_MASK {
            None
        } else {
            Some(Self(key.to_string()))
        }
    }

    /// The raw key, for the `Authorization` header only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

/// Stored keys go through the same check as typed ones.
impl<'de> Deserialize<'de> for Credential {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| serde::de::Error::custom("blank or masked credential"))
    }
}

/// `deserialize_with` helper: a blank or masked stored key loads as `None`
/// instead of failing the surrounding record.
pub fn deserialize_optional<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Credential>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Credential::parse))
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credential({})", CREDENTIAL_MASK)
    }
}

impl std::fmt::Display for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(CREDENTIAL_MASK)
    }
}
