use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four labels a model id can be assigned to.
///
/// A role is a naming convention consumed by the launched tool; any model may
/// be assigned to any role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Opus,
    Sonnet,
    Haiku,
    Subagent,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Opus, Role::Sonnet, Role::Haiku, Role::Subagent];

    pub fn label(self) -> &'static str {
        match self {
            Role::Opus => "Opus",
            Role::Sonnet => "Sonnet",
            Role::Haiku => "Haiku",
            Role::Subagent => "Subagent",
        }
    }

    /// What the launched tool uses the role for.
    pub fn description(self) -> Option<&'static str> {
        match self {
            Role::Opus => Some("used for opus, or opusplan while plan mode is active"),
            Role::Sonnet => Some("used for sonnet, or opusplan while plan mode is inactive"),
            Role::Haiku => Some("used for haiku and background tasks"),
            Role::Subagent => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Model id bound to each role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleAssignment {
    pub opus: String,
    pub sonnet: String,
    pub haiku: String,
    pub subagent: String,
}

impl RoleAssignment {
    pub fn get(&self, role: Role) -> &str {
        match role {
            Role::Opus => &self.opus,
            Role::Sonnet => &self.sonnet,
            Role::Haiku => &self.haiku,
            Role::Subagent => &self.subagent,
        }
    }

    pub fn set(&mut self, role: Role, model_id: String) {
        match role {
            Role::Opus => self.opus = model_id,
            Role::Sonnet => self.sonnet = model_id,
            Role::Haiku => self.haiku = model_id,
            Role::Subagent => self.subagent = model_id,
        }
    }
}

/// The persisted launcher configuration.
///
/// Serialized with camelCase keys so existing `config.json` files keep
/// working. Role fields default to empty when missing; selection falls back
/// to catalog defaults for them.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub base_url: String,
    pub auth_token: String,
    #[serde(default)]
    pub opus_model: String,
    #[serde(default)]
    pub sonnet_model: String,
    #[serde(default)]
    pub haiku_model: String,
    #[serde(default)]
    pub subagent_model: String,
}

impl Config {
    pub fn new(base_url: String, auth_token: String, roles: RoleAssignment) -> Self {
        Self {
            base_url,
            auth_token,
            opus_model: roles.opus,
            sonnet_model: roles.sonnet,
            haiku_model: roles.haiku,
            subagent_model: roles.subagent,
        }
    }

    pub fn roles(&self) -> RoleAssignment {
        RoleAssignment {
            opus: self.opus_model.clone(),
            sonnet: self.sonnet_model.clone(),
            haiku: self.haiku_model.clone(),
            subagent: self.subagent_model.clone(),
        }
    }

    /// Replaces all four role bindings, keeping endpoint and credential.
    pub fn with_roles(self, roles: RoleAssignment) -> Self {
        Self::new(self.base_url, self.auth_token, roles)
    }

    /// Name of the first required connection field that is blank.
    pub fn missing_connection_field(&self) -> Option<&'static str> {
        if self.base_url.trim().is_empty() {
            Some("baseUrl")
        } else if self.auth_token.trim().is_empty() {
            Some("authToken")
        } else {
            None
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing_connection_field().is_none()
            && Role::ALL
                .iter()
                .all(|role| !self.roles().get(*role).trim().is_empty())
    }
}

// Hand-written so the token never ends up in logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("auth_token", &mask_secret(&self.auth_token))
            .field("opus_model", &self.opus_model)
            .field("sonnet_model", &self.sonnet_model)
            .field("haiku_model", &self.haiku_model)
            .field("subagent_model", &self.subagent_model)
            .finish()
    }
}

/// Shortens a credential for display: the first and last four characters of
/// long values, a fixed placeholder otherwise.
pub fn mask_secret(val: &str) -> String {
    if val.is_empty() {
        return "-".into();
    }
    let chars: Vec<char> = val.chars().collect();
    if chars.len() <= 12 {
        return "****".into();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
