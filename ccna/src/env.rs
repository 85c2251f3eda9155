//! Turning a [`Config`] into environment variables for the launched tool.

use config::Config;

pub const BASE_URL_VAR: &str = "ANTHROPIC_BASE_URL";
pub const AUTH_TOKEN_VAR: &str = "ANTHROPIC_AUTH_TOKEN";
pub const OPUS_MODEL_VAR: &str = "ANTHROPIC_DEFAULT_OPUS_MODEL";
pub const SONNET_MODEL_VAR: &str = "ANTHROPIC_DEFAULT_SONNET_MODEL";
pub const HAIKU_MODEL_VAR: &str = "ANTHROPIC_DEFAULT_HAIKU_MODEL";
pub const SUBAGENT_MODEL_VAR: &str = "CLAUDE_CODE_SUBAGENT_MODEL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Mac,
    Linux,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::Mac
        } else {
            Platform::Linux
        }
    }
}

/// The six variable bindings, always in the same order.
pub fn bindings(config: &Config) -> Vec<(&'static str, String)> {
    vec![
        (BASE_URL_VAR, config.base_url.clone()),
        (AUTH_TOKEN_VAR, config.auth_token.clone()),
        (OPUS_MODEL_VAR, config.opus_model.clone()),
        (SONNET_MODEL_VAR, config.sonnet_model.clone()),
        (HAIKU_MODEL_VAR, config.haiku_model.clone()),
        (SUBAGENT_MODEL_VAR, config.subagent_model.clone()),
    ]
}

/// Bindings plus the platform they are displayed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentMap {
    pub platform: Platform,
    pub vars: Vec<(&'static str, String)>,
}

pub fn render(config: &Config, platform: Platform) -> EnvironmentMap {
    EnvironmentMap {
        platform,
        vars: bindings(config),
    }
}

impl EnvironmentMap {
    /// Shell assignments for the platform's usual shell. Values are wrapped
    /// in double quotes but embedded quotes are not escaped.
    pub fn assignments(&self) -> Vec<String> {
        self.vars
            .iter()
            .map(|(name, value)| match self.platform {
                Platform::Windows => format!("$env:{name}=\"{value}\""),
                Platform::Mac | Platform::Linux => format!("export {name}=\"{value}\""),
            })
            .collect()
    }

    /// `set NAME=value` lines for running the tool by hand.
    pub fn manual_fallback(&self) -> Vec<String> {
        self.vars
            .iter()
            .map(|(name, value)| format!("set {name}={value}"))
            .collect()
    }

    pub fn usage_hints(&self) -> Vec<String> {
        match self.platform {
            Platform::Windows => vec![
                "PowerShell: paste the lines above into PowerShell".to_string(),
                format!(
                    "Command Prompt: use set, for example: set {BASE_URL_VAR}={}",
                    self.value(BASE_URL_VAR).unwrap_or_default()
                ),
            ],
            Platform::Mac | Platform::Linux => vec![
                "bash/zsh: paste the lines above into your terminal".to_string(),
                "or add them to ~/.bashrc, ~/.zshrc, ~/.profile or similar".to_string(),
            ],
        }
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(var, _)| *var == name)
            .map(|(_, value)| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::RoleAssignment;

    fn sample() -> Config {
        Config::new(
            "https://api.example.com".into(),
            "sk-123".into(),
            RoleAssignment {
                opus: "o".into(),
                sonnet: "s".into(),
                haiku: "h".into(),
                subagent: "sub".into(),
            },
        )
    }

    #[test]
    fn bindings_map_each_field_once() {
        assert_eq!(
            bindings(&sample()),
            vec![
                ("ANTHROPIC_BASE_URL", "https://api.example.com".to_string()),
                ("ANTHROPIC_AUTH_TOKEN", "sk-123".to_string()),
                ("ANTHROPIC_DEFAULT_OPUS_MODEL", "o".to_string()),
                ("ANTHROPIC_DEFAULT_SONNET_MODEL", "s".to_string()),
                ("ANTHROPIC_DEFAULT_HAIKU_MODEL", "h".to_string()),
                ("CLAUDE_CODE_SUBAGENT_MODEL", "sub".to_string()),
            ]
        );
    }

    #[test]
    fn platforms_differ_only_in_syntax() {
        let posix = render(&sample(), Platform::Linux);
        let windows = render(&sample(), Platform::Windows);
        assert_eq!(posix.vars, windows.vars);
        assert_eq!(posix.assignments().len(), 6);
        assert_eq!(windows.assignments().len(), 6);
        assert_eq!(posix.assignments()[0], "export ANTHROPIC_BASE_URL=\"https://api.example.com\"");
        assert_eq!(windows.assignments()[5], "$env:CLAUDE_CODE_SUBAGENT_MODEL=\"sub\"");
        assert_eq!(
            render(&sample(), Platform::Mac).assignments(),
            posix.assignments()
        );
    }

    #[test]
    fn embedded_quotes_are_not_escaped() {
        let mut cfg = sample();
        cfg.opus_model = "we\"ird".into();
        let lines = render(&cfg, Platform::Linux).assignments();
        assert_eq!(lines[2], "export ANTHROPIC_DEFAULT_OPUS_MODEL=\"we\"ird\"");
    }

    #[test]
    fn manual_fallback_uses_set_syntax() {
        let lines = render(&sample(), Platform::Linux).manual_fallback();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "set ANTHROPIC_AUTH_TOKEN=sk-123");
    }

    #[test]
    fn windows_hints_mention_base_url() {
        let hints = render(&sample(), Platform::Windows).usage_hints();
        assert!(hints[1].ends_with("set ANTHROPIC_BASE_URL=https://api.example.com"));
    }
}
