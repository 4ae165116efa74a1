use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

const ENV_FILE: &str = ".env";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Operator's own channel; the bot joins its chat and raids from it.
    pub twitch_username: String,
    pub twitch_bot_username: String,
    pub twitch_bot_secret: String,
    pub twitch_client_id: String,
    pub twitch_client_secret: String,
    pub priority_streamers: Vec<String>,
    pub backup_streamers: Vec<String>,
    pub games_blacklist: Vec<String>,
    #[serde(default = "default_helix_api_base")]
    pub helix_api_base: String,
    #[serde(default = "default_oauth_token_url")]
    pub oauth_token_url: String,
    #[serde(default = "default_chat_ws_url")]
    pub chat_ws_url: String,
}

fn default_helix_api_base() -> String {
    "https://api.twitch.tv/helix".to_string()
}

fn default_oauth_token_url() -> String {
    "https://id.twitch.tv/oauth2/token".to_string()
}

fn default_chat_ws_url() -> String {
    "wss://irc-ws.chat.twitch.tv:443".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config = Self::parse(&content)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "Failed to parse config TOML")
    }

    /// Secrets from the environment win over the file.
    pub fn apply_env_overrides(&mut self) {
        if let Some(secret) = env_secret("TWITCH_BOT_SECRET") {
            self.twitch_bot_secret = secret;
        }
        if let Some(secret) = env_secret("TWITCH_CLIENT_SECRET") {
            self.twitch_client_secret = secret;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("twitch_username", &self.twitch_username),
            ("twitch_bot_username", &self.twitch_bot_username),
            ("twitch_bot_secret", &self.twitch_bot_secret),
            ("twitch_client_id", &self.twitch_client_id),
            ("twitch_client_secret", &self.twitch_client_secret),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                anyhow::bail!("config key `{}` cannot be empty", key);
            }
        }
        if self.priority_streamers.is_empty() && self.backup_streamers.is_empty() {
            tracing::warn!("both priority_streamers and backup_streamers are empty");
        }
        Ok(())
    }

    /// Load .env file into process environment. Real env vars take precedence.
    pub fn load_env_file() {
        let path = Path::new(ENV_FILE);
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return,
        };
        // Strip BOM if present (common on Windows-created files)
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
        for (key, value) in parse_env_lines(content) {
            if std::env::var(key).is_err() {
                std::env::set_var(key, value);
            }
        }
    }
}

fn parse_env_lines(content: &str) -> Vec<(&str, &str)> {
    content
        .lines()
        .map(|line| line.trim().trim_matches('\r'))
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim().trim_matches('"').trim_matches('\'')))
        .collect()
}

fn env_secret(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(sanitize_key(&value)),
        _ => None,
    }
}

/// Strip carriage returns, BOM, and other invisible chars from a secret value.
fn sanitize_key(raw: &str) -> String {
    raw.replace(['\r', '\u{feff}', '\u{200b}'], "")
        .trim()
        .to_string()
}
