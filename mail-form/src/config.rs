use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_RELAY_BASE_URL: &str = "http://localhost:4566";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Where `/api/*` is forwarded to, with the `/api` prefix stripped.
    pub relay_base_url: String,
    /// Base the server-side submission posts `/api/send-email` to.
    /// Defaults to this server itself, so it goes through the same proxy as the browser.
    #[serde(default)]
    pub api_base_url: Option<String>,
}

impl Config {
    pub fn api_base_url(&self) -> String {
        self.api_base_url
            .clone()
            .unwrap_or_else(|| format!("http://127.0.0.1:{}", self.port))
    }
}

fn read_yaml(path: &str) -> Result<Config, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    serde_yaml::from_str(&contents).map_err(Into::into)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            relay_base_url: DEFAULT_RELAY_BASE_URL.to_string(),
            api_base_url: None,
        }
    }
}

/// Variables found by `lookup` win over whatever `config` already holds.
pub fn apply_overrides<F>(mut config: Config, lookup: F) -> Result<Config, Box<dyn std::error::Error>>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("FORM_PORT") {
        config.port = v
            .parse::<u16>()
            .map_err(|e| format!("Failed to parse FORM_PORT: {e}"))?;
    }
    if let Some(v) = lookup("RELAY_BASE_URL") {
        config.relay_base_url = v;
    }
    if let Some(v) = lookup("FORM_API_BASE_URL") {
        config.api_base_url = Some(v);
    }
    Ok(config)
}

pub fn from_lookup<F>(lookup: F) -> Result<Config, Box<dyn std::error::Error>>
where
    F: Fn(&str) -> Option<String>,
{
    apply_overrides(Config::default(), lookup)
}

fn load_file() -> Result<Option<Config>, Box<dyn std::error::Error>> {
    let config_path = env::var("MAIL_FORM_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    if Path::new(&config_path).exists() {
        return read_yaml(&config_path).map(Some);
    }

    for fallback in ["config.yaml", "config.example.yaml"] {
        if Path::new(fallback).exists() {
            tracing::warn!(
                "Config file '{}' not found, falling back to '{}'",
                config_path,
                fallback
            );
            return read_yaml(fallback).map(Some);
        }
    }

    Ok(None)
}

/// File values (or defaults), with environment variables applied on top.
pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    let base = load_file()?.unwrap_or_else(|| {
        tracing::info!("No config file found, starting from defaults");
        Config::default()
    });

    apply_overrides(base, |key| env::var(key).ok())
}
