use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path};

pub const DEFAULT_PORT: u16 = 4566;
pub const DEFAULT_SMTP_HOST: &str = "mailhog";
pub const DEFAULT_SMTP_PORT: u16 = 1025;
pub const DEFAULT_SENDER: &str = "noreply@example.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub port: u16,
    pub sender: String,
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub transport: TransportKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    #[default]
    Smtp,
    Stub,
}

impl std::str::FromStr for TransportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "smtp" => Ok(Self::Smtp),
            "stub" => Ok(Self::Stub),
            other => Err(format!("unknown mail transport '{other}'")),
        }
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
            sender: DEFAULT_SENDER.to_string(),
            smtp: SmtpConfig {
                host: DEFAULT_SMTP_HOST.to_string(),
                port: DEFAULT_SMTP_PORT,
            },
            transport: TransportKind::default(),
        }
    }
}

fn parse_port(key: &str, value: &str) -> Result<u16, String> {
    value
        .parse::<u16>()
        .map_err(|e| format!("Failed to parse {key}: {e}"))
}

/// Overwrites every field whose variable `lookup` finds. Unset ones keep their value.
pub fn apply_overrides<F>(mut config: Config, lookup: F) -> Result<Config, Box<dyn std::error::Error>>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("RELAY_PORT") {
        config.port = parse_port("RELAY_PORT", &v)?;
    }
    if let Some(v) = lookup("MAIL_SENDER") {
        config.sender = v;
    }
    if let Some(v) = lookup("SMTP_HOST") {
        config.smtp.host = v;
    }
    if let Some(v) = lookup("SMTP_PORT") {
        config.smtp.port = parse_port("SMTP_PORT", &v)?;
    }
    if let Some(v) = lookup("MAIL_TRANSPORT") {
        config.transport = v.parse::<TransportKind>()?;
    }
    Ok(config)
}

/// Local mail catcher defaults with `lookup` overrides applied.
pub fn from_lookup<F>(lookup: F) -> Result<Config, Box<dyn std::error::Error>>
where
    F: Fn(&str) -> Option<String>,
{
    apply_overrides(Config::default(), lookup)
}

fn load_file() -> Result<Option<Config>, Box<dyn std::error::Error>> {
    // Retrieve env variable
    let config_path = env::var("MAIL_RELAY_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    // Try env path
    if Path::new(&config_path).exists() {
        return read_yaml(&config_path).map(Some);
    }

    // Fallback to config.yaml
    if Path::new("config.yaml").exists() {
        tracing::warn!(
            "Config file '{}' not found, falling back to 'config.yaml'",
            config_path
        );
        return read_yaml("config.yaml").map(Some);
    }

    // Fallback to config.example.yaml
    if Path::new("config.example.yaml").exists() {
        tracing::warn!(
            "Config file '{}' and 'config.yaml' not found, falling back to 'config.example.yaml'",
            config_path
        );
        return read_yaml("config.example.yaml").map(Some);
    }

    Ok(None)
}

/// File values (or defaults when no file exists), then environment variables on top.
pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    let base = load_file()?.unwrap_or_else(|| {
        tracing::info!("No config file found, starting from defaults");
        Config::default()
    });

    apply_overrides(base, |key| env::var(key).ok())
}
