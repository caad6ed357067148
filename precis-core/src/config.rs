use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::prompt::DEFAULT_TEMPLATE;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PrecisConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeminiConfig {
    /// Absent until a deployment provides one; requests fail with a
    /// configuration error rather than the process refusing to start.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_seconds: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-flash".to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connect_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 5,
            connect_timeout_seconds: 5,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PromptConfig {
    pub template: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl PrecisConfig {
    /// Load configuration from (in increasing priority) built-in defaults,
    /// an optional TOML file, `PRECIS_<SECTION>__<KEY>` variables, and the
    /// conventional `GEMINI_API_KEY`, `GEMINI_API_URL`, `DATABASE_URL` and
    /// `PORT` variables.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder().add_source(File::with_name(path).required(false));
        Self::layered(builder, EnvOverrides::from_env())?
            .build()?
            .try_deserialize()
    }

    fn layered(
        builder: ConfigBuilder<DefaultState>,
        overrides: EnvOverrides,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        builder
            .add_source(
                Environment::with_prefix("PRECIS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("gemini.api_key", overrides.gemini_api_key)?
            .set_override_option("gemini.base_url", overrides.gemini_api_url)?
            .set_override_option("database.url", overrides.database_url)?
            .set_override_option("server.port", overrides.port)
    }

    /// The Gemini credential, treating an empty string as unset.
    pub fn api_key(&self) -> Option<&str> {
        self.gemini.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

/// The conventional deployment variables that sit above every other layer.
/// Empty values count as unset.
#[derive(Debug, Default)]
struct EnvOverrides {
    gemini_api_key: Option<String>,
    gemini_api_url: Option<String>,
    database_url: Option<String>,
    port: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Self {
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_api_url: var("GEMINI_API_URL"),
            database_url: var("DATABASE_URL"),
            port: var("PORT"),
        }
    }
}
