use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

pub const DEFAULT_PERPLEXITY_BASE_URL: &str = "https://api.perplexity.ai";
pub const DEFAULT_MODEL: &str = "mistral-7b-instruct";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub environment: Environment,
    pub perplexity: PerplexityConfig,
    pub generation: GenerationDefaults,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PerplexityConfig {
    pub api_key: Secret<String>,
    pub base_url: String,
    /// Transport timeout applied by the HTTP client.
    pub timeout_secs: u64,
}

/// Request parameters used when a caller does not override them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerationDefaults {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Redis connection string. When absent outside production the service
    /// keeps word history in memory.
    pub redis_url: Option<String>,
}

impl RelayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let environment = match env::var("ENVIRONMENT").as_deref() {
            Ok("prod") => Environment::Prod,
            _ => Environment::Dev,
        };
        let is_prod = environment == Environment::Prod;

        let redis_url = env::var("REDIS_URL").ok().filter(|url| !url.is_empty());
        if is_prod && redis_url.is_none() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "REDIS_URL is required in production but not set"
            )));
        }

        Ok(RelayConfig {
            common: common_config,
            environment,
            perplexity: PerplexityConfig {
                api_key: Secret::new(get_env("PERPLEXITY_API_KEY", None)?),
                base_url: get_env("PERPLEXITY_BASE_URL", Some(DEFAULT_PERPLEXITY_BASE_URL))?,
                timeout_secs: parse_env("PERPLEXITY_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            },
            generation: GenerationDefaults {
                model: get_env("PERPLEXITY_MODEL", Some(DEFAULT_MODEL))?,
                max_tokens: parse_env("PERPLEXITY_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
                temperature: parse_env("PERPLEXITY_TEMPERATURE", DEFAULT_TEMPERATURE)?,
            },
            store: StoreConfig { redis_url },
        })
    }
}

fn get_env(key: &str, default: Option<&str>) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => default.map(str::to_string).ok_or_else(|| {
            AppError::ConfigError(anyhow::anyhow!("{} is required but not set", key))
        }),
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val.parse().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("{} has invalid value '{}': {}", key, val, e))
        }),
        Err(_) => Ok(default),
    }
}
