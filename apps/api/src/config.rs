use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::llm_client::gemini::DEFAULT_API_BASE;
use crate::llm_client::RetryPolicy;

/// Candidate priority list used when GEMINI_MODELS is not set.
pub const DEFAULT_MODELS: [&str; 6] = [
    "gemini-2.0-flash",
    "gemini-2.0-flash-exp",
    "gemini-1.5-flash",
    "gemini-1.5-flash-latest",
    "gemini-pro",
    "gemini-1.0-pro",
];

/// Application configuration loaded from environment variables.
/// Startup fails if DATABASE_URL is missing or a value does not parse;
/// a missing GEMINI_API_KEY only disables the AI routes.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub gemini_api_key: Option<String>,
    pub gemini_api_base: String,
    pub gemini_models: Vec<String>,
    pub gemini_default_model: String,
    pub max_rate_limit_retries: u32,
    pub backoff_unit: Duration,
    pub max_backoff: Duration,
    pub llm_deadline: Option<Duration>,
    pub inline_attachment_max_bytes: usize,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup (the process env in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL")
            .with_context(|| "Required environment variable 'DATABASE_URL' is not set")?;

        let gemini_models = match get("GEMINI_MODELS") {
            Some(raw) => parse_model_list(&raw)?,
            None => DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
        };
        let gemini_default_model = match get("GEMINI_DEFAULT_MODEL") {
            Some(model) => model.trim().to_string(),
            None => gemini_models[0].clone(),
        };

        let deadline_secs: u64 = parse_or("LLM_DEADLINE_SECS", get("LLM_DEADLINE_SECS"), 90)?;

        Ok(Config {
            database_url,
            gemini_api_key: get("GEMINI_API_KEY").map(|k| k.trim().to_string()),
            gemini_api_base: get("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            gemini_models,
            gemini_default_model,
            max_rate_limit_retries: parse_or(
                "LLM_MAX_RATE_LIMIT_RETRIES",
                get("LLM_MAX_RATE_LIMIT_RETRIES"),
                2,
            )?,
            backoff_unit: Duration::from_millis(parse_or(
                "LLM_BACKOFF_UNIT_MS",
                get("LLM_BACKOFF_UNIT_MS"),
                1000,
            )?),
            max_backoff: Duration::from_millis(parse_or(
                "LLM_MAX_BACKOFF_MS",
                get("LLM_MAX_BACKOFF_MS"),
                8000,
            )?),
            llm_deadline: (deadline_secs > 0).then(|| Duration::from_secs(deadline_secs)),
            inline_attachment_max_bytes: parse_or(
                "INLINE_ATTACHMENT_MAX_BYTES",
                get("INLINE_ATTACHMENT_MAX_BYTES"),
                15 * 1024 * 1024,
            )?,
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", get("MAX_UPLOAD_BYTES"), 10 * 1024 * 1024)?,
            port: parse_or("PORT", get("PORT"), 8080)
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_rate_limit_retries: self.max_rate_limit_retries,
            backoff_unit: self.backoff_unit,
            max_backoff: self.max_backoff,
            deadline: self.llm_deadline,
        }
    }
}

/// Comma-separated model names; blanks are dropped and an empty result is an error.
fn parse_model_list(raw: &str) -> Result<Vec<String>> {
    let models: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect();
    if models.is_empty() {
        bail!("GEMINI_MODELS must list at least one model name");
    }
    Ok(models)
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(v) => v
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{v}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/hirewise")]).unwrap();

        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.gemini_models.len(), DEFAULT_MODELS.len());
        assert_eq!(config.gemini_default_model, "gemini-2.0-flash");
        assert_eq!(config.gemini_api_base, DEFAULT_API_BASE);
        assert_eq!(config.port, 8080);

        let policy = config.retry_policy();
        assert_eq!(policy.max_rate_limit_retries, 2);
        assert_eq!(policy.backoff_unit, Duration::from_millis(1000));
        assert_eq!(policy.max_backoff, Duration::from_millis(8000));
        assert_eq!(policy.deadline, Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_database_url_is_required() {
        let err = config_from(&[("GEMINI_API_KEY", "k")]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_model_list_parsing() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("GEMINI_MODELS", " gemini-1.5-flash , ,gemini-pro "),
            ("GEMINI_DEFAULT_MODEL", "gemini-pro"),
        ])
        .unwrap();
        assert_eq!(config.gemini_models, vec!["gemini-1.5-flash", "gemini-pro"]);
        assert_eq!(config.gemini_default_model, "gemini-pro");

        assert!(config_from(&[("DATABASE_URL", "postgres://x"), ("GEMINI_MODELS", " , ,")]).is_err());
    }

    #[test]
    fn test_zero_deadline_disables_it() {
        let config = config_from(&[("DATABASE_URL", "postgres://x"), ("LLM_DEADLINE_SECS", "0")])
            .unwrap();
        assert!(config.llm_deadline.is_none());
    }

    #[test]
    fn test_invalid_number_names_the_variable() {
        let err = config_from(&[("DATABASE_URL", "postgres://x"), ("PORT", "eighty")]).unwrap_err();
        assert!(format!("{err:#}").contains("PORT"));
    }
}
