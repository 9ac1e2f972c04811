use std::time::Duration;

use anyhow::{Context, Result, bail};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub http_addr: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub completion_timeout: Duration,
}

impl ServiceConfig {
    pub fn from_env(default_http_addr: &str) -> Result<Self> {
        Self::from_lookup(default_http_addr, |key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(default_http_addr: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let http_addr = present("HTTP_ADDR").unwrap_or_else(|| default_http_addr.to_string());
        let gemini_api_key = present("GEMINI_API_KEY").or_else(|| present("API_KEY"));
        let gemini_model =
            present("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        let timeout_secs = match present("COMPLETION_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("COMPLETION_TIMEOUT_SECS is not a number: {raw}"))?,
            None => DEFAULT_COMPLETION_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            bail!("COMPLETION_TIMEOUT_SECS must be positive");
        }

        Ok(Self {
            http_addr,
            gemini_api_key,
            gemini_model,
            completion_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<ServiceConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ServiceConfig::from_lookup("0.0.0.0:8080", |key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config.http_addr, "0.0.0.0:8080");
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.completion_timeout, Duration::from_secs(10));
    }

    #[test]
    fn api_key_falls_back_and_ignores_blanks() {
        let config_a = config(&[("API_KEY", "fallback")]).unwrap();
        assert_eq!(config_a.gemini_api_key.as_deref(), Some("fallback"));

        let config_b = config(&[("GEMINI_API_KEY", "  "), ("API_KEY", "fallback")]).unwrap();
        assert_eq!(config_b.gemini_api_key.as_deref(), Some("fallback"));

        let config_c = config(&[("GEMINI_API_KEY", "primary"), ("API_KEY", "fallback")]).unwrap();
        assert_eq!(config_c.gemini_api_key.as_deref(), Some("primary"));
    }

    #[test]
    fn timeout_must_be_positive_number() {
        let config_ok = config(&[("COMPLETION_TIMEOUT_SECS", "3"), ("HTTP_ADDR", "127.0.0.1:9000")])
            .unwrap();
        assert_eq!(config_ok.completion_timeout, Duration::from_secs(3));
        assert_eq!(config_ok.http_addr, "127.0.0.1:9000");

        assert!(config(&[("COMPLETION_TIMEOUT_SECS", "0")]).is_err());
        assert!(config(&[("COMPLETION_TIMEOUT_SECS", "soon")]).is_err());
    }
}
