use crate::readiness::PollConfig;
use anyhow::{Context, Result};
use serde_derive::Deserialize;
use std::path::Path;
use url::Url;

/// Client configuration. Every field has a dev-server default, so a
/// missing config file still produces a working setup against
/// `http://localhost:8080` with the `dev` key.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base: Url,
    pub key: String,
    pub from_email: String,
    pub from_name: Option<String>,
    pub to: String,
    pub reply_to: Option<String>,
    pub readiness: Readiness,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Readiness {
    pub path: String,
    #[serde(flatten)]
    pub poll: PollConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base: Url::parse("http://localhost:8080").unwrap(),
            key: "dev".to_owned(),
            from_email: "sender@example.com".to_owned(),
            from_name: None,
            to: "user@example.com".to_owned(),
            reply_to: Some("reply@example.com".to_owned()),
            readiness: Readiness::default(),
        }
    }
}

impl Default for Readiness {
    fn default() -> Self {
        Readiness {
            path: "/healthz".to_owned(),
            poll: PollConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Config> {
        if !Path::new(path).exists() {
            log::debug!("config file `{}` not found, using defaults", path);
            return Ok(Config::default());
        }
        let buffer = std::fs::read_to_string(path)
            .with_context(|| format!("could not read file `{}`", path))?;
        toml::from_str(&buffer)
            .with_context(|| format!("could not parse toml config file `{}`", path))
    }

    pub fn health_url(&self) -> Result<Url> {
        self.api_base
            .join(&self.readiness.path)
            .with_context(|| format!("invalid health check path `{}`", self.readiness.path))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_config_falls_back_to_dev_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!("http://localhost:8080/", config.api_base.as_str());
        assert_eq!("dev", config.key);
        assert_eq!(30_000, config.readiness.poll.timeout_ms);
        assert_eq!(500, config.readiness.poll.interval_ms);
        assert_eq!("/healthz", config.readiness.path);
    }

    #[test]
    fn readiness_table_overrides_the_polling_budget() {
        let config: Config = toml::from_str(
            r#"
            api_base = "http://mail.internal:9090"
            key = "staging"

            [readiness]
            path = "/livez"
            timeout_ms = 5000
            interval_ms = 100
            "#,
        )
        .unwrap();

        assert_eq!("staging", config.key);
        assert_eq!(5_000, config.readiness.poll.timeout_ms);
        assert_eq!(100, config.readiness.poll.interval_ms);
        assert_eq!(
            "http://mail.internal:9090/livez",
            config.health_url().unwrap().as_str()
        );
    }

    #[test]
    fn health_url_joins_base_and_path() {
        let config = Config::default();
        assert_eq!(
            "http://localhost:8080/healthz",
            config.health_url().unwrap().as_str()
        );
    }
}
