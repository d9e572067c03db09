use crate::client::Client;
use crate::config::Config;
use crate::message::{Message, Recipient, SendOptions, SendResult};
use crate::readiness::{wait_until_ready, HttpProbe};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use clap::Clap;
use std::collections::HashMap;

pub mod send;
pub mod send_raw;
pub mod send_template;
pub mod wait;

/// Blocks until the configured server answers its health check, or
/// bails with the timeout error for the caller to surface.
pub(crate) async fn await_server(config: &Config) -> Result<()> {
    let url = config.health_url()?;
    let probe = HttpProbe::new(url, config.readiness.poll.attempt_timeout())?;
    wait_until_ready(&probe, &config.readiness.poll).await?;
    Ok(())
}

pub(crate) fn client_from(config: &Config) -> Result<Client> {
    Client::new(config.api_base.clone(), config.key.clone())
}

pub(crate) fn print_results(results: &[SendResult]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(results)?);
    Ok(())
}

// same formats the server itself accepts for send_at
pub(crate) fn validate_send_at(raw: &str) -> Result<()> {
    if DateTime::parse_from_rfc3339(raw).is_ok()
        || NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").is_ok()
        || NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok()
    {
        return Ok(());
    }
    anyhow::bail!("could not parse send_at timestamp `{}`", raw)
}

/// Message flags shared by `send` and `send-template`; anything not
/// given on the command line falls back to the config file.
#[derive(Clap, Debug, Default)]
pub struct MessageOpts {
    /// Recipient address, may be given multiple times
    #[clap(short, long)]
    pub to: Vec<String>,
    /// Sender address
    #[clap(long)]
    pub from: Option<String>,
    /// Sender display name
    #[clap(long)]
    pub from_name: Option<String>,
    /// Message subject
    #[clap(short, long)]
    pub subject: Option<String>,
    /// Plain text body
    #[clap(long)]
    pub text: Option<String>,
    /// HTML body
    #[clap(long)]
    pub html: Option<String>,
    /// Reply-To header
    #[clap(long)]
    pub reply_to: Option<String>,
    /// Tag the message, may be given multiple times
    #[clap(long = "tag")]
    pub tags: Vec<String>,
    /// Schedule delivery: RFC 3339, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD`
    #[clap(long)]
    pub send_at: Option<String>,
}

impl MessageOpts {
    pub(crate) fn message(&self, config: &Config) -> Message {
        let to = if self.to.is_empty() {
            vec![config.to.clone()]
        } else {
            self.to.clone()
        };

        let mut headers = HashMap::new();
        if let Some(reply_to) = self.reply_to.clone().or_else(|| config.reply_to.clone()) {
            headers.insert("Reply-To".to_owned(), reply_to);
        }

        Message {
            html: self.html.clone(),
            text: self.text.clone(),
            subject: self.subject.clone(),
            from_email: self
                .from
                .clone()
                .unwrap_or_else(|| config.from_email.clone()),
            from_name: self.from_name.clone().or_else(|| config.from_name.clone()),
            to: to.iter().map(|email| Recipient::to(email)).collect(),
            headers,
            tags: self.tags.clone(),
            ..Default::default()
        }
    }

    pub(crate) fn options(&self) -> Result<SendOptions> {
        let send_at = match &self.send_at {
            Some(raw) => {
                validate_send_at(raw)
                    .with_context(|| format!("rejecting --send-at value `{}`", raw))?;
                Some(raw.clone())
            }
            None => None,
        };
        Ok(SendOptions {
            send_at,
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn flags_override_config_defaults() {
        let config = Config::default();
        let opts = MessageOpts {
            to: vec!["ops@example.com".to_owned()],
            from: Some("alerts@example.com".to_owned()),
            subject: Some("it broke".to_owned()),
            text: Some("details inside".to_owned()),
            ..Default::default()
        };

        let message = opts.message(&config);

        assert_eq!("alerts@example.com", message.from_email);
        assert_eq!(1, message.to.len());
        assert_eq!("ops@example.com", message.to[0].email);
        // config reply_to still applies when the flag is absent
        assert_eq!(
            Some(&"reply@example.com".to_owned()),
            message.headers.get("Reply-To")
        );
    }

    #[test]
    fn missing_flags_fall_back_to_config() {
        let config = Config::default();
        let opts = MessageOpts::default();

        let message = opts.message(&config);

        assert_eq!("sender@example.com", message.from_email);
        assert_eq!("user@example.com", message.to[0].email);
    }

    #[test]
    fn send_at_accepts_the_server_formats() {
        assert!(validate_send_at("2026-09-01T10:00:00Z").is_ok());
        assert!(validate_send_at("2026-09-01T10:00:00+02:00").is_ok());
        assert!(validate_send_at("2026-09-01 10:00:00").is_ok());
        assert!(validate_send_at("2026-09-01T10:00:00").is_ok());
        assert!(validate_send_at("2026-09-01").is_ok());
        assert!(validate_send_at("next tuesday").is_err());
    }

    #[test]
    fn send_at_flows_into_the_envelope() {
        let opts = MessageOpts {
            send_at: Some("2026-09-01T10:00:00Z".to_owned()),
            ..Default::default()
        };

        let options = opts.options().unwrap();
        assert_eq!(Some("2026-09-01T10:00:00Z".to_owned()), options.send_at);

        let bad = MessageOpts {
            send_at: Some("soon".to_owned()),
            ..Default::default()
        };
        assert!(bad.options().is_err());
    }
}
