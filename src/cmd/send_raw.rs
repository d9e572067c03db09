use super::{await_server, client_from, print_results, validate_send_at};
use crate::config::Config;
use crate::message::SendOptions;
use anyhow::{Context, Result};
use clap::Clap;
use std::io::Read;

/// Send a raw RFC 2822 message through messages/send-raw. Recipients
/// come from --to, or the server falls back to the To: header.
#[derive(Clap, Debug)]
pub struct SendRaw {
    /// File containing the raw message, `-` for stdin
    #[clap(default_value = "-")]
    file: String,
    /// Envelope sender override
    #[clap(long)]
    from: Option<String>,
    /// Recipient address, may be given multiple times
    #[clap(short, long)]
    to: Vec<String>,
    /// Schedule delivery: RFC 3339, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD`
    #[clap(long)]
    send_at: Option<String>,
    /// Skip the readiness wait before sending
    #[clap(long)]
    no_wait: bool,
}

impl SendRaw {
    pub async fn run(&self, config: &Config) -> Result<()> {
        let raw_message = self.read_raw()?;
        let options = self.options()?;

        if !self.no_wait {
            await_server(config).await?;
        }

        log::info!("sending raw message ({} bytes)", raw_message.len());
        let results = client_from(config)?
            .send_raw(raw_message, self.from.clone(), self.to.clone(), options)
            .await?;
        print_results(&results)
    }

    fn read_raw(&self) -> Result<String> {
        if self.file == "-" {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .with_context(|| "could not read raw message from stdin")?;
            Ok(buffer)
        } else {
            std::fs::read_to_string(&self.file)
                .with_context(|| format!("could not read file `{}`", self.file))
        }
    }

    fn options(&self) -> Result<SendOptions> {
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
