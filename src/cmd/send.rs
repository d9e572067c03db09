use super::{await_server, client_from, print_results, MessageOpts};
use crate::config::Config;
use anyhow::Result;
use clap::Clap;

/// Send a message through messages/send.
#[derive(Clap, Debug)]
pub struct Send {
    #[clap(flatten)]
    message: MessageOpts,
    /// Skip the readiness wait before sending
    #[clap(long)]
    no_wait: bool,
}

impl Send {
    pub async fn run(&self, config: &Config) -> Result<()> {
        if !self.no_wait {
            await_server(config).await?;
        }

        let message = self.message.message(config);
        let options = self.message.options()?;
        log::info!(
            "sending message from {} to {} recipient(s)",
            message.from_email,
            message.to.len()
        );

        let results = client_from(config)?.send(message, options).await?;
        print_results(&results)
    }
}
