use super::await_server;
use crate::config::Config;
use anyhow::Result;
use clap::Clap;

/// Poll the server's health endpoint until it is ready or the
/// configured budget runs out.
#[derive(Clap, Debug)]
pub struct Wait {}

impl Wait {
    pub async fn run(&self, config: &Config) -> Result<()> {
        await_server(config).await?;
        println!("{} is ready", config.health_url()?);
        Ok(())
    }
}
