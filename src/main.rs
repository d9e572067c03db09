mod client;
mod cmd;
mod config;
mod message;
mod readiness;

use anyhow::Result;
use clap::Clap;
use config::Config;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::str::FromStr;

#[derive(Clap)]
#[clap(version = "0.1.0")]
struct Opts {
    #[clap(short, long, default_value = "postino.toml")]
    config: String,
    #[clap(short, long, default_value = "info")]
    log_level: String,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Clap)]
enum Command {
    Wait(cmd::wait::Wait),
    Send(cmd::send::Send),
    SendTemplate(cmd::send_template::SendTemplate),
    SendRaw(cmd::send_raw::SendRaw),
}

#[tokio::main]
async fn main() -> Result<()> {
    let opts: Opts = Opts::parse();

    SimpleLogger::new()
        .with_level(LevelFilter::from_str(&opts.log_level)?)
        .init()?;

    let config = Config::load(&opts.config)?;

    match opts.command {
        Command::Wait(cmd) => cmd.run(&config).await,
        Command::Send(cmd) => cmd.run(&config).await,
        Command::SendTemplate(cmd) => cmd.run(&config).await,
        Command::SendRaw(cmd) => cmd.run(&config).await,
    }
}
