use clap::Parser;
use error_stack::{Result, ResultExt};
use std::net::IpAddr;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use userbase::config::Server as Config;
use userbase::server::StartServerError;

/// Expose the userbase HTTP API
#[derive(Debug, Parser)]
pub struct ServerCommand {
    /// Path to the configuration file. Defaults to `userbase.toml`.
    #[clap(long, short)]
    pub config: Option<PathBuf>,
    #[clap(long)]
    pub address: Option<IpAddr>,
    #[clap(long)]
    pub port: Option<u16>,
    #[clap(long)]
    pub workers: Option<NonZeroUsize>,
}

pub fn run(args: &ServerCommand) -> Result<(), StartServerError> {
    let mut config = Config::load(args.config.as_deref()).change_context(StartServerError)?;
    args.override_config(&mut config);

    tracing_subscriber::fmt()
        .with_max_level(config.level())
        .init();

    actix_web::rt::System::new().block_on(userbase::server::run(config))
}

impl ServerCommand {
    fn override_config(&self, config: &mut Config) {
        // override server configurations if set by the cli
        if let Some(address) = self.address {
            config.address = address;
        }

        if let Some(port) = self.port {
            config.port = port;
        }

        if let Some(workers) = self.workers {
            config.workers = workers;
        }
    }
}
