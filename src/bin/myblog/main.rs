use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use spdlog::{info, warn};

use myblog::config::{open_config, Config};
use myblog::logger::configure_logger;
use myblog::server::server_run;

#[derive(Parser, Debug)]
#[command(version, about = "Serve a myblog site", long_about = None)]
struct Args {
    /// Config path. Defaults to myblog.toml next to the executable, in the current dir or in the user config dir
    #[arg(short, long)]
    config_path: Option<String>,

    /// Listen address, overriding [server] address
    #[arg(short, long)]
    address: Option<String>,

    /// Listen port, overriding [server] port
    #[arg(short, long)]
    port: Option<u16>,

    /// Recompute the hot posts on every request
    #[arg(long)]
    no_cache: bool,
}

impl Args {
    fn apply_to(&self, config: &mut Config) {
        if let Some(ref address) = self.address {
            config.server.address = address.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.no_cache {
            config.defaults.cache_enabled = false;
        }
    }
}

#[ntex::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config_path = args.config_path.as_ref().map(PathBuf::from);

    let mut config = match open_config(config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("Please run myblog-admin bootstrap or myblog --help");
            return Ok(());
        }
    };
    args.apply_to(&mut config);

    if let Err(err) = configure_logger(&config) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    info!("Starting myblog with data file {}", config.paths.data_file.display());
    info!("Listening on {}:{}", config.server.address, config.server.port);
    if !config.defaults.cache_enabled {
        info!("Hot posts cache disabled");
    }

    server_run(config).await?;
    Ok(())
}
