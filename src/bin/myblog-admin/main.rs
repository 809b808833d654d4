use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use spdlog::warn;

use myblog::admin::OwnerAdmin;
use myblog::config::open_config;
use myblog::logger::configure_logger;
use myblog::model::UserId;
use myblog::store::ContentStore;
use myblog::util::os_helper::current_user;

use crate::bootstrap::bootstrap_cmd;
use crate::commands::{run_content_cmd, ContentCmd};

mod bootstrap;
mod commands;
mod decompress;

#[derive(Parser, Debug)]
#[command(version, about = "Manage the content of a myblog site", long_about = None)]
struct Args {
    /// Config path. Defaults to myblog.toml next to the executable, in the current dir or in the user config dir
    #[arg(long, global = true)]
    config_path: Option<String>,

    /// Acting editor. If empty, the OS user name is used
    #[arg(short, long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bootstrap a new blog
    Bootstrap(BootstrapArgs),
    #[command(flatten)]
    Content(ContentCmd),
}

#[derive(Parser, Debug)]
struct BootstrapArgs {
    /// Directory where the new blog will be generated
    #[arg(short, long)]
    out_dir: String,
}

/// Acting editor from `--user`, or the OS user when the flag is missing or blank
fn resolve_user(user: Option<String>) -> UserId {
    user.map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .map(UserId)
        .unwrap_or_else(current_user)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let command = match args.command {
        Command::Bootstrap(bootstrap) => {
            bootstrap_cmd(&bootstrap)?;
            return Ok(());
        }
        Command::Content(command) => command,
    };

    let config = match open_config(args.config_path.map(PathBuf::from)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("Please run myblog-admin bootstrap or pass --config-path");
            return Ok(());
        }
    };

    if let Err(err) = configure_logger(&config) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    let user = resolve_user(args.user);
    let admin = OwnerAdmin::new(&user);
    let mut store = ContentStore::open(&config.paths.data_file)?;

    let output = run_content_cmd(&admin, &mut store, command)?;
    if store.is_dirty() {
        store.persist()?;
    }
    println!("{}", output);

    Ok(())
}
