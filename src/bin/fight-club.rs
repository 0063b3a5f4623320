// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use fight_club::{
    config::Config,
    ego::Roster,
    ledger::Ledger,
    path::{default_config_file, default_data_root},
    shell::Shell,
    store::JsonStore,
};

use anyhow::Result;
use clap::Parser;
use std::{path::PathBuf, process::exit};
use tracing::{debug, error};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Parser)]
#[command(about, override_usage = "fight-club [options]", version)]
struct Cli {
    /// Directory holding missions, rewards, and alter-ego documents.
    #[arg(short, long, value_name = "path")]
    pub data_root: Option<PathBuf>,

    /// Path to configuration file.
    #[arg(short, long, value_name = "path")]
    pub config: Option<PathBuf>,
}

impl Cli {
    fn run(self) -> Result<()> {
        let config_file = match self.config {
            Some(path) => path,
            None => default_config_file()?,
        };
        let config = Config::load(&config_file)?;
        debug!("loaded configuration from {config_file:?}");

        let data_root = match (self.data_root, config.settings.data_root) {
            (Some(path), _) => path,
            (None, Some(data_root)) => data_root.as_path().to_path_buf(),
            (None, None) => default_data_root()?,
        };
        debug!("using data root {data_root:?}");

        let store = JsonStore::open(&data_root)?;
        let shell = Shell::new(Ledger::new(store), Roster::new(data_root), config.defaults);
        shell.run()?;

        Ok(())
    }
}

fn main() {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_timer(false)
        .without_time();
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap();
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    if let Err(error) = run() {
        error!("{error:?}");
        exit(1);
    }

    exit(0)
}

fn run() -> Result<()> {
    Cli::parse().run()
}
