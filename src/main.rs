// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use std::path::PathBuf;

use pocketmoney::{cli, commands, db, logging};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    logging::init_logger(logging::level_for(matches.get_count("verbose")));

    let path = match matches.get_one::<String>("db") {
        Some(p) => PathBuf::from(p),
        None => db::default_path()?,
    };
    let storage = db::Storage::open_and_init(&path)
        .with_context(|| format!("Open DB at {}", path.display()))?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", storage.path().display());
        }
        Some(("wallet", sub)) => commands::wallets::handle(&storage, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&storage, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&storage)?,
        Some(("export", sub)) => commands::exporter::handle(&storage, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
