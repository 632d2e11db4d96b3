// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, ArgGroup, Command};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn id_arg(help: &'static str) -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
        .help(help)
}

fn wallet_cmd() -> Command {
    Command::new("wallet")
        .about("Manage wallets")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Create a wallet")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("description").long("description").default_value(""))
                .arg(
                    Arg::new("balance")
                        .long("balance")
                        .value_parser(value_parser!(i64))
                        .default_value("0")
                        .allow_negative_numbers(true)
                        .help("Opening balance in minor units"),
                ),
        )
        .subcommand(json_args(Command::new("list").about("List wallets")))
        .subcommand(json_args(
            Command::new("show")
                .about("Show one wallet")
                .arg(id_arg("Wallet id")),
        ))
        .subcommand(
            Command::new("edit")
                .about("Change a wallet's name, description or balance")
                .arg(id_arg("Wallet id"))
                .arg(Arg::new("name").long("name"))
                .arg(Arg::new("description").long("description"))
                .arg(
                    Arg::new("balance")
                        .long("balance")
                        .value_parser(value_parser!(i64))
                        .allow_negative_numbers(true),
                ),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a wallet and its transactions")
                .arg(id_arg("Wallet id")),
        )
        .subcommand(
            Command::new("recalc")
                .about("Recompute balances from transactions")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .value_parser(value_parser!(i64)),
                )
                .arg(Arg::new("all").long("all").action(ArgAction::SetTrue))
                .group(
                    ArgGroup::new("target")
                        .args(["id", "all"])
                        .required(true),
                ),
        )
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Manage transactions")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Record a transaction and reconcile its wallet")
                .arg(
                    Arg::new("wallet")
                        .long("wallet")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                )
                .arg(
                    Arg::new("amount")
                        .long("amount")
                        .required(true)
                        .value_parser(value_parser!(i64))
                        .help("Magnitude in minor units"),
                )
                .arg(
                    Arg::new("type")
                        .long("type")
                        .required(true)
                        .help("income|expense"),
                )
                .arg(Arg::new("description").long("description").default_value(""))
                .arg(
                    Arg::new("at")
                        .long("at")
                        .help("YYYY-MM-DD HH:MM:SS (default: now)"),
                ),
        )
        .subcommand(json_args(
            Command::new("list")
                .about("List a wallet's transactions")
                .arg(
                    Arg::new("wallet")
                        .long("wallet")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                )
                .arg(
                    Arg::new("order")
                        .long("order")
                        .default_value("newest")
                        .help("newest|oldest|amount-desc|amount-asc|id"),
                ),
        ))
        .subcommand(
            Command::new("edit")
                .about("Change a transaction and reconcile affected wallets")
                .arg(id_arg("Transaction id"))
                .arg(
                    Arg::new("wallet")
                        .long("wallet")
                        .value_parser(value_parser!(i64)),
                )
                .arg(
                    Arg::new("amount")
                        .long("amount")
                        .value_parser(value_parser!(i64)),
                )
                .arg(Arg::new("type").long("type"))
                .arg(Arg::new("description").long("description"))
                .arg(Arg::new("at").long("at")),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a transaction and reconcile its wallet")
                .arg(id_arg("Transaction id")),
        )
}

pub fn build_cli() -> Command {
    Command::new("pocketmoney")
        .version(clap::crate_version!())
        .about("Wallets, transactions and balance reconciliation on a local SQLite file")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .help("Database file (default: platform data dir)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("More logging (-v info, -vv debug)"),
        )
        .subcommand(Command::new("init").about("Create the database and tables"))
        .subcommand(wallet_cmd())
        .subcommand(tx_cmd())
        .subcommand(Command::new("doctor").about("Report wallets whose balance is out of date"))
        .subcommand(
            Command::new("export")
                .about("Export a wallet's transactions")
                .arg(
                    Arg::new("wallet")
                        .long("wallet")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .help("csv|json"),
                )
                .arg(Arg::new("out").long("out").required(true)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn recalc_requires_a_target() {
        let r = build_cli().try_get_matches_from(["pocketmoney", "wallet", "recalc"]);
        assert!(r.is_err());
    }
}
