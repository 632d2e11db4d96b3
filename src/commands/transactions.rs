// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::Storage;
use crate::error::StoreError;
use crate::models::{NewTransaction, Transaction, TransactionType};
use crate::repo::{TransactionOrder, TransactionRepository, WalletRepository};
use crate::utils::{
    fmt_minor, maybe_print_json, now_timestamp, parse_timestamp, pretty_table, required,
};
use anyhow::{anyhow, Result};

pub fn handle(storage: &Storage, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(storage, sub)?,
        Some(("list", sub)) => list(storage, sub)?,
        Some(("edit", sub)) => edit(storage, sub)?,
        Some(("rm", sub)) => remove(storage, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(storage: &Storage, sub: &clap::ArgMatches) -> Result<()> {
    let wallet_id = *required::<i64>(sub, "wallet")?;
    let kind: TransactionType = required::<String>(sub, "type")?.parse()?;
    let timestamp = match sub.get_one::<String>("at") {
        Some(at) => parse_timestamp(at)?,
        None => now_timestamp(),
    };
    let tx = NewTransaction {
        wallet_id,
        description: required::<String>(sub, "description")?.trim().to_string(),
        amount: *required::<i64>(sub, "amount")?,
        kind,
        timestamp,
    };
    let id = TransactionRepository::new(storage).create(&tx)?;
    let balance = WalletRepository::new(storage).recalculate_balance(wallet_id)?;
    println!(
        "Recorded {} {} on {} (id {}); wallet {} balance {}",
        tx.kind,
        fmt_minor(tx.amount),
        tx.timestamp,
        id,
        wallet_id,
        fmt_minor(balance)
    );
    Ok(())
}

pub fn query_rows(storage: &Storage, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let wallet_id = *required::<i64>(sub, "wallet")?;
    let order: TransactionOrder = required::<String>(sub, "order")?
        .parse()
        .map_err(|e: String| anyhow!(e))?;
    Ok(TransactionRepository::new(storage).get_by_wallet(wallet_id, order)?)
}

fn list(storage: &Storage, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(storage, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.timestamp.clone(),
                    t.kind.to_string(),
                    fmt_minor(t.amount),
                    t.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "When", "Type", "Amount", "Description"], rows)
        );
    }
    Ok(())
}

fn edit(storage: &Storage, sub: &clap::ArgMatches) -> Result<()> {
    let id = *required::<i64>(sub, "id")?;
    let txs = TransactionRepository::new(storage);
    let mut tx = txs
        .get_by_id(id)?
        .ok_or(StoreError::NotFound { entity: "transaction", id })?;
    let previous_wallet = tx.wallet_id;

    if let Some(w) = sub.get_one::<i64>("wallet") {
        tx.wallet_id = *w;
    }
    if let Some(a) = sub.get_one::<i64>("amount") {
        tx.amount = *a;
    }
    if let Some(t) = sub.get_one::<String>("type") {
        tx.kind = t.parse()?;
    }
    if let Some(d) = sub.get_one::<String>("description") {
        tx.description = d.trim().to_string();
    }
    if let Some(at) = sub.get_one::<String>("at") {
        tx.timestamp = parse_timestamp(at)?;
    }
    txs.update(&tx)?;

    let wallets = WalletRepository::new(storage);
    wallets.recalculate_balance(tx.wallet_id)?;
    if previous_wallet != tx.wallet_id {
        wallets.recalculate_balance(previous_wallet)?;
    }
    println!("Updated transaction {}", id);
    Ok(())
}

fn remove(storage: &Storage, sub: &clap::ArgMatches) -> Result<()> {
    let id = *required::<i64>(sub, "id")?;
    let txs = TransactionRepository::new(storage);
    let tx = txs
        .get_by_id(id)?
        .ok_or(StoreError::NotFound { entity: "transaction", id })?;
    txs.delete(id)?;
    let balance = WalletRepository::new(storage).recalculate_balance(tx.wallet_id)?;
    println!(
        "Removed transaction {}; wallet {} balance {}",
        id,
        tx.wallet_id,
        fmt_minor(balance)
    );
    Ok(())
}
