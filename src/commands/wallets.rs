// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::Storage;
use crate::error::StoreError;
use crate::models::{NewWallet, Wallet};
use crate::repo::WalletRepository;
use crate::utils::{fmt_minor, maybe_print_json, pretty_table, required};
use anyhow::{Context, Result};

pub fn handle(storage: &Storage, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(storage, sub)?,
        Some(("list", sub)) => list(storage, sub)?,
        Some(("show", sub)) => show(storage, sub)?,
        Some(("edit", sub)) => edit(storage, sub)?,
        Some(("rm", sub)) => remove(storage, sub)?,
        Some(("recalc", sub)) => recalc(storage, sub)?,
        _ => {}
    }
    Ok(())
}

fn rows(wallets: &[Wallet]) -> Vec<Vec<String>> {
    wallets
        .iter()
        .map(|w| {
            vec![
                w.id.to_string(),
                w.name.clone(),
                w.description.clone(),
                fmt_minor(w.balance),
            ]
        })
        .collect()
}

fn add(storage: &Storage, sub: &clap::ArgMatches) -> Result<()> {
    let name = required::<String>(sub, "name")?.trim().to_string();
    if name.is_empty() {
        anyhow::bail!("Wallet name must not be empty");
    }
    let description = required::<String>(sub, "description")?.trim().to_string();
    let balance = *required::<i64>(sub, "balance")?;
    let id = WalletRepository::new(storage)
        .create(&NewWallet::new(&name, description).with_balance(balance))
        .with_context(|| format!("Could not create wallet '{}'", name))?;
    println!("Added wallet '{}' (id {})", name, id);
    Ok(())
}

fn list(storage: &Storage, sub: &clap::ArgMatches) -> Result<()> {
    let wallets = WalletRepository::new(storage).get_all()?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &wallets)? {
        println!(
            "{}",
            pretty_table(&["ID", "Name", "Description", "Balance"], rows(&wallets))
        );
    }
    Ok(())
}

fn show(storage: &Storage, sub: &clap::ArgMatches) -> Result<()> {
    let id = *required::<i64>(sub, "id")?;
    let wallet = WalletRepository::new(storage)
        .get_by_id(id)?
        .ok_or(StoreError::NotFound { entity: "wallet", id })?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &wallet)? {
        println!(
            "{}",
            pretty_table(
                &["ID", "Name", "Description", "Balance"],
                rows(std::slice::from_ref(&wallet))
            )
        );
    }
    Ok(())
}

fn edit(storage: &Storage, sub: &clap::ArgMatches) -> Result<()> {
    let id = *required::<i64>(sub, "id")?;
    let repo = WalletRepository::new(storage);
    let mut wallet = repo
        .get_by_id(id)?
        .ok_or(StoreError::NotFound { entity: "wallet", id })?;
    if let Some(name) = sub.get_one::<String>("name") {
        wallet.name = name.trim().to_string();
    }
    if let Some(description) = sub.get_one::<String>("description") {
        wallet.description = description.trim().to_string();
    }
    if let Some(balance) = sub.get_one::<i64>("balance") {
        wallet.balance = *balance;
    }
    repo.update(&wallet)?;
    println!("Updated wallet {} ('{}')", wallet.id, wallet.name);
    Ok(())
}

fn remove(storage: &Storage, sub: &clap::ArgMatches) -> Result<()> {
    let id = *required::<i64>(sub, "id")?;
    if WalletRepository::new(storage).delete(id)? == 0 {
        return Err(StoreError::NotFound { entity: "wallet", id }.into());
    }
    println!("Removed wallet {} and its transactions", id);
    Ok(())
}

fn recalc(storage: &Storage, sub: &clap::ArgMatches) -> Result<()> {
    let repo = WalletRepository::new(storage);
    let ids: Vec<i64> = if sub.get_flag("all") {
        repo.get_all()?.into_iter().map(|w| w.id).collect()
    } else {
        let id = *required::<i64>(sub, "id")?;
        if repo.get_by_id(id)?.is_none() {
            return Err(StoreError::NotFound { entity: "wallet", id }.into());
        }
        vec![id]
    };
    for id in ids {
        let balance = repo.recalculate_balance(id)?;
        println!("Wallet {} balance: {}", id, fmt_minor(balance));
    }
    Ok(())
}
