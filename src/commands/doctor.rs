// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::Storage;
use crate::repo::WalletRepository;
use crate::utils::{fmt_minor, pretty_table};
use anyhow::Result;
use serde::Serialize;

/// A wallet whose stored balance no longer matches its transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceDrift {
    pub wallet_id: i64,
    pub name: String,
    pub stored: i64,
    pub computed: i64,
}

pub fn find_drift(storage: &Storage) -> Result<Vec<BalanceDrift>> {
    let repo = WalletRepository::new(storage);
    let mut out = Vec::new();
    for w in repo.get_all()? {
        let computed = repo.computed_balance(w.id)?;
        if computed != w.balance {
            out.push(BalanceDrift {
                wallet_id: w.id,
                name: w.name,
                stored: w.balance,
                computed,
            });
        }
    }
    Ok(out)
}

pub fn handle(storage: &Storage) -> Result<()> {
    let drift = find_drift(storage)?;
    if drift.is_empty() {
        println!("doctor: no issues found");
        return Ok(());
    }
    let rows = drift
        .iter()
        .map(|d| {
            vec![
                d.wallet_id.to_string(),
                d.name.clone(),
                fmt_minor(d.stored),
                fmt_minor(d.computed),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Wallet", "Name", "Stored", "From transactions"], rows)
    );
    println!("Run `pocketmoney wallet recalc --all` to fix.");
    Ok(())
}
