// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::Storage;
use crate::error::StoreError;
use crate::repo::{TransactionOrder, TransactionRepository, WalletRepository};
use crate::utils::required;
use anyhow::{bail, Result};

pub fn handle(storage: &Storage, m: &clap::ArgMatches) -> Result<()> {
    let wallet_id = *required::<i64>(m, "wallet")?;
    let fmt = required::<String>(m, "format")?.to_lowercase();
    let out = required::<String>(m, "out")?;

    let wallet = WalletRepository::new(storage)
        .get_by_id(wallet_id)?
        .ok_or(StoreError::NotFound { entity: "wallet", id: wallet_id })?;
    let rows = TransactionRepository::new(storage)
        .get_by_wallet(wallet_id, TransactionOrder::TimestampAsc)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["id", "wallet", "timestamp", "type", "amount", "description"])?;
            for t in &rows {
                wtr.write_record([
                    t.id.to_string(),
                    wallet.name.clone(),
                    t.timestamp.clone(),
                    t.kind.to_string(),
                    t.amount.to_string(),
                    t.description.clone(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&rows)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    println!("Exported {} transactions of '{}' to {}", rows.len(), wallet.name, out);
    Ok(())
}
