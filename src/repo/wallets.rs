// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use crate::db::Storage;
use crate::error::Result;
use crate::models::{NewWallet, Wallet};

const WALLET_COLUMNS: &str = "id, name, description, balance";

fn wallet_from_row(r: &Row<'_>) -> rusqlite::Result<Wallet> {
    Ok(Wallet {
        id: r.get(0)?,
        name: r.get(1)?,
        description: r.get::<_, Option<String>>(2)?.unwrap_or_default(),
        balance: r.get(3)?,
    })
}

/// Signed sum of a wallet's transactions, 0 when it has none.
fn sum_signed_amounts(conn: &Connection, wallet_id: i64) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COALESCE(SUM(CASE WHEN type = 0 THEN amount ELSE -amount END), 0)
         FROM Transactions WHERE wallet_id = ?1",
        params![wallet_id],
        |r| r.get(0),
    )
}

pub struct WalletRepository<'a> {
    storage: &'a Storage,
}

impl<'a> WalletRepository<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(&self, wallet: &NewWallet) -> Result<i64> {
        let conn = self.storage.conn()?;
        conn.execute(
            "INSERT INTO Wallets(name, description, balance) VALUES (?1, ?2, ?3)",
            params![wallet.name, wallet.description, wallet.balance],
        )?;
        let id = conn.last_insert_rowid();
        debug!(id, name = %wallet.name, balance = wallet.balance, "wallet created");
        Ok(id)
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<Wallet>> {
        let conn = self.storage.conn()?;
        let wallet = conn
            .query_row(
                &format!("SELECT {WALLET_COLUMNS} FROM Wallets WHERE id = ?1"),
                params![id],
                wallet_from_row,
            )
            .optional()?;
        if wallet.is_none() {
            debug!(id, "wallet not found");
        }
        Ok(wallet)
    }

    pub fn get_all(&self) -> Result<Vec<Wallet>> {
        let conn = self.storage.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {WALLET_COLUMNS} FROM Wallets ORDER BY id"))?;
        let wallets = stmt
            .query_map([], wallet_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(count = wallets.len(), "wallets loaded");
        Ok(wallets)
    }

    /// Overwrites name, description and balance. Returns the number of rows
    /// touched, which is 0 when the id does not exist.
    pub fn update(&self, wallet: &Wallet) -> Result<usize> {
        let conn = self.storage.conn()?;
        let n = conn.execute(
            "UPDATE Wallets SET name = ?1, description = ?2, balance = ?3 WHERE id = ?4",
            params![wallet.name, wallet.description, wallet.balance, wallet.id],
        )?;
        debug!(id = wallet.id, rows = n, "wallet updated");
        Ok(n)
    }

    /// Deletes the wallet and, through the foreign key, its transactions.
    pub fn delete(&self, id: i64) -> Result<usize> {
        let conn = self.storage.conn()?;
        let n = conn.execute("DELETE FROM Wallets WHERE id = ?1", params![id])?;
        debug!(id, rows = n, "wallet deleted");
        Ok(n)
    }

    /// Balance implied by the wallet's transactions, without writing it.
    pub fn computed_balance(&self, wallet_id: i64) -> Result<i64> {
        Ok(sum_signed_amounts(self.storage.conn()?, wallet_id)?)
    }

    /// Recomputes `income - expense` over the wallet's transactions and
    /// stores it as the wallet balance. Read and write share one SQLite
    /// transaction.
    pub fn recalculate_balance(&self, wallet_id: i64) -> Result<i64> {
        let conn = self.storage.conn()?;
        let tx = conn.unchecked_transaction()?;
        let balance = sum_signed_amounts(&tx, wallet_id)?;
        let n = tx.execute(
            "UPDATE Wallets SET balance = ?1 WHERE id = ?2",
            params![balance, wallet_id],
        )?;
        tx.commit()?;
        if n == 0 {
            debug!(wallet_id, "recalculated balance for missing wallet; nothing written");
        } else {
            debug!(wallet_id, balance, "wallet balance recalculated");
        }
        Ok(balance)
    }
}
