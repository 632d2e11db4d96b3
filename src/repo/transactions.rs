// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::str::FromStr;

use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use crate::db::Storage;
use crate::error::{Result, StoreError};
use crate::models::{NewTransaction, Transaction};

const TX_COLUMNS: &str = "id, wallet_id, description, amount, type, timestamp";

fn transaction_from_row(r: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: r.get(0)?,
        wallet_id: r.get(1)?,
        description: r.get::<_, Option<String>>(2)?.unwrap_or_default(),
        amount: r.get(3)?,
        kind: r.get(4)?,
        timestamp: r.get(5)?,
    })
}

/// Ordering for [`TransactionRepository::get_by_wallet`]. Every variant ends
/// with an id tiebreak so rows sharing a key come back in a stable order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransactionOrder {
    #[default]
    TimestampDesc,
    TimestampAsc,
    AmountDesc,
    AmountAsc,
    Id,
}

impl TransactionOrder {
    fn sql(self) -> &'static str {
        match self {
            TransactionOrder::TimestampDesc => "timestamp DESC, id DESC",
            TransactionOrder::TimestampAsc => "timestamp ASC, id ASC",
            TransactionOrder::AmountDesc => "amount DESC, id DESC",
            TransactionOrder::AmountAsc => "amount ASC, id ASC",
            TransactionOrder::Id => "id ASC",
        }
    }
}

impl FromStr for TransactionOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newest" | "timestamp-desc" => Ok(TransactionOrder::TimestampDesc),
            "oldest" | "timestamp-asc" => Ok(TransactionOrder::TimestampAsc),
            "amount-desc" => Ok(TransactionOrder::AmountDesc),
            "amount-asc" => Ok(TransactionOrder::AmountAsc),
            "id" => Ok(TransactionOrder::Id),
            other => Err(format!(
                "Unknown order '{}' (use newest|oldest|amount-desc|amount-asc|id)",
                other
            )),
        }
    }
}

pub struct TransactionRepository<'a> {
    storage: &'a Storage,
}

impl<'a> TransactionRepository<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Inserts the row. Does not check that the wallet exists beyond the
    /// foreign key, and does not touch the wallet balance.
    pub fn create(&self, tx: &NewTransaction) -> Result<i64> {
        let conn = self.storage.conn()?;
        if tx.amount < 0 {
            return Err(StoreError::InvalidAmount(tx.amount));
        }
        conn.execute(
            "INSERT INTO Transactions(wallet_id, description, amount, type, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![tx.wallet_id, tx.description, tx.amount, tx.kind, tx.timestamp],
        )?;
        let id = conn.last_insert_rowid();
        debug!(id, wallet_id = tx.wallet_id, amount = tx.amount, kind = %tx.kind, "transaction created");
        Ok(id)
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<Transaction>> {
        let conn = self.storage.conn()?;
        let tx = conn
            .query_row(
                &format!("SELECT {TX_COLUMNS} FROM Transactions WHERE id = ?1"),
                params![id],
                transaction_from_row,
            )
            .optional()?;
        if tx.is_none() {
            debug!(id, "transaction not found");
        }
        Ok(tx)
    }

    pub fn get_by_wallet(&self, wallet_id: i64, order: TransactionOrder) -> Result<Vec<Transaction>> {
        let conn = self.storage.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {TX_COLUMNS} FROM Transactions WHERE wallet_id = ?1 ORDER BY {}",
            order.sql()
        ))?;
        let rows = stmt
            .query_map(params![wallet_id], transaction_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(wallet_id, count = rows.len(), "transactions loaded");
        Ok(rows)
    }

    /// Overwrites every field by id; returns rows touched.
    pub fn update(&self, tx: &Transaction) -> Result<usize> {
        let conn = self.storage.conn()?;
        if tx.amount < 0 {
            return Err(StoreError::InvalidAmount(tx.amount));
        }
        let n = conn.execute(
            "UPDATE Transactions SET wallet_id = ?1, description = ?2, amount = ?3, type = ?4, timestamp = ?5
             WHERE id = ?6",
            params![tx.wallet_id, tx.description, tx.amount, tx.kind, tx.timestamp, tx.id],
        )?;
        debug!(id = tx.id, rows = n, "transaction updated");
        Ok(n)
    }

    pub fn delete(&self, id: i64) -> Result<usize> {
        let conn = self.storage.conn()?;
        let n = conn.execute("DELETE FROM Transactions WHERE id = ?1", params![id])?;
        debug!(id, rows = n, "transaction deleted");
        Ok(n)
    }
}
