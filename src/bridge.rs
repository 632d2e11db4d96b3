// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Flat entry points for a foreign caller.
//!
//! Parameters are primitives and results are plain records. Nothing here
//! returns an error: every failure is logged and reported as `false`, `None`
//! or an empty list. Transaction mutations are followed by a balance
//! reconciliation of the affected wallet(s); the write and the
//! reconciliation are two separate units of work.

use serde::Serialize;
use tracing::{error, info, warn};

use crate::db::Storage;
use crate::error::{Result, StoreError};
use crate::models::{NewTransaction, NewWallet, Transaction, TransactionType, Wallet};
use crate::repo::{TransactionOrder, TransactionRepository, WalletRepository};
use crate::utils::parse_timestamp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletRecord {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub balance: i64,
}

impl From<Wallet> for WalletRecord {
    fn from(w: Wallet) -> Self {
        Self {
            id: w.id,
            name: w.name,
            description: w.description,
            balance: w.balance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRecord {
    pub id: i64,
    pub wallet_id: i64,
    pub amount: i64,
    pub description: String,
    pub type_code: i64,
    pub timestamp: String,
}

impl From<Transaction> for TransactionRecord {
    fn from(t: Transaction) -> Self {
        Self {
            id: t.id,
            wallet_id: t.wallet_id,
            amount: t.amount,
            description: t.description,
            type_code: t.kind.code(),
            timestamp: t.timestamp,
        }
    }
}

/// Logs a failed operation and turns it into a sentinel.
fn degrade<T>(op: &str, res: Result<T>, fallback: T) -> T {
    match res {
        Ok(v) => v,
        Err(e) => {
            error!(op, error = %e, "native storage call failed");
            fallback
        }
    }
}

#[derive(Debug, Default)]
pub struct Bridge {
    storage: Option<Storage>,
}

impl Bridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an already opened storage.
    pub fn with_storage(storage: Storage) -> Self {
        Self {
            storage: Some(storage),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.storage.as_ref().is_some_and(Storage::is_open)
    }

    /// Opens the database at `path` and creates the schema. Calling it again
    /// once initialized is a no-op.
    pub fn init_storage(&mut self, path: &str) -> bool {
        if self.is_initialized() {
            info!(path, "storage already initialized");
            return true;
        }
        match Storage::open_and_init(path) {
            Ok(storage) => {
                info!(path, "storage initialized");
                self.storage = Some(storage);
                true
            }
            Err(e) => {
                error!(path, error = %e, "storage initialization failed");
                false
            }
        }
    }

    pub fn close(&mut self) {
        self.storage = None;
    }

    fn storage(&self) -> Result<&Storage> {
        self.storage.as_ref().ok_or(StoreError::NotOpen)
    }

    pub fn create_wallet(&self, name: &str, description: &str, balance: i64) -> bool {
        let res = self.storage().and_then(|s| {
            WalletRepository::new(s).create(&NewWallet::new(name, description).with_balance(balance))
        });
        degrade("create_wallet", res.map(|_| true), false)
    }

    pub fn get_all_wallets(&self) -> Vec<WalletRecord> {
        let res = self
            .storage()
            .and_then(|s| WalletRepository::new(s).get_all())
            .map(|ws| ws.into_iter().map(WalletRecord::from).collect());
        degrade("get_all_wallets", res, Vec::new())
    }

    pub fn get_wallet_by_id(&self, id: i64) -> Option<WalletRecord> {
        let res = self
            .storage()
            .and_then(|s| WalletRepository::new(s).get_by_id(id))
            .map(|w| w.map(WalletRecord::from));
        degrade("get_wallet_by_id", res, None)
    }

    pub fn update_wallet(&self, id: i64, name: &str, description: &str, balance: i64) -> bool {
        let wallet = Wallet {
            id,
            name: name.to_string(),
            description: description.to_string(),
            balance,
        };
        let res = self
            .storage()
            .and_then(|s| WalletRepository::new(s).update(&wallet));
        degrade("update_wallet", res.map(|n| n > 0), false)
    }

    pub fn delete_wallet(&self, id: i64) -> bool {
        let res = self
            .storage()
            .and_then(|s| WalletRepository::new(s).delete(id));
        degrade("delete_wallet", res.map(|n| n > 0), false)
    }

    pub fn create_transaction(
        &self,
        wallet_id: i64,
        description: &str,
        amount: i64,
        type_code: i64,
        timestamp: &str,
    ) -> bool {
        let res = self.storage().and_then(|s| {
            let tx = NewTransaction {
                wallet_id,
                description: description.to_string(),
                amount,
                kind: TransactionType::from_code(type_code)?,
                timestamp: parse_timestamp(timestamp)?,
            };
            TransactionRepository::new(s).create(&tx)?;
            WalletRepository::new(s).recalculate_balance(wallet_id)?;
            Ok(true)
        });
        degrade("create_transaction", res, false)
    }

    pub fn get_transactions_by_wallet(&self, wallet_id: i64) -> Vec<TransactionRecord> {
        let res = self
            .storage()
            .and_then(|s| {
                TransactionRepository::new(s).get_by_wallet(wallet_id, TransactionOrder::default())
            })
            .map(|ts| ts.into_iter().map(TransactionRecord::from).collect());
        degrade("get_transactions_by_wallet", res, Vec::new())
    }

    /// Overwrites the transaction and reconciles `wallet_id`, plus the
    /// wallet it previously belonged to when that differs.
    pub fn update_transaction(
        &self,
        id: i64,
        wallet_id: i64,
        description: &str,
        amount: i64,
        type_code: i64,
        timestamp: &str,
    ) -> bool {
        let res = self.storage().and_then(|s| {
            let txs = TransactionRepository::new(s);
            let wallets = WalletRepository::new(s);
            let tx = Transaction {
                id,
                wallet_id,
                description: description.to_string(),
                amount,
                kind: TransactionType::from_code(type_code)?,
                timestamp: parse_timestamp(timestamp)?,
            };
            let previous = txs.get_by_id(id)?.map(|t| t.wallet_id);
            if txs.update(&tx)? == 0 {
                warn!(id, "update_transaction: no such transaction");
                return Ok(false);
            }
            wallets.recalculate_balance(wallet_id)?;
            if let Some(prev) = previous.filter(|p| *p != wallet_id) {
                wallets.recalculate_balance(prev)?;
            }
            Ok(true)
        });
        degrade("update_transaction", res, false)
    }

    /// Deletes the transaction and reconciles the wallet that owned it, plus
    /// `wallet_id` when the caller names a different one.
    pub fn delete_transaction(&self, id: i64, wallet_id: i64) -> bool {
        let res = self.storage().and_then(|s| {
            let txs = TransactionRepository::new(s);
            let Some(owner) = txs.get_by_id(id)?.map(|t| t.wallet_id) else {
                warn!(id, "delete_transaction: no such transaction");
                return Ok(false);
            };
            if txs.delete(id)? == 0 {
                warn!(id, "delete_transaction: no such transaction");
                return Ok(false);
            }
            let wallets = WalletRepository::new(s);
            wallets.recalculate_balance(owner)?;
            if owner != wallet_id {
                warn!(id, owner, wallet_id, "delete_transaction: caller named another wallet");
                wallets.recalculate_balance(wallet_id)?;
            }
            Ok(true)
        });
        degrade("delete_transaction", res, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bridge() -> Bridge {
        let mut b = Bridge::new();
        assert!(b.init_storage(":memory:"));
        b
    }

    #[test]
    fn uninitialized_bridge_degrades_to_sentinels() {
        let b = Bridge::new();
        assert!(!b.create_wallet("Cash", "", 0));
        assert!(b.get_all_wallets().is_empty());
        assert_eq!(b.get_wallet_by_id(1), None);
        assert!(!b.delete_transaction(1, 1));
    }

    #[test]
    fn init_storage_is_idempotent() {
        let mut b = bridge();
        assert!(b.create_wallet("Cash", "pocket", 0));
        assert!(b.init_storage(":memory:"));
        // still the same database
        assert_eq!(b.get_all_wallets().len(), 1);
    }

    #[test]
    fn transaction_entry_points_reconcile() {
        let b = bridge();
        assert!(b.create_wallet("Cash", "pocket", 0));
        let w = b.get_all_wallets().remove(0);

        assert!(b.create_transaction(w.id, "allowance", 5000, 0, "2025-08-01 09:00:00"));
        assert!(b.create_transaction(w.id, "snacks", 2000, 1, "2025-08-02 10:00:00"));
        assert_eq!(b.get_wallet_by_id(w.id).unwrap().balance, 3000);

        let txs = b.get_transactions_by_wallet(w.id);
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].description, "snacks");

        assert!(b.update_transaction(txs[0].id, w.id, "snacks", 500, 1, "2025-08-02 10:00:00"));
        assert_eq!(b.get_wallet_by_id(w.id).unwrap().balance, 4500);

        assert!(b.delete_transaction(txs[0].id, w.id));
        assert_eq!(b.get_wallet_by_id(w.id).unwrap().balance, 5000);
        assert!(!b.delete_transaction(txs[0].id, w.id));
    }

    #[test]
    fn bad_type_code_and_timestamp_are_rejected() {
        let b = bridge();
        assert!(b.create_wallet("Cash", "", 0));
        let id = b.get_all_wallets()[0].id;
        assert!(!b.create_transaction(id, "x", 100, 7, "2025-08-01 09:00:00"));
        assert!(!b.create_transaction(id, "x", 100, 0, "not a date"));
        assert!(!b.create_transaction(id, "x", -100, 0, "2025-08-01 09:00:00"));
        assert!(b.get_transactions_by_wallet(id).is_empty());
    }

    #[test]
    fn moving_a_transaction_reconciles_both_wallets() {
        let b = bridge();
        assert!(b.create_wallet("A", "", 0));
        assert!(b.create_wallet("B", "", 0));
        let ws = b.get_all_wallets();
        let (a, bw) = (ws[0].id, ws[1].id);
        assert!(b.create_transaction(a, "gift", 1000, 0, "2025-08-01"));
        let t = b.get_transactions_by_wallet(a).remove(0);
        assert!(b.update_transaction(t.id, bw, "gift", 1000, 0, "2025-08-01"));
        assert_eq!(b.get_wallet_by_id(a).unwrap().balance, 0);
        assert_eq!(b.get_wallet_by_id(bw).unwrap().balance, 1000);
    }

    #[test]
    fn deleting_with_the_wrong_wallet_still_reconciles_the_owner() {
        let b = bridge();
        assert!(b.create_wallet("A", "", 0));
        assert!(b.create_wallet("B", "", 0));
        let ws = b.get_all_wallets();
        let (a, bw) = (ws[0].id, ws[1].id);
        assert!(b.create_transaction(a, "gift", 1000, 0, "2025-08-01"));
        let t = b.get_transactions_by_wallet(a).remove(0);

        assert!(b.delete_transaction(t.id, bw));
        assert!(b.get_transactions_by_wallet(a).is_empty());
        assert_eq!(b.get_wallet_by_id(a).unwrap().balance, 0);
        assert_eq!(b.get_wallet_by_id(bw).unwrap().balance, 0);
    }

    #[test]
    fn wallet_update_and_delete_report_missing_rows() {
        let b = bridge();
        assert!(!b.update_wallet(42, "ghost", "", 0));
        assert!(!b.delete_wallet(42));
        assert!(b.create_wallet("Cash", "", 0));
        assert!(!b.create_wallet("Cash", "", 0));
    }
}
