// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pocketmoney::db::Storage;
use pocketmoney::error::StoreError;
use pocketmoney::models::{NewTransaction, NewWallet, TransactionType};
use pocketmoney::repo::{TransactionOrder, TransactionRepository, WalletRepository};

fn setup() -> Storage {
    Storage::in_memory().unwrap()
}

#[test]
fn create_then_fetch_returns_same_fields() {
    let storage = setup();
    let repo = WalletRepository::new(&storage);
    let id = repo
        .create(&NewWallet::new("Piggy bank", "coins only").with_balance(1234))
        .unwrap();

    let w = repo.get_by_id(id).unwrap().unwrap();
    assert_eq!(w.id, id);
    assert_eq!(w.name, "Piggy bank");
    assert_eq!(w.description, "coins only");
    assert_eq!(w.balance, 1234);
}

#[test]
fn missing_wallet_is_none_not_a_zero_wallet() {
    let storage = setup();
    let repo = WalletRepository::new(&storage);
    assert_eq!(repo.get_by_id(0).unwrap(), None);
    assert_eq!(repo.get_by_id(99).unwrap(), None);
}

#[test]
fn get_all_is_ordered_by_id() {
    let storage = setup();
    let repo = WalletRepository::new(&storage);
    let b = repo.create(&NewWallet::new("B", "")).unwrap();
    let a = repo.create(&NewWallet::new("A", "")).unwrap();
    let ids: Vec<i64> = repo.get_all().unwrap().iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![b, a]);
}

#[test]
fn update_and_delete_report_rows_touched() {
    let storage = setup();
    let repo = WalletRepository::new(&storage);
    let id = repo.create(&NewWallet::new("Cash", "")).unwrap();

    let mut w = repo.get_by_id(id).unwrap().unwrap();
    w.name = "Wallet".into();
    w.description = "renamed".into();
    w.balance = -50;
    assert_eq!(repo.update(&w).unwrap(), 1);
    assert_eq!(repo.get_by_id(id).unwrap().unwrap(), w);

    w.id = 777;
    assert_eq!(repo.update(&w).unwrap(), 0);
    assert_eq!(repo.delete(777).unwrap(), 0);
    assert_eq!(repo.delete(id).unwrap(), 1);
    assert!(repo.get_all().unwrap().is_empty());
}

#[test]
fn duplicate_name_is_a_constraint_violation() {
    let storage = setup();
    let repo = WalletRepository::new(&storage);
    repo.create(&NewWallet::new("Cash", "")).unwrap();
    let err = repo.create(&NewWallet::new("Cash", "again")).unwrap_err();
    assert!(matches!(err, StoreError::Constraint(_)), "{err:?}");
}

#[test]
fn deleting_a_wallet_cascades_to_transactions() {
    let storage = setup();
    let wallets = WalletRepository::new(&storage);
    let txs = TransactionRepository::new(&storage);
    let id = wallets.create(&NewWallet::new("Cash", "")).unwrap();
    let tx_id = txs
        .create(&NewTransaction {
            wallet_id: id,
            description: "pocket money".into(),
            amount: 500,
            kind: TransactionType::Income,
            timestamp: "2025-08-01 08:00:00".into(),
        })
        .unwrap();

    wallets.delete(id).unwrap();
    assert_eq!(txs.get_by_id(tx_id).unwrap(), None);
    assert!(txs.get_by_wallet(id, TransactionOrder::default()).unwrap().is_empty());
}

#[test]
fn closed_storage_fails_every_operation() {
    let mut storage = setup();
    storage.close();
    let repo = WalletRepository::new(&storage);
    assert!(matches!(repo.create(&NewWallet::new("x", "")), Err(StoreError::NotOpen)));
    assert!(matches!(repo.get_by_id(1), Err(StoreError::NotOpen)));
    assert!(matches!(repo.get_all(), Err(StoreError::NotOpen)));
    assert!(matches!(repo.delete(1), Err(StoreError::NotOpen)));
    assert!(matches!(repo.recalculate_balance(1), Err(StoreError::NotOpen)));
}
