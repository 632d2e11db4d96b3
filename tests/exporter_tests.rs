// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pocketmoney::db::Storage;
use pocketmoney::models::{NewTransaction, NewWallet, TransactionType};
use pocketmoney::repo::{TransactionRepository, WalletRepository};
use pocketmoney::{cli, commands::exporter};
use serde_json::Value;
use tempfile::tempdir;

fn setup() -> (Storage, i64) {
    let storage = Storage::in_memory().unwrap();
    let id = WalletRepository::new(&storage)
        .create(&NewWallet::new("Checking", ""))
        .unwrap();
    let txs = TransactionRepository::new(&storage);
    for (kind, amount, ts, desc) in [
        (TransactionType::Expense, 1234, "2025-01-02 08:00:00", "Corner Shop, weekly run"),
        (TransactionType::Income, 5000, "2025-01-01 08:00:00", "Allowance"),
    ] {
        txs.create(&NewTransaction {
            wallet_id: id,
            description: desc.into(),
            amount,
            kind,
            timestamp: ts.into(),
        })
        .unwrap();
    }
    (storage, id)
}

fn run_export(storage: &Storage, wallet: i64, format: &str, out: &str) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from([
        "pocketmoney",
        "export",
        "--wallet",
        &wallet.to_string(),
        "--format",
        format,
        "--out",
        out,
    ]);
    let Some(("export", sub)) = matches.subcommand() else {
        panic!("export command not parsed");
    };
    exporter::handle(storage, sub)
}

#[test]
fn export_csv_is_oldest_first_and_quotes_commas() {
    let (storage, id) = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join("export.csv");
    run_export(&storage, id, "csv", &out.to_string_lossy()).unwrap();

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][3], "INCOME");
    assert_eq!(&rows[1][4], "1234");
    assert_eq!(&rows[1][5], "Corner Shop, weekly run");
    assert_eq!(&rows[1][1], "Checking");
}

#[test]
fn export_json_lists_transactions() {
    let (storage, id) = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join("export.json");
    run_export(&storage, id, "JSON", &out.to_string_lossy()).unwrap();

    let v: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let arr = v.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["type"], "INCOME");
    assert_eq!(arr[1]["amount"], 1234);
}

#[test]
fn export_rejects_unknown_wallet_and_format() {
    let (storage, id) = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join("x.out");
    let out = out.to_string_lossy();
    assert!(run_export(&storage, id + 10, "csv", &out).is_err());
    let err = run_export(&storage, id, "xml", &out).unwrap_err();
    assert!(err.to_string().contains("Unknown format"));
}
