// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub balance: i64, // minor units
}

/// Insert form of a [`Wallet`]; the id is assigned by storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWallet {
    pub name: String,
    pub description: String,
    pub balance: i64,
}

impl NewWallet {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            balance: 0,
        }
    }

    pub fn with_balance(mut self, balance: i64) -> Self {
        self.balance = balance;
        self
    }
}

/// Direction of a transaction. The amount itself is always a magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn code(self) -> i64 {
        match self {
            TransactionType::Income => 0,
            TransactionType::Expense => 1,
        }
    }

    pub fn from_code(code: i64) -> Result<Self, StoreError> {
        match code {
            0 => Ok(TransactionType::Income),
            1 => Ok(TransactionType::Expense),
            other => Err(StoreError::InvalidTransactionType(other.to_string())),
        }
    }

    pub fn signed(self, amount: i64) -> i64 {
        match self {
            TransactionType::Income => amount,
            TransactionType::Expense => -amount,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Income => f.write_str("INCOME"),
            TransactionType::Expense => f.write_str("EXPENSE"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.eq_ignore_ascii_case("income") {
            return Ok(TransactionType::Income);
        }
        if t.eq_ignore_ascii_case("expense") {
            return Ok(TransactionType::Expense);
        }
        match t.parse::<i64>() {
            Ok(code) => TransactionType::from_code(code),
            Err(_) => Err(StoreError::InvalidTransactionType(t.to_string())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let code = value.as_i64()?;
        TransactionType::from_code(code).map_err(|_| FromSqlError::OutOfRange(code))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub wallet_id: i64,
    pub description: String,
    pub amount: i64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub timestamp: String, // YYYY-MM-DD HH:MM:SS
}

impl Transaction {
    pub fn signed_amount(&self) -> i64 {
        self.kind.signed(self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub wallet_id: i64,
    pub description: String,
    pub amount: i64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub timestamp: String,
}

impl NewTransaction {
    pub fn into_transaction(self, id: i64) -> Transaction {
        Transaction {
            id,
            wallet_id: self.wallet_id,
            description: self.description,
            amount: self.amount,
            kind: self.kind,
            timestamp: self.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_codes_match_storage_layout() {
        assert_eq!(TransactionType::Income.code(), 0);
        assert_eq!(TransactionType::Expense.code(), 1);
        assert!(matches!(
            TransactionType::from_code(2),
            Err(StoreError::InvalidTransactionType(_))
        ));
    }

    #[test]
    fn parses_names_and_codes() {
        assert_eq!("income".parse::<TransactionType>().unwrap(), TransactionType::Income);
        assert_eq!(" EXPENSE ".parse::<TransactionType>().unwrap(), TransactionType::Expense);
        assert_eq!("1".parse::<TransactionType>().unwrap(), TransactionType::Expense);
        assert!("refund".parse::<TransactionType>().is_err());
    }

    #[test]
    fn sign_is_carried_by_type() {
        assert_eq!(TransactionType::Income.signed(5000), 5000);
        assert_eq!(TransactionType::Expense.signed(2000), -2000);
    }

    #[test]
    fn transaction_serializes_type_field() {
        let t = Transaction {
            id: 1,
            wallet_id: 2,
            description: "lunch".into(),
            amount: 1200,
            kind: TransactionType::Expense,
            timestamp: "2025-08-01 12:00:00".into(),
        };
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["type"], "EXPENSE");
        assert_eq!(t.signed_amount(), -1200);
    }
}
