// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Errors raised by the storage handle and the repositories.

use std::path::PathBuf;

use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database is not open")]
    NotOpen,
    #[error("failed to open database at {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("failed to create schema: {0}")]
    Schema(#[source] rusqlite::Error),
    #[error("constraint violation: {0}")]
    Constraint(String),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("invalid amount {0}: amounts are non-negative magnitudes")]
    InvalidAmount(i64),
    #[error("invalid transaction type '{0}' (use INCOME|EXPENSE or 0|1)")]
    InvalidTransactionType(String),
    #[error("invalid timestamp '{0}', expected YYYY-MM-DD HH:MM:SS")]
    InvalidTimestamp(String),
    #[error(transparent)]
    Sql(rusqlite::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(f, msg) = &e {
            if f.code == ErrorCode::ConstraintViolation {
                return StoreError::Constraint(msg.clone().unwrap_or_else(|| f.to_string()));
            }
        }
        StoreError::Sql(e)
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn unique_violation_is_classified_as_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t(name TEXT UNIQUE); INSERT INTO t VALUES('a');")
            .unwrap();
        let err: StoreError = conn
            .execute("INSERT INTO t VALUES('a')", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, StoreError::Constraint(_)), "{err:?}");
    }

    #[test]
    fn other_sql_errors_pass_through() {
        let conn = Connection::open_in_memory().unwrap();
        let err: StoreError = conn.execute("SELECT * FROM nope", []).unwrap_err().into();
        assert!(matches!(err, StoreError::Sql(_)));
    }
}
