// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! JNI exports for the Android activities.
//!
//! The JVM may call in from any thread, so every export goes through one
//! process-wide lock around the [`Bridge`].

use std::sync::{Mutex, PoisonError};

use jni::objects::{JObject, JObjectArray, JString, JValue};
use jni::sys::{jboolean, jint, jlong, jobject, jobjectArray, JNI_FALSE, JNI_TRUE};
use jni::JNIEnv;
use once_cell::sync::Lazy;
use thiserror::Error;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

use crate::bridge::{Bridge, TransactionRecord, WalletRecord};
use crate::logging::init_logger;

static BRIDGE: Lazy<Mutex<Bridge>> = Lazy::new(|| Mutex::new(Bridge::new()));

const WALLET_DTO: &str = "com/example/pocketmoneyapp/data/WalletDto";
const WALLET_DTO_CTOR: &str = "(ILjava/lang/String;Ljava/lang/String;J)V";
const TRANSACTION_DTO: &str = "com/example/pocketmoneyapp/data/TransactionDto";
const TRANSACTION_DTO_CTOR: &str = "(IIJLjava/lang/String;ILjava/lang/String;)V";

#[derive(Debug, Error)]
enum ExportError {
    #[error(transparent)]
    Jni(#[from] jni::errors::Error),
    #[error("value {0} does not fit a Java int")]
    IntOutOfRange(i64),
}

type ExportResult<T> = std::result::Result<T, ExportError>;

/// Narrows a storage id to the `Int` the Kotlin DTOs carry.
fn java_int(v: i64) -> ExportResult<jint> {
    jint::try_from(v).map_err(|_| ExportError::IntOutOfRange(v))
}

fn with_bridge<R>(f: impl FnOnce(&mut Bridge) -> R) -> R {
    let mut guard = BRIDGE.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

fn to_jboolean(b: bool) -> jboolean {
    if b { JNI_TRUE } else { JNI_FALSE }
}

fn read_string(env: &mut JNIEnv, s: &JString) -> Option<String> {
    match env.get_string(s) {
        Ok(v) => Some(v.into()),
        Err(e) => {
            error!(error = %e, "could not read Java string");
            None
        }
    }
}

fn wallet_object<'local>(
    env: &mut JNIEnv<'local>,
    w: &WalletRecord,
) -> ExportResult<JObject<'local>> {
    let id = java_int(w.id)?;
    let name = env.new_string(&w.name)?;
    let description = env.new_string(&w.description)?;
    Ok(env.new_object(
        WALLET_DTO,
        WALLET_DTO_CTOR,
        &[
            JValue::Int(id),
            JValue::Object(&name),
            JValue::Object(&description),
            JValue::Long(w.balance),
        ],
    )?)
}

fn transaction_object<'local>(
    env: &mut JNIEnv<'local>,
    t: &TransactionRecord,
) -> ExportResult<JObject<'local>> {
    let id = java_int(t.id)?;
    let wallet_id = java_int(t.wallet_id)?;
    let type_code = java_int(t.type_code)?;
    let description = env.new_string(&t.description)?;
    let timestamp = env.new_string(&t.timestamp)?;
    Ok(env.new_object(
        TRANSACTION_DTO,
        TRANSACTION_DTO_CTOR,
        &[
            JValue::Int(id),
            JValue::Int(wallet_id),
            JValue::Long(t.amount),
            JValue::Object(&description),
            JValue::Int(type_code),
            JValue::Object(&timestamp),
        ],
    )?)
}

fn object_array<'local, T>(
    env: &mut JNIEnv<'local>,
    class: &str,
    items: &[T],
    build: impl Fn(&mut JNIEnv<'local>, &T) -> ExportResult<JObject<'local>>,
) -> ExportResult<JObjectArray<'local>> {
    let len = java_int(items.len() as i64)?;
    let array = env.new_object_array(len, class, JObject::null())?;
    for (i, item) in items.iter().enumerate() {
        let obj = build(env, item)?;
        env.set_object_array_element(&array, java_int(i as i64)?, &obj)?;
        env.delete_local_ref(obj)?;
    }
    Ok(array)
}

fn array_or_null(res: ExportResult<JObjectArray>) -> jobjectArray {
    match res {
        Ok(array) => JObject::from(array).into_raw(),
        Err(e) => {
            error!(error = %e, "could not build Java array");
            std::ptr::null_mut()
        }
    }
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_pocketmoneyapp_MainActivity_initializeNativeDb(
    mut env: JNIEnv,
    _this: JObject,
    db_path: JString,
) {
    init_logger(LevelFilter::DEBUG);
    if let Some(path) = read_string(&mut env, &db_path) {
        with_bridge(|b| b.init_storage(&path));
    }
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_pocketmoneyapp_MainActivity_createWalletNative(
    mut env: JNIEnv,
    _this: JObject,
    name: JString,
    description: JString,
    balance: jlong,
) -> jboolean {
    let (Some(name), Some(description)) = (
        read_string(&mut env, &name),
        read_string(&mut env, &description),
    ) else {
        return JNI_FALSE;
    };
    to_jboolean(with_bridge(|b| b.create_wallet(&name, &description, balance)))
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_pocketmoneyapp_MainActivity_getAllWalletsNative(
    mut env: JNIEnv,
    _this: JObject,
) -> jobjectArray {
    let wallets = with_bridge(|b| b.get_all_wallets());
    array_or_null(object_array(&mut env, WALLET_DTO, &wallets, wallet_object))
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_pocketmoneyapp_MainActivity_getWalletByIdNative(
    mut env: JNIEnv,
    _this: JObject,
    id: jint,
) -> jobject {
    let Some(wallet) = with_bridge(|b| b.get_wallet_by_id(id as i64)) else {
        return std::ptr::null_mut();
    };
    match wallet_object(&mut env, &wallet) {
        Ok(obj) => obj.into_raw(),
        Err(e) => {
            error!(error = %e, "could not build WalletDto");
            std::ptr::null_mut()
        }
    }
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_pocketmoneyapp_MainActivity_updateWalletNative(
    mut env: JNIEnv,
    _this: JObject,
    id: jint,
    name: JString,
    description: JString,
    balance: jlong,
) -> jboolean {
    let (Some(name), Some(description)) = (
        read_string(&mut env, &name),
        read_string(&mut env, &description),
    ) else {
        return JNI_FALSE;
    };
    to_jboolean(with_bridge(|b| {
        b.update_wallet(id as i64, &name, &description, balance)
    }))
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_pocketmoneyapp_MainActivity_deleteWalletNative(
    _env: JNIEnv,
    _this: JObject,
    id: jint,
) -> jboolean {
    to_jboolean(with_bridge(|b| b.delete_wallet(id as i64)))
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_pocketmoneyapp_TransactionListActivity_createTransactionNative(
    mut env: JNIEnv,
    _this: JObject,
    wallet_id: jint,
    description: JString,
    amount: jlong,
    type_code: jint,
    timestamp: JString,
) -> jboolean {
    let (Some(description), Some(timestamp)) = (
        read_string(&mut env, &description),
        read_string(&mut env, &timestamp),
    ) else {
        return JNI_FALSE;
    };
    to_jboolean(with_bridge(|b| {
        b.create_transaction(
            wallet_id as i64,
            &description,
            amount,
            type_code as i64,
            &timestamp,
        )
    }))
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_pocketmoneyapp_TransactionListActivity_getTransactionsByWalletNative(
    mut env: JNIEnv,
    _this: JObject,
    wallet_id: jint,
) -> jobjectArray {
    let txs = with_bridge(|b| b.get_transactions_by_wallet(wallet_id as i64));
    array_or_null(object_array(&mut env, TRANSACTION_DTO, &txs, transaction_object))
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_pocketmoneyapp_TransactionListActivity_updateTransactionNative(
    mut env: JNIEnv,
    _this: JObject,
    id: jint,
    wallet_id: jint,
    description: JString,
    amount: jlong,
    type_code: jint,
    timestamp: JString,
) -> jboolean {
    let (Some(description), Some(timestamp)) = (
        read_string(&mut env, &description),
        read_string(&mut env, &timestamp),
    ) else {
        return JNI_FALSE;
    };
    to_jboolean(with_bridge(|b| {
        b.update_transaction(
            id as i64,
            wallet_id as i64,
            &description,
            amount,
            type_code as i64,
            &timestamp,
        )
    }))
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_pocketmoneyapp_TransactionListActivity_deleteTransactionNative(
    _env: JNIEnv,
    _this: JObject,
    id: jint,
    wallet_id: jint,
) -> jboolean {
    to_jboolean(with_bridge(|b| b.delete_transaction(id as i64, wallet_id as i64)))
}

/// Drops the connection. Pairs with an instance method on `MainActivity`:
///
/// ```kotlin
/// private external fun closeNativeDb()
/// ```
///
/// called from `onDestroy` when `isFinishing`.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_pocketmoneyapp_MainActivity_closeNativeDb(
    _env: JNIEnv,
    _this: JObject,
) {
    close_shared();
}

fn close_shared() {
    with_bridge(Bridge::close);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_beyond_java_int_are_refused() {
        assert_eq!(java_int(42).unwrap(), 42);
        assert_eq!(java_int(i32::MAX as i64).unwrap(), i32::MAX);
        assert!(matches!(
            java_int(i32::MAX as i64 + 1),
            Err(ExportError::IntOutOfRange(_))
        ));
        assert!(matches!(
            java_int(i64::MIN),
            Err(ExportError::IntOutOfRange(_))
        ));
    }

    #[test]
    fn closing_the_shared_bridge_allows_reopening() {
        assert!(with_bridge(|b| b.init_storage(":memory:")));
        assert!(with_bridge(|b| b.create_wallet("Cash", "", 0)));
        close_shared();
        assert!(!with_bridge(|b| b.is_initialized()));
        assert!(with_bridge(|b| b.get_all_wallets()).is_empty());

        assert!(with_bridge(|b| b.init_storage(":memory:")));
        assert!(with_bridge(|b| b.get_all_wallets()).is_empty());
        close_shared();
    }
}
