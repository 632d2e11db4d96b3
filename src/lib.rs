// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#[cfg(feature = "jni")]
pub mod android;
pub mod bridge;
pub mod cli;
pub mod commands;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod repo;
pub mod utils;
