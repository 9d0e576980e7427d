/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

mod error;
mod object;
mod expiries;
mod store;
mod stats;
mod config;
mod worker;
mod map;

use std::sync::Arc;
use parking_lot::Mutex;

use crate::store::Store;

pub(crate) type StoreRef<K, V, S> = Arc<Mutex<Store<K, V, S>>>;

pub use crate::{
	error::MapError,
	object::{Deadline, ttl_from_secs},
	stats::Stats,
	config::TtlMapConfig,
	map::TtlMap,
};
