/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::{
	sync::Arc,
	thread::JoinHandle,
	hash::{Hash, BuildHasher, RandomState},
	time::{Instant, Duration},
};

use parking_lot::Mutex;
use crossbeam_channel::unbounded;
use log::warn;

use crate::{
	StoreRef,
	error::MapError,
	object::ttl_from_secs,
	store::Store,
	stats::Stats,
	config::TtlMapConfig,
	worker::{
		WorkerEvent,
		WorkerSender,
		ReaperWorker,
		register_worker,
	},
};

/// A thread-safe map whose entries can expire after a time-to-live.
///
/// Every operation takes the same lock over the entries and their
/// deadlines, so operations are linearizable. Reads drop any entries whose
/// deadline has elapsed before answering, and a background reaper does the
/// same every sweep interval regardless of read traffic. Dropping the map
/// stops the reaper and waits for it to exit.
///
/// Values removed from the map are dropped outside the lock, so a value's
/// `Drop` may itself call into the map.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use paper_ttl::{TtlMap, MapError};
///
/// let map = TtlMap::<&str, &str>::new().unwrap();
///
/// map.set("key1", "value1", Some(Duration::from_secs(5)));
/// map.set("key2", "value2", None);
///
/// assert_eq!(*map.get(&"key1").unwrap(), "value1");
/// assert_eq!(map.get(&"key3"), Err(MapError::KeyNotFound));
/// assert_eq!(map.len(), 2);
/// ```
pub struct TtlMap<K, V, S = RandomState>
where
	K: 'static + Eq + Hash + Clone + Send,
	V: 'static + Send + Sync,
	S: 'static + Clone + Send + BuildHasher,
{
	store: StoreRef<K, V, S>,
	config: TtlMapConfig,

	stopper: WorkerSender,
	reaper: Option<JoinHandle<Result<(), MapError>>>,
}

impl<K, V> TtlMap<K, V, RandomState>
where
	K: 'static + Eq + Hash + Clone + Send,
	V: 'static + Send + Sync,
{
	/// Creates an empty map which sweeps expired entries every second.
	/// Returns a [`MapError`] only if the reaper thread cannot be spawned.
	pub fn new() -> Result<Self, MapError> {
		Self::with_config(TtlMapConfig::default())
	}

	/// Creates an empty map with the supplied configuration.
	/// If the configured sweep interval is zero, a [`MapError`] will be
	/// returned.
	///
	/// # Examples
	/// ```
	/// use std::time::Duration;
	/// use paper_ttl::{TtlMap, TtlMapConfig, MapError};
	///
	/// let config = TtlMapConfig::default()
	///     .with_sweep_interval(Duration::from_millis(100));
	///
	/// assert!(TtlMap::<u32, u32>::with_config(config).is_ok());
	///
	/// // Supplying a sweep interval of zero will return a MapError.
	/// let config = config.with_sweep_interval(Duration::ZERO);
	/// assert_eq!(
	///     TtlMap::<u32, u32>::with_config(config).err(),
	///     Some(MapError::ZeroSweepInterval),
	/// );
	/// ```
	pub fn with_config(config: TtlMapConfig) -> Result<Self, MapError> {
		Self::with_hasher(config, RandomState::new())
	}
}

impl<K, V, S> TtlMap<K, V, S>
where
	K: 'static + Eq + Hash + Clone + Send,
	V: 'static + Send + Sync,
	S: 'static + Clone + Send + BuildHasher,
{
	/// Creates an empty map with the supplied configuration whose entries
	/// and deadlines are hashed with `hasher`.
	pub fn with_hasher(config: TtlMapConfig, hasher: S) -> Result<Self, MapError> {
		config.validate()?;

		let store = Arc::new(Mutex::new(Store::with_hasher(hasher)));
		let (stopper, listener) = unbounded();

		let reaper = register_worker(ReaperWorker::new(
			listener,
			store.clone(),
			config.sweep_interval(),
		))?;

		let map = TtlMap {
			store,
			config,

			stopper,
			reaper: Some(reaper),
		};

		Ok(map)
	}

	/// Returns the interval between background sweeps.
	#[must_use]
	pub fn sweep_interval(&self) -> Duration {
		self.config.sweep_interval()
	}

	/// Gets the value associated with the supplied key.
	/// If the key is not in the map or its ttl has elapsed, returns a
	/// [`MapError`].
	pub fn get(&self, key: &K) -> Result<Arc<V>, MapError> {
		self.with_store(|store| store.get(key, Instant::now()))
	}

	/// Gets the value associated with the supplied key, or `default` if the
	/// key is not in the map or its ttl has elapsed.
	pub fn get_or(&self, key: &K, default: Arc<V>) -> Arc<V> {
		self.get(key).unwrap_or(default)
	}

	/// Gets the value associated with the supplied key, or the result of
	/// `default` if the key is not in the map or its ttl has elapsed.
	/// `default` is only called on a miss.
	pub fn get_or_else<F>(&self, key: &K, default: F) -> Arc<V>
	where
		F: FnOnce() -> Arc<V>,
	{
		self.get(key).unwrap_or_else(|_| default())
	}

	/// Sets the supplied key and value in the map, replacing any existing
	/// value and deadline for that key. A `ttl` of `None` never expires and
	/// a zero `ttl` is expired as soon as it is written.
	///
	/// # Examples
	/// ```
	/// use std::time::Duration;
	/// use paper_ttl::TtlMap;
	///
	/// let map = TtlMap::<u32, u32>::new().unwrap();
	///
	/// map.set(0, 1, Some(Duration::ZERO));
	/// assert!(!map.contains(&0));
	///
	/// map.set(0, 2, None);
	/// assert_eq!(*map.get(&0).unwrap(), 2);
	/// ```
	pub fn set(&self, key: K, value: V, ttl: Option<Duration>) {
		self.with_store(|store| store.set(key, value, ttl, Instant::now()));
	}

	/// Same as [`TtlMap::set`] but with the ttl expressed in seconds.
	/// If the ttl is negative or not finite, returns a [`MapError`] and
	/// leaves the map untouched.
	pub fn set_secs(&self, key: K, value: V, ttl: Option<f64>) -> Result<(), MapError> {
		let ttl = ttl.map(ttl_from_secs).transpose()?;
		self.set(key, value, ttl);

		Ok(())
	}

	/// Deletes the value associated with the supplied key.
	/// If the key is not in the map or its ttl has elapsed, returns a
	/// [`MapError`].
	pub fn delete(&self, key: &K) -> Result<(), MapError> {
		self.with_store(|store| store.del(key, Instant::now()))
	}

	/// Replaces the ttl of the supplied key without changing its value.
	/// If the key is not in the map or its ttl has elapsed, returns a
	/// [`MapError`].
	pub fn set_ttl(&self, key: &K, ttl: Option<Duration>) -> Result<(), MapError> {
		self.with_store(|store| store.set_ttl(key, ttl, Instant::now()))
	}

	/// Returns the time left before the supplied key expires, or `None` if
	/// it never does.
	pub fn ttl(&self, key: &K) -> Result<Option<Duration>, MapError> {
		self.with_store(|store| store.ttl(key, Instant::now()))
	}

	#[must_use]
	pub fn contains(&self, key: &K) -> bool {
		self.with_store(|store| store.contains(key, Instant::now()))
	}

	/// Returns the number of unexpired entries.
	#[must_use]
	pub fn len(&self) -> usize {
		self.with_store(|store| store.len(Instant::now()))
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns a snapshot of the unexpired keys, in no particular order.
	#[must_use]
	pub fn keys(&self) -> Vec<K> {
		self.with_store(|store| store.keys(Instant::now()))
	}

	/// Returns a snapshot of the unexpired values, in no particular order.
	#[must_use]
	pub fn values(&self) -> Vec<Arc<V>> {
		self.with_store(|store| store.values(Instant::now()))
	}

	/// Returns a snapshot of the unexpired entries, in no particular order.
	#[must_use]
	pub fn items(&self) -> Vec<(K, Arc<V>)> {
		self.with_store(|store| store.items(Instant::now()))
	}

	/// Removes every entry from the map.
	pub fn clear(&self) {
		self.with_store(Store::clear);
	}

	/// Returns the current statistics.
	#[must_use]
	pub fn stats(&self) -> Stats {
		self.with_store(|store| store.stats(Instant::now()))
	}

	/// Runs `f` with the store locked. Objects removed by `f` are dropped
	/// only after the lock is released, so a value's `Drop` may use the map.
	fn with_store<T, F>(&self, f: F) -> T
	where
		F: FnOnce(&mut Store<K, V, S>) -> T,
	{
		let (result, reclaimed) = {
			let mut store = self.store.lock();
			let result = f(&mut *store);

			(result, store.take_reclaimed())
		};

		drop(reclaimed);
		result
	}
}

impl<K, V, S> Drop for TtlMap<K, V, S>
where
	K: 'static + Eq + Hash + Clone + Send,
	V: 'static + Send + Sync,
	S: 'static + Clone + Send + BuildHasher,
{
	fn drop(&mut self) {
		// the reaper also stops if the channel disconnects, so a failed
		// send still ends in a clean exit
		self.stopper.send(WorkerEvent::Stop).ok();

		let Some(reaper) = self.reaper.take() else {
			return;
		};

		match reaper.join() {
			Ok(Ok(())) => {},
			Ok(Err(err)) => warn!("reaper exited with an error: {err}"),
			Err(_) => warn!("reaper thread panicked"),
		}
	}
}
