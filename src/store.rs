/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::{
	sync::Arc,
	hash::{Hash, BuildHasher},
	time::{Instant, Duration},
	collections::HashMap,
};

use crate::{
	error::MapError,
	object::Object,
	expiries::Expiries,
	stats::{Stats, StoreStats},
};

/// The entry store and its deadline index. Both are only ever touched
/// together, by a caller holding the lock around the store, so every
/// method here assumes exclusive access.
///
/// Each object remembers its own deadline, which is the single pair the
/// index holds for its key. Overwrites and deletes remove exactly that
/// pair, so a popped pair always belongs to the key's current entry.
///
/// Objects removed from the store are parked in `reclaimed` rather than
/// dropped, so the lock holder can drop them after releasing the lock.
pub struct Store<K, V, S> {
	objects: HashMap<K, Object<V>, S>,
	expiries: Expiries<K, S>,
	stats: StoreStats,

	reclaimed: Vec<Object<V>>,
}

impl<K, V, S> Store<K, V, S>
where
	K: Eq + Hash + Clone,
	S: Clone + BuildHasher,
{
	pub fn with_hasher(hasher: S) -> Self {
		Store {
			objects: HashMap::with_hasher(hasher.clone()),
			expiries: Expiries::with_hasher(hasher),
			stats: StoreStats::new(),

			reclaimed: Vec::new(),
		}
	}

	pub fn get(&mut self, key: &K, now: Instant) -> Result<Arc<V>, MapError> {
		self.prune_expired(now);

		match self.objects.get(key) {
			Some(object) => {
				self.stats.hit();
				Ok(object.data())
			},

			None => {
				self.stats.miss();
				Err(MapError::KeyNotFound)
			},
		}
	}

	pub fn set(&mut self, key: K, value: V, ttl: Option<Duration>, now: Instant) {
		let object = Object::new(value, ttl, now);

		if let Some(old_object) = self.objects.get(&key) {
			self.expiries.remove(&key, old_object.deadline());
		}

		self.stats.set();
		self.expiries.insert(key.clone(), object.deadline());

		if let Some(old_object) = self.objects.insert(key, object) {
			self.reclaimed.push(old_object);
		}
	}

	pub fn del(&mut self, key: &K, now: Instant) -> Result<(), MapError> {
		self.prune_expired(now);

		let object = self.objects
			.remove(key)
			.ok_or(MapError::KeyNotFound)?;

		self.stats.del();
		self.expiries.remove(key, object.deadline());
		self.reclaimed.push(object);

		Ok(())
	}

	pub fn set_ttl(
		&mut self,
		key: &K,
		ttl: Option<Duration>,
		now: Instant,
	) -> Result<(), MapError> {
		self.prune_expired(now);

		let object = self.objects
			.get_mut(key)
			.ok_or(MapError::KeyNotFound)?;

		let old_deadline = object.expires(ttl, now);
		let new_deadline = object.deadline();

		self.expiries.remove(key, old_deadline);
		self.expiries.insert(key.clone(), new_deadline);

		Ok(())
	}

	pub fn ttl(&mut self, key: &K, now: Instant) -> Result<Option<Duration>, MapError> {
		self.prune_expired(now);

		self.objects
			.get(key)
			.map(|object| object.deadline().remaining(now))
			.ok_or(MapError::KeyNotFound)
	}

	pub fn contains(&mut self, key: &K, now: Instant) -> bool {
		self.prune_expired(now);
		self.objects.contains_key(key)
	}

	pub fn len(&mut self, now: Instant) -> usize {
		self.prune_expired(now);
		self.objects.len()
	}

	pub fn keys(&mut self, now: Instant) -> Vec<K> {
		self.prune_expired(now);
		self.objects.keys().cloned().collect()
	}

	pub fn values(&mut self, now: Instant) -> Vec<Arc<V>> {
		self.prune_expired(now);

		self.objects
			.values()
			.map(Object::data)
			.collect()
	}

	pub fn items(&mut self, now: Instant) -> Vec<(K, Arc<V>)> {
		self.prune_expired(now);

		self.objects
			.iter()
			.map(|(key, object)| (key.clone(), object.data()))
			.collect()
	}

	pub fn clear(&mut self) {
		self.reclaimed.extend(self.objects.drain().map(|(_, object)| object));
		self.expiries.clear();
	}

	pub fn stats(&mut self, now: Instant) -> Stats {
		self.prune_expired(now);
		self.stats.to_stats(self.objects.len())
	}

	/// Removes any objects whose deadline has elapsed at `now` and returns
	/// how many were removed. Only buckets at the front of the index are
	/// visited, so the cost is proportional to the number of expired keys.
	pub fn prune_expired(&mut self, now: Instant) -> usize {
		let mut count = 0;

		while let Some(expired) = self.expiries.pop_expired(now) {
			for key in expired {
				let Some(object) = self.objects.get(&key) else {
					continue;
				};

				if !object.is_expired(now) {
					// the pair was out of date, so restore the live one
					let deadline = object.deadline();
					self.expiries.insert(key, deadline);
				} else if let Some(object) = self.objects.remove(&key) {
					self.reclaimed.push(object);
					count += 1;
				}
			}
		}

		self.stats.expired(count);
		count
	}

	/// Hands over every object removed since the last call. The caller
	/// drops them once the lock is released, since a value's `Drop` may
	/// call back into the map.
	pub fn take_reclaimed(&mut self) -> Vec<Object<V>> {
		std::mem::take(&mut self.reclaimed)
	}
}
