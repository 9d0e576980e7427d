/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::{
	time::Instant,
	hash::{Hash, BuildHasher},
	collections::{BTreeMap, HashSet},
};

use crate::object::Deadline;

/// Keys bucketed by deadline, ordered from the nearest deadline to the
/// furthest. A key appears in exactly one bucket per live entry.
pub struct Expiries<K, S> {
	map: BTreeMap<Deadline, HashSet<K, S>>,
	hasher: S,
}

impl<K, S> Expiries<K, S>
where
	K: Eq + Hash,
	S: Clone + BuildHasher,
{
	pub fn with_hasher(hasher: S) -> Self {
		Expiries {
			map: BTreeMap::new(),
			hasher,
		}
	}

	pub fn insert(&mut self, key: K, deadline: Deadline) {
		if let Some(keys) = self.map.get_mut(&deadline) {
			keys.insert(key);
		} else {
			let mut keys = HashSet::with_hasher(self.hasher.clone());
			keys.insert(key);

			self.map.insert(deadline, keys);
		}
	}

	pub fn remove(&mut self, key: &K, deadline: Deadline) {
		let Some(keys) = self.map.get_mut(&deadline) else {
			return;
		};

		keys.remove(key);

		if keys.is_empty() {
			self.map.remove(&deadline);
		}
	}

	/// Returns the nearest deadline in the index, if any.
	pub fn peek(&self) -> Option<Deadline> {
		self.map
			.first_key_value()
			.map(|(deadline, _)| *deadline)
	}

	/// Pops the bucket with the nearest deadline if that deadline has
	/// elapsed at `now`.
	pub fn pop_expired(&mut self, now: Instant) -> Option<HashSet<K, S>> {
		if !self.peek()?.is_elapsed(now) {
			return None;
		}

		self.map.pop_first().map(|(_, keys)| keys)
	}

	pub fn clear(&mut self) {
		self.map.clear();
	}
}

#[cfg(test)]
mod tests {
	use std::{
		hash::RandomState,
		time::{Instant, Duration},
	};

	use crate::{
		expiries::Expiries,
		object::Deadline,
	};

	fn expiries() -> Expiries<u32, RandomState> {
		Expiries::with_hasher(RandomState::new())
	}

	#[test]
	fn pops_only_elapsed_buckets_in_order() {
		let now = Instant::now();
		let mut expiries = expiries();

		expiries.insert(0, Deadline::At(now + Duration::from_secs(2)));
		expiries.insert(1, Deadline::At(now));
		expiries.insert(2, Deadline::At(now + Duration::from_secs(1)));
		expiries.insert(3, Deadline::Never);
		expiries.insert(4, Deadline::At(now));

		let first = expiries.pop_expired(now).expect("a bucket has elapsed");
		assert_eq!(first.len(), 2);
		assert!(first.contains(&1) && first.contains(&4));

		assert!(expiries.pop_expired(now).is_none());

		let later = now + Duration::from_secs(5);

		for expected in [2, 0] {
			let keys = expiries.pop_expired(later).expect("a bucket has elapsed");
			assert_eq!(keys.into_iter().collect::<Vec<_>>(), vec![expected]);
		}

		assert!(expiries.pop_expired(later).is_none());
		assert_eq!(expiries.peek(), Some(Deadline::Never));
	}

	#[test]
	fn removing_the_last_key_drops_the_bucket() {
		let now = Instant::now();
		let deadline = Deadline::At(now);
		let mut expiries = expiries();

		expiries.insert(0, deadline);
		expiries.insert(1, deadline);

		expiries.remove(&0, deadline);
		assert_eq!(expiries.peek(), Some(deadline));

		expiries.remove(&1, deadline);
		assert_eq!(expiries.peek(), None);
		assert!(expiries.pop_expired(now).is_none());
	}

	#[test]
	fn removing_with_a_stale_deadline_is_a_noop() {
		let now = Instant::now();
		let mut expiries = expiries();

		expiries.insert(0, Deadline::Never);
		expiries.remove(&0, Deadline::At(now));

		assert_eq!(expiries.peek(), Some(Deadline::Never));
	}

	#[test]
	fn popping_an_empty_index_is_a_noop() {
		let mut expiries = expiries();

		assert!(expiries.pop_expired(Instant::now()).is_none());

		expiries.clear();
		assert!(expiries.peek().is_none());
	}
}
