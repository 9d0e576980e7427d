/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::time::{Instant, Duration};

/// Counters maintained by the store. Every update happens under the
/// store's lock, so plain integers suffice.
pub struct StoreStats {
	total_hits: u64,
	total_gets: u64,
	total_sets: u64,
	total_dels: u64,
	total_expired: u64,

	start_time: Instant,
}

/// This struct holds the basic statistical information about `TtlMap`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
	len: usize,

	total_hits: u64,
	total_gets: u64,
	total_sets: u64,
	total_dels: u64,
	total_expired: u64,

	uptime: Duration,
}

impl Stats {
	/// Returns the number of live entries at the time of the snapshot.
	#[must_use]
	pub fn get_len(&self) -> usize {
		self.len
	}

	/// Returns the map's total number of gets.
	#[must_use]
	pub fn get_total_gets(&self) -> u64 {
		self.total_gets
	}

	/// Returns the map's total number of sets.
	#[must_use]
	pub fn get_total_sets(&self) -> u64 {
		self.total_sets
	}

	/// Returns the map's total number of successful dels.
	#[must_use]
	pub fn get_total_dels(&self) -> u64 {
		self.total_dels
	}

	/// Returns the number of entries reclaimed because their deadline elapsed.
	#[must_use]
	pub fn get_total_expired(&self) -> u64 {
		self.total_expired
	}

	/// Returns the map's current miss ratio.
	#[must_use]
	pub fn get_miss_ratio(&self) -> f64 {
		if self.total_gets == 0 {
			return 1.0;
		}

		1.0 - self.total_hits as f64 / self.total_gets as f64
	}

	/// Returns the time elapsed since the map was constructed.
	#[must_use]
	pub fn get_uptime(&self) -> Duration {
		self.uptime
	}
}

impl StoreStats {
	pub fn new() -> Self {
		StoreStats {
			total_hits: 0,
			total_gets: 0,
			total_sets: 0,
			total_dels: 0,
			total_expired: 0,

			start_time: Instant::now(),
		}
	}

	pub fn hit(&mut self) {
		self.total_gets += 1;
		self.total_hits += 1;
	}

	pub fn miss(&mut self) {
		self.total_gets += 1;
	}

	pub fn set(&mut self) {
		self.total_sets += 1;
	}

	pub fn del(&mut self) {
		self.total_dels += 1;
	}

	pub fn expired(&mut self, count: usize) {
		self.total_expired += count as u64;
	}

	#[must_use]
	pub fn to_stats(&self, len: usize) -> Stats {
		Stats {
			len,

			total_hits: self.total_hits,
			total_gets: self.total_gets,
			total_sets: self.total_sets,
			total_dels: self.total_dels,
			total_expired: self.total_expired,

			uptime: self.start_time.elapsed(),
		}
	}
}

#[cfg(test)]
mod tests {
	use crate::stats::StoreStats;

	#[test]
	fn miss_ratio_is_correct() {
		let mut stats = StoreStats::new();
		assert_eq!(stats.to_stats(0).get_miss_ratio(), 1.0);

		stats.hit();
		stats.hit();
		stats.hit();
		stats.miss();

		let snapshot = stats.to_stats(3);

		assert_eq!(snapshot.get_total_gets(), 4);
		assert_eq!(snapshot.get_miss_ratio(), 0.25);
		assert_eq!(snapshot.get_len(), 3);
	}
}
