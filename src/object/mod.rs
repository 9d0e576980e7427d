/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

mod deadline;

use std::{
	sync::Arc,
	time::{Instant, Duration},
};

pub use crate::object::deadline::{Deadline, ttl_from_secs};

pub struct Object<V> {
	data: Arc<V>,
	deadline: Deadline,
}

impl<V> Object<V> {
	pub fn new(data: V, ttl: Option<Duration>, now: Instant) -> Self {
		Object {
			data: Arc::new(data),
			deadline: Deadline::from_ttl(ttl, now),
		}
	}

	pub fn data(&self) -> Arc<V> {
		self.data.clone()
	}

	pub fn deadline(&self) -> Deadline {
		self.deadline
	}

	pub fn is_expired(&self, now: Instant) -> bool {
		self.deadline.is_elapsed(now)
	}

	/// Re-arms the object's deadline and returns the one it replaced.
	pub fn expires(&mut self, ttl: Option<Duration>, now: Instant) -> Deadline {
		let old_deadline = self.deadline;
		self.deadline = Deadline::from_ttl(ttl, now);

		old_deadline
	}
}
