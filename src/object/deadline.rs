/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::time::{Instant, Duration};

use crate::error::MapError;

/// The instant at which an entry stops being visible to readers.
///
/// Every [`Deadline::At`] orders before [`Deadline::Never`], so a
/// never-expiring entry always sorts to the back of the deadline index.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub enum Deadline {
	At(Instant),
	Never,
}

impl Deadline {
	/// Returns the deadline of an entry written at `now` with the supplied
	/// `ttl`. A `ttl` of `None`, or one which overflows the clock, never
	/// expires.
	#[must_use]
	pub fn from_ttl(ttl: Option<Duration>, now: Instant) -> Self {
		match ttl.and_then(|ttl| now.checked_add(ttl)) {
			Some(instant) => Deadline::At(instant),
			None => Deadline::Never,
		}
	}

	#[must_use]
	pub fn is_elapsed(&self, now: Instant) -> bool {
		matches!(self, Deadline::At(instant) if *instant <= now)
	}

	/// Returns the time left until the deadline elapses, or `None` if it
	/// never does.
	#[must_use]
	pub fn remaining(&self, now: Instant) -> Option<Duration> {
		match self {
			Deadline::At(instant) => Some(instant.saturating_duration_since(now)),
			Deadline::Never => None,
		}
	}
}

/// Converts a ttl expressed in seconds into a [`Duration`], rejecting
/// negative, NaN and unrepresentable values with [`MapError::InvalidTtl`].
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use paper_ttl::{MapError, ttl_from_secs};
///
/// assert_eq!(ttl_from_secs(1.5), Ok(Duration::from_millis(1500)));
/// assert_eq!(ttl_from_secs(-1.0), Err(MapError::InvalidTtl));
/// ```
pub fn ttl_from_secs(secs: f64) -> Result<Duration, MapError> {
	Duration::try_from_secs_f64(secs).map_err(|_| MapError::InvalidTtl)
}
