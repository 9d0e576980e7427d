/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::time::Duration;

use serde::{Serialize, Deserialize};

use crate::error::MapError;

const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Construction parameters for a [`TtlMap`](crate::TtlMap).
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use paper_ttl::TtlMapConfig;
///
/// let config = TtlMapConfig::default()
///     .with_sweep_interval(Duration::from_millis(250));
///
/// assert_eq!(config.sweep_interval(), Duration::from_millis(250));
/// ```
#[derive(PartialEq, Eq, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TtlMapConfig {
	sweep_interval: Duration,
}

impl Default for TtlMapConfig {
	fn default() -> Self {
		TtlMapConfig {
			sweep_interval: DEFAULT_SWEEP_INTERVAL,
		}
	}
}

impl TtlMapConfig {
	/// Sets how long the background reaper sleeps between sweeps.
	#[must_use]
	pub fn with_sweep_interval(mut self, sweep_interval: Duration) -> Self {
		self.sweep_interval = sweep_interval;
		self
	}

	#[must_use]
	pub fn sweep_interval(&self) -> Duration {
		self.sweep_interval
	}

	pub fn validate(&self) -> Result<(), MapError> {
		if self.sweep_interval.is_zero() {
			return Err(MapError::ZeroSweepInterval);
		}

		Ok(())
	}
}
