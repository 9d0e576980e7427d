/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use thiserror::Error;

#[derive(Debug, PartialEq, Error)]
pub enum MapError {
	#[error("internal error")]
	Internal,

	#[error("the key was not found in the map")]
	KeyNotFound,

	#[error("the ttl must be a non-negative, finite number of seconds")]
	InvalidTtl,

	#[error("the sweep interval cannot be zero")]
	ZeroSweepInterval,
}
