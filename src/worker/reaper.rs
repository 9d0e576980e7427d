/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::{
	hash::{Hash, BuildHasher},
	time::{Instant, Duration},
};

use crossbeam_channel::RecvTimeoutError;
use log::{debug, trace};

use crate::{
	StoreRef,
	error::MapError,
	worker::{Worker, WorkerEvent, WorkerReceiver},
};

/// Periodically removes expired objects from the store, independent of
/// read traffic. Waiting on the listener doubles as the sleep between
/// sweeps, so a stop event interrupts it immediately.
pub struct ReaperWorker<K, V, S> {
	listener: WorkerReceiver,
	store: StoreRef<K, V, S>,
	interval: Duration,
}

impl<K, V, S> Worker for ReaperWorker<K, V, S>
where
	Self: 'static + Send,
	K: Eq + Hash + Clone,
	S: Clone + BuildHasher,
{
	fn name(&self) -> &'static str {
		"paper-ttl-reaper"
	}

	fn run(&mut self) -> Result<(), MapError> {
		debug!("reaper started with a sweep interval of {:?}", self.interval);

		loop {
			match self.listener.recv_timeout(self.interval) {
				Err(RecvTimeoutError::Timeout) => {},

				Ok(WorkerEvent::Stop) | Err(RecvTimeoutError::Disconnected) => {
					debug!("reaper stopped");
					return Ok(());
				},
			}

			let (count, reclaimed) = {
				let mut store = self.store.lock();
				let count = store.prune_expired(Instant::now());

				(count, store.take_reclaimed())
			};

			// values may call back into the map when dropped
			drop(reclaimed);

			if count > 0 {
				trace!("reaper removed {count} expired entries");
			}
		}
	}
}

impl<K, V, S> ReaperWorker<K, V, S> {
	pub fn new(
		listener: WorkerReceiver,
		store: StoreRef<K, V, S>,
		interval: Duration,
	) -> Self {
		ReaperWorker {
			listener,
			store,
			interval,
		}
	}
}
