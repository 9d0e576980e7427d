/*
 * Copyright (c) Kia Shakiba
 *
 * This source code is licensed under the GNU AGPLv3 license found in the
 * LICENSE file in the root directory of this source tree.
 */

mod reaper;

use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};

use crate::error::MapError;

pub type WorkerSender = Sender<WorkerEvent>;
pub type WorkerReceiver = Receiver<WorkerEvent>;

#[derive(Clone, Copy, Debug)]
pub enum WorkerEvent {
	Stop,
}

pub trait Worker
where
	Self: 'static + Send,
{
	fn name(&self) -> &'static str;
	fn run(&mut self) -> Result<(), MapError>;
}

pub fn register_worker(
	mut worker: impl Worker,
) -> Result<JoinHandle<Result<(), MapError>>, MapError> {
	thread::Builder::new()
		.name(worker.name().to_owned())
		.spawn(move || worker.run())
		.map_err(|_| MapError::Internal)
}

pub use crate::worker::reaper::ReaperWorker;
