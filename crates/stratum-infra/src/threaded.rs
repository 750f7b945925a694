// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A backend that hands finished command lists to a dedicated submission thread.
//!
//! The calling thread only queues the list; the wrapped backend executes it on
//! the `stratum-submit` thread. The job channel holds a single list, so the
//! caller can run at most one frame ahead of the worker. Results come back on a
//! separate channel and are collected on the next `execute`, after that call's
//! list has been queued.

use crossbeam_channel::{Receiver, Sender};
use std::thread::{self, JoinHandle};
use stratum_core::{BackendCaps, CommandList, RenderBackend, RenderError, RenderStats, Settings};

type FrameResult = Result<RenderStats, RenderError>;

#[derive(Debug)]
struct Worker {
    jobs: Sender<CommandList>,
    results: Receiver<FrameResult>,
    handle: JoinHandle<()>,
}

/// Runs another backend on its own thread.
#[derive(Debug)]
pub struct ThreadedBackend<B: RenderBackend + 'static> {
    name: String,
    pending: Option<B>,
    worker: Option<Worker>,
    last_frame_stats: RenderStats,
}

impl<B: RenderBackend + 'static> ThreadedBackend<B> {
    /// Wraps `inner`. The thread starts at `init`.
    pub fn new(inner: B) -> Self {
        Self {
            name: format!("threaded({})", inner.name()),
            pending: Some(inner),
            worker: None,
            last_frame_stats: RenderStats::default(),
        }
    }

    /// Collects finished frames. Returns the first error reported, if any.
    fn collect(&mut self) -> Result<(), RenderError> {
        let Some(worker) = &self.worker else {
            return Err(RenderError::BackendDisconnected);
        };
        for result in worker.results.try_iter() {
            self.last_frame_stats = result?;
        }
        Ok(())
    }
}

impl<B: RenderBackend + 'static> RenderBackend for ThreadedBackend<B> {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self, settings: &Settings) -> Result<BackendCaps, RenderError> {
        let mut inner = self.pending.take().ok_or_else(|| {
            RenderError::InitializationFailed(format!("{} is already running", self.name))
        })?;

        let caps = inner.init(settings)?;

        let (jobs, job_rx) = crossbeam_channel::bounded::<CommandList>(1);
        let (result_tx, results) = crossbeam_channel::unbounded::<FrameResult>();
        let handle = thread::Builder::new()
            .name("stratum-submit".to_string())
            .spawn(move || {
                log::debug!("Submission thread started for '{}'.", inner.name());
                for list in job_rx {
                    let result = inner.execute(list);
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
                inner.shutdown();
                log::debug!("Submission thread finished.");
            })
            .map_err(|err| {
                RenderError::InitializationFailed(format!("cannot spawn submission thread: {err}"))
            })?;

        self.worker = Some(Worker {
            jobs,
            results,
            handle,
        });
        Ok(BackendCaps {
            threaded: true,
            ..caps
        })
    }

    fn execute(&mut self, list: CommandList) -> Result<RenderStats, RenderError> {
        let worker = self.worker.as_ref().ok_or(RenderError::BackendDisconnected)?;
        worker
            .jobs
            .send(list)
            .map_err(|_| RenderError::BackendDisconnected)?;
        // This frame is queued whatever earlier frames reported.
        self.collect()?;
        Ok(self.last_frame_stats.clone())
    }

    fn shutdown(&mut self) {
        let Some(Worker {
            jobs,
            results,
            handle,
        }) = self.worker.take()
        else {
            return;
        };

        // Closing the job channel ends the worker loop once queued lists are done.
        drop(jobs);
        if handle.join().is_err() {
            log::error!("Submission thread panicked.");
        }
        for result in results.try_iter() {
            match result {
                Ok(stats) => self.last_frame_stats = stats,
                Err(err) => log::warn!("Frame failed during shutdown: {err}"),
            }
        }
        log::info!(
            "{} shut down at frame {}.",
            self.name,
            self.last_frame_stats.frame_number
        );
    }
}

impl<B: RenderBackend + 'static> Drop for ThreadedBackend<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
