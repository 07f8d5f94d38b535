//! Worker threads for phase-2 jobs.
//!
//! Jobs are handed over through a channel and run independently of the
//! caller that submitted them. Dropping the queue stops accepting work and
//! waits for queued jobs to finish.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::error::{LaunchproofError, Result};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A fixed set of threads draining a job channel.
pub struct BackgroundQueue {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl BackgroundQueue {
    /// Start `workers` threads (at least one).
    pub fn new(workers: usize) -> Self {
        let (sender, receiver) = mpsc::channel::<Job>();
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..workers.max(1))
            .map(|n| {
                let receiver = Arc::clone(&receiver);
                thread::Builder::new()
                    .name(format!("launchproof-bg-{}", n))
                    .spawn(move || worker_loop(&receiver))
            })
            .filter_map(|spawned| match spawned {
                Ok(handle) => Some(handle),
                Err(e) => {
                    tracing::error!("failed to start background worker: {}", e);
                    None
                }
            })
            .collect();

        Self {
            sender: Some(sender),
            workers,
        }
    }

    /// Queue a job.
    pub fn submit(&self, job: impl FnOnce() + Send + 'static) -> Result<()> {
        if self.workers.is_empty() {
            return Err(LaunchproofError::Other(anyhow::anyhow!(
                "no background workers are running"
            )));
        }
        self.sender
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("background queue is shut down"))?
            .send(Box::new(job))
            .map_err(|_| anyhow::anyhow!("background queue is shut down"))?;
        Ok(())
    }

    /// Stop accepting work and wait for queued jobs.
    pub fn shutdown(mut self) {
        self.drain();
    }

    fn drain(&mut self) {
        self.sender.take();
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                tracing::error!("background worker panicked");
            }
        }
    }
}

impl Drop for BackgroundQueue {
    fn drop(&mut self) {
        self.drain();
    }
}

fn worker_loop(receiver: &Mutex<Receiver<Job>>) {
    loop {
        let job = {
            let receiver = receiver.lock().unwrap_or_else(|e| e.into_inner());
            receiver.recv()
        };
        match job {
            Ok(job) => {
                if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                    tracing::error!("background job panicked");
                }
            }
            Err(_) => break,
        }
    }
}
