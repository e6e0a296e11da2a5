use std::thread;

use crossbeam::channel;
use crossbeam::channel::{Receiver, Sender};
use tracing::{debug, error, instrument};

use super::ThreadPool;
use crate::error::{ChirpyError, Result};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A thread pool implemented with a shared job queue (i.e. channel).
///
/// This implementation uses the MPMC [`channel`] provided by the crossbeam crate, with the pool
/// as the single producer and the workers as consumers.
///
/// If a job panics, the worker running it is replaced with a fresh one. Failing to start the
/// replacement is logged and otherwise ignored, so a pool can shrink to zero workers, after which
/// [`spawn`](ThreadPool::spawn) panics.
///
/// [`channel`]: https://docs.rs/crossbeam/0.8.1/crossbeam/channel/index.html
pub struct SharedQueueThreadPool {
    tx: Sender<Job>,
}

impl ThreadPool for SharedQueueThreadPool {
    /// starts `threads` workers, each holding a handle to the receiving end of the queue
    fn new(threads: u32) -> Result<Self> {
        let (tx, rx) = channel::unbounded::<Job>();
        for _ in 0..threads {
            spawn_worker(JobReceiver(rx.clone()))
                .map_err(|e| ChirpyError::Pool(format!("could not start worker: {}", e)))?;
        }
        debug!("created shared queue pool with {} threads", threads);
        Ok(SharedQueueThreadPool { tx })
    }

    /// queues `job` for the next idle worker
    ///
    /// # Panics
    ///
    /// Panics if the pool has no workers left.
    fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.tx
            .send(Box::new(job))
            .expect("there are no workers in the pool");
    }
}

/// The receiving end of the job queue owned by one worker. Dropping it while the worker is
/// unwinding from a panic starts a replacement worker.
#[derive(Clone, Debug)]
struct JobReceiver(Receiver<Job>);

impl Drop for JobReceiver {
    fn drop(&mut self) {
        if thread::panicking() {
            debug!("worker panicked, starting a replacement");
            if let Err(e) = spawn_worker(self.clone()) {
                error!("failed to start a replacement worker: {}", e);
            }
        }
    }
}

fn spawn_worker(rx: JobReceiver) -> std::io::Result<()> {
    thread::Builder::new()
        .name("chirpy-worker".to_string())
        .spawn(move || run_jobs(rx))
        .map(|_| ())
}

/// runs jobs from `rx` until the pool is dropped
#[instrument(skip(rx))]
fn run_jobs(rx: JobReceiver) {
    loop {
        match rx.0.recv() {
            Ok(job) => job(),
            Err(_) => {
                debug!("worker exiting, the pool was dropped");
                break;
            }
        }
    }
}
