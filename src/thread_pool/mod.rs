//! Fixed-size worker pools that run request jobs against clones of a
//! [`RecordStore`](crate::RecordStore).
//!
//! Request handlers run on these pools; each job blocks on the store call it makes, and the
//! store serializes those calls.
use crate::Result;

/// A pool of worker threads that runs submitted jobs.
pub trait ThreadPool {
    /// creates a pool with `threads` workers
    ///
    /// # Errors
    /// returns an error if the workers could not be started
    fn new(threads: u32) -> Result<Self>
    where
        Self: Sized;

    /// runs `job` on one of the workers. Returns without waiting for the job to finish.
    fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static;
}

mod rayon_pool;
mod shared_queue;

pub use self::rayon_pool::RayonThreadPool;
pub use self::shared_queue::SharedQueueThreadPool;
