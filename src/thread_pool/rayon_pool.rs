use tracing::{debug, error};

use super::ThreadPool;
use crate::error::{ChirpyError, Result};

/// A thread pool that uses the work stealing strategy implemented by the [`Rayon`] library.
///
/// A panicking job is logged and dropped. The worker thread keeps serving later jobs.
///
/// [`Rayon`]: https://docs.rs/rayon/latest/rayon/index.html
pub struct RayonThreadPool {
    pool: rayon::ThreadPool,
}

impl ThreadPool for RayonThreadPool {
    fn new(threads: u32) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads as usize)
            .thread_name(|i| format!("chirpy-rayon-{}", i))
            .panic_handler(|_| error!("a job panicked on the rayon pool"))
            .build()
            .map_err(|e| ChirpyError::Pool(format!("could not build thread pool: {:?}", e)))?;
        debug!("created rayon pool with {} threads", threads);

        Ok(RayonThreadPool { pool })
    }

    fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.pool.spawn(job);
    }
}
