//! Worker pools the copy orchestrator submits range copies to.
//!
//! The orchestrator needs exactly two things from a pool: `submit` a unit of
//! work and `wait` on the returned handle. [`RayonPool`] runs units on a fixed
//! set of threads; [`InlinePool`] runs them on the calling thread, which makes
//! tests deterministic.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crossbeam_channel::{bounded, Receiver};
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::errors::{CopyError, Result};

/// A unit of work: copies something and reports the byte count.
pub type UnitOfWork = Box<dyn FnOnce() -> Result<u64> + Send + 'static>;

/// Anything that can execute units of work and hand back awaitable handles.
pub trait WorkerPool: Send + Sync {
    fn submit(&self, unit: UnitOfWork) -> TaskHandle;
}

/// Completion handle for one submitted unit.
pub struct TaskHandle {
    rx: Receiver<Result<u64>>,
}

impl TaskHandle {
    /// Block until the unit has finished and return its result.
    pub fn wait(self) -> Result<u64> {
        self.rx
            .recv()
            .unwrap_or_else(|_| Err(CopyError::WorkerLost))
    }

    fn run(unit: UnitOfWork) -> (impl FnOnce() + Send + 'static, TaskHandle) {
        let (tx, rx) = bounded(1);
        let job = move || {
            let result = panic::catch_unwind(AssertUnwindSafe(unit)).unwrap_or_else(|payload| {
                Err(CopyError::WorkerPanicked {
                    message: panic_message(payload.as_ref()),
                })
            });
            let _ = tx.send(result);
        };
        (job, TaskHandle { rx })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Fixed-size pool of worker threads.
pub struct RayonPool {
    pool: ThreadPool,
}

impl RayonPool {
    pub fn new(threads: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(|idx| format!("yo-worker-{idx}"))
            .build()
            .map_err(|err| CopyError::Pool {
                reason: err.to_string(),
            })?;
        Ok(Self { pool })
    }

    #[cfg(test)]
    fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl WorkerPool for RayonPool {
    fn submit(&self, unit: UnitOfWork) -> TaskHandle {
        let (job, handle) = TaskHandle::run(unit);
        self.pool.spawn(job);
        handle
    }
}

/// Runs every unit to completion inside `submit`, on the caller's thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlinePool;

impl WorkerPool for InlinePool {
    fn submit(&self, unit: UnitOfWork) -> TaskHandle {
        let (job, handle) = TaskHandle::run(unit);
        job();
        handle
    }
}
