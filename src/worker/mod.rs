mod pool;
mod error;

pub use pool::{DEFAULT_WORKERS, WorkerPool, WorkerSlot};
pub use error::{WorkerError, WorkerResult};
