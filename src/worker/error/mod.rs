#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("Task processing failed: {0}")]
    ProcessingError(String),

    #[error("Worker pool is at capacity: {0}")]
    CapacityError(String),

    #[error("Batch was cancelled")]
    Cancelled,
}

pub type WorkerResult<T> = Result<T, WorkerError>;

impl From<tokio::sync::AcquireError> for WorkerError {
    fn from(err: tokio::sync::AcquireError) -> Self {
        WorkerError::CapacityError(format!("Failed to acquire worker: {}", err))
    }
}

impl From<tokio::task::JoinError> for WorkerError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_cancelled() {
            WorkerError::Cancelled
        } else {
            WorkerError::ProcessingError(format!("Task panicked: {}", err))
        }
    }
}

impl From<WorkerError> for crate::utils::StamperError {
    fn from(err: WorkerError) -> Self {
        crate::utils::StamperError::processing(err.to_string())
    }
}

impl From<WorkerError> for crate::utils::ItemError {
    fn from(err: WorkerError) -> Self {
        crate::utils::ItemError::Worker(err.to_string())
    }
}
