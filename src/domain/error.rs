use std::thread::ThreadId;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("Cross-thread operation not valid: form owned by {owner:?}, accessed from {caller:?}")]
    WrongThread { owner: ThreadId, caller: ThreadId },
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error("A download is already running")]
    AlreadyRunning,

    #[error("Failed to spawn download worker: {0}")]
    Spawn(#[source] std::io::Error),
}
