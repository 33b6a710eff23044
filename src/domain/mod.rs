pub mod error;
pub mod model;

pub use error::{ControllerError, SurfaceError};
pub use model::{DownloadState, ProgressFraction, RunOutcome, RunSummary, Strategy};
