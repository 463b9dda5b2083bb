use std::path::PathBuf;

use thiserror::Error;

use crate::preprocessing::domain::frame_preprocessor::PreprocessError;

type BoxError = Box<dyn std::error::Error>;

/// Failures that abort a motion analysis run.
///
/// None of these are retried; the caller decides how to present them.
#[derive(Error, Debug)]
pub enum MotionError {
    #[error("could not open video {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
    #[error("failed to decode frame: {0}")]
    Decode(#[source] BoxError),
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),
    #[error("failed to annotate frame {index}: {source}")]
    Annotate {
        index: usize,
        #[source]
        source: BoxError,
    },
    #[error("no frames to encode: output resolution cannot be derived")]
    EmptyInput,
    #[error("failed to encode motion video: {0}")]
    Encode(#[source] BoxError),
    #[error("failed to append to event log {path}: {source}")]
    LogWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("frame {index} is {actual}, expected {expected}")]
    FrameMismatch {
        index: usize,
        expected: String,
        actual: String,
    },
    #[error("pipeline already executed")]
    AlreadyExecuted,
}
