//! Error types for the inspection pipeline.

use std::path::PathBuf;

use thiserror::Error;
use ucantool_core::CoreError;

/// Errors raised while acquiring input.
#[derive(Debug, Error)]
pub enum InputError {
    /// The named file does not exist.
    #[error("file does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Standard input was empty and no file was named.
    #[error("no input provided via stdin and no file specified")]
    EmptyStdin,

    /// Any other read failure.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while inspecting an artifact.
#[derive(Debug, Error)]
pub enum InspectError {
    /// Input could not be read.
    #[error(transparent)]
    Input(#[from] InputError),

    /// No decoder accepted the bytes.
    #[error("unable to decode: input is not a container, invocation, delegation or receipt")]
    UnrecognizedFormat,

    /// A container entry past the end was selected.
    #[error("container index out of range, requested {requested}, but there are only {available} items")]
    IndexOutOfRange { requested: usize, available: usize },

    /// Re-encoding a decoded model failed.
    #[error("encoding raw container bytes: {0}")]
    Encoding(#[source] CoreError),

    /// Binary to DAG-JSON conversion failed.
    #[error("transcoding to DAG-JSON: {0}")]
    Transcode(#[source] CoreError),
}

/// Result type for inspection operations.
pub type Result<T> = std::result::Result<T, InspectError>;
