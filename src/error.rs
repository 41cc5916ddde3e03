//! Error handling for the onegin sort utility

use std::io;
use thiserror::Error;

/// Custom error type for onegin sort operations
#[derive(Error, Debug)]
pub enum OneginError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Permission denied: {file}")]
    PermissionDenied { file: String },

    #[error("No such file or directory: {file}")]
    FileNotFound { file: String },

    #[error("Is a directory: {file}")]
    IsDirectory { file: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Conflicting options: {message}")]
    ConflictingOptions { message: String },

    #[error("Memory allocation failed after {nodes} tree nodes")]
    AllocationFailure { nodes: usize },

    #[error("Cannot build an index from zero lines")]
    EmptyInput,

    #[error("Input is not sorted at line {line}")]
    NotSorted { line: usize },
}

impl OneginError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            OneginError::PermissionDenied { .. }
            | OneginError::FileNotFound { .. }
            | OneginError::IsDirectory { .. }
            | OneginError::Io(_) => crate::SORT_FAILURE,

            _ => crate::EXIT_FAILURE,
        }
    }

    pub fn permission_denied(file: &str) -> Self {
        OneginError::PermissionDenied {
            file: file.to_string(),
        }
    }

    pub fn file_not_found(file: &str) -> Self {
        OneginError::FileNotFound {
            file: file.to_string(),
        }
    }

    pub fn is_directory(file: &str) -> Self {
        OneginError::IsDirectory {
            file: file.to_string(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: &str) -> Self {
        OneginError::InvalidArgument {
            message: message.to_string(),
        }
    }

    /// Create a conflicting options error
    pub fn conflicting_options(message: &str) -> Self {
        OneginError::ConflictingOptions {
            message: message.to_string(),
        }
    }

    pub fn not_sorted(line: usize) -> Self {
        OneginError::NotSorted { line }
    }
}

/// Result type for onegin sort operations
pub type OneginResult<T> = Result<T, OneginError>;

/// Context trait for attaching a file name to I/O failures
pub trait SortContext<T> {
    fn with_file_context(self, filename: &str) -> OneginResult<T>;
}

fn io_error_for_file(io_err: io::Error, filename: &str) -> OneginError {
    match io_err.kind() {
        io::ErrorKind::PermissionDenied => OneginError::permission_denied(filename),
        io::ErrorKind::NotFound => OneginError::file_not_found(filename),
        _ => OneginError::Io(io::Error::new(
            io_err.kind(),
            format!("{}: {}", filename, io_err),
        )),
    }
}

impl<T> SortContext<T> for OneginResult<T> {
    fn with_file_context(self, filename: &str) -> OneginResult<T> {
        self.map_err(|err| match err {
            OneginError::Io(io_err) => io_error_for_file(io_err, filename),
            other => other,
        })
    }
}

impl<T> SortContext<T> for Result<T, io::Error> {
    fn with_file_context(self, filename: &str) -> OneginResult<T> {
        self.map_err(|io_err| io_error_for_file(io_err, filename))
    }
}
