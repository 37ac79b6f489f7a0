//! Error types for the task tree pipeline.

/// Errors raised by the forest builder, the render surface and the bindings.
///
/// Orphaned records (a `parentTaskID` that resolves to nothing) are not
/// errors; the builder drops them and logs at `debug`.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// No record has a null `parentTaskID`, so a single tree cannot be built.
    #[error("no root task found: every record references a parent")]
    NoRootFound,

    /// The requested link interpolation is not one of the supported curves.
    #[error("unsupported curve: {0:?}")]
    UnsupportedCurve(String),

    /// JSON handed over by the host could not be decoded.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] serde_json::Error),
}

impl TreeError {
    /// Short machine-readable code sent to the host alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            TreeError::NoRootFound => "no_root_found",
            TreeError::UnsupportedCurve(_) => "unsupported_curve",
            TreeError::InvalidInput(_) => "invalid_input",
        }
    }
}

pub type Result<T, E = TreeError> = std::result::Result<T, E>;
