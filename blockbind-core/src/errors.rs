use thiserror::Error;

/// Fatal errors raised while setting up or driving a block.
///
/// The `Display` output of each variant is the message handed verbatim to the
/// host's fatal-error channel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// The model could not be constructed from its description.
    #[error("{0}")]
    ModelLoad(String),
    #[error("{parameter} must be a string array.")]
    NonTextualParameter { parameter: String },
    #[error("{parameter} is too large ({rows}x{cols})")]
    OversizedParameter {
        parameter: String,
        rows: usize,
        cols: usize,
    },
    #[error("Model filename could not be read")]
    UnreadableModelPath,
    #[error("Wrong {port} port width. Expected {expected}, got {actual}")]
    PortWidthMismatch {
        port: String,
        expected: usize,
        actual: usize,
    },
    #[error("Invalid block configuration: {0}")]
    Config(String),
    #[error("Block has already been torn down")]
    TornDown,
}

/// Convenience type for `Result<T, BindError>`.
pub type BindResult<T> = Result<T, BindError>;
