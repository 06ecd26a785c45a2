use thiserror::Error;

/// Errors raised while constructing a [`LinearModel`](crate::LinearModel).
#[derive(Error, Debug)]
pub enum LinearModelError {
    #[error("Could not read model description \"{path}\": {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed model description: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Variable \"{0}\" is declared more than once")]
    DuplicateVariable(String),
    #[error("Variable \"{variable}\" references unknown variable \"{reference}\"")]
    UnknownReference { variable: String, reference: String },
    #[error("Input variable \"{0}\" cannot be computed from other variables")]
    ComputedInput(String),
    #[error("Variable \"{0}\" is part of a dependency cycle")]
    Cycle(String),
}

/// Convenience type for `Result<T, LinearModelError>`.
pub type LinearModelResult<T> = Result<T, LinearModelError>;
