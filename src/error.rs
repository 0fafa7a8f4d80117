use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while evaluating a policy.
///
/// A forbidden file is not an error: it is a `false` verdict. These variants
/// cover misconfigured policies and unreadable sources.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("{policy} requires at least one file type")]
    EmptyTypeList { policy: &'static str },

    #[error("failed to read file contents: {0}")]
    Io(#[from] io::Error),
}

impl GateError {
    /// True for errors caused by how the policy was built rather than by the input.
    pub fn is_configuration(&self) -> bool {
        matches!(self, GateError::EmptyTypeList { .. })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid signature for custom type '{extension}': {reason}")]
    InvalidSignature { extension: String, reason: String },

    #[error("custom type has an empty extension ('{extension}')")]
    EmptyExtension { extension: String },

    #[error("no policy named '{0}' in configuration")]
    UnknownPolicy(String),
}
