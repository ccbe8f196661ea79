//! Domain error types.

/// A label that does not name any known preset, frequency or category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized {kind}: {value}")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

/// Top-level error type for signalbench.
#[derive(Debug, thiserror::Error)]
pub enum SignalbenchError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("unknown strategy: {key}")]
    UnknownStrategy { key: String },

    #[error("strategy key already registered: {key}")]
    DuplicateStrategy { key: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no price data for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SignalbenchError {
    /// Process exit status: 1 io, 2 config, 4 strategy, 5 data.
    pub fn exit_status(&self) -> u8 {
        match self {
            SignalbenchError::Io(_) => 1,
            SignalbenchError::ConfigParse { .. }
            | SignalbenchError::ConfigMissing { .. }
            | SignalbenchError::ConfigInvalid { .. } => 2,
            SignalbenchError::UnknownStrategy { .. }
            | SignalbenchError::DuplicateStrategy { .. } => 4,
            SignalbenchError::Data { .. } | SignalbenchError::NoData { .. } => 5,
        }
    }
}

impl From<&SignalbenchError> for std::process::ExitCode {
    fn from(err: &SignalbenchError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
