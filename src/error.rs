//! Application error type.
//!
//! Every variant maps to a process exit code so `main` can stay a thin wrapper.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid flags, environment values, or out-of-range inputs.
    #[error("{0}")]
    Config(String),

    /// Missing model artifact or branding asset. Fatal, no degraded mode.
    #[error("{0}")]
    Startup(String),

    /// The predictor rejected the record or produced an unusable result.
    #[error("Prediction failed: {0}")]
    Inference(String),

    #[error("{0}")]
    Terminal(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl AppError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn startup(message: impl Into<String>) -> Self {
        Self::Startup(message.into())
    }

    pub fn inference(message: impl Into<String>) -> Self {
        Self::Inference(message.into())
    }

    pub fn terminal(message: impl Into<String>) -> Self {
        Self::Terminal(message.into())
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Startup(_) | Self::Io { .. } => 2,
            Self::Inference(_) | Self::Terminal(_) => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_split_setup_from_runtime() {
        assert_eq!(AppError::startup("missing model").exit_code(), 2);
        assert_eq!(AppError::config("bad theme").exit_code(), 2);
        assert_eq!(AppError::inference("boom").exit_code(), 4);
        assert_eq!(AppError::terminal("no tty").exit_code(), 4);
    }

    #[test]
    fn inference_message_is_prefixed() {
        let err = AppError::inference("unknown level");
        assert_eq!(err.to_string(), "Prediction failed: unknown level");
    }
}
