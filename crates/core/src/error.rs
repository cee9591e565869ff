use std::time::Duration;

use thiserror::Error;

/// Why an external data provider produced nothing usable.
///
/// These never reach the user; callers log them and degrade the reply.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} request failed: {message}")]
    Transport {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} answered with HTTP {status}")]
    Status { provider: &'static str, status: u16 },

    #[error("{provider} payload could not be decoded: {message}")]
    Decode {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} payload is missing `{field}`")]
    MissingField {
        provider: &'static str,
        field: &'static str,
    },

    #[error("{provider} did not answer within {timeout:?}")]
    Timeout {
        provider: &'static str,
        timeout: Duration,
    },
}

impl ProviderError {
    pub fn transport(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Transport {
            provider,
            message: message.into(),
        }
    }

    pub fn decode(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Decode {
            provider,
            message: message.into(),
        }
    }

    pub fn provider(&self) -> &'static str {
        match self {
            Self::Transport { provider, .. }
            | Self::Status { provider, .. }
            | Self::Decode { provider, .. }
            | Self::MissingField { provider, .. }
            | Self::Timeout { provider, .. } => provider,
        }
    }
}
