use thiserror::Error;

use crate::errors::RequestFailure;

/// Failure of the HTTP layer underneath the client.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("[E006] Invalid base URL: {0}\n\nSuggestions:\n  • Provide a valid HTTP or HTTPS URL\n  • Example: https://orchestrator-api.swanchain.io\n  • Ensure the URL includes the protocol (http:// or https://)")]
    CannotBeBase(String),

    #[error("[E009] Invalid URL format: {0}\n\nSuggestions:\n  • Check the URL format is correct\n  • Use absolute URLs with protocol (http:// or https://)")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    Failure(#[from] RequestFailure),
}

impl TransportError {
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::CannotBeBase(_) => "E006",
            Self::Url(_) => "E009",
            Self::Reqwest(_) => "E999", // Network errors get generic code
            Self::Failure(f) => f.error_code(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SwanApiError {
    #[error("[E001] Login failed: {0}\n\nSuggestions:\n  • Check that the API key is correct\n  • Generate a new API key on the SwanHub website\n  • Make sure the key belongs to the selected environment")]
    Authentication(String),

    #[error("[E003] No {cfg_name} machine in {region}\n\nSuggestions:\n  • List the available hardware with `swan hardware`\n  • Pick a region the configuration is offered in\n  • Use region \"Global\" to let the orchestrator choose")]
    Configuration { cfg_name: String, region: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("[E004] Malformed response: missing or invalid `{0}`\n\nSuggestions:\n  • Make sure you are logged in\n  • Check that the client and orchestrator versions match\n  • Run with RUST_LOG=debug to see the raw response")]
    MalformedResponse(String),

    #[error("[E005] Failed to serialize response: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("[E007] Failed to write deployment info: {0}")]
    Io(#[from] std::io::Error),
}

impl SwanApiError {
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Authentication(_) => "E001",
            Self::Configuration { .. } => "E003",
            Self::Transport(t) => t.error_code(),
            Self::MalformedResponse(_) => "E004",
            Self::Serialization(_) => "E005",
            Self::Io(_) => "E007",
        }
    }

    pub(crate) fn malformed(field: impl Into<String>) -> Self {
        Self::MalformedResponse(field.into())
    }
}
