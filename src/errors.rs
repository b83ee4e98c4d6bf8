use reqwest::StatusCode;
use std::fmt::{self, Formatter};
use thiserror::Error;
use url::Url;

/// A request that reached the orchestrator but came back with a non-2xx
/// status.
#[derive(Debug, Error)]
pub struct RequestFailure {
    pub url: Url,
    pub status: StatusCode,
    pub msg: String,
}

impl RequestFailure {
    pub fn new(url: Url, status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            url,
            status,
            msg: msg.into(),
        }
    }

    pub const fn error_code(&self) -> &'static str {
        "E002"
    }

    fn suggestions(&self) -> Vec<&'static str> {
        match self.status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => vec![
                "Check that your API key is valid",
                "Make sure the client logged in before calling authenticated endpoints",
                "Generate a new API key on the SwanHub website if the old one was revoked",
            ],
            StatusCode::NOT_FOUND => vec![
                "Check that the URL is correct",
                "Verify the task UUID was returned by a successful deployment",
                "Make sure you are talking to the right environment (production or calibration)",
            ],
            StatusCode::TOO_MANY_REQUESTS => vec![
                "Wait a moment before retrying",
                "Consider reducing request frequency",
            ],
            status if status.is_server_error() => vec![
                "The orchestrator is having problems, try again later",
                "Check the SwanHub status page for ongoing incidents",
            ],
            _ => vec![
                "Check the request parameters",
                "Run with RUST_LOG=debug to see the full exchange",
            ],
        }
    }
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        writeln!(
            formatter,
            "[{}] Request to {} failed with status {}",
            self.error_code(),
            self.url,
            self.status
        )?;
        if !self.msg.is_empty() {
            writeln!(formatter, "Server response: {}", self.msg)?;
        }
        write!(formatter, "\nSuggestions:")?;
        for suggestion in self.suggestions() {
            write!(formatter, "\n  • {suggestion}")?;
        }
        Ok(())
    }
}
