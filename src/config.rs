use std::fmt::{self, Display};
use std::str::FromStr;

use url::Url;

pub const PRODUCTION_API: &str = "https://orchestrator-api.swanchain.io";
pub const CALIBRATION_API: &str = "https://orchestrator-api-cali.swanchain.io";

/// Which orchestrator a client talks to.
///
/// Each client carries its own value, so clients pointed at different
/// servers can live side by side in one process.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Production,
    Calibration,
    Custom(String),
}

impl Environment {
    /// Base URL every endpoint path is resolved against.
    pub fn base_url(&self) -> &str {
        match self {
            Self::Production => PRODUCTION_API,
            Self::Calibration => CALIBRATION_API,
            Self::Custom(url) => url.as_str(),
        }
    }
}

impl From<Url> for Environment {
    fn from(url: Url) -> Self {
        Self::Custom(url.to_string())
    }
}

impl From<Option<String>> for Environment {
    fn from(environment: Option<String>) -> Self {
        environment.map_or(Self::Production, Self::Custom)
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Calibration => write!(f, "calibration"),
            Self::Custom(url) => write!(f, "{url}"),
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "mainnet" => Ok(Self::Production),
            "calibration" | "cali" => Ok(Self::Calibration),
            _ => Url::parse(s).map(Self::from).map_err(|e| {
                format!(
                    "Invalid environment: {s} ({e}). Valid options: production, calibration, or an http(s) URL"
                )
            }),
        }
    }
}
