use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Provider API generations with an adapter implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderId {
    /// Structured JSON API.
    WebApi,
    /// Older HTML historical-data pages.
    Legacy,
}

impl ProviderId {
    pub const ALL: [Self; 2] = [Self::WebApi, Self::Legacy];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WebApi => "web-api",
            Self::Legacy => "legacy",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "web-api" | "webapi" | "api" => Ok(Self::WebApi),
            "legacy" | "html" => Ok(Self::Legacy),
            other => Err(ValidationError::InvalidProvider {
                value: other.to_owned(),
            }),
        }
    }
}
