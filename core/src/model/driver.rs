use super::null_as_default;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Border colour used when upstream omits the team colour.
pub const FALLBACK_TEAM_COLOUR: &str = "#888";

/// Car number assigned to a driver for the season. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DriverNumber(u32);

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid driver number {0:?}: expected a positive integer")]
pub struct InvalidDriverNumber(pub String);

impl DriverNumber {
    pub fn new(value: u32) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl FromStr for DriverNumber {
    type Err = InvalidDriverNumber;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        raw.trim()
            .parse::<u32>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| InvalidDriverNumber(raw.to_string()))
    }
}

impl fmt::Display for DriverNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Driver record as served by the `/drivers` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub driver_number: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub broadcast_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub team_name: String,
    /// Hex colour without the leading `#`.
    #[serde(default)]
    pub team_colour: Option<String>,
    #[serde(default)]
    pub headshot_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_acronym: Option<String>,
}

impl Driver {
    /// CSS colour for the team, `#`-prefixed.
    pub fn team_colour_css(&self) -> String {
        match self.team_colour.as_deref().map(str::trim) {
            Some(hex) if !hex.is_empty() => format!("#{}", hex.trim_start_matches('#')),
            _ => FALLBACK_TEAM_COLOUR.to_string(),
        }
    }

    pub fn image_alt(&self) -> &str {
        self.last_name.as_deref().unwrap_or(&self.full_name)
    }
}
