//! Onfido API region definitions.
//!
//! Onfido hosts separate API clusters per region. The region picks the
//! hostname every request is sent to.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Onfido API region.
///
/// # Example
///
/// ```rust
/// use onfido::Region;
///
/// let region: Region = "us".parse().unwrap();
/// assert_eq!(region, Region::Us);
/// assert_eq!(region.base_url(), "https://api.us.onfido.com");
/// assert_eq!(Region::default(), Region::Eu);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Region {
    /// European Union cluster (`api.eu.onfido.com`).
    #[default]
    Eu,
    /// United States cluster (`api.us.onfido.com`).
    Us,
    /// Canada cluster (`api.ca.onfido.com`).
    Ca,
}

impl Region {
    /// Returns the lowercase region code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Eu => "eu",
            Self::Us => "us",
            Self::Ca => "ca",
        }
    }

    /// Returns the base URL (scheme and host) for this region.
    #[must_use]
    pub fn base_url(self) -> String {
        format!("https://api.{}.onfido.com", self.code())
    }

    /// Returns all supported regions.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Eu, Self::Us, Self::Ca]
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Region {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eu" => Ok(Self::Eu),
            "us" => Ok(Self::Us),
            "ca" => Ok(Self::Ca),
            _ => Err(ConfigError::InvalidRegion {
                region: s.to_string(),
            }),
        }
    }
}

impl Serialize for Region {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Region {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
