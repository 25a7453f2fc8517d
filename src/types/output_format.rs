use crate::AdvisoryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shape of a single-day advisory result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Derived metrics and per-day recommendations.
    #[default]
    Processed,
    /// Display oriented view of the derived values.
    Weather,
    /// Original input, processed and weather views together.
    Full,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Processed => "processed",
            OutputFormat::Weather => "weather",
            OutputFormat::Full => "full",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = AdvisoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processed" => Ok(OutputFormat::Processed),
            "weather" => Ok(OutputFormat::Weather),
            "full" => Ok(OutputFormat::Full),
            other => Err(AdvisoryError::InvalidFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
