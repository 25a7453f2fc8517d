use crate::types::observation::ObservationInput;
use crate::AdvisoryError;
use serde::{Deserialize, Serialize};

/// A weather processing request as received from a client.
///
/// Every field is optional on the wire; an absent or `null` `weather_data`
/// is reported as [`AdvisoryError::MissingInput`] when the request is handled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryRequest {
    #[serde(default)]
    pub weather_data: Option<ObservationInput>,
    #[serde(default)]
    pub region: Option<String>,
    /// One of `processed`, `weather` or `full`.
    #[serde(default)]
    pub format: Option<String>,
}

impl AdvisoryRequest {
    /// Decodes a request from a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisoryError::InvalidRequest`] if the body is not valid JSON or
    /// an observation is missing a field.
    pub fn from_json(body: &str) -> Result<Self, AdvisoryError> {
        Ok(serde_json::from_str(body)?)
    }
}
