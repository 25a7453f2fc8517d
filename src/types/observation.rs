//! The raw daily observation record and the input shapes that carry it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of meteorological input.
///
/// Values are taken as reported. Nothing checks that `temperature_min` is below
/// `temperature_max` or that the percentages lie within 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyObservation {
    pub date: NaiveDate,
    /// Minimum temperature in °C.
    pub temperature_min: f64,
    /// Maximum temperature in °C.
    pub temperature_max: f64,
    /// Average relative humidity in %.
    pub humidity: f64,
    /// Cloud cover in %.
    pub cloud_cover: f64,
    /// Station level pressure in hPa.
    pub pressure: f64,
}

impl DailyObservation {
    /// Mean of the minimum and maximum temperature, unrounded.
    pub fn average_temperature(&self) -> f64 {
        (self.temperature_min + self.temperature_max) / 2.0
    }
}

/// Observation data as it arrives with a request: a single day or an ordered
/// series of days.
///
/// Deserializes from either a JSON object or a JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObservationInput {
    Series(Vec<DailyObservation>),
    Single(DailyObservation),
}

impl From<DailyObservation> for ObservationInput {
    fn from(value: DailyObservation) -> Self {
        ObservationInput::Single(value)
    }
}

impl From<Vec<DailyObservation>> for ObservationInput {
    fn from(value: Vec<DailyObservation>) -> Self {
        ObservationInput::Series(value)
    }
}

impl From<&[DailyObservation]> for ObservationInput {
    fn from(value: &[DailyObservation]) -> Self {
        ObservationInput::Series(value.to_vec())
    }
}
