//! Defines the `WeatherCondition` enum, the sky condition label derived from
//! a day's cloud cover.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cloud cover above this percentage is labelled [`WeatherCondition::Cloudy`].
pub const CLOUDY_ABOVE: f64 = 70.0;
/// Cloud cover above this percentage (and not above [`CLOUDY_ABOVE`]) is
/// labelled [`WeatherCondition::PartlyCloudy`].
pub const PARTLY_CLOUDY_ABOVE: f64 = 30.0;

/// Sky condition for a single day.
///
/// Serializes to the display labels `"Clear"`, `"Partly Cloudy"` and `"Cloudy"`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum WeatherCondition {
    /// Cloud cover of 30% or less.
    Clear,
    /// Cloud cover above 30% up to and including 70%.
    #[serde(rename = "Partly Cloudy")]
    PartlyCloudy,
    /// Cloud cover above 70%.
    Cloudy,
}

impl WeatherCondition {
    /// Classifies a cloud cover percentage.
    ///
    /// Both thresholds are exclusive lower bounds: exactly 70% is still
    /// `PartlyCloudy` and exactly 30% is still `Clear`.
    ///
    /// # Arguments
    ///
    /// * `cloud_cover` - Cloud cover in percent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use agroweather::WeatherCondition;
    ///
    /// assert_eq!(WeatherCondition::from_cloud_cover(70.0), WeatherCondition::PartlyCloudy);
    /// assert_eq!(WeatherCondition::from_cloud_cover(70.1), WeatherCondition::Cloudy);
    /// assert_eq!(WeatherCondition::from_cloud_cover(30.0), WeatherCondition::Clear);
    /// ```
    pub fn from_cloud_cover(cloud_cover: f64) -> Self {
        if cloud_cover > CLOUDY_ABOVE {
            WeatherCondition::Cloudy
        } else if cloud_cover > PARTLY_CLOUDY_ABOVE {
            WeatherCondition::PartlyCloudy
        } else {
            WeatherCondition::Clear
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "Clear",
            WeatherCondition::PartlyCloudy => "Partly Cloudy",
            WeatherCondition::Cloudy => "Cloudy",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
