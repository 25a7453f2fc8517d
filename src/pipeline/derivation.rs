//! Per-day derived metrics.

use crate::pipeline::rules::daily_advisories;
use crate::types::observation::DailyObservation;
use crate::types::weather_condition::WeatherCondition;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Metrics computed from a single [`DailyObservation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedDaily {
    pub date: NaiveDate,
    /// `(min + max) / 2`, unrounded.
    pub avg_temperature: f64,
    pub condition: WeatherCondition,
    /// Heuristic rain chance in percent, always within `[0, 100]`.
    pub rainfall_probability: f64,
    /// Advisories in rule table order.
    pub recommendations: Vec<String>,
}

/// Rough rain chance from humidity excess over 50% plus half the cloud cover,
/// clamped to `[0, 100]`.
///
/// This is not a calibrated probability. NaN inputs yield `0.0`.
///
/// # Arguments
///
/// * `humidity` - Average relative humidity in percent.
/// * `cloud_cover` - Cloud cover in percent.
pub fn rainfall_probability(humidity: f64, cloud_cover: f64) -> f64 {
    let estimate = (humidity - 50.0) + cloud_cover * 0.5;
    // f64::max returns the non-NaN operand, which keeps the clamp total
    estimate.max(0.0).min(100.0)
}

/// Runs the derivation and recommendation stages for one day.
pub fn derive(observation: &DailyObservation) -> DerivedDaily {
    let avg_temperature = observation.average_temperature();
    let recommendations = daily_advisories(observation, avg_temperature)
        .into_iter()
        .map(|advisory| advisory.message().to_string())
        .collect();

    DerivedDaily {
        date: observation.date,
        avg_temperature,
        condition: WeatherCondition::from_cloud_cover(observation.cloud_cover),
        rainfall_probability: rainfall_probability(observation.humidity, observation.cloud_cover),
        recommendations,
    }
}
