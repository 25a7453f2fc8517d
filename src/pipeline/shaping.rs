//! Output shapes of the advisory pipeline.

use crate::pipeline::derivation::{derive, DerivedDaily};
use crate::pipeline::weekly::{summarize, WeeklySummary};
use crate::types::observation::DailyObservation;
use crate::types::output_format::OutputFormat;
use crate::types::weather_condition::WeatherCondition;
use crate::AdvisoryError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Display oriented view of a day, with presentation rounding applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherDisplay {
    pub location: String,
    pub date: NaiveDate,
    /// Average temperature rounded to one decimal.
    pub temperature: f64,
    pub temperature_min: f64,
    pub temperature_max: f64,
    pub humidity: f64,
    pub cloud_cover: f64,
    pub pressure: f64,
    pub condition: WeatherCondition,
    /// Rain chance rounded to a whole percent.
    pub rainfall_probability: u8,
    /// One line description, e.g. `"Partly Cloudy, 27.5°C, 30% chance of rain"`.
    pub summary: String,
}

/// Original input together with both derived views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullDay {
    pub original: DailyObservation,
    pub processed: DerivedDaily,
    pub weather: WeatherDisplay,
}

/// One entry of a batch report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayReport {
    /// 1-based position in the batch.
    pub day: usize,
    /// The observation date as `YYYY-MM-DD`.
    pub date: String,
    pub original: DailyObservation,
    pub processed: DerivedDaily,
    pub weather: WeatherDisplay,
}

/// Result of a multi-day request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub region: String,
    /// `"<first date> to <last date>"`.
    pub period: String,
    pub daily_predictions: Vec<DayReport>,
    pub weekly_analysis: WeeklySummary,
}

/// Any result the pipeline can produce. Serializes as the bare inner shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdvisoryResponse {
    Batch(BatchReport),
    Full(FullDay),
    Weather(WeatherDisplay),
    Processed(DerivedDaily),
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Maps a day and its derived metrics onto display fields.
///
/// # Arguments
///
/// * `observation` - The raw day.
/// * `derived` - The day's derived metrics.
/// * `region` - Location label shown with the day.
pub fn weather_display(
    observation: &DailyObservation,
    derived: &DerivedDaily,
    region: &str,
) -> WeatherDisplay {
    let temperature = round_to_tenth(derived.avg_temperature);
    // the clamp in derivation keeps this within 0..=100
    let rainfall_probability = derived.rainfall_probability.round() as u8;

    WeatherDisplay {
        location: region.to_string(),
        date: observation.date,
        temperature,
        temperature_min: observation.temperature_min,
        temperature_max: observation.temperature_max,
        humidity: observation.humidity,
        cloud_cover: observation.cloud_cover,
        pressure: observation.pressure,
        condition: derived.condition,
        rainfall_probability,
        summary: format!(
            "{}, {:.1}°C, {}% chance of rain",
            derived.condition, temperature, rainfall_probability
        ),
    }
}

/// Produces the requested single-day shape.
pub fn shape_day(
    observation: &DailyObservation,
    format: OutputFormat,
    region: &str,
) -> AdvisoryResponse {
    let processed = derive(observation);
    match format {
        OutputFormat::Processed => AdvisoryResponse::Processed(processed),
        OutputFormat::Weather => {
            AdvisoryResponse::Weather(weather_display(observation, &processed, region))
        }
        OutputFormat::Full => AdvisoryResponse::Full(FullDay {
            original: *observation,
            weather: weather_display(observation, &processed, region),
            processed,
        }),
    }
}

/// Builds the per-day entries and the weekly summary for an ordered series.
///
/// # Errors
///
/// Returns [`AdvisoryError::MissingInput`] if `days` is empty.
pub fn batch_report(days: &[DailyObservation], region: &str) -> Result<BatchReport, AdvisoryError> {
    let (first, last) = match (days.first(), days.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(AdvisoryError::MissingInput),
    };

    let daily_predictions = days
        .iter()
        .enumerate()
        .map(|(index, observation)| {
            let processed = derive(observation);
            DayReport {
                day: index + 1,
                date: observation.date.format("%Y-%m-%d").to_string(),
                original: *observation,
                weather: weather_display(observation, &processed, region),
                processed,
            }
        })
        .collect();

    Ok(BatchReport {
        region: region.to_string(),
        period: format!(
            "{} to {}",
            first.date.format("%Y-%m-%d"),
            last.date.format("%Y-%m-%d")
        ),
        daily_predictions,
        weekly_analysis: summarize(days)?,
    })
}
