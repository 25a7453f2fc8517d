//! Multi-day aggregation.

use crate::pipeline::rules::{weekly_advisories, HIGH_TEMPERATURE_C};
use crate::types::observation::DailyObservation;
use crate::types::observation_frame::ObservationFrame;
use crate::AdvisoryError;
use log::debug;
use polars::prelude::{col, lit};
use serde::{Deserialize, Serialize};

/// Unweighted means of the five observed fields across a batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyAverages {
    pub temperature_min: f64,
    pub temperature_max: f64,
    pub humidity: f64,
    pub cloud_cover: f64,
    pub pressure: f64,
}

/// Aggregate statistics and advisories for a batch of days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
    #[serde(rename = "totalDays")]
    pub total_days: usize,
    pub averages: WeeklyAverages,
    pub recommendations: Vec<String>,
}

/// Builds the weekly summary of an observation frame.
///
/// The frame must hold at least one day. Order of the days does not affect the
/// result.
///
/// # Errors
///
/// Returns [`AdvisoryError::MissingInput`] if the frame is empty,
/// [`AdvisoryError::ProcessingFailed`] if any observation cell is null, or
/// [`AdvisoryError::Frame`] if evaluating the frame fails.
pub fn summarize_frame(frame: &ObservationFrame) -> Result<WeeklySummary, AdvisoryError> {
    let total_days = frame.height()?;
    if total_days == 0 {
        return Err(AdvisoryError::MissingInput);
    }
    frame.ensure_complete()?;

    let averages = frame.averages()?;
    let high_temperature_days =
        frame.count_where(col("temperature_max").gt(lit(HIGH_TEMPERATURE_C)))?;
    debug!(
        "Summarized {} days, {} above {}°C",
        total_days, high_temperature_days, HIGH_TEMPERATURE_C
    );

    let recommendations = weekly_advisories(&averages, high_temperature_days)
        .into_iter()
        .map(|advisory| advisory.message())
        .collect();

    Ok(WeeklySummary {
        total_days,
        averages,
        recommendations,
    })
}

/// Builds the weekly summary of an ordered series of observations.
///
/// # Errors
///
/// Returns [`AdvisoryError::MissingInput`] if `days` is empty.
pub fn summarize(days: &[DailyObservation]) -> Result<WeeklySummary, AdvisoryError> {
    if days.is_empty() {
        return Err(AdvisoryError::MissingInput);
    }
    summarize_frame(&ObservationFrame::from_observations(days)?)
}
