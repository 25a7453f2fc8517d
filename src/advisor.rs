//! This module provides the main entry point of the crate, the `WeatherAdvisor`.
//! It turns daily observations into derived metrics, per-day advisories and
//! weekly summaries, in the output shape the caller asks for.

use crate::pipeline::shaping::{batch_report, shape_day, AdvisoryResponse, BatchReport};
use crate::types::observation::{DailyObservation, ObservationInput};
use crate::types::observation_frame::ObservationFrame;
use crate::types::output_format::OutputFormat;
use crate::types::request::AdvisoryRequest;
use crate::AdvisoryError;
use bon::bon;
use log::{debug, info, warn};

/// Region label used when neither the advisor nor the request names one.
pub const DEFAULT_REGION: &str = "Default Region";

/// Runs the weather advisory pipeline.
///
/// The advisor holds only configuration (a default region label and a default
/// single-day output format); every call is independent, so one advisor can be
/// shared freely across threads.
///
/// # Examples
///
/// ```rust
/// use agroweather::{OutputFormat, WeatherAdvisor};
///
/// let advisor = WeatherAdvisor::builder()
///     .region("Mekong Delta")
///     .default_format(OutputFormat::Full)
///     .build();
/// assert_eq!(advisor.region(), "Mekong Delta");
///
/// let defaults = WeatherAdvisor::default();
/// assert_eq!(defaults.default_format(), OutputFormat::Processed);
/// ```
#[derive(Debug, Clone)]
pub struct WeatherAdvisor {
    region: String,
    default_format: OutputFormat,
}

impl Default for WeatherAdvisor {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[bon]
impl WeatherAdvisor {
    /// Creates an advisor.
    ///
    /// # Arguments
    ///
    /// * `.region(impl Into<String>)`: Optional. Region label for reports. Defaults to [`DEFAULT_REGION`].
    /// * `.default_format(OutputFormat)`: Optional. Shape for single-day results when a call names none. Defaults to [`OutputFormat::Processed`].
    #[builder]
    pub fn new(
        #[builder(into)] region: Option<String>,
        default_format: Option<OutputFormat>,
    ) -> Self {
        Self {
            region: region.unwrap_or_else(|| DEFAULT_REGION.to_string()),
            default_format: default_format.unwrap_or_default(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn default_format(&self) -> OutputFormat {
        self.default_format
    }

    /// Processes one day or a series of days.
    ///
    /// A single day yields the shape selected by `.format(..)` (or the advisor
    /// default). A series always yields a [`BatchReport`].
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `input` - **Required.** The observation data ([`ObservationInput`]).
    /// * `.region(impl Into<String>)`: Optional. Overrides the advisor's region for this call.
    /// * `.format(OutputFormat)`: Optional. Overrides the advisor's default single-day shape.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisoryError::MissingInput`] for an empty series.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use agroweather::{AdvisoryError, AdvisoryResponse, DailyObservation, OutputFormat, WeatherAdvisor};
    /// # use chrono::NaiveDate;
    /// # fn main() -> Result<(), AdvisoryError> {
    /// let day = DailyObservation {
    ///     date: NaiveDate::from_ymd_opt(2025, 8, 17).unwrap(),
    ///     temperature_min: 22.0,
    ///     temperature_max: 36.2,
    ///     humidity: 78.0,
    ///     cloud_cover: 6.0,
    ///     pressure: 1012.5,
    /// };
    ///
    /// let advisor = WeatherAdvisor::default();
    /// let response = advisor
    ///     .analyze(day.into())
    ///     .format(OutputFormat::Weather)
    ///     .call()?;
    /// assert!(matches!(response, AdvisoryResponse::Weather(_)));
    ///
    /// let batch = advisor.analyze(vec![day, day].into()).region("North").call()?;
    /// assert!(matches!(batch, AdvisoryResponse::Batch(ref b) if b.region == "North"));
    /// # Ok(())
    /// # }
    /// ```
    #[builder(start_fn = analyze)]
    #[doc(hidden)]
    pub fn build_analyze(
        &self,
        #[builder(start_fn)] input: ObservationInput,
        #[builder(into)] region: Option<String>,
        format: Option<OutputFormat>,
    ) -> Result<AdvisoryResponse, AdvisoryError> {
        let region = region.unwrap_or_else(|| self.region.clone());

        match input {
            ObservationInput::Single(day) => {
                let format = format.unwrap_or(self.default_format);
                debug!("Processing {} as '{}' for {}", day.date, format, region);
                Ok(shape_day(&day, format, &region))
            }
            ObservationInput::Series(days) => {
                Ok(AdvisoryResponse::Batch(self.report(&days, &region)?))
            }
        }
    }

    /// Processes a single day in the given shape.
    pub fn process_day(&self, day: &DailyObservation, format: OutputFormat) -> AdvisoryResponse {
        shape_day(day, format, &self.region)
    }

    /// Builds a batch report for an ordered series of days.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisoryError::MissingInput`] if `days` is empty.
    pub fn process_batch(&self, days: &[DailyObservation]) -> Result<BatchReport, AdvisoryError> {
        self.report(days, &self.region)
    }

    /// Builds a batch report for every day in a frame, in frame order.
    ///
    /// Narrow the frame first (e.g. with [`ObservationFrame::get_range`]) to
    /// report on one week of a longer feed.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisoryError::MissingInput`] if the frame holds no days and
    /// [`AdvisoryError::ProcessingFailed`] if a row cannot be read back.
    pub fn process_frame(&self, frame: &ObservationFrame) -> Result<BatchReport, AdvisoryError> {
        let days = frame.collect_observations()?;
        self.report(&days, &self.region)
    }

    /// Handles a decoded client request.
    ///
    /// Missing data is reported before the format selector is checked.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisoryError::MissingInput`] if the request carries no
    /// observations or an empty series, and [`AdvisoryError::InvalidFormat`] if
    /// the selector is not `processed`, `weather` or `full`.
    pub fn handle(&self, request: AdvisoryRequest) -> Result<AdvisoryResponse, AdvisoryError> {
        let input = match request.weather_data {
            Some(ObservationInput::Series(days)) if days.is_empty() => {
                return Err(AdvisoryError::MissingInput)
            }
            Some(input) => input,
            None => return Err(AdvisoryError::MissingInput),
        };

        let format = request
            .format
            .as_deref()
            .map(str::parse::<OutputFormat>)
            .transpose()
            .inspect_err(|e| warn!("Rejected request: {}", e))?;

        self.analyze(input)
            .maybe_region(request.region)
            .maybe_format(format)
            .call()
    }

    /// Decodes and handles a JSON request body.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisoryError::InvalidRequest`] for an undecodable body, plus
    /// everything [`WeatherAdvisor::handle`] returns.
    pub fn handle_json(&self, body: &str) -> Result<AdvisoryResponse, AdvisoryError> {
        self.handle(AdvisoryRequest::from_json(body)?)
    }

    fn report(
        &self,
        days: &[DailyObservation],
        region: &str,
    ) -> Result<BatchReport, AdvisoryError> {
        if days.is_empty() {
            return Err(AdvisoryError::MissingInput);
        }
        info!("Building report for {} days in {}", days.len(), region);
        batch_report(days, region)
    }
}
