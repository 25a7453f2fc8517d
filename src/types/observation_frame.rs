// observation_frame.rs

//! Contains the `ObservationFrame` structure for lazy operations on a series of
//! daily observations.

use crate::pipeline::weekly::WeeklyAverages;
use crate::sources::extractor::{
    dataframe_from_observations, observations_from_dataframe, reject_missing_values,
};
use crate::types::observation::DailyObservation;
use crate::types::traits::any_date::AnyDate;
use crate::AdvisoryError;
use polars::prelude::{col, lit, DataFrame, Expr, IntoLazy, LazyFrame};

/// A wrapper around a Polars `LazyFrame` holding daily observations.
///
/// The frame has a `date` column of type `Date` and the five numeric
/// observation columns (`temperature_min`, `temperature_max`, `humidity`,
/// `cloud_cover`, `pressure`) as `Float64`.
///
/// Frames are built from records with [`ObservationFrame::from_observations`]
/// or loaded from a feed through [`crate::ObservationLoader`].
///
/// # Errors
///
/// Methods that evaluate the frame return [`AdvisoryError::Frame`] if the
/// underlying computation fails.
#[derive(Clone)]
pub struct ObservationFrame {
    /// The underlying Polars LazyFrame.
    pub frame: LazyFrame,
}

impl ObservationFrame {
    /// Wraps a `LazyFrame` that already has the observation schema.
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// Builds a frame from observation records, keeping their order.
    ///
    /// # Arguments
    ///
    /// * `days` - The observations, one row each.
    pub fn from_observations(days: &[DailyObservation]) -> Result<Self, AdvisoryError> {
        let df: DataFrame = dataframe_from_observations(days)?;
        Ok(Self::new(df.lazy()))
    }

    /// Filters the observations with a Polars predicate expression.
    ///
    /// Returns a *new* `ObservationFrame`; `self` is unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// # use agroweather::{DailyObservation, ObservationFrame, AdvisoryError};
    /// use chrono::NaiveDate;
    /// use polars::prelude::{col, lit};
    ///
    /// # fn main() -> Result<(), AdvisoryError> {
    /// let day = DailyObservation {
    ///     date: NaiveDate::from_ymd_opt(2025, 8, 17).unwrap(),
    ///     temperature_min: 22.0,
    ///     temperature_max: 36.2,
    ///     humidity: 78.0,
    ///     cloud_cover: 6.0,
    ///     pressure: 1012.5,
    /// };
    /// let frame = ObservationFrame::from_observations(&[day])?;
    /// let humid = frame.filter(col("humidity").gt(lit(85.0)));
    /// assert_eq!(humid.height()?, 0);
    /// # Ok(())
    /// # }
    /// ```
    pub fn filter(&self, predicate: Expr) -> ObservationFrame {
        ObservationFrame::new(self.frame.clone().filter(predicate))
    }

    /// Keeps only the days within `start..=end`.
    ///
    /// Bounds can be anything implementing [`AnyDate`]: a `NaiveDate`, an ISO
    /// date string, a [`crate::Month`] or an observation. For a multi-day bound
    /// the start uses the first day of `start` and the end the last day of
    /// `end`.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisoryError::DateParsingError`] if a bound cannot be resolved.
    pub fn get_range(
        &self,
        start: impl AnyDate,
        end: impl AnyDate,
    ) -> Result<ObservationFrame, AdvisoryError> {
        let start_naive = start
            .get_date_range()
            .ok_or(AdvisoryError::DateParsingError)?
            .start;
        let end_naive = end
            .get_date_range()
            .ok_or(AdvisoryError::DateParsingError)?
            .end;

        Ok(self.filter(
            col("date")
                .gt_eq(lit(start_naive))
                .and(col("date").lt_eq(lit(end_naive))),
        ))
    }

    /// Keeps only the given day. A multi-day argument resolves to its first day.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisoryError::DateParsingError`] if `date` cannot be resolved.
    pub fn get_at(&self, date: impl AnyDate) -> Result<ObservationFrame, AdvisoryError> {
        let naive_date = date
            .get_date_range()
            .ok_or(AdvisoryError::DateParsingError)?
            .start;
        Ok(self.filter(col("date").eq(lit(naive_date))))
    }

    /// Number of days in the frame.
    pub fn height(&self) -> Result<usize, AdvisoryError> {
        Ok(self.frame.clone().collect()?.height())
    }

    /// Number of days matching `predicate`.
    pub fn count_where(&self, predicate: Expr) -> Result<usize, AdvisoryError> {
        self.filter(predicate).height()
    }

    /// Checks that no observation cell is null.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisoryError::ProcessingFailed`] wrapping the first missing
    /// value found.
    pub fn ensure_complete(&self) -> Result<(), AdvisoryError> {
        let df = self.frame.clone().collect()?;
        Ok(reject_missing_values(&df)?)
    }

    /// Unweighted means of the five numeric columns.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisoryError::MissingInput`] if the frame holds no days.
    pub fn averages(&self) -> Result<WeeklyAverages, AdvisoryError> {
        let means = self
            .frame
            .clone()
            .select([
                col("temperature_min").mean(),
                col("temperature_max").mean(),
                col("humidity").mean(),
                col("cloud_cover").mean(),
                col("pressure").mean(),
            ])
            .collect()?;

        let mean = |name: &str| -> Result<f64, AdvisoryError> {
            means
                .column(name)?
                .f64()?
                .get(0)
                .ok_or(AdvisoryError::MissingInput)
        };

        Ok(WeeklyAverages {
            temperature_min: mean("temperature_min")?,
            temperature_max: mean("temperature_max")?,
            humidity: mean("humidity")?,
            cloud_cover: mean("cloud_cover")?,
            pressure: mean("pressure")?,
        })
    }

    /// Collects the frame back into observation records, in frame order.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisoryError::ProcessingFailed`] if a row has a null value.
    pub fn collect_observations(&self) -> Result<Vec<DailyObservation>, AdvisoryError> {
        let df = self.frame.clone().collect()?;
        Ok(observations_from_dataframe(&df)?)
    }
}
