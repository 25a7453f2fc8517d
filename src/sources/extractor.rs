//! Conversions between observation records and polars frames.

use crate::sources::error::SourceError;
use crate::types::observation::DailyObservation;
use chrono::NaiveDate;
use polars::prelude::*;

pub(crate) const DATE_COLUMN: &str = "date";

/// Numeric observation columns, in record field order.
pub(crate) const NUMERIC_COLUMNS: [&str; 5] = [
    "temperature_min",
    "temperature_max",
    "humidity",
    "cloud_cover",
    "pressure",
];

/// Builds an in-memory frame holding one row per observation.
pub(crate) fn dataframe_from_observations(
    days: &[DailyObservation],
) -> Result<DataFrame, PolarsError> {
    let dates: Vec<NaiveDate> = days.iter().map(|d| d.date).collect();
    let temperature_min: Vec<f64> = days.iter().map(|d| d.temperature_min).collect();
    let temperature_max: Vec<f64> = days.iter().map(|d| d.temperature_max).collect();
    let humidity: Vec<f64> = days.iter().map(|d| d.humidity).collect();
    let cloud_cover: Vec<f64> = days.iter().map(|d| d.cloud_cover).collect();
    let pressure: Vec<f64> = days.iter().map(|d| d.pressure).collect();

    df!(
        DATE_COLUMN => dates,
        "temperature_min" => temperature_min,
        "temperature_max" => temperature_max,
        "humidity" => humidity,
        "cloud_cover" => cloud_cover,
        "pressure" => pressure
    )
}

/// Checks that a parsed feed has the observation columns and brings it into
/// canonical shape: a `Date` typed date column followed by the numeric columns
/// as `Float64`. Extra columns are dropped.
pub(crate) fn normalize_schema(df: DataFrame, feed: &str) -> Result<DataFrame, SourceError> {
    for column in std::iter::once(DATE_COLUMN).chain(NUMERIC_COLUMNS) {
        if df.get_column_index(column).is_none() {
            return Err(SourceError::MissingColumn {
                feed: feed.to_string(),
                column: column.to_string(),
            });
        }
    }

    let date_type = df.column(DATE_COLUMN)?.dtype().clone();
    if date_type != DataType::Date {
        return Err(SourceError::SchemaMismatch {
            feed: feed.to_string(),
            message: format!(
                "column '{}' must hold ISO calendar dates, found {}",
                DATE_COLUMN, date_type
            ),
        });
    }

    let selection: Vec<Expr> = std::iter::once(col(DATE_COLUMN))
        .chain(
            NUMERIC_COLUMNS
                .iter()
                .map(|name| col(*name).strict_cast(DataType::Float64)),
        )
        .collect();

    let normalized = df
        .lazy()
        .select(selection)
        .collect()
        .map_err(|e| SourceError::SchemaMismatch {
            feed: feed.to_string(),
            message: format!("observation columns must be numeric: {}", e),
        })?;
    reject_missing_values(&normalized)?;
    Ok(normalized)
}

/// Fails on the first null cell of an observation column, scanning columns in
/// record field order.
///
/// # Errors
///
/// Returns [`SourceError::MissingValue`] naming the row and column.
pub(crate) fn reject_missing_values(df: &DataFrame) -> Result<(), SourceError> {
    for name in std::iter::once(DATE_COLUMN).chain(NUMERIC_COLUMNS) {
        let column = df.column(name)?;
        if column.null_count() == 0 {
            continue;
        }
        let row = column
            .is_null()
            .into_iter()
            .position(|is_null| is_null == Some(true))
            .unwrap_or_default();
        return Err(SourceError::MissingValue {
            row,
            column: name.to_string(),
        });
    }
    Ok(())
}

/// Reads observation records back out of a canonical frame, in row order.
///
/// # Errors
///
/// Returns [`SourceError::MissingValue`] for a null cell and
/// [`SourceError::InvalidDate`] for a date that does not render as `YYYY-MM-DD`.
pub(crate) fn observations_from_dataframe(
    df: &DataFrame,
) -> Result<Vec<DailyObservation>, SourceError> {
    let dates = df.column(DATE_COLUMN)?.cast(&DataType::String)?;
    let dates = dates.str()?;

    let numeric: Vec<Column> = NUMERIC_COLUMNS
        .iter()
        .map(|name| df.column(name)?.cast(&DataType::Float64))
        .collect::<PolarsResult<_>>()?;
    let numeric: Vec<&Float64Chunked> = numeric
        .iter()
        .map(|column| column.f64())
        .collect::<PolarsResult<_>>()?;

    let mut observations = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let raw_date = dates.get(row).ok_or_else(|| SourceError::MissingValue {
            row,
            column: DATE_COLUMN.to_string(),
        })?;
        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|_| {
            SourceError::InvalidDate {
                row,
                value: raw_date.to_string(),
            }
        })?;

        let value = |index: usize| {
            numeric[index]
                .get(row)
                .ok_or_else(|| SourceError::MissingValue {
                    row,
                    column: NUMERIC_COLUMNS[index].to_string(),
                })
        };

        observations.push(DailyObservation {
            date,
            temperature_min: value(0)?,
            temperature_max: value(1)?,
            humidity: value(2)?,
            cloud_cover: value(3)?,
            pressure: value(4)?,
        });
    }
    Ok(observations)
}
