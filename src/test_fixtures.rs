//! Shared observation fixtures for unit tests.

use crate::types::observation::DailyObservation;
use chrono::NaiveDate;

fn day(
    day: u32,
    temperature_min: f64,
    temperature_max: f64,
    humidity: f64,
    cloud_cover: f64,
    pressure: f64,
) -> DailyObservation {
    DailyObservation {
        date: NaiveDate::from_ymd_opt(2025, 8, day).unwrap(),
        temperature_min,
        temperature_max,
        humidity,
        cloud_cover,
        pressure,
    }
}

/// Five consecutive days, 2025-08-17 through 2025-08-21.
pub(crate) fn august_week() -> Vec<DailyObservation> {
    vec![
        day(17, 22.0, 36.2, 78.0, 6.0, 1012.5),
        day(18, 23.1, 28.5, 82.0, 45.0, 1010.2),
        day(19, 22.4, 27.9, 88.0, 72.0, 1008.7),
        day(20, 21.8, 29.1, 70.0, 20.0, 1011.4),
        day(21, 22.6, 27.5, 75.0, 16.0, 1013.0),
    ]
}

/// The same week as CSV, with integer formatted humidity and cloud cover the
/// way spreadsheet exports usually write them.
pub(crate) const AUGUST_WEEK_CSV: &str = "\
date,temperature_min,temperature_max,humidity,cloud_cover,pressure,station
2025-08-17,22.0,36.2,78,6,1012.5,north
2025-08-18,23.1,28.5,82,45,1010.2,north
2025-08-19,22.4,27.9,88,72,1008.7,north
2025-08-20,21.8,29.1,70,20,1011.4,north
2025-08-21,22.6,27.5,75,16,1013.0,north
";
