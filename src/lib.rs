mod advisor;
mod error;
mod pipeline;
mod sources;
mod types;
mod utils;

#[cfg(test)]
mod test_fixtures;

pub use advisor::*;
pub use error::AdvisoryError;

pub use types::observation::{DailyObservation, ObservationInput};
pub use types::observation_frame::ObservationFrame;
pub use types::output_format::OutputFormat;
pub use types::request::AdvisoryRequest;
pub use types::weather_condition::{WeatherCondition, CLOUDY_ABOVE, PARTLY_CLOUDY_ABOVE};

pub use types::traits::any_date::AnyDate;
pub use types::traits::types::{Month, StartEndDate};

pub use pipeline::derivation::{derive, rainfall_probability, DerivedDaily};
pub use pipeline::rules::{
    daily_advisories, weekly_advisories, DailyAdvisory, DailyRule, WeeklyAdvisory, WeeklyRule,
    DAILY_RULES, HIGH_TEMPERATURE_C, WEEKLY_RULES,
};
pub use pipeline::shaping::{
    batch_report, shape_day, weather_display, AdvisoryResponse, BatchReport, DayReport, FullDay,
    WeatherDisplay,
};
pub use pipeline::weekly::{summarize, summarize_frame, WeeklyAverages, WeeklySummary};

pub use sources::error::SourceError;
pub use sources::loader::ObservationLoader;
