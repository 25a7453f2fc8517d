use crate::types::observation::DailyObservation;
use crate::types::traits::types::{Month, StartEndDate};
use chrono::NaiveDate;

/// Anything that resolves to an inclusive range of calendar days.
///
/// Used for the bounds of [`crate::ObservationFrame::get_range`], so callers can
/// pass dates, ISO strings or whole months interchangeably.
pub trait AnyDate {
    fn get_date_range(self) -> Option<StartEndDate>;
}

impl AnyDate for NaiveDate {
    fn get_date_range(self) -> Option<StartEndDate> {
        Some(StartEndDate {
            start: self,
            end: self,
        })
    }
}

impl AnyDate for &str {
    fn get_date_range(self) -> Option<StartEndDate> {
        NaiveDate::parse_from_str(self, "%Y-%m-%d")
            .ok()?
            .get_date_range()
    }
}

impl AnyDate for String {
    fn get_date_range(self) -> Option<StartEndDate> {
        self.as_str().get_date_range()
    }
}

impl AnyDate for Month {
    fn get_date_range(self) -> Option<StartEndDate> {
        Some(StartEndDate {
            start: self.first_day()?,
            end: self.last_day()?,
        })
    }
}

impl AnyDate for &DailyObservation {
    fn get_date_range(self) -> Option<StartEndDate> {
        self.date.get_date_range()
    }
}
