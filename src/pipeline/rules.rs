//! Threshold rule tables for daily and weekly advisories.
//!
//! Each table is an ordered list of independent predicate/advisory pairs. Every
//! rule is evaluated on its own; none suppresses another, and the output keeps
//! table order.

use crate::pipeline::weekly::WeeklyAverages;
use crate::types::observation::DailyObservation;
use std::fmt;

/// Maximum temperature (°C) above which a day counts as hot. Shared by the
/// per-day heat rule and the weekly hot-day count.
pub const HIGH_TEMPERATURE_C: f64 = 35.0;

/// Advisories produced for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DailyAdvisory {
    HeatProtection,
    ColdProtection,
    FungalDisease,
    IrrigationFrequency,
    RainfallPreparation,
    FieldOperations,
    UnsettledWeather,
    OptimalPlanting,
}

impl DailyAdvisory {
    pub fn message(&self) -> &'static str {
        match self {
            DailyAdvisory::HeatProtection => {
                "High temperature alert: provide shade for sensitive crops and increase irrigation"
            }
            DailyAdvisory::ColdProtection => {
                "Low temperature warning: protect sensitive crops from cold stress"
            }
            DailyAdvisory::FungalDisease => {
                "High humidity: monitor crops for fungal diseases and improve ventilation"
            }
            DailyAdvisory::IrrigationFrequency => {
                "Low humidity: increase irrigation frequency to prevent water stress"
            }
            DailyAdvisory::RainfallPreparation => {
                "Heavy cloud cover: prepare for possible rainfall and check field drainage"
            }
            DailyAdvisory::FieldOperations => {
                "Clear skies: favorable conditions for spraying, harvesting and other field operations"
            }
            DailyAdvisory::UnsettledWeather => {
                "Low pressure: unsettled weather possible, secure equipment and young plants"
            }
            DailyAdvisory::OptimalPlanting => {
                "Optimal temperature and humidity for planting and transplanting"
            }
        }
    }
}

impl fmt::Display for DailyAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A per-day rule. The predicate receives the observation and its average
/// temperature.
pub struct DailyRule {
    pub advisory: DailyAdvisory,
    pub applies: fn(&DailyObservation, f64) -> bool,
}

pub const DAILY_RULES: [DailyRule; 8] = [
    DailyRule {
        advisory: DailyAdvisory::HeatProtection,
        applies: |day, _| day.temperature_max > HIGH_TEMPERATURE_C,
    },
    DailyRule {
        advisory: DailyAdvisory::ColdProtection,
        applies: |day, _| day.temperature_min < 15.0,
    },
    DailyRule {
        advisory: DailyAdvisory::FungalDisease,
        applies: |day, _| day.humidity > 85.0,
    },
    DailyRule {
        advisory: DailyAdvisory::IrrigationFrequency,
        applies: |day, _| day.humidity < 40.0,
    },
    DailyRule {
        advisory: DailyAdvisory::RainfallPreparation,
        applies: |day, _| day.cloud_cover > 80.0,
    },
    DailyRule {
        advisory: DailyAdvisory::FieldOperations,
        applies: |day, _| day.cloud_cover < 20.0,
    },
    DailyRule {
        advisory: DailyAdvisory::UnsettledWeather,
        applies: |day, _| day.pressure < 1010.0,
    },
    DailyRule {
        advisory: DailyAdvisory::OptimalPlanting,
        applies: |day, avg_temperature| {
            (25.0..=30.0).contains(&avg_temperature) && (60.0..=80.0).contains(&day.humidity)
        },
    },
];

/// Evaluates [`DAILY_RULES`] in order and returns every advisory that fires.
///
/// # Arguments
///
/// * `day` - The observation to evaluate.
/// * `avg_temperature` - The day's average temperature, see
///   [`DailyObservation::average_temperature`].
pub fn daily_advisories(day: &DailyObservation, avg_temperature: f64) -> Vec<DailyAdvisory> {
    DAILY_RULES
        .iter()
        .filter(|rule| (rule.applies)(day, avg_temperature))
        .map(|rule| rule.advisory)
        .collect()
}

/// Advisories produced for a multi-day batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeeklyAdvisory {
    HighHumidity,
    GenerallyCloudy,
    ClearSkies,
    LowPressureSystems,
    LargeTemperatureVariation,
    TropicalCrops,
    /// Number of days whose maximum exceeded [`HIGH_TEMPERATURE_C`].
    HighTemperatureDays(usize),
}

impl WeeklyAdvisory {
    pub fn message(&self) -> String {
        match self {
            WeeklyAdvisory::HighHumidity => {
                "High humidity expected this week: take preventive measures against fungal diseases"
                    .to_string()
            }
            WeeklyAdvisory::GenerallyCloudy => {
                "Generally cloudy week: reduced sunlight may slow crop growth".to_string()
            }
            WeeklyAdvisory::ClearSkies => {
                "Clear skies expected: make sure irrigation keeps up during sunny days".to_string()
            }
            WeeklyAdvisory::LowPressureSystems => {
                "Low pressure systems this week: watch for storms and heavy rain".to_string()
            }
            WeeklyAdvisory::LargeTemperatureVariation => {
                "Large daily temperature variation: protect sensitive crops from temperature stress"
                    .to_string()
            }
            WeeklyAdvisory::TropicalCrops => {
                "Favorable week for tropical crops such as rice, sugarcane and vegetables".to_string()
            }
            WeeklyAdvisory::HighTemperatureDays(days) => format!(
                "{} day(s) with high temperatures: schedule irrigation and shade accordingly",
                days
            ),
        }
    }
}

impl fmt::Display for WeeklyAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// A weekly rule keyed on the batch means.
pub struct WeeklyRule {
    pub advisory: WeeklyAdvisory,
    pub applies: fn(&WeeklyAverages) -> bool,
}

pub const WEEKLY_RULES: [WeeklyRule; 6] = [
    WeeklyRule {
        advisory: WeeklyAdvisory::HighHumidity,
        applies: |avg| avg.humidity > 85.0,
    },
    WeeklyRule {
        advisory: WeeklyAdvisory::GenerallyCloudy,
        applies: |avg| avg.cloud_cover > 70.0,
    },
    WeeklyRule {
        advisory: WeeklyAdvisory::ClearSkies,
        applies: |avg| avg.cloud_cover < 20.0,
    },
    WeeklyRule {
        advisory: WeeklyAdvisory::LowPressureSystems,
        applies: |avg| avg.pressure < 1010.0,
    },
    WeeklyRule {
        advisory: WeeklyAdvisory::LargeTemperatureVariation,
        applies: |avg| avg.temperature_max - avg.temperature_min > 15.0,
    },
    WeeklyRule {
        advisory: WeeklyAdvisory::TropicalCrops,
        applies: |avg| {
            (25.0..=32.0).contains(&avg.temperature_max) && (60.0..=80.0).contains(&avg.humidity)
        },
    },
];

/// Evaluates [`WEEKLY_RULES`] against the batch means, then appends the hot
/// day count when it is non-zero.
///
/// # Arguments
///
/// * `averages` - Means of the batch.
/// * `high_temperature_days` - Days in the batch with a maximum above [`HIGH_TEMPERATURE_C`].
pub fn weekly_advisories(
    averages: &WeeklyAverages,
    high_temperature_days: usize,
) -> Vec<WeeklyAdvisory> {
    let mut advisories: Vec<WeeklyAdvisory> = WEEKLY_RULES
        .iter()
        .filter(|rule| (rule.applies)(averages))
        .map(|rule| rule.advisory)
        .collect();

    if high_temperature_days > 0 {
        advisories.push(WeeklyAdvisory::HighTemperatureDays(high_temperature_days));
    }
    advisories
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    // A day that triggers no daily rule: avg 20, humidity 50, cloud 50, pressure 1015
    fn neutral_day() -> DailyObservation {
        DailyObservation {
            date: NaiveDate::from_ymd_opt(2025, 8, 17).unwrap(),
            temperature_min: 16.0,
            temperature_max: 24.0,
            humidity: 50.0,
            cloud_cover: 50.0,
            pressure: 1015.0,
        }
    }

    fn evaluate(day: DailyObservation) -> Vec<DailyAdvisory> {
        daily_advisories(&day, day.average_temperature())
    }

    #[test]
    fn test_neutral_day_has_no_advisories() {
        assert!(evaluate(neutral_day()).is_empty());
    }

    fn tweaked(tweak: fn(&mut DailyObservation)) -> DailyObservation {
        let mut day = neutral_day();
        tweak(&mut day);
        day
    }

    #[test]
    fn test_each_daily_rule_in_isolation() {
        let cases: [(fn(&mut DailyObservation), DailyAdvisory); 7] = [
            (|d| d.temperature_max = 35.1, DailyAdvisory::HeatProtection),
            (|d| d.temperature_min = 14.9, DailyAdvisory::ColdProtection),
            (|d| d.humidity = 85.5, DailyAdvisory::FungalDisease),
            (|d| d.humidity = 39.0, DailyAdvisory::IrrigationFrequency),
            (|d| d.cloud_cover = 81.0, DailyAdvisory::RainfallPreparation),
            (|d| d.cloud_cover = 19.0, DailyAdvisory::FieldOperations),
            (|d| d.pressure = 1009.9, DailyAdvisory::UnsettledWeather),
        ];
        for (tweak, expected) in cases {
            let day = tweaked(tweak);
            assert_eq!(evaluate(day), vec![expected], "{:?}", day);
        }
    }

    #[test]
    fn test_daily_boundaries_are_exclusive() {
        let boundaries: [fn(&mut DailyObservation); 7] = [
            |d| d.temperature_max = 35.0,
            |d| d.temperature_min = 15.0,
            |d| d.humidity = 85.0,
            |d| d.humidity = 40.0,
            |d| d.cloud_cover = 80.0,
            |d| d.cloud_cover = 20.0,
            |d| d.pressure = 1010.0,
        ];
        for tweak in boundaries {
            let day = tweaked(tweak);
            assert!(evaluate(day).is_empty(), "{:?}", day);
        }
    }

    #[test]
    fn test_optimal_planting_window_is_inclusive() {
        // avg exactly 25 and 30, humidity exactly 60 and 80
        let low = DailyObservation {
            temperature_min: 20.0,
            temperature_max: 30.0,
            humidity: 60.0,
            ..neutral_day()
        };
        let high = DailyObservation {
            temperature_min: 25.0,
            temperature_max: 35.0,
            humidity: 80.0,
            ..neutral_day()
        };
        assert_eq!(evaluate(low), vec![DailyAdvisory::OptimalPlanting]);
        assert_eq!(evaluate(high), vec![DailyAdvisory::OptimalPlanting]);

        let too_humid = DailyObservation {
            humidity: 80.5,
            ..low
        };
        let too_warm = DailyObservation {
            temperature_max: 35.2,
            ..high
        };
        assert!(evaluate(too_humid).is_empty());
        assert_eq!(evaluate(too_warm), vec![DailyAdvisory::HeatProtection]);
    }

    #[test]
    fn test_multiple_rules_keep_table_order() {
        let day = DailyObservation {
            date: NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(),
            temperature_min: 10.0,
            temperature_max: 37.0,
            humidity: 90.0,
            cloud_cover: 95.0,
            pressure: 1002.0,
        };
        assert_eq!(
            evaluate(day),
            vec![
                DailyAdvisory::HeatProtection,
                DailyAdvisory::ColdProtection,
                DailyAdvisory::FungalDisease,
                DailyAdvisory::RainfallPreparation,
                DailyAdvisory::UnsettledWeather,
            ]
        );
    }

    fn neutral_week() -> WeeklyAverages {
        WeeklyAverages {
            temperature_min: 18.0,
            temperature_max: 24.0,
            humidity: 50.0,
            cloud_cover: 50.0,
            pressure: 1015.0,
        }
    }

    #[test]
    fn test_weekly_rules() {
        assert!(weekly_advisories(&neutral_week(), 0).is_empty());

        let wet = WeeklyAverages {
            humidity: 88.0,
            cloud_cover: 75.0,
            pressure: 1005.0,
            ..neutral_week()
        };
        assert_eq!(
            weekly_advisories(&wet, 0),
            vec![
                WeeklyAdvisory::HighHumidity,
                WeeklyAdvisory::GenerallyCloudy,
                WeeklyAdvisory::LowPressureSystems,
            ]
        );

        let swing = WeeklyAverages {
            temperature_min: 10.0,
            temperature_max: 25.5,
            cloud_cover: 10.0,
            humidity: 65.0,
            ..neutral_week()
        };
        assert_eq!(
            weekly_advisories(&swing, 2),
            vec![
                WeeklyAdvisory::ClearSkies,
                WeeklyAdvisory::LargeTemperatureVariation,
                WeeklyAdvisory::TropicalCrops,
                WeeklyAdvisory::HighTemperatureDays(2),
            ]
        );
    }

    #[test]
    fn test_weekly_variation_boundary_is_exclusive() {
        let exactly_fifteen = WeeklyAverages {
            temperature_min: 10.0,
            temperature_max: 25.0,
            ..neutral_week()
        };
        assert!(!weekly_advisories(&exactly_fifteen, 0)
            .contains(&WeeklyAdvisory::LargeTemperatureVariation));
    }

    #[test]
    fn test_high_temperature_days_message() {
        assert_eq!(
            WeeklyAdvisory::HighTemperatureDays(3).message(),
            "3 day(s) with high temperatures: schedule irrigation and shade accordingly"
        );
    }
}
