//! Hourly forecast models and the date range they are queried with

use chrono::{Days, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::weather::WeatherCondition;
use crate::{Result, WeatherError};

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `[today, today + 1]` relative to `today`
    #[must_use]
    pub fn starting_at(today: NaiveDate) -> Self {
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
        Self::new(today, tomorrow)
    }

    /// `[today, tomorrow]` in the local timezone
    #[must_use]
    pub fn today_and_tomorrow() -> Self {
        Self::starting_at(Local::now().date_naive())
    }

    /// Reject ranges whose start comes after their end
    pub fn validate(&self) -> Result<()> {
        if self.start > self.end {
            return Err(WeatherError::validation(format!(
                "Date range start {} is after end {}",
                self.start, self.end
            )));
        }
        Ok(())
    }

    /// Whether `date` falls inside the range (both ends included)
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::today_and_tomorrow()
    }
}

/// Forecast for one hour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
    /// Local time at the location
    pub date_time: NaiveDateTime,
    pub temperature_rounded: i32,
    pub condition: WeatherCondition,
    pub is_day: bool,
}

/// Probability of precipitation for one hour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationProbability {
    pub latitude: String,
    pub longitude: String,
    /// Local time at the location
    pub date_time: NaiveDateTime,
    /// Probability between 0.0 and 1.0
    pub probability: f32,
}

impl PrecipitationProbability {
    /// Build from an API percentage, clamping to `0..=100`
    #[must_use]
    pub fn from_percentage(
        latitude: &str,
        longitude: &str,
        date_time: NaiveDateTime,
        percentage: u8,
    ) -> Self {
        Self {
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
            date_time,
            probability: f32::from(percentage.min(100)) / 100.0,
        }
    }

    /// Probability as a whole percentage
    #[must_use]
    pub fn percentage(&self) -> u8 {
        (self.probability * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_default_range_spans_today_and_tomorrow() {
        let range = DateRange::starting_at(date("2026-10-15"));
        assert_eq!(range.start, date("2026-10-15"));
        assert_eq!(range.end, date("2026-10-16"));
    }

    #[test]
    fn test_default_range_crosses_month_end() {
        let range = DateRange::starting_at(date("2026-12-31"));
        assert_eq!(range.end, date("2027-01-01"));
    }

    #[rstest]
    #[case("2026-10-15", "2026-10-16", true)]
    #[case("2026-10-15", "2026-10-15", true)]
    #[case("2026-10-16", "2026-10-15", false)]
    fn test_range_validation(#[case] start: &str, #[case] end: &str, #[case] valid: bool) {
        let range = DateRange::new(date(start), date(end));
        assert_eq!(range.validate().is_ok(), valid);
    }

    #[test]
    fn test_range_is_inclusive() {
        let range = DateRange::new(date("2026-10-15"), date("2026-10-16"));
        assert!(range.contains(date("2026-10-15")));
        assert!(range.contains(date("2026-10-16")));
        assert!(!range.contains(date("2026-10-17")));
    }

    #[test]
    fn test_precipitation_from_percentage() {
        let at = date("2026-10-15").and_hms_opt(14, 0, 0).unwrap();
        let p = PrecipitationProbability::from_percentage("1.0", "2.0", at, 35);
        assert!((p.probability - 0.35).abs() < f32::EPSILON);
        assert_eq!(p.percentage(), 35);

        let clamped = PrecipitationProbability::from_percentage("1.0", "2.0", at, 140);
        assert_eq!(clamped.probability, 1.0);
    }
}
