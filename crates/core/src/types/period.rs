//! Dashboard time-window selector.

use chrono::{DateTime, Months, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Time window a dashboard card is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimePeriod {
    LastWeek,
    LastMonth,
    LastSixMonths,
    LastYear,
    #[default]
    AllTime,
}

/// Error returned when a period label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time period: {0} (expected last-week, last-month, last-6-months, last-year or all-time)")]
pub struct ParsePeriodError(String);

impl TimePeriod {
    /// All selectable periods, in the order the dashboard offers them.
    pub const ALL: [Self; 5] = [
        Self::LastWeek,
        Self::LastMonth,
        Self::LastSixMonths,
        Self::LastYear,
        Self::AllTime,
    ];

    /// Earliest instant (inclusive) a record may carry to fall inside the
    /// window ending at `now`.
    ///
    /// Returns `None` for [`TimePeriod::AllTime`]. Month and year steps use
    /// calendar subtraction clamped to the last day of the target month, so
    /// 31 March minus one month is the last day of February.
    #[must_use]
    pub fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let cutoff = match self {
            Self::LastWeek => now.checked_sub_signed(TimeDelta::days(7)),
            Self::LastMonth => now.checked_sub_months(Months::new(1)),
            Self::LastSixMonths => now.checked_sub_months(Months::new(6)),
            Self::LastYear => now.checked_sub_months(Months::new(12)),
            Self::AllTime => return None,
        };
        // Only unrepresentable dates fail to subtract; nothing can be older.
        Some(cutoff.unwrap_or(DateTime::<Utc>::MIN_UTC))
    }

    /// Human-readable label (e.g., "Last 6 Months").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LastWeek => "Last Week",
            Self::LastMonth => "Last Month",
            Self::LastSixMonths => "Last 6 Months",
            Self::LastYear => "Last Year",
            Self::AllTime => "All Time",
        }
    }
}

impl std::fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for TimePeriod {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "lastweek" | "week" | "7d" => Ok(Self::LastWeek),
            "lastmonth" | "month" | "1m" => Ok(Self::LastMonth),
            "last6months" | "lastsixmonths" | "6m" => Ok(Self::LastSixMonths),
            "lastyear" | "year" | "1y" => Ok(Self::LastYear),
            "alltime" | "all" => Ok(Self::AllTime),
            _ => Err(ParsePeriodError(s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_week_cutoff_is_seven_days() {
        let now = at(2024, 6, 15);
        assert_eq!(TimePeriod::LastWeek.cutoff(now), Some(at(2024, 6, 8)));
    }

    #[test]
    fn test_month_cutoff_clamps_to_end_of_february() {
        let now = at(2024, 3, 31);
        assert_eq!(TimePeriod::LastMonth.cutoff(now), Some(at(2024, 2, 29)));
        let now = at(2023, 3, 31);
        assert_eq!(TimePeriod::LastMonth.cutoff(now), Some(at(2023, 2, 28)));
    }

    #[test]
    fn test_six_month_cutoff_crosses_year() {
        let now = at(2024, 2, 10);
        assert_eq!(TimePeriod::LastSixMonths.cutoff(now), Some(at(2023, 8, 10)));
        let now = at(2024, 8, 31);
        assert_eq!(TimePeriod::LastSixMonths.cutoff(now), Some(at(2024, 2, 29)));
    }

    #[test]
    fn test_year_cutoff_from_leap_day() {
        let now = at(2024, 2, 29);
        assert_eq!(TimePeriod::LastYear.cutoff(now), Some(at(2023, 2, 28)));
    }

    #[test]
    fn test_all_time_has_no_cutoff() {
        assert_eq!(TimePeriod::AllTime.cutoff(at(2024, 1, 1)), None);
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!("Last Week".parse::<TimePeriod>().unwrap(), TimePeriod::LastWeek);
        assert_eq!("last-month".parse::<TimePeriod>().unwrap(), TimePeriod::LastMonth);
        assert_eq!(
            "last_6_months".parse::<TimePeriod>().unwrap(),
            TimePeriod::LastSixMonths
        );
        assert_eq!("LAST YEAR".parse::<TimePeriod>().unwrap(), TimePeriod::LastYear);
        assert_eq!("All Time".parse::<TimePeriod>().unwrap(), TimePeriod::AllTime);
        assert!("fortnight".parse::<TimePeriod>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for period in TimePeriod::ALL {
            assert_eq!(period.to_string().parse::<TimePeriod>().unwrap(), period);
        }
    }
}
