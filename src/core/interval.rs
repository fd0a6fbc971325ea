use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString, IntoEnumIterator};

use crate::error::{ChartError, ChartResult};

/// Candle bucket size offered by the interval picker.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    AsRefStr,
    StrumDisplay,
    EnumIter,
)]
pub enum Interval {
    #[strum(serialize = "1s")]
    #[serde(rename = "1s")]
    OneSecond,
    #[strum(serialize = "15s")]
    #[serde(rename = "15s")]
    FifteenSeconds,
    #[strum(serialize = "30s")]
    #[serde(rename = "30s")]
    ThirtySeconds,
    #[strum(serialize = "1m")]
    #[serde(rename = "1m")]
    OneMinute,
    #[strum(serialize = "5m")]
    #[serde(rename = "5m")]
    FiveMinutes,
    #[strum(serialize = "15m")]
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[strum(serialize = "30m")]
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[strum(serialize = "1h")]
    #[serde(rename = "1h")]
    OneHour,
    #[strum(serialize = "2h")]
    #[serde(rename = "2h")]
    TwoHours,
    #[strum(serialize = "4h")]
    #[serde(rename = "4h")]
    FourHours,
    #[strum(serialize = "6h")]
    #[serde(rename = "6h")]
    SixHours,
    #[strum(serialize = "8h")]
    #[serde(rename = "8h")]
    EightHours,
    #[strum(serialize = "12h")]
    #[serde(rename = "12h")]
    TwelveHours,
    #[strum(serialize = "1d")]
    #[serde(rename = "1d")]
    OneDay,
    #[strum(serialize = "3d")]
    #[serde(rename = "3d")]
    ThreeDays,
    #[strum(serialize = "1w")]
    #[serde(rename = "1w")]
    OneWeek,
    #[strum(serialize = "1mo")]
    #[serde(rename = "1mo")]
    OneMonth,
}

impl Default for Interval {
    fn default() -> Self {
        Self::FifteenMinutes
    }
}

/// How time-axis labels are bucketed and abbreviated for an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeAxisFormat {
    /// Sub-day candles: bucket by calendar day, repeat labels show the clock.
    Intraday,
    /// Day and week candles: bucket by month, repeat labels show month/day.
    DayWeek,
    /// Month candles: every label is year/month, no bucketing.
    Monthly,
}

impl TimeAxisFormat {
    /// `chrono` pattern of the coarse bucket used to deduplicate labels.
    #[must_use]
    pub fn bucket_pattern(self) -> &'static str {
        match self {
            Self::Intraday => "%y/%m/%d",
            Self::DayWeek | Self::Monthly => "%y/%m",
        }
    }
}

impl Interval {
    /// Parses the toolbar spelling (`"15m"`, `"1mo"`, ...).
    pub fn parse(value: &str) -> ChartResult<Self> {
        Self::from_str(value).map_err(|_| ChartError::UnknownInterval(value.to_owned()))
    }

    /// Every supported interval in ascending bucket size.
    #[must_use]
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }

    /// Nominal bucket length; a month counts as 30 days.
    #[must_use]
    pub fn duration_ms(self) -> i64 {
        const SECOND: i64 = 1_000;
        const MINUTE: i64 = 60 * SECOND;
        const HOUR: i64 = 60 * MINUTE;
        const DAY: i64 = 24 * HOUR;
        match self {
            Self::OneSecond => SECOND,
            Self::FifteenSeconds => 15 * SECOND,
            Self::ThirtySeconds => 30 * SECOND,
            Self::OneMinute => MINUTE,
            Self::FiveMinutes => 5 * MINUTE,
            Self::FifteenMinutes => 15 * MINUTE,
            Self::ThirtyMinutes => 30 * MINUTE,
            Self::OneHour => HOUR,
            Self::TwoHours => 2 * HOUR,
            Self::FourHours => 4 * HOUR,
            Self::SixHours => 6 * HOUR,
            Self::EightHours => 8 * HOUR,
            Self::TwelveHours => 12 * HOUR,
            Self::OneDay => DAY,
            Self::ThreeDays => 3 * DAY,
            Self::OneWeek => 7 * DAY,
            Self::OneMonth => 30 * DAY,
        }
    }

    #[must_use]
    pub fn time_axis_format(self) -> TimeAxisFormat {
        match self {
            Self::OneDay | Self::ThreeDays | Self::OneWeek => TimeAxisFormat::DayWeek,
            Self::OneMonth => TimeAxisFormat::Monthly,
            _ => TimeAxisFormat::Intraday,
        }
    }
}
