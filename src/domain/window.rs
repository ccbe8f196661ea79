//! Window selection: range presets, custom ranges and sampling frequency.

use crate::domain::error::UnknownLabel;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangePreset {
    OneDay,
    FiveDays,
    TenDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    FiveYears,
    TenYears,
    Max,
    Custom,
}

impl RangePreset {
    pub const ALL: [RangePreset; 11] = [
        RangePreset::OneDay,
        RangePreset::FiveDays,
        RangePreset::TenDays,
        RangePreset::OneMonth,
        RangePreset::ThreeMonths,
        RangePreset::SixMonths,
        RangePreset::OneYear,
        RangePreset::FiveYears,
        RangePreset::TenYears,
        RangePreset::Max,
        RangePreset::Custom,
    ];

    /// Calendar days back from the last available date. `None` for `Max`
    /// and `Custom`, which are not day counts.
    pub fn days(self) -> Option<i64> {
        match self {
            RangePreset::OneDay => Some(1),
            RangePreset::FiveDays => Some(5),
            RangePreset::TenDays => Some(10),
            RangePreset::OneMonth => Some(30),
            RangePreset::ThreeMonths => Some(90),
            RangePreset::SixMonths => Some(180),
            RangePreset::OneYear => Some(365),
            RangePreset::FiveYears => Some(1825),
            RangePreset::TenYears => Some(3650),
            RangePreset::Max | RangePreset::Custom => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RangePreset::OneDay => "1D",
            RangePreset::FiveDays => "5D",
            RangePreset::TenDays => "10D",
            RangePreset::OneMonth => "1M",
            RangePreset::ThreeMonths => "3M",
            RangePreset::SixMonths => "6M",
            RangePreset::OneYear => "1Y",
            RangePreset::FiveYears => "5Y",
            RangePreset::TenYears => "10Y",
            RangePreset::Max => "MAX",
            RangePreset::Custom => "CUSTOM",
        }
    }
}

impl fmt::Display for RangePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RangePreset {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        RangePreset::ALL
            .into_iter()
            .find(|p| p.label() == wanted)
            .ok_or_else(|| UnknownLabel {
                kind: "range preset",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Daily => write!(f, "daily"),
            Frequency::Weekly => write!(f, "weekly"),
            Frequency::Monthly => write!(f, "monthly"),
        }
    }
}

impl FromStr for Frequency {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "1d" => Ok(Frequency::Daily),
            "weekly" | "1wk" | "1w" => Ok(Frequency::Weekly),
            "monthly" | "1mo" | "1m" => Ok(Frequency::Monthly),
            _ => Err(UnknownLabel {
                kind: "frequency",
                value: s.to_string(),
            }),
        }
    }
}

/// Which slice of the raw history is visible and how it is sampled.
///
/// `custom_start`/`custom_end` are only read when `range` is
/// [`RangePreset::Custom`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSelector {
    pub range: RangePreset,
    pub frequency: Frequency,
    pub custom_start: Option<NaiveDate>,
    pub custom_end: Option<NaiveDate>,
}

impl WindowSelector {
    pub fn preset(range: RangePreset, frequency: Frequency) -> Self {
        Self {
            range,
            frequency,
            custom_start: None,
            custom_end: None,
        }
    }

    pub fn custom(start: NaiveDate, end: NaiveDate, frequency: Frequency) -> Self {
        Self {
            range: RangePreset::Custom,
            frequency,
            custom_start: Some(start),
            custom_end: Some(end),
        }
    }
}

impl Default for WindowSelector {
    fn default() -> Self {
        Self::preset(RangePreset::Max, Frequency::Daily)
    }
}
