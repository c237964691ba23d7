//! Approximate dates for snapshot ordering
//!
//! A [`DumpDate`] describes a snapshot by four loose integer fields: years,
//! months, days and hours. The hours field of a date read from a dump or a
//! wall clock is packed as `hour * 100 + minute`, which keeps the numeric order
//! of the zero-padded `hhmm` directory names.
//!
//! Fields are never normalized against the calendar. Adding days can overflow a
//! month and subtracting can go negative; ordering is done through
//! [`DumpDate::approx_key`], a monotonic approximation rather than a duration.
//!
//! ## Examples
//!
//! ```rust
//! use dumpnav::DumpDate;
//!
//! let snapshot = DumpDate::new(2017, 4, 15, 36);
//! let later = snapshot + DumpDate::new(0, 0, 1, 0);
//!
//! assert!(later.is_after(&snapshot));
//! assert!(snapshot.same_year(&later));
//! assert!(!snapshot.same_day(&later));
//! ```

use crate::error::{NavError, Result};
use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use std::fmt;
use std::ops::Add;

/// Upper bounds used to complete a partially known date
const MAX_MONTHS: i64 = 12;
const MAX_DAYS: i64 = 31;
const MAX_HOURS: i64 = 2359;

/// A date as encoded in the dump hierarchy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DumpDate {
    years: i64,
    months: i64,
    days: i64,
    hours: i64,
}

impl DumpDate {
    /// The all-zero date, used as the "no lower bound" value
    pub const ZERO: DumpDate = DumpDate {
        years: 0,
        months: 0,
        days: 0,
        hours: 0,
    };

    /// Create a date from its four fields
    pub fn new(years: i64, months: i64, days: i64, hours: i64) -> Self {
        Self {
            years,
            months,
            days,
            hours,
        }
    }

    /// Years field
    pub fn years(&self) -> i64 {
        self.years
    }

    /// Months field
    pub fn months(&self) -> i64 {
        self.months
    }

    /// Days field
    pub fn days(&self) -> i64 {
        self.days
    }

    /// Hours field (packed `hhmm` for dates coming from a dump or a clock)
    pub fn hours(&self) -> i64 {
        self.hours
    }

    /// Monotonic ordering key
    ///
    /// `((years * 12 + months) * 31 + days) * 24 + hours`. This only serves for
    /// comparisons; it does not measure real elapsed hours. Computed in
    /// `i128` so any field values, including those parsed from stray
    /// directory names, order without overflow.
    pub fn approx_key(&self) -> i128 {
        let months = i128::from(self.years) * 12 + i128::from(self.months);
        let days = months * 31 + i128::from(self.days);
        days * 24 + i128::from(self.hours)
    }

    /// Strictly later than `other`
    pub fn is_after(&self, other: &DumpDate) -> bool {
        self.approx_key() > other.approx_key()
    }

    /// Strictly earlier than `other`
    pub fn is_before(&self, other: &DumpDate) -> bool {
        self.approx_key() < other.approx_key()
    }

    /// Earlier than `bound` whatever the still unknown fields turn out to be
    ///
    /// A zero field of `self` is read as "not decoded yet" rather than as a
    /// literal zero. Such fields are completed with their largest plausible
    /// value before comparing, so the answer is `true` only when every date
    /// below this tree position is before `bound`. With no zero fields this is
    /// exactly [`DumpDate::is_before`].
    pub fn is_before_sparse(&self, bound: &DumpDate) -> bool {
        let complete = |value: i64, max: i64| if value == 0 { max } else { value };
        if self.years == 0 {
            return false;
        }
        let latest = DumpDate {
            years: self.years,
            months: complete(self.months, MAX_MONTHS),
            days: complete(self.days, MAX_DAYS),
            hours: complete(self.hours, MAX_HOURS),
        };
        latest.is_before(bound)
    }

    /// Same years field
    pub fn same_year(&self, other: &DumpDate) -> bool {
        self.years == other.years
    }

    /// Same months field
    pub fn same_month(&self, other: &DumpDate) -> bool {
        self.months == other.months
    }

    /// Same days field
    pub fn same_day(&self, other: &DumpDate) -> bool {
        self.days == other.days
    }

    /// Same hours field
    pub fn same_hour(&self, other: &DumpDate) -> bool {
        self.hours == other.hours
    }

    /// Convert a wall-clock time, packing the hour as `hour * 100 + minute`
    pub fn from_datetime<T: Datelike + Timelike>(t: &T) -> Self {
        Self {
            years: i64::from(t.year()),
            months: i64::from(t.month()),
            days: i64::from(t.day()),
            hours: i64::from(t.hour() * 100 + t.minute()),
        }
    }

    /// Shift a wall-clock time by `delta` and convert the result
    ///
    /// Unlike [`Add`], this goes through the calendar: years and months move
    /// whole months (clamping the day to the end of a shorter month), days move
    /// whole days and the hours field of `delta` counts plain hours.
    pub fn offset_datetime(t: NaiveDateTime, delta: &DumpDate) -> Result<Self> {
        let out_of_range = || NavError::DateOutOfRange(format!("{} shifted by {}", t, delta));

        let months = delta
            .years
            .checked_mul(12)
            .and_then(|m| m.checked_add(delta.months))
            .ok_or_else(out_of_range)?;
        let magnitude = Months::new(u32::try_from(months.unsigned_abs()).map_err(|_| out_of_range())?);
        let shifted = if months >= 0 {
            t.checked_add_months(magnitude)
        } else {
            t.checked_sub_months(magnitude)
        };

        let shifted = shifted
            .and_then(|t| t.checked_add_signed(TimeDelta::try_days(delta.days)?))
            .and_then(|t| t.checked_add_signed(TimeDelta::try_hours(delta.hours)?))
            .ok_or_else(out_of_range)?;

        Ok(Self::from_datetime(&shifted))
    }

    /// Field-wise sum, or `None` if a field overflows
    pub fn checked_add(&self, rhs: &DumpDate) -> Option<DumpDate> {
        Some(DumpDate {
            years: self.years.checked_add(rhs.years)?,
            months: self.months.checked_add(rhs.months)?,
            days: self.days.checked_add(rhs.days)?,
            hours: self.hours.checked_add(rhs.hours)?,
        })
    }

    /// Wall-clock time for this date, if it names a real calendar minute
    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        let year = i32::try_from(self.years).ok()?;
        let month = u32::try_from(self.months).ok()?;
        let day = u32::try_from(self.days).ok()?;
        let hours = u32::try_from(self.hours).ok()?;
        NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hours / 100, hours % 100, 0)
    }
}

/// Field-wise sum without renormalization
impl Add for DumpDate {
    type Output = DumpDate;

    fn add(self, rhs: DumpDate) -> DumpDate {
        DumpDate {
            years: self.years + rhs.years,
            months: self.months + rhs.months,
            days: self.days + rhs.days,
            hours: self.hours + rhs.hours,
        }
    }
}

impl fmt::Display for DumpDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "y:{} m:{} d:{} h:{}",
            self.years, self.months, self.days, self.hours
        )
    }
}
