//! Continuous time handle expressed as a Julian date.

use crate::constants::SECONDS_PER_DAY;

use hifitime::Epoch;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One continuous instant, maintained as a Julian date (days since noon
/// 4713 BC Jan 1). The Gregorian view is exact to about one millisecond;
/// the Julian/Gregorian calendar switch is handled implicitly and
/// callers are expected to supply modern dates (1582-10-15 or later).
///
/// Equality is bitwise on the Julian date, not time-tolerant.
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AbsoluteDate {
    jd: f64,
}

impl AbsoluteDate {
    /// Builds a new [AbsoluteDate] from a Gregorian calendar date.
    /// Seconds may be fractional.
    pub fn from_gregorian(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: f64,
    ) -> Self {
        let mut s = Self::default();
        s.set_gregorian(year, month, day, hour, minute, second);
        s
    }

    /// Builds a new [AbsoluteDate] from a Julian date (days).
    pub fn from_julian(jd: f64) -> Self {
        Self { jd }
    }

    /// Builds a new [AbsoluteDate] from a [hifitime::Epoch],
    /// through its UTC Julian-date view.
    pub fn from_epoch(epoch: Epoch) -> Self {
        Self {
            jd: epoch.to_jde_utc_days(),
        }
    }

    /// Converts to a [hifitime::Epoch] through the UTC Julian-date view.
    pub fn to_epoch(&self) -> Epoch {
        Epoch::from_jde_utc(self.jd)
    }

    /// Stores the Julian date corresponding to the provided Gregorian
    /// calendar date, using the Meeus algorithm.
    pub fn set_gregorian(
        &mut self,
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: f64,
    ) {
        let (mut y, mut m) = (year as f64, month as f64);
        if month <= 2 {
            y -= 1.0;
            m += 12.0;
        }

        let a = (y / 100.0).floor();
        let b = 2.0 - a + (a / 4.0).floor();

        let jd0 = (365.25 * (y + 4716.0)).floor() + (30.6001 * (m + 1.0)).floor() + day as f64 + b
            - 1524.5;

        let day_fraction = (hour as f64 + minute as f64 / 60.0 + second / 3600.0) / 24.0;

        self.jd = jd0 + day_fraction;
    }

    /// Overwrites the stored Julian date (days).
    pub fn set_julian(&mut self, jd: f64) {
        self.jd = jd;
    }

    /// Returns the stored Julian date (days).
    pub fn julian_date(&self) -> f64 {
        self.jd
    }

    /// Returns the Gregorian calendar view
    /// (year, month, day, hour, minute, second), exact to about 1 ms.
    pub fn gregorian(&self) -> (i32, u32, u32, u32, u32, f64) {
        let shifted = self.jd + 0.5;
        let z = shifted.floor();
        let f = shifted - z;

        let a = if z >= 2299161.0 {
            let alpha = ((z - 1867216.25) / 36524.25).floor();
            z + 1.0 + alpha - (alpha / 4.0).floor()
        } else {
            z
        };

        let b = a + 1524.0;
        let c = ((b - 122.1) / 365.25).floor();
        let d = (365.25 * c).floor();
        let e = ((b - d) / 30.6001).floor();

        let day = b - d - (30.6001 * e).floor();
        let month = if e < 14.0 { e - 1.0 } else { e - 13.0 };
        let year = if month > 2.0 { c - 4716.0 } else { c - 4715.0 };

        let mut seconds_of_day = f * SECONDS_PER_DAY;
        // absorb representation noise right below a day boundary
        if seconds_of_day >= SECONDS_PER_DAY {
            seconds_of_day = SECONDS_PER_DAY - 1.0e-9;
        }

        let hour = (seconds_of_day / 3600.0).floor();
        let minute = ((seconds_of_day - hour * 3600.0) / 60.0).floor();
        let second = seconds_of_day - hour * 3600.0 - minute * 60.0;

        (
            year as i32,
            month as u32,
            day as u32,
            hour as u32,
            minute as u32,
            second,
        )
    }

    /// Advances this date by the given number of seconds
    /// (negative to move backwards in time).
    pub fn advance(&mut self, step_s: f64) {
        self.jd += step_s / SECONDS_PER_DAY;
    }
}

impl std::fmt::Display for AbsoluteDate {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "JD {:.9}", self.jd)
    }
}
