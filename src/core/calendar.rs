use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const WEEKDAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// A calendar day. `month` is zero-based (0 = January, 11 = December).
///
/// Always a real Gregorian date: the only ways in are [`CalendarDate::new`],
/// [`CalendarDate::from_naive`] and parsing. Field order makes the derived
/// ordering match calendar order. Serialized as an ISO `YYYY-MM-DD` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDate {
    year: i32,
    month: u32,
    day: u32,
}

impl CalendarDate {
    /// Returns `None` when the triple is not a real Gregorian date.
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        if month > 11 || day == 0 || day > days_in_month(year, month) {
            return None;
        }
        Some(Self { year, month, day })
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month0(),
            day: date.day(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    /// Zero-based month.
    pub fn month(self) -> u32 {
        self.month
    }

    pub fn day(self) -> u32 {
        self.day
    }

    pub fn to_naive(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month + 1, self.day)
    }

    /// Weekday index with 0 = Sunday.
    pub fn weekday(self) -> u32 {
        weekday_index(self.year, self.month, self.day)
    }

    pub fn month_name(self) -> &'static str {
        MONTH_NAMES[self.month as usize]
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month + 1, self.day)
    }
}

impl FromStr for CalendarDate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().splitn(3, '-');
        let (Some(y), Some(m), Some(d)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(format!("expected YYYY-MM-DD, got '{s}'"));
        };
        let year: i32 = y.parse().map_err(|_| format!("invalid year in '{s}'"))?;
        let month: u32 = m.parse().map_err(|_| format!("invalid month in '{s}'"))?;
        let day: u32 = d.parse().map_err(|_| format!("invalid day in '{s}'"))?;
        if month == 0 {
            return Err(format!("invalid month in '{s}'"));
        }
        CalendarDate::new(year, month - 1, day).ok_or_else(|| format!("no such date: '{s}'"))
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CalendarDate> for String {
    fn from(date: CalendarDate) -> Self {
        date.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarDayCell {
    /// Padding before the first day of the month.
    Blank,
    Disabled(CalendarDate),
    /// Today's date. Still selectable; this only changes how it is shown.
    Today(CalendarDate),
    Selectable(CalendarDate),
}

impl CalendarDayCell {
    pub fn date(&self) -> Option<CalendarDate> {
        match self {
            Self::Blank => None,
            Self::Disabled(d) | Self::Today(d) | Self::Selectable(d) => Some(*d),
        }
    }

    pub fn is_selectable(&self) -> bool {
        matches!(self, Self::Today(_) | Self::Selectable(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthDirection {
    Previous,
    Next,
}

impl MonthDirection {
    pub fn delta(self) -> i32 {
        match self {
            Self::Previous => -1,
            Self::Next => 1,
        }
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in a zero-based month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        0 | 2 | 4 | 6 | 7 | 9 | 11 => 31,
        3 | 5 | 8 | 10 => 30,
        1 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Sakamoto's method, valid for any proleptic Gregorian year.
fn weekday_index(year: i32, month: u32, day: u32) -> u32 {
    const OFFSETS: [i64; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
    let y = if month < 2 {
        year as i64 - 1
    } else {
        year as i64
    };
    let raw = y + y.div_euclid(4) - y.div_euclid(100)
        + y.div_euclid(400)
        + OFFSETS[month as usize % 12]
        + day as i64;
    raw.rem_euclid(7) as u32
}

/// A date is bookable when it is today or later.
pub fn is_selectable(date: CalendarDate, today: CalendarDate) -> bool {
    date >= today
}

/// Lays out one month for display: leading blanks up to the weekday of the
/// 1st, then one cell per day classified against `today`.
pub fn renderable_month(year: i32, month: u32, today: CalendarDate) -> Vec<CalendarDayCell> {
    let days = days_in_month(year, month);
    if days == 0 {
        return Vec::new();
    }

    let leading = weekday_index(year, month, 1) as usize;
    let mut cells = Vec::with_capacity(leading + days as usize);
    cells.extend(std::iter::repeat(CalendarDayCell::Blank).take(leading));

    for day in 1..=days {
        let date = CalendarDate { year, month, day };
        let cell = if date < today {
            CalendarDayCell::Disabled(date)
        } else if date == today {
            CalendarDayCell::Today(date)
        } else {
            CalendarDayCell::Selectable(date)
        };
        cells.push(cell);
    }

    cells
}

/// Steps one month forward or back, wrapping the year. Stays put at the ends
/// of the `i32` year range.
pub fn advance_month(year: i32, month: u32, direction: MonthDirection) -> (i32, u32) {
    let index = year as i64 * 12 + month as i64 + direction.delta() as i64;
    match i32::try_from(index.div_euclid(12)) {
        Ok(next_year) => (next_year, index.rem_euclid(12) as u32),
        Err(_) => (year, month),
    }
}
