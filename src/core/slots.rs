use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// First bookable hour (inclusive).
pub const OPENING_HOUR: u8 = 9;
/// Closing hour (exclusive); the last slot starts one hour before.
pub const CLOSING_HOUR: u8 = 17;

/// An hour-long slot identified by its start time, shown as `HH:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot {
    hour: u8,
}

impl TimeSlot {
    /// Returns `None` outside the offered range.
    pub fn from_hour(hour: u8) -> Option<Self> {
        (OPENING_HOUR..CLOSING_HOUR)
            .contains(&hour)
            .then_some(Self { hour })
    }

    pub fn start_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour as u32, 0, 0).unwrap_or(NaiveTime::MIN)
    }

    pub fn label(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.hour)
    }
}

impl FromStr for TimeSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (hour, minute) = s.split_once(':').unwrap_or((s, "00"));
        if minute != "00" {
            return Err(format!("slots start on the hour, got '{s}'"));
        }
        let hour: u8 = hour
            .parse()
            .map_err(|_| format!("invalid slot '{s}'"))?;
        TimeSlot::from_hour(hour).ok_or_else(|| format!("no slot at '{s}'"))
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> Self {
        slot.to_string()
    }
}

/// The fixed daily schedule, `09:00` through `16:00`.
///
/// Existing bookings are not consulted, so two clients can book the same slot.
pub fn available_slots() -> Vec<TimeSlot> {
    (OPENING_HOUR..CLOSING_HOUR)
        .map(|hour| TimeSlot { hour })
        .collect()
}
