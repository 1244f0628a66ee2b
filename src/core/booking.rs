use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::core::calendar::CalendarDate;
use crate::core::slots::TimeSlot;

/// One bookable kind of session, as offered on the first wizard step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTypeOption {
    pub type_id: String,
    #[serde(default)]
    pub label: String,
    pub price_cents: u64,
    pub duration_minutes: u32,
}

impl SessionTypeOption {
    pub fn new(
        type_id: impl Into<String>,
        label: impl Into<String>,
        price_cents: u64,
        duration_minutes: u32,
    ) -> Self {
        Self {
            type_id: type_id.into(),
            label: label.into(),
            price_cents,
            duration_minutes,
        }
    }

    pub fn is_free(&self) -> bool {
        self.price_cents == 0
    }

    /// Human label, falling back to the id when none is configured.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.type_id
        } else {
            &self.label
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailField {
    FirstName,
    LastName,
    Email,
    Phone,
    Goals,
}

impl DetailField {
    pub const ALL: [DetailField; 5] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Phone,
        Self::Goals,
    ];
}

impl fmt::Display for DetailField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FirstName => "first name",
            Self::LastName => "last name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Goals => "goals",
        };
        f.write_str(name)
    }
}

/// A draft field a transition can be blocked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    SessionType,
    Date,
    Time,
    ClientDetails,
    Detail(DetailField),
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionType => f.write_str("session type"),
            Self::Date => f.write_str("date"),
            Self::Time => f.write_str("time"),
            Self::ClientDetails => f.write_str("client details"),
            Self::Detail(field) => write!(f, "{field}"),
        }
    }
}

/// Free-form contact details. Email format is not checked here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDetails {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub goals: String,
}

impl ClientDetails {
    pub fn field(&self, field: DetailField) -> &str {
        match field {
            DetailField::FirstName => &self.first_name,
            DetailField::LastName => &self.last_name,
            DetailField::Email => &self.email,
            DetailField::Phone => &self.phone,
            DetailField::Goals => &self.goals,
        }
    }

    pub fn field_mut(&mut self, field: DetailField) -> &mut String {
        match field {
            DetailField::FirstName => &mut self.first_name,
            DetailField::LastName => &mut self.last_name,
            DetailField::Email => &mut self.email,
            DetailField::Phone => &mut self.phone,
            DetailField::Goals => &mut self.goals,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// Detail fields that must be non-blank before a booking can be confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequiredFields(BTreeSet<DetailField>);

impl RequiredFields {
    pub fn new(fields: impl IntoIterator<Item = DetailField>) -> Self {
        Self(fields.into_iter().collect())
    }

    pub fn contains(&self, field: DetailField) -> bool {
        self.0.contains(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = DetailField> + '_ {
        self.0.iter().copied()
    }

    /// First required field left blank, in form order.
    pub fn first_missing(&self, details: &ClientDetails) -> Option<DetailField> {
        self.iter().find(|f| details.field(*f).trim().is_empty())
    }
}

impl Default for RequiredFields {
    fn default() -> Self {
        Self::new([
            DetailField::FirstName,
            DetailField::LastName,
            DetailField::Email,
        ])
    }
}

/// Booking fields accumulated step by step. A later field is only ever set
/// once every earlier one is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub session_type: Option<SessionTypeOption>,
    pub selected_date: Option<CalendarDate>,
    pub selected_time: Option<TimeSlot>,
    pub client_details: Option<ClientDetails>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
}

/// A confirmed booking. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub session_type: SessionTypeOption,
    pub date: CalendarDate,
    pub time: TimeSlot,
    pub client_details: ClientDetails,
    pub created_at: DateTime<Utc>,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Upcoming,
}

/// Dashboard view of a confirmed booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    /// Id of the booking this session mirrors. Absent on sessions written
    /// before bookings carried a correlation id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
    pub session_type: String,
    #[serde(default)]
    pub title: String,
    pub date: CalendarDate,
    pub time: TimeSlot,
    pub duration_minutes: u32,
    pub status: SessionStatus,
}

impl Session {
    pub fn from_booking(booking: &Booking) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            booking_id: Some(booking.id.clone()),
            session_type: booking.session_type.type_id.clone(),
            title: booking.session_type.display_label().to_string(),
            date: booking.date,
            time: booking.time,
            duration_minutes: booking.session_type.duration_minutes,
            status: SessionStatus::Upcoming,
        }
    }

    pub fn starts_at(&self) -> Option<NaiveDateTime> {
        self.date
            .to_naive()
            .map(|d| d.and_time(self.time.start_time()))
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.session_type
        } else {
            &self.title
        }
    }
}
