use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

use crate::core::booking::{
    Booking, BookingDraft, BookingStatus, ClientDetails, DraftField, RequiredFields, Session,
    SessionTypeOption,
};
use crate::core::calendar::{
    advance_month, is_selectable, renderable_month, CalendarDate, CalendarDayCell, MonthDirection,
};
use crate::core::error::BookingError;
use crate::core::slots::{available_slots, TimeSlot};
use crate::core::summary::{compute_summary, BookingSummary};
use crate::storage::{append_record, Collection, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    SelectingType,
    SelectingDateTime,
    EnteringDetails,
    Confirmed,
}

impl WizardStep {
    /// One-based position shown in the step indicator.
    pub fn number(self) -> u8 {
        match self {
            Self::SelectingType => 1,
            Self::SelectingDateTime => 2,
            Self::EnteringDetails => 3,
            Self::Confirmed => 4,
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SelectingType => "selecting a session type",
            Self::SelectingDateTime => "selecting a date and time",
            Self::EnteringDetails => "entering client details",
            Self::Confirmed => "confirmed",
        };
        f.write_str(name)
    }
}

/// The pair emitted by a successful confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    pub booking: Booking,
    pub session: Session,
}

/// First draft field blocking `step` from advancing, if any.
pub fn first_missing(
    step: WizardStep,
    draft: &BookingDraft,
    required: &RequiredFields,
) -> Option<DraftField> {
    match step {
        WizardStep::SelectingType => draft.session_type.is_none().then_some(DraftField::SessionType),
        WizardStep::SelectingDateTime => {
            if draft.selected_date.is_none() {
                Some(DraftField::Date)
            } else if draft.selected_time.is_none() {
                Some(DraftField::Time)
            } else {
                None
            }
        }
        WizardStep::EnteringDetails => match &draft.client_details {
            None => Some(DraftField::ClientDetails),
            Some(details) => required.first_missing(details).map(DraftField::Detail),
        },
        WizardStep::Confirmed => None,
    }
}

/// Whether the "next" affordance should be enabled for `step`.
pub fn can_advance(step: WizardStep, draft: &BookingDraft, required: &RequiredFields) -> bool {
    step != WizardStep::Confirmed && first_missing(step, draft, required).is_none()
}

/// One run of the booking wizard. Owned by whoever drives the UI; nothing
/// here is shared between instances.
#[derive(Debug, Clone)]
pub struct WizardSession {
    step: WizardStep,
    draft: BookingDraft,
    required_fields: RequiredFields,
    prefill: Option<ClientDetails>,
    visible_year: i32,
    visible_month: u32,
    confirmation: Option<Confirmation>,
}

impl WizardSession {
    pub fn new(today: CalendarDate, required_fields: RequiredFields) -> Self {
        Self {
            step: WizardStep::SelectingType,
            draft: BookingDraft::default(),
            required_fields,
            prefill: None,
            visible_year: today.year(),
            visible_month: today.month(),
            confirmation: None,
        }
    }

    /// Details offered as defaults on the contact step, e.g. from a previous
    /// booking.
    pub fn with_prefill(mut self, details: ClientDetails) -> Self {
        self.prefill = Some(details);
        self
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn required_fields(&self) -> &RequiredFields {
        &self.required_fields
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    pub fn can_advance(&self) -> bool {
        can_advance(self.step, &self.draft, &self.required_fields)
    }

    pub fn summary(&self) -> BookingSummary {
        compute_summary(&self.draft)
    }

    /// Details to show in the contact form: what was entered, else the prefill.
    pub fn details_prefill(&self) -> Option<&ClientDetails> {
        self.draft
            .client_details
            .as_ref()
            .or(self.prefill.as_ref())
    }

    pub fn select_session_type(&mut self, option: SessionTypeOption) -> Result<(), BookingError> {
        self.require_step(WizardStep::SelectingType, "select a session type")?;
        debug!(type_id = %option.type_id, "session type selected");
        self.draft.session_type = Some(option);
        Ok(())
    }

    pub fn visible_month(&self) -> (i32, u32) {
        (self.visible_year, self.visible_month)
    }

    pub fn navigate_month(&mut self, direction: MonthDirection) -> (i32, u32) {
        let (year, month) = advance_month(self.visible_year, self.visible_month, direction);
        self.visible_year = year;
        self.visible_month = month;
        (year, month)
    }

    pub fn visible_calendar(&self, today: CalendarDate) -> Vec<CalendarDayCell> {
        renderable_month(self.visible_year, self.visible_month, today)
    }

    /// Picks a day. Picking a different day drops the chosen time.
    pub fn select_date(&mut self, date: CalendarDate, today: CalendarDate) -> Result<(), BookingError> {
        self.require_step(WizardStep::SelectingDateTime, "select a date")?;
        if !is_selectable(date, today) {
            return Err(BookingError::DateUnavailable(date));
        }
        if self.draft.selected_date != Some(date) {
            self.draft.selected_time = None;
        }
        debug!(%date, "date selected");
        self.draft.selected_date = Some(date);
        Ok(())
    }

    pub fn select_time(&mut self, slot: TimeSlot) -> Result<(), BookingError> {
        self.require_step(WizardStep::SelectingDateTime, "select a time")?;
        if self.draft.selected_date.is_none() {
            return Err(BookingError::MissingSelection(DraftField::Date));
        }
        if !available_slots().contains(&slot) {
            return Err(BookingError::SlotUnavailable(slot.label()));
        }
        debug!(%slot, "time selected");
        self.draft.selected_time = Some(slot);
        Ok(())
    }

    pub fn enter_details(&mut self, details: ClientDetails) -> Result<(), BookingError> {
        self.require_step(WizardStep::EnteringDetails, "enter client details")?;
        debug!("client details entered");
        self.draft.client_details = Some(details);
        Ok(())
    }

    pub fn next_step(&mut self) -> Result<WizardStep, BookingError> {
        let next = match self.step {
            WizardStep::SelectingType => WizardStep::SelectingDateTime,
            WizardStep::SelectingDateTime => WizardStep::EnteringDetails,
            WizardStep::EnteringDetails | WizardStep::Confirmed => {
                return Err(self.invalid("advance (use confirm to finish)"));
            }
        };
        self.ensure_complete()?;
        debug!(from = %self.step, to = %next, "wizard advanced");
        self.step = next;
        Ok(next)
    }

    /// Steps back one level. Nothing entered so far is cleared.
    pub fn previous_step(&mut self) -> Result<WizardStep, BookingError> {
        let previous = match self.step {
            WizardStep::SelectingDateTime => WizardStep::SelectingType,
            WizardStep::EnteringDetails => WizardStep::SelectingDateTime,
            WizardStep::SelectingType | WizardStep::Confirmed => {
                return Err(self.invalid("go back"));
            }
        };
        debug!(from = %self.step, to = %previous, "wizard stepped back");
        self.step = previous;
        Ok(previous)
    }

    /// Finalizes the draft into a booking and its dashboard session. Only
    /// allowed once per wizard.
    pub fn confirm(&mut self, now: DateTime<Utc>) -> Result<Confirmation, BookingError> {
        self.require_step(WizardStep::EnteringDetails, "confirm")?;
        self.ensure_complete()?;

        let (Some(session_type), Some(date), Some(time), Some(client_details)) = (
            self.draft.session_type.clone(),
            self.draft.selected_date,
            self.draft.selected_time,
            self.draft.client_details.clone(),
        ) else {
            // Earlier steps could only be passed with these set.
            return Err(BookingError::MissingSelection(DraftField::SessionType));
        };

        let booking = Booking {
            id: uuid::Uuid::new_v4().to_string(),
            session_type,
            date,
            time,
            client_details,
            created_at: now,
            status: BookingStatus::Confirmed,
        };
        let session = Session::from_booking(&booking);
        let confirmation = Confirmation { booking, session };

        info!(
            booking_id = %confirmation.booking.id,
            date = %confirmation.booking.date,
            time = %confirmation.booking.time,
            "booking confirmed"
        );
        self.step = WizardStep::Confirmed;
        self.confirmation = Some(confirmation.clone());
        Ok(confirmation)
    }

    /// [`confirm`](Self::confirm), then writes the booking and session to
    /// `store`. A failed write leaves the wizard confirmed; the pair stays
    /// available through [`confirmation`](Self::confirmation).
    pub fn confirm_and_save(
        &mut self,
        store: &mut dyn Store,
        now: DateTime<Utc>,
    ) -> Result<Confirmation, BookingError> {
        let confirmation = self.confirm(now)?;
        save_confirmation(store, &confirmation)?;
        Ok(confirmation)
    }

    fn ensure_complete(&self) -> Result<(), BookingError> {
        match first_missing(self.step, &self.draft, &self.required_fields) {
            Some(field) => Err(BookingError::MissingSelection(field)),
            None => Ok(()),
        }
    }

    fn require_step(&self, expected: WizardStep, action: &'static str) -> Result<(), BookingError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &'static str) -> BookingError {
        BookingError::InvalidStateTransition {
            step: self.step,
            action,
        }
    }
}

/// Appends a confirmed booking and its session to their collections.
pub fn save_confirmation(
    store: &mut dyn Store,
    confirmation: &Confirmation,
) -> Result<(), BookingError> {
    let booking_id = confirmation.booking.id.clone();
    let result = append_record(store, Collection::Bookings, &confirmation.booking)
        .and_then(|_| append_record(store, Collection::Sessions, &confirmation.session));

    result.map_err(|source| {
        warn!(%booking_id, error = %source, "confirmed booking was not persisted");
        BookingError::PersistenceFailure { booking_id, source }
    })
}
