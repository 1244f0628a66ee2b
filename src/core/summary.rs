use serde::Serialize;

use crate::core::booking::BookingDraft;
use crate::core::calendar::CalendarDate;

const PLACEHOLDER: &str = "-";
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// Display strings for the booking summary panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingSummary {
    pub type_label: String,
    pub date_label: String,
    pub time_label: String,
    pub duration_label: String,
    pub price_label: String,
}

pub fn compute_summary(draft: &BookingDraft) -> BookingSummary {
    compute_summary_in(draft, DEFAULT_CURRENCY_SYMBOL)
}

/// Same as [`compute_summary`] with a configurable currency symbol.
pub fn compute_summary_in(draft: &BookingDraft, currency_symbol: &str) -> BookingSummary {
    let session_type = draft.session_type.as_ref();

    BookingSummary {
        type_label: session_type
            .map(|t| t.display_label().to_string())
            .unwrap_or_else(placeholder),
        date_label: draft
            .selected_date
            .map(format_long_date)
            .unwrap_or_else(placeholder),
        time_label: draft
            .selected_time
            .map(|t| t.label())
            .unwrap_or_else(placeholder),
        duration_label: session_type
            .map(|t| format!("{} minutes", t.duration_minutes))
            .unwrap_or_else(placeholder),
        price_label: session_type
            .map(|t| format_price(t.price_cents, currency_symbol))
            .unwrap_or_else(placeholder),
    }
}

/// "Free" for zero, otherwise symbol plus two decimals.
pub fn format_price(price_cents: u64, currency_symbol: &str) -> String {
    if price_cents == 0 {
        "Free".to_string()
    } else {
        format!(
            "{currency_symbol}{}.{:02}",
            price_cents / 100,
            price_cents % 100
        )
    }
}

/// e.g. "Tuesday, October 20, 2026".
pub fn format_long_date(date: CalendarDate) -> String {
    match date.to_naive() {
        Some(d) => d.format("%A, %B %-d, %Y").to_string(),
        None => date.to_string(),
    }
}

fn placeholder() -> String {
    PLACEHOLDER.to_string()
}
