use chrono::NaiveDateTime;

use crate::core::booking::{Booking, Session};
use crate::core::calendar::{CalendarDate, CalendarDayCell, MONTH_NAMES, WEEKDAY_HEADERS};
use crate::core::dashboard::{session_badge, DashboardStats, Goal, GoalStatus, SessionBadge};
use crate::core::slots::TimeSlot;
use crate::core::summary::{format_long_date, format_price, BookingSummary};
use crate::core::wizard::Confirmation;

pub fn print_month(
    year: i32,
    month: u32,
    cells: &[CalendarDayCell],
    selected: Option<CalendarDate>,
) {
    let name = MONTH_NAMES.get(month as usize).copied().unwrap_or("?");
    println!("\x1b[1m{name} {year}\x1b[0m");
    for header in WEEKDAY_HEADERS {
        print!("{header:>4}");
    }
    println!();

    for (i, cell) in cells.iter().enumerate() {
        match cell {
            CalendarDayCell::Blank => print!("    "),
            CalendarDayCell::Disabled(d) => print!("\x1b[90m{:>4}\x1b[0m", d.day()),
            CalendarDayCell::Today(d) | CalendarDayCell::Selectable(d) if Some(*d) == selected => {
                print!(" \x1b[7m{:>3}\x1b[0m", d.day())
            }
            CalendarDayCell::Today(d) => print!(" \x1b[36;1m{:>3}\x1b[0m", d.day()),
            CalendarDayCell::Selectable(d) => print!("{:>4}", d.day()),
        }
        if i % 7 == 6 {
            println!();
        }
    }
    if cells.len() % 7 != 0 {
        println!();
    }
}

pub fn print_slots(slots: &[TimeSlot], selected: Option<TimeSlot>) {
    for (i, slot) in slots.iter().enumerate() {
        if Some(*slot) == selected {
            println!("  \x1b[33m{:>2})\x1b[0m \x1b[7m{slot}\x1b[0m", i + 1);
        } else {
            println!("  \x1b[33m{:>2})\x1b[0m {slot}", i + 1);
        }
    }
}

pub fn print_summary(summary: &BookingSummary) {
    println!("\x1b[1mSession summary\x1b[0m");
    println!("  Type:     {}", summary.type_label);
    println!("  Date:     {}", summary.date_label);
    println!("  Time:     {}", summary.time_label);
    println!("  Duration: {}", summary.duration_label);
    println!("  Price:    {}", summary.price_label);
}

pub fn print_confirmation(confirmation: &Confirmation, currency_symbol: &str) {
    let booking = &confirmation.booking;
    println!("\n\x1b[32;1mBooking confirmed!\x1b[0m");
    println!("  Type:     {}", booking.session_type.display_label());
    println!("  Date:     {}", format_long_date(booking.date));
    println!("  Time:     {}", booking.time);
    println!("  Duration: {} minutes", booking.session_type.duration_minutes);
    println!(
        "  Price:    {}",
        format_price(booking.session_type.price_cents, currency_symbol)
    );
    println!("  \x1b[90mReference {}\x1b[0m", short_id(&booking.id));
}

pub fn print_bookings(bookings: &[Booking], currency_symbol: &str) {
    if bookings.is_empty() {
        println!("No bookings.");
        return;
    }
    for b in bookings {
        println!(
            "  \x1b[90m{}\x1b[0m  {} {}  {}  {}  ({})",
            short_id(&b.id),
            b.date,
            b.time,
            b.session_type.display_label(),
            b.client_details.full_name(),
            format_price(b.session_type.price_cents, currency_symbol),
        );
    }
}

pub fn print_sessions(sessions: &[&Session], now: NaiveDateTime) {
    if sessions.is_empty() {
        println!("No upcoming sessions");
        return;
    }
    for s in sessions {
        let badge = match session_badge(s, now) {
            SessionBadge::Confirmed => "\x1b[32mConfirmed\x1b[0m",
            SessionBadge::Scheduled => "\x1b[90mScheduled\x1b[0m",
        };
        let day = s
            .date
            .to_naive()
            .map(|d| d.format("%b %-d").to_string())
            .unwrap_or_else(|| s.date.to_string());
        println!(
            "  {:<24} {:<7} {}  {} min  {badge}",
            s.display_title(),
            day,
            s.time,
            s.duration_minutes
        );
    }
}

pub fn print_goals(goals: &[Goal]) {
    if goals.is_empty() {
        println!("No goals yet. Create one with `coach-book goals add <title>`.");
        return;
    }
    for goal in goals {
        let status = match goal.status {
            GoalStatus::Active => "",
            GoalStatus::Completed => " \x1b[32m(completed)\x1b[0m",
        };
        println!(
            "\x1b[1m{}\x1b[0m{status}  \x1b[90m{}\x1b[0m",
            goal.title,
            short_id(&goal.id)
        );
        if !goal.description.is_empty() {
            println!("  {}", goal.description);
        }
        let mut tags = Vec::new();
        if !goal.category.is_empty() {
            tags.push(goal.category.clone());
        }
        if let Some(deadline) = goal.deadline {
            tags.push(format!("Due: {}", deadline.format("%-m/%-d/%Y")));
        }
        if !tags.is_empty() {
            println!("  \x1b[36m{}\x1b[0m", tags.join(" · "));
        }
        for m in &goal.milestones {
            let mark = if m.completed { "x" } else { " " };
            println!("  [{mark}] {}  \x1b[90m#{}\x1b[0m", m.text, m.id);
        }
        println!("  {} {}% Complete", progress_bar(goal.progress), goal.progress);
    }
}

pub fn print_stats(stats: &DashboardStats) {
    println!("  Active goals:      {}", stats.active_goals);
    println!("  Completed goals:   {}", stats.completed_goals);
    println!("  Upcoming sessions: {}", stats.upcoming_sessions);
    println!("  Average progress:  {}%", stats.average_progress);
}

fn progress_bar(progress: u8) -> String {
    let filled = (progress.min(100) as usize) / 5;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(20 - filled))
}

fn short_id(id: &str) -> &str {
    let end = id.char_indices().nth(8).map_or(id.len(), |(i, _)| i);
    &id[..end]
}
