use anyhow::Result;
use chrono::Utc;
use std::io::{self, Write};

use super::{output, today};
use crate::core::booking::DetailField;
use crate::core::calendar::{CalendarDate, MonthDirection};
use crate::core::config::AppConfig;
use crate::core::error::BookingError;
use crate::core::slots::available_slots;
use crate::core::summary::{compute_summary_in, format_price};
use crate::core::wizard::{WizardSession, WizardStep};
use crate::storage::{last_client_details, Store};

enum Flow {
    Continue,
    Quit,
}

pub fn run(config: &AppConfig, store: &mut dyn Store) -> Result<()> {
    let today = today();
    let mut wizard = WizardSession::new(today, config.required_fields.clone());
    if let Some(details) = last_client_details(store)? {
        wizard = wizard.with_prefill(details);
    }

    println!("\x1b[1mcoach-book\x1b[0m v{}", env!("CARGO_PKG_VERSION"));
    println!("Type \x1b[33mb\x1b[0m to go back, \x1b[33mq\x1b[0m or \x1b[33mCtrl-D\x1b[0m to cancel.\n");

    loop {
        let flow = match wizard.step() {
            WizardStep::SelectingType => choose_session_type(&mut wizard, config)?,
            WizardStep::SelectingDateTime => choose_date_and_time(&mut wizard, today)?,
            WizardStep::EnteringDetails => enter_details(&mut wizard, config, store)?,
            WizardStep::Confirmed => break,
        };
        if let Flow::Quit = flow {
            println!("Booking cancelled.");
            return Ok(());
        }
    }

    if let Some(confirmation) = wizard.confirmation() {
        output::print_confirmation(confirmation, &config.currency_symbol);
    }
    Ok(())
}

fn choose_session_type(wizard: &mut WizardSession, config: &AppConfig) -> Result<Flow> {
    print_step_header(wizard.step(), "choose a session");
    for (i, option) in config.session_types.iter().enumerate() {
        println!(
            "  \x1b[33m{:>2})\x1b[0m {:<24} {:>3} min  {}",
            i + 1,
            option.display_label(),
            option.duration_minutes,
            format_price(option.price_cents, &config.currency_symbol)
        );
    }

    loop {
        let Some(input) = prompt("session")? else {
            return Ok(Flow::Quit);
        };
        match input.as_str() {
            "q" => return Ok(Flow::Quit),
            "b" => {
                eprintln!("Already at the first step.");
                continue;
            }
            _ => {}
        }

        let choice = input
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| config.session_types.get(i));
        match choice {
            Some(option) => {
                wizard.select_session_type(option.clone())?;
                wizard.next_step()?;
                return Ok(Flow::Continue);
            }
            None => eprintln!("Pick a number between 1 and {}.", config.session_types.len()),
        }
    }
}

fn choose_date_and_time(wizard: &mut WizardSession, today: CalendarDate) -> Result<Flow> {
    println!();
    print_step_header(wizard.step(), "choose a date");

    // Date
    loop {
        let (year, month) = wizard.visible_month();
        output::print_month(
            year,
            month,
            &wizard.visible_calendar(today),
            wizard.draft().selected_date,
        );
        let Some(input) = prompt("day (n/p to change month)")? else {
            return Ok(Flow::Quit);
        };
        match input.as_str() {
            "q" => return Ok(Flow::Quit),
            "b" => {
                wizard.previous_step()?;
                return Ok(Flow::Continue);
            }
            "n" => {
                wizard.navigate_month(MonthDirection::Next);
                continue;
            }
            "p" => {
                wizard.navigate_month(MonthDirection::Previous);
                continue;
            }
            _ => {}
        }

        let Some(date) = input
            .parse::<u32>()
            .ok()
            .and_then(|day| CalendarDate::new(year, month, day))
        else {
            eprintln!("Enter a day of the month shown.");
            continue;
        };
        match wizard.select_date(date, today) {
            Ok(()) => break,
            Err(BookingError::DateUnavailable(_)) => eprintln!("That day has already passed."),
            Err(e) => return Err(e.into()),
        }
    }

    // Time
    let slots = available_slots();
    println!("\n\x1b[1mAvailable times\x1b[0m");
    output::print_slots(&slots, wizard.draft().selected_time);
    loop {
        let Some(input) = prompt("time (b to pick another day)")? else {
            return Ok(Flow::Quit);
        };
        match input.as_str() {
            "q" => return Ok(Flow::Quit),
            "b" => return Ok(Flow::Continue),
            _ => {}
        }

        let choice = input
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| slots.get(i).copied())
            .or_else(|| input.parse().ok());
        match choice {
            Some(slot) => {
                wizard.select_time(slot)?;
                wizard.next_step()?;
                return Ok(Flow::Continue);
            }
            None => eprintln!("Pick a slot number or a time like 14:00."),
        }
    }
}

fn enter_details(
    wizard: &mut WizardSession,
    config: &AppConfig,
    store: &mut dyn Store,
) -> Result<Flow> {
    println!();
    output::print_summary(&compute_summary_in(wizard.draft(), &config.currency_symbol));
    println!();
    print_step_header(wizard.step(), "your details");

    let mut details = wizard.details_prefill().cloned().unwrap_or_default();
    for field in DetailField::ALL {
        let required = wizard.required_fields().contains(field);
        let current = details.field(field).to_string();
        let label = match (required, current.is_empty()) {
            (true, true) => format!("{field} *"),
            (true, false) => format!("{field} * [{current}]"),
            (false, true) => field.to_string(),
            (false, false) => format!("{field} [{current}]"),
        };

        let Some(input) = prompt(&label)? else {
            return Ok(Flow::Quit);
        };
        match input.as_str() {
            "q" => return Ok(Flow::Quit),
            "b" => {
                wizard.enter_details(details)?;
                wizard.previous_step()?;
                return Ok(Flow::Continue);
            }
            "" => {}
            value => *details.field_mut(field) = value.to_string(),
        }
    }
    wizard.enter_details(details)?;

    if !wizard.can_advance() {
        if let Some(missing) = wizard
            .draft()
            .client_details
            .as_ref()
            .and_then(|d| wizard.required_fields().first_missing(d))
        {
            eprintln!("\x1b[31m{} is required.\x1b[0m", capitalize(&missing.to_string()));
        }
        return Ok(Flow::Continue);
    }

    loop {
        let Some(input) = prompt("confirm booking? [y/n/b]")? else {
            return Ok(Flow::Quit);
        };
        match input.as_str() {
            "y" | "yes" => break,
            "n" | "no" | "q" => return Ok(Flow::Quit),
            "b" => {
                wizard.previous_step()?;
                return Ok(Flow::Continue);
            }
            _ => eprintln!("Answer y, n or b."),
        }
    }

    match wizard.confirm_and_save(store, Utc::now()) {
        Ok(_) => {}
        Err(BookingError::PersistenceFailure { source, .. }) => {
            eprintln!(
                "\x1b[31;1mWarning:\x1b[0m your booking is confirmed but could not be saved ({source}). Please note the details below."
            );
        }
        Err(e) => return Err(e.into()),
    }
    Ok(Flow::Continue)
}

fn print_step_header(step: WizardStep, title: &str) {
    println!(
        "\x1b[1mStep {} of {}: {title}\x1b[0m",
        step.number(),
        WizardStep::Confirmed.number()
    );
}

/// Reads one trimmed line. `None` on end of input.
fn prompt(label: &str) -> Result<Option<String>> {
    eprint!("\x1b[32;1m{label}>\x1b[0m ");
    io::stderr().flush().ok();

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        println!();
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
