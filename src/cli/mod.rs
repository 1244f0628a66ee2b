mod book;
mod dashboard;
mod output;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::core::calendar::{renderable_month, CalendarDate};
use crate::core::config::{load_config, AppConfig};
use crate::core::dashboard::UPCOMING_SESSIONS_SHOWN;
use crate::core::slots::available_slots;
use crate::storage::JsonStore;

#[derive(Parser, Debug)]
#[command(name = "coach-book", version, about = "Book coaching sessions and track goals")]
struct Cli {
    /// Working directory (config and data are resolved from here)
    #[arg(short = 'c', long = "cwd")]
    working_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a month with bookable days
    Calendar {
        #[arg(long)]
        year: Option<i32>,
        /// Month number, 1-12
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },
    /// List the daily time slots
    Slots,
    /// Book a session interactively
    Book,
    /// List confirmed bookings
    Bookings {
        #[arg(short = 'f', long, default_value = "text")]
        format: OutputFormat,
    },
    /// List upcoming sessions
    Sessions {
        #[arg(short = 'n', long, default_value_t = UPCOMING_SESSIONS_SHOWN)]
        limit: usize,
    },
    /// Show dashboard statistics
    Stats,
    /// Mirror bookings into the session list
    Sync,
    /// Manage goals
    #[command(subcommand)]
    Goals(GoalCommand),
}

#[derive(Subcommand, Debug)]
enum GoalCommand {
    /// List goals with their milestones
    List,
    /// Create a goal
    Add {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        category: String,
        /// Deadline as YYYY-MM-DD
        #[arg(long)]
        deadline: Option<NaiveDate>,
        /// Milestone text (repeatable)
        #[arg(short = 'm', long = "milestone")]
        milestones: Vec<String>,
    },
    /// Toggle a milestone's completion
    Toggle { goal_id: String, milestone_id: u32 },
    /// Delete a goal
    Delete { goal_id: String },
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.working_dir.clone()).context("failed to load configuration")?;

    let filter = if cli.debug || config.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Calendar { year, month } => {
            let today = today();
            let year = year.unwrap_or(today.year());
            let month = month.map(|m| m - 1).unwrap_or(today.month());
            output::print_month(year, month, &renderable_month(year, month, today), None);
            Ok(())
        }
        Command::Slots => {
            output::print_slots(&available_slots(), None);
            Ok(())
        }
        Command::Book => {
            let mut store = open_store(&config)?;
            book::run(&config, &mut store)
        }
        Command::Bookings { format } => {
            let store = open_store(&config)?;
            dashboard::list_bookings(&config, &store, format)
        }
        Command::Sessions { limit } => {
            let mut store = open_store(&config)?;
            dashboard::list_sessions(&mut store, limit)
        }
        Command::Stats => {
            let mut store = open_store(&config)?;
            dashboard::show_stats(&mut store)
        }
        Command::Sync => {
            let mut store = open_store(&config)?;
            dashboard::sync(&mut store)
        }
        Command::Goals(command) => {
            let mut store = open_store(&config)?;
            dashboard::goals(&mut store, command)
        }
    }
}

fn open_store(config: &AppConfig) -> Result<JsonStore> {
    JsonStore::open(config)
        .with_context(|| format!("failed to open data directory {}", config.data_path().display()))
}

fn today() -> CalendarDate {
    CalendarDate::from_naive(Local::now().date_naive())
}

fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}
