use anyhow::{bail, Result};
use chrono::Utc;

use super::{now_local, output, GoalCommand, OutputFormat};
use crate::core::booking::Booking;
use crate::core::config::AppConfig;
use crate::core::dashboard::{Dashboard, NewGoal};
use crate::storage::{read_records, Collection, Store};

pub fn list_bookings(config: &AppConfig, store: &dyn Store, format: OutputFormat) -> Result<()> {
    let mut bookings: Vec<Booking> = read_records(store, Collection::Bookings)?;
    bookings.sort_by_key(|b| (b.date, b.time));

    match format {
        OutputFormat::Text => output::print_bookings(&bookings, &config.currency_symbol),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&bookings)?),
    }
    Ok(())
}

pub fn list_sessions(store: &mut dyn Store, limit: usize) -> Result<()> {
    let dashboard = load_synced(store)?;
    let now = now_local();
    output::print_sessions(&dashboard.upcoming_sessions(now, limit), now);
    Ok(())
}

pub fn show_stats(store: &mut dyn Store) -> Result<()> {
    let dashboard = load_synced(store)?;
    output::print_stats(&dashboard.stats(now_local()));
    Ok(())
}

pub fn sync(store: &mut dyn Store) -> Result<()> {
    let mut dashboard = Dashboard::load(store)?;
    let added = sync_bookings(&mut dashboard, store)?;
    println!("{added} session(s) added from bookings.");
    Ok(())
}

pub fn goals(store: &mut dyn Store, command: GoalCommand) -> Result<()> {
    let mut dashboard = Dashboard::load(store)?;

    match command {
        GoalCommand::List => output::print_goals(&dashboard.goals),
        GoalCommand::Add {
            title,
            description,
            category,
            deadline,
            milestones,
        } => {
            if title.trim().is_empty() {
                bail!("goal title cannot be empty");
            }
            let goal = dashboard.create_goal(
                NewGoal {
                    title,
                    description,
                    category,
                    deadline,
                    milestones,
                },
                Utc::now(),
            );
            println!("Created goal {} ({})", goal.title, goal.id);
            dashboard.save_goals(store)?;
        }
        GoalCommand::Toggle {
            goal_id,
            milestone_id,
        } => {
            let goal_id = resolve_goal_id(&dashboard, &goal_id)?;
            let progress = dashboard.toggle_milestone(&goal_id, milestone_id)?;
            dashboard.save_goals(store)?;
            println!("Progress: {progress}%");
        }
        GoalCommand::Delete { goal_id } => {
            let goal_id = resolve_goal_id(&dashboard, &goal_id)?;
            let removed = dashboard.delete_goal(&goal_id)?;
            dashboard.save_goals(store)?;
            println!("Deleted goal {}", removed.title);
        }
    }
    Ok(())
}

/// Loads the dashboard and picks up any bookings it has not seen yet.
fn load_synced(store: &mut dyn Store) -> Result<Dashboard> {
    let mut dashboard = Dashboard::load(store)?;
    sync_bookings(&mut dashboard, store)?;
    Ok(dashboard)
}

fn sync_bookings(dashboard: &mut Dashboard, store: &mut dyn Store) -> Result<usize> {
    let bookings: Vec<Booking> = read_records(store, Collection::Bookings)?;
    let added = dashboard.sync_from_bookings(&bookings);
    if added > 0 {
        dashboard.save_sessions(store)?;
    }
    Ok(added)
}

/// Accepts a full id or an unambiguous prefix, as printed by `goals list`.
fn resolve_goal_id(dashboard: &Dashboard, input: &str) -> Result<String> {
    let matches: Vec<&str> = dashboard
        .goals
        .iter()
        .map(|g| g.id.as_str())
        .filter(|id| id.starts_with(input))
        .collect();

    match matches.as_slice() {
        [id] => Ok(id.to_string()),
        [] => bail!("no goal matches '{input}'"),
        _ if matches.contains(&input) => Ok(input.to_string()),
        _ => bail!("'{input}' matches {} goals; use a longer id", matches.len()),
    }
}
