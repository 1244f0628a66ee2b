//! Goal tracking and the upcoming-sessions view of the dashboard.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::booking::{Booking, Session};
use crate::core::error::DashboardError;
use crate::storage::{read_records, replace_records, Collection, Store};

/// Number of sessions the dashboard lists by default.
pub const UPCOMING_SESSIONS_SHOWN: usize = 5;

/// Sessions starting within this window are shown as confirmed.
const CONFIRMED_WINDOW_HOURS: i64 = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: u32,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    /// Percent complete, 0..=100.
    #[serde(default)]
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub status: GoalStatus,
}

impl Goal {
    pub fn completed_milestones(&self) -> usize {
        self.milestones.iter().filter(|m| m.completed).count()
    }

    /// Recomputes progress from milestones. Goals without milestones keep
    /// whatever progress they already had.
    fn refresh_progress(&mut self) {
        let total = self.milestones.len();
        if total > 0 {
            let ratio = self.completed_milestones() as f64 / total as f64;
            self.progress = (ratio * 100.0).round() as u8;
        }
    }
}

/// Input for [`Dashboard::create_goal`].
#[derive(Debug, Clone, Default)]
pub struct NewGoal {
    pub title: String,
    pub description: String,
    pub category: String,
    pub deadline: Option<NaiveDate>,
    pub milestones: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionBadge {
    Confirmed,
    Scheduled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub active_goals: usize,
    pub completed_goals: usize,
    pub upcoming_sessions: usize,
    pub average_progress: u8,
}

#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    pub goals: Vec<Goal>,
    pub sessions: Vec<Session>,
}

impl Dashboard {
    pub fn new(goals: Vec<Goal>, mut sessions: Vec<Session>) -> Self {
        sort_sessions(&mut sessions);
        Self { goals, sessions }
    }

    pub fn load(store: &dyn Store) -> Result<Self, DashboardError> {
        let goals = read_records(store, Collection::Goals)?;
        let sessions = read_records(store, Collection::Sessions)?;
        Ok(Self::new(goals, sessions))
    }

    pub fn save(&self, store: &mut dyn Store) -> Result<(), DashboardError> {
        self.save_goals(store)?;
        self.save_sessions(store)
    }

    pub fn save_goals(&self, store: &mut dyn Store) -> Result<(), DashboardError> {
        replace_records(store, Collection::Goals, &self.goals)?;
        Ok(())
    }

    pub fn save_sessions(&self, store: &mut dyn Store) -> Result<(), DashboardError> {
        replace_records(store, Collection::Sessions, &self.sessions)?;
        Ok(())
    }

    pub fn goal(&self, goal_id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == goal_id)
    }

    pub fn create_goal(&mut self, new: NewGoal, now: DateTime<Utc>) -> &Goal {
        let milestones = new
            .milestones
            .into_iter()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .enumerate()
            .map(|(i, text)| Milestone {
                id: i as u32,
                text,
                completed: false,
            })
            .collect();

        let goal = Goal {
            id: uuid::Uuid::new_v4().to_string(),
            title: new.title,
            description: new.description,
            category: new.category,
            deadline: new.deadline,
            milestones,
            progress: 0,
            created_at: Some(now),
            status: GoalStatus::Active,
        };
        debug!(goal_id = %goal.id, title = %goal.title, "goal created");

        let index = self.goals.len();
        self.goals.push(goal);
        &self.goals[index]
    }

    /// Flips a milestone and returns the goal's new progress.
    pub fn toggle_milestone(&mut self, goal_id: &str, milestone_id: u32) -> Result<u8, DashboardError> {
        let goal = self
            .goals
            .iter_mut()
            .find(|g| g.id == goal_id)
            .ok_or_else(|| DashboardError::GoalNotFound(goal_id.to_string()))?;

        let milestone = goal
            .milestones
            .iter_mut()
            .find(|m| m.id == milestone_id)
            .ok_or_else(|| DashboardError::MilestoneNotFound {
                goal_id: goal_id.to_string(),
                milestone_id,
            })?;
        milestone.completed = !milestone.completed;

        goal.refresh_progress();
        debug!(goal_id, milestone_id, progress = goal.progress, "milestone toggled");
        Ok(goal.progress)
    }

    pub fn delete_goal(&mut self, goal_id: &str) -> Result<Goal, DashboardError> {
        let index = self
            .goals
            .iter()
            .position(|g| g.id == goal_id)
            .ok_or_else(|| DashboardError::GoalNotFound(goal_id.to_string()))?;
        Ok(self.goals.remove(index))
    }

    /// Sessions starting at or after `now`, soonest first.
    pub fn upcoming_sessions(&self, now: NaiveDateTime, limit: usize) -> Vec<&Session> {
        let mut upcoming: Vec<&Session> = self
            .sessions
            .iter()
            .filter(|s| is_upcoming(s, now))
            .collect();
        upcoming.sort_by_key(|s| (s.date, s.time));
        upcoming.truncate(limit);
        upcoming
    }

    pub fn stats(&self, now: NaiveDateTime) -> DashboardStats {
        let active_goals = self
            .goals
            .iter()
            .filter(|g| g.status == GoalStatus::Active)
            .count();
        let completed_goals = self
            .goals
            .iter()
            .filter(|g| g.status == GoalStatus::Completed)
            .count();
        let upcoming_sessions = self.sessions.iter().filter(|s| is_upcoming(s, now)).count();

        let average_progress = if self.goals.is_empty() {
            0
        } else {
            let total: u64 = self.goals.iter().map(|g| g.progress as u64).sum();
            (total as f64 / self.goals.len() as f64).round() as u8
        };

        DashboardStats {
            active_goals,
            completed_goals,
            upcoming_sessions,
            average_progress,
        }
    }

    /// Adds a session for every booking the dashboard does not show yet and
    /// returns how many were added.
    ///
    /// A booking counts as shown when a session carries its id or sits on the
    /// same date and time. The second rule means two bookings in one slot
    /// surface as a single session.
    pub fn sync_from_bookings(&mut self, bookings: &[Booking]) -> usize {
        let mut added = 0;
        for booking in bookings {
            let already_shown = self.sessions.iter().any(|s| match &s.booking_id {
                Some(id) if *id == booking.id => true,
                _ => s.date == booking.date && s.time == booking.time,
            });
            if already_shown {
                continue;
            }
            self.sessions.push(Session::from_booking(booking));
            added += 1;
        }

        if added > 0 {
            sort_sessions(&mut self.sessions);
            info!(added, "sessions synced from bookings");
        }
        added
    }
}

pub fn session_badge(session: &Session, now: NaiveDateTime) -> SessionBadge {
    match session.starts_at() {
        Some(start) if start < now + Duration::hours(CONFIRMED_WINDOW_HOURS) => {
            SessionBadge::Confirmed
        }
        _ => SessionBadge::Scheduled,
    }
}

fn is_upcoming(session: &Session, now: NaiveDateTime) -> bool {
    session.starts_at().is_some_and(|start| start >= now)
}

fn sort_sessions(sessions: &mut [Session]) {
    sessions.sort_by_key(|s| (s.date, s.time));
}
