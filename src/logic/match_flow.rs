//! Match lifecycle: scheduling, status transitions and the running-clock toggle.
//!
//! Status changes are admin-only. The clock toggle is open to admins and to coaches who own the
//! match or one of its teams, and only while the match is live.

use crate::logic::auth::{authorize_any, is_admin};
use crate::logic::clock::ClockDriver;
use crate::logic::validation::FieldErrors;
use crate::models::{Match, MatchSide, MatchStatus, Player, Role, Team, TeamId, TournamentId, User};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum MatchError {
    #[error("Only an admin can change the match status")]
    AdminOnly,
    #[error("Cannot change match status from {from} to {to}")]
    InvalidTransition { from: MatchStatus, to: MatchStatus },
    #[error("The match clock can only be started or paused while the match is live")]
    ClockNotLive,
    #[error("You are not allowed to control this match")]
    Forbidden,
}

/// Payload for scheduling a match.
#[derive(Clone, Debug, Deserialize)]
pub struct ScheduleForm {
    #[serde(default)]
    pub tournament_id: Option<TournamentId>,
    pub team1_id: Option<TeamId>,
    pub team2_id: Option<TeamId>,
    pub scheduled_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub venue: Option<String>,
}

/// Create an upcoming match between two distinct existing teams, with match sheets built from
/// the current rosters. A coach becomes the match's owner.
pub fn schedule_match(
    form: &ScheduleForm,
    teams: &[Team],
    roster: &[Player],
    scheduler: &User,
) -> Result<Match, FieldErrors> {
    let mut errors = FieldErrors::new();
    let home = find_team(teams, form.team1_id, "team1_id", &mut errors);
    let away = find_team(teams, form.team2_id, "team2_id", &mut errors);
    if form.team1_id.is_some() && form.team1_id == form.team2_id {
        errors.add("team2_id", "A team cannot play itself");
    }
    if form.scheduled_date.is_none() {
        errors.add("scheduled_date", "Scheduled date is required");
    }

    let (Some(home), Some(away), Some(date)) = (home, away, form.scheduled_date) else {
        return Err(errors);
    };
    errors.into_result()?;

    let mut m = Match::new(
        MatchSide::from_roster(home, roster),
        MatchSide::from_roster(away, roster),
        date,
    );
    m.tournament_id = form.tournament_id;
    m.venue = form
        .venue
        .as_ref()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    if scheduler.role == Role::Coach {
        m.coach_id = Some(scheduler.id);
    }
    log::info!("Scheduled match {} ({} vs {})", m.id, home.name, away.name);
    Ok(m)
}

fn find_team<'a>(
    teams: &'a [Team],
    id: Option<TeamId>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<&'a Team> {
    let Some(id) = id else {
        errors.add(field, "Team selection is required");
        return None;
    };
    let team = teams.iter().find(|t| t.id == id);
    if team.is_none() {
        errors.add(field, "Team not found");
    }
    team
}

/// Move the match to `to`, starting or stopping its clock as a side effect.
///
/// | from | to | clock |
/// |---|---|---|
/// | upcoming | live | runs |
/// | live | half-time | stops |
/// | half-time | live | runs, second half |
/// | live / half-time | ended | stops |
pub fn change_status<C: ClockDriver + ?Sized>(
    m: &mut Match,
    actor: &User,
    to: MatchStatus,
    clock: &mut C,
) -> Result<(), MatchError> {
    if !is_admin(actor) {
        log::warn!("User '{}' tried to change status of match {}", actor.username, m.id);
        return Err(MatchError::AdminOnly);
    }
    let from = m.status;
    if !from.can_transition_to(to) {
        return Err(MatchError::InvalidTransition { from, to });
    }

    match (from, to) {
        (MatchStatus::HalfTime, MatchStatus::Live) => {
            m.half = 2;
            m.timer_running = true;
        }
        (_, MatchStatus::Live) => m.timer_running = true,
        _ => m.timer_running = false,
    }
    m.status = to;

    if m.clock_running() {
        clock.start(m.id);
    } else {
        clock.stop(m.id);
    }
    log::info!("Match {} moved from {} to {} (half {})", m.id, from, to, m.half);
    Ok(())
}

/// Flip the running flag of a live match. Returns the new flag.
pub fn toggle_timer<C: ClockDriver + ?Sized>(
    m: &mut Match,
    actor: &User,
    clock: &mut C,
) -> Result<bool, MatchError> {
    if !authorize_any(Some(actor), &m.owners()) {
        return Err(MatchError::Forbidden);
    }
    if !m.is_live() {
        return Err(MatchError::ClockNotLive);
    }
    m.timer_running = !m.timer_running;
    if m.timer_running {
        clock.start(m.id);
    } else {
        clock.stop(m.id);
    }
    log::info!(
        "Match {} clock {} at {}s",
        m.id,
        if m.timer_running { "resumed" } else { "paused" },
        m.elapsed_seconds
    );
    Ok(m.timer_running)
}

/// Matches a user may see in listings: all for admins, owned ones for coaches.
pub fn visible_to(user: &User, m: &Match) -> bool {
    is_admin(user) || authorize_any(Some(user), &m.owners())
}
