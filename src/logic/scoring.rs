//! Live scoring: append a scoring event, then update the team and player counters.
//!
//! The event log is the source of truth. Counters on the match sheet are an incremental view of
//! it, and [`totals_from_log`] rebuilds the same view from scratch.

use crate::logic::auth::authorize_mutation;
use crate::logic::clock::format_match_clock;
use crate::models::{Match, PlayerId, PlayerStats, ScoreType, ScoringEvent, TeamId, User};
use crate::store::{ScoringEventStore, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Score input is only available during live matches")]
    MatchNotLive,
    #[error("Team is not playing in this match")]
    TeamNotInMatch(TeamId),
    #[error("Player is not on this team's match sheet")]
    PlayerNotInTeam(PlayerId),
    #[error("You can only add scores for your own team")]
    Forbidden,
    #[error("Failed to save score. Please try again.")]
    Store(#[from] StoreError),
}

#[derive(Clone, Debug, Deserialize)]
pub struct ScoreRequest {
    pub team_id: TeamId,
    pub player_id: PlayerId,
    #[serde(rename = "type")]
    pub score_type: ScoreType,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Record a score in a live match.
///
/// The event is persisted before anything local changes; if the store refuses it, the match is
/// left exactly as it was.
pub fn add_score<S: ScoringEventStore + ?Sized>(
    m: &mut Match,
    actor: &User,
    store: &mut S,
    request: ScoreRequest,
) -> Result<ScoringEvent, ScoringError> {
    if !m.is_live() {
        return Err(ScoringError::MatchNotLive);
    }
    let side = m
        .side(request.team_id)
        .ok_or(ScoringError::TeamNotInMatch(request.team_id))?;
    if side.player(request.player_id).is_none() {
        return Err(ScoringError::PlayerNotInTeam(request.player_id));
    }
    if !authorize_mutation(Some(actor), &side.owner()) {
        log::warn!(
            "User '{}' tried to score for team {} in match {}",
            actor.username,
            request.team_id,
            m.id
        );
        return Err(ScoringError::Forbidden);
    }

    let comment = request
        .comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    let event = ScoringEvent::new(
        m.id,
        request.team_id,
        request.player_id,
        request.score_type,
        format_match_clock(m.elapsed_seconds),
        comment,
    );

    if let Err(e) = store.append_event(&event) {
        log::error!("Could not persist scoring event for match {}: {}", m.id, e);
        return Err(e.into());
    }

    apply_event(m, &event);
    log::info!(
        "Match {}: {} for team {} by player {} at {} (+{})",
        m.id,
        event.score_type,
        event.team_id,
        event.player_id,
        event.match_time,
        event.points
    );
    Ok(event)
}

/// Reflect an already persisted event on the match sheet and local log.
fn apply_event(m: &mut Match, event: &ScoringEvent) {
    if let Some(side) = m.side_mut(event.team_id) {
        side.record(event.player_id, event.score_type);
    }
    m.events.push(event.clone());
}

/// Team scores and player counters of one match.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct MatchTotals {
    pub team_scores: BTreeMap<TeamId, u32>,
    pub players: BTreeMap<PlayerId, PlayerStats>,
}

/// Totals as currently held on the match sheet (the incremental view).
pub fn incremental_totals(m: &Match) -> MatchTotals {
    let mut totals = MatchTotals::default();
    for side in &m.sides {
        totals.team_scores.insert(side.team_id, side.score);
        for p in &side.players {
            totals.players.insert(p.player_id, p.stats);
        }
    }
    totals
}

/// Totals folded from an event log. Events of other matches are ignored; every sheet player
/// appears, with zero counters if they never scored.
pub fn totals_from_log(m: &Match, events: &[ScoringEvent]) -> MatchTotals {
    let mut totals = MatchTotals::default();
    for side in &m.sides {
        totals.team_scores.insert(side.team_id, 0);
        for p in &side.players {
            totals.players.insert(p.player_id, PlayerStats::default());
        }
    }
    for e in events.iter().filter(|e| e.match_id == m.id) {
        *totals.team_scores.entry(e.team_id).or_default() += e.points;
        totals
            .players
            .entry(e.player_id)
            .or_default()
            .record(e.score_type);
    }
    totals
}

/// Reset the match sheet and local log, then replay `events` (recovery after a reload).
pub fn rebuild_from_log(m: &mut Match, events: &[ScoringEvent]) {
    for side in &mut m.sides {
        side.reset_counters();
    }
    m.events.clear();
    let mine: Vec<ScoringEvent> = events
        .iter()
        .filter(|e| e.match_id == m.id)
        .cloned()
        .collect();
    for e in &mine {
        apply_event(m, e);
    }
}

/// The incremental view agrees with the log, and each team's score equals its players' points.
pub fn is_consistent(m: &Match, events: &[ScoringEvent]) -> bool {
    incremental_totals(m) == totals_from_log(m, events)
        && m.sides.iter().all(|s| s.score == s.player_points())
}
