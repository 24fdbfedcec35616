//! Match, MatchStatus and the per-match team sheets (MatchSide).

use crate::models::player::{Player, PlayerId, PlayerStats};
use crate::models::scoring::{ScoreType, ScoringEvent};
use crate::models::team::{Team, TeamId};
use crate::models::tournament::TournamentId;
use crate::models::user::{ResourceOwner, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Lifecycle of a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStatus {
    #[default]
    Upcoming,
    Live,
    HalfTime,
    Ended,
}

impl MatchStatus {
    /// Whether an operator may move a match from `self` to `to`.
    pub fn can_transition_to(&self, to: MatchStatus) -> bool {
        use MatchStatus::*;
        matches!(
            (self, to),
            (Upcoming, Live) | (Live, HalfTime) | (HalfTime, Live) | (Live, Ended) | (HalfTime, Ended)
        )
    }

    pub fn valid_next_states(&self) -> Vec<MatchStatus> {
        use MatchStatus::*;
        match self {
            Upcoming => vec![Live],
            Live => vec![HalfTime, Ended],
            HalfTime => vec![Live, Ended],
            Ended => vec![],
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchStatus::Upcoming => "upcoming",
            MatchStatus::Live => "live",
            MatchStatus::HalfTime => "half-time",
            MatchStatus::Ended => "ended",
        };
        f.write_str(s)
    }
}

/// A player as listed on a match sheet, with this match's counters.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SidePlayer {
    pub player_id: PlayerId,
    pub jersey_number: u8,
    pub name: String,
    pub stats: PlayerStats,
}

/// One of the two teams in a match: identity, running score and match sheet.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchSide {
    pub team_id: TeamId,
    pub name: String,
    pub logo: String,
    pub coach_id: Option<UserId>,
    pub score: u32,
    pub players: Vec<SidePlayer>,
}

impl MatchSide {
    /// Sheet for `team` listing every roster player of that team, sorted by jersey number.
    pub fn from_roster(team: &Team, roster: &[Player]) -> Self {
        let mut side = Self {
            team_id: team.id,
            name: team.name.clone(),
            logo: team.logo.clone(),
            coach_id: team.coach_id,
            score: 0,
            players: Vec::new(),
        };
        side.sync_roster(roster);
        side
    }

    /// Add roster players missing from the sheet. Existing entries (and their counters) are kept.
    pub fn sync_roster(&mut self, roster: &[Player]) {
        for p in roster.iter().filter(|p| p.team_id == self.team_id) {
            if self.player(p.id).is_none() {
                self.players.push(SidePlayer {
                    player_id: p.id,
                    jersey_number: p.jersey_number,
                    name: p.name.clone(),
                    stats: PlayerStats::default(),
                });
            }
        }
        self.players.sort_by_key(|p| p.jersey_number);
    }

    pub fn player(&self, id: PlayerId) -> Option<&SidePlayer> {
        self.players.iter().find(|p| p.player_id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut SidePlayer> {
        self.players.iter_mut().find(|p| p.player_id == id)
    }

    /// Count a score for `player_id`. Returns false (and changes nothing) if the player is not on the sheet.
    pub fn record(&mut self, player_id: PlayerId, score_type: ScoreType) -> bool {
        match self.player_mut(player_id) {
            Some(p) => {
                p.stats.record(score_type);
                self.score += score_type.points();
                true
            }
            None => false,
        }
    }

    /// Sum of points implied by the players' counters.
    pub fn player_points(&self) -> u32 {
        self.players.iter().map(|p| p.stats.total_points()).sum()
    }

    /// Zero the score and every player's counters.
    pub fn reset_counters(&mut self) {
        self.score = 0;
        for p in &mut self.players {
            p.stats = PlayerStats::default();
        }
    }

    pub fn owner(&self) -> ResourceOwner {
        ResourceOwner {
            coach_id: self.coach_id,
            team_id: Some(self.team_id),
        }
    }
}

/// A scheduled or played match between two distinct teams.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: Option<TournamentId>,
    pub sides: [MatchSide; 2],
    pub status: MatchStatus,
    /// 1 or 2.
    pub half: u8,
    pub elapsed_seconds: u32,
    /// Operator's play/pause flag. The clock only advances when this is set and the match is live.
    pub timer_running: bool,
    pub scheduled_date: DateTime<Utc>,
    pub venue: Option<String>,
    /// Coach who scheduled the match, if any.
    pub coach_id: Option<UserId>,
    /// Local copy of this match's scoring events, in insertion order.
    #[serde(skip)]
    pub events: Vec<ScoringEvent>,
    pub created_at: DateTime<Utc>,
}

impl Match {
    pub fn new(home: MatchSide, away: MatchSide, scheduled_date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id: None,
            sides: [home, away],
            status: MatchStatus::Upcoming,
            half: 1,
            elapsed_seconds: 0,
            timer_running: false,
            scheduled_date,
            venue: None,
            coach_id: None,
            events: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn side(&self, team_id: TeamId) -> Option<&MatchSide> {
        self.sides.iter().find(|s| s.team_id == team_id)
    }

    pub fn side_mut(&mut self, team_id: TeamId) -> Option<&mut MatchSide> {
        self.sides.iter_mut().find(|s| s.team_id == team_id)
    }

    pub fn team_ids(&self) -> [TeamId; 2] {
        [self.sides[0].team_id, self.sides[1].team_id]
    }

    pub fn involves(&self, team_id: TeamId) -> bool {
        self.side(team_id).is_some()
    }

    pub fn is_live(&self) -> bool {
        self.status == MatchStatus::Live
    }

    /// True when a tick would advance the clock.
    pub fn clock_running(&self) -> bool {
        self.is_live() && self.timer_running
    }

    /// Advance the clock by one second if it is running. Returns whether it advanced.
    pub fn tick(&mut self) -> bool {
        if !self.clock_running() {
            return false;
        }
        self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
        true
    }

    /// Everyone who may operate this match besides admins: its scheduler and both teams' owners.
    pub fn owners(&self) -> Vec<ResourceOwner> {
        let mut owners = vec![ResourceOwner {
            coach_id: self.coach_id,
            team_id: None,
        }];
        owners.extend(self.sides.iter().map(MatchSide::owner));
        owners
    }

    /// Scoring events, most recent first.
    pub fn events_recent_first(&self) -> impl Iterator<Item = &ScoringEvent> {
        self.events.iter().rev()
    }
}
