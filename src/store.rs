//! In-memory data store standing in for the hosted relational database.
//!
//! Scoring events go through [`ScoringEventStore`] so the scoring flow can be run against a store
//! that fails; everything else is plain table access on [`Database`].

use crate::models::{
    Account, Match, MatchId, Page, PermissionSet, Player, PlayerId, ScoringEvent, Team, TeamId,
    Tournament, TournamentId, TrackingRecord, UserId,
};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum StoreError {
    #[error("data store unavailable: {0}")]
    Unavailable(String),
    #[error("duplicate key {0}")]
    DuplicateKey(uuid::Uuid),
}

/// Append-only persistence of scoring events.
pub trait ScoringEventStore {
    fn append_event(&mut self, event: &ScoringEvent) -> Result<(), StoreError>;
    fn events_for_match(&self, match_id: MatchId) -> Vec<ScoringEvent>;
}

/// The `scoring_events` table.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<ScoringEvent>,
}

impl EventLog {
    pub fn all(&self) -> &[ScoringEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl ScoringEventStore for EventLog {
    fn append_event(&mut self, event: &ScoringEvent) -> Result<(), StoreError> {
        if self.events.iter().any(|e| e.id == event.id) {
            return Err(StoreError::DuplicateKey(event.id));
        }
        self.events.push(event.clone());
        Ok(())
    }

    fn events_for_match(&self, match_id: MatchId) -> Vec<ScoringEvent> {
        self.events
            .iter()
            .filter(|e| e.match_id == match_id)
            .cloned()
            .collect()
    }
}

/// Every table the application reads and writes.
#[derive(Debug, Default)]
pub struct Database {
    pub tournaments: Vec<Tournament>,
    pub teams: Vec<Team>,
    pub players: Vec<Player>,
    pub matches: HashMap<MatchId, Match>,
    pub scoring_events: EventLog,
    pub tracking: Vec<TrackingRecord>,
    pub coaches: Vec<Account>,
    pub admins: Vec<Account>,
    /// `coach_permissions`, keyed by coach id.
    pub permissions: HashMap<UserId, PermissionSet>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tournament_mut(&mut self, id: TournamentId) -> Option<&mut Tournament> {
        self.tournaments.iter_mut().find(|t| t.id == id)
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn team_mut(&mut self, id: TeamId) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| t.id == id)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn team_players(&self, team_id: TeamId) -> Vec<&Player> {
        let mut players: Vec<&Player> = self.players.iter().filter(|p| p.team_id == team_id).collect();
        players.sort_by_key(|p| p.jersey_number);
        players
    }

    pub fn coach(&self, id: UserId) -> Option<&Account> {
        self.coaches.iter().find(|c| c.id == id)
    }

    pub fn coach_mut(&mut self, id: UserId) -> Option<&mut Account> {
        self.coaches.iter_mut().find(|c| c.id == id)
    }

    pub fn permissions_of(&self, user_id: UserId) -> Option<&PermissionSet> {
        self.permissions.get(&user_id)
    }

    /// Add a coach with the default (all false) permission set.
    pub fn add_coach(&mut self, account: Account) {
        self.permissions.insert(account.id, PermissionSet::default());
        self.coaches.push(account);
    }

    /// Convenience for seeding: add a coach and grant the listed pages.
    pub fn add_coach_with_pages(&mut self, account: Account, pages: &[Page]) {
        let mut perms = PermissionSet::default();
        for &page in pages {
            perms.set(page, true);
        }
        self.permissions.insert(account.id, perms);
        self.coaches.push(account);
    }

    pub fn add_admin(&mut self, account: Account) {
        self.admins.push(account);
    }

    /// Remove a team with its players. Returns false if it did not exist.
    pub fn delete_team(&mut self, id: TeamId) -> bool {
        let before = self.teams.len();
        self.teams.retain(|t| t.id != id);
        if self.teams.len() == before {
            return false;
        }
        self.players.retain(|p| p.team_id != id);
        true
    }
}
