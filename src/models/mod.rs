//! Data structures for rugby tournaments: teams, players, matches, scores, users.

mod player;
mod rugby_match;
mod scoring;
mod team;
mod tournament;
mod tracking;
mod user;

pub use player::{Player, PlayerForm, PlayerId, PlayerStats};
pub use rugby_match::{Match, MatchId, MatchSide, MatchStatus, SidePlayer};
pub use scoring::{ScoreType, ScoringEvent, ScoringEventId};
pub use team::{Team, TeamForm, TeamId};
pub use tournament::{Tournament, TournamentForm, TournamentId, TournamentStatus};
pub use tracking::{TrackingForm, TrackingId, TrackingRecord};
pub use user::{Account, CoachForm, Page, PermissionSet, ResourceOwner, Role, User, UserId};
