//! Rugby tournament web app: library with models, business logic and the JSON API.

pub mod config;
pub mod http;
pub mod logic;
pub mod models;
pub mod store;

pub use config::{Config, ConfigError};
pub use http::{session_middleware, ApiError, AppHandles};
pub use logic::{
    add_score, authorize_mutation, change_status, check_permission, format_match_clock,
    format_tracking_time, login, parse_tracking_time, schedule_match, toggle_timer, FieldErrors,
    LoginError, MatchError, ScoringError,
};
pub use models::{
    Account, Match, MatchId, MatchStatus, Page, PermissionSet, Player, PlayerId, PlayerStats, Role,
    ScoreType, ScoringEvent, Team, TeamId, Tournament, TournamentId, User, UserId,
};
pub use store::{Database, ScoringEventStore, StoreError};
