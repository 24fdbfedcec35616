//! Business logic: authorization, sessions, match flow, scoring, statistics and tracking.

pub mod auth;
pub mod clock;
pub mod match_flow;
pub mod scoring;
pub mod session;
pub mod statistics;
pub mod tracking;
pub mod validation;

pub use auth::{
    authorize_any, authorize_mutation, check_permission, effective_permissions, hash_password,
    is_admin, login, page_access, resolve_role, Access, LoginError,
};
pub use clock::{format_match_clock, ClockDriver, IntervalClock, TickFn};
pub use match_flow::{change_status, schedule_match, toggle_timer, visible_to, MatchError, ScheduleForm};
pub use scoring::{
    add_score, incremental_totals, is_consistent, rebuild_from_log, totals_from_log, MatchTotals,
    ScoreRequest, ScoringError,
};
pub use session::{SessionEntry, SessionId, SessionRegistry, DEFAULT_COACH_IDLE_TIMEOUT};
pub use statistics::{compile as compile_statistics, PlayerTotals, StatisticsReport, TeamTotals};
pub use tracking::{
    build_record, export_csv, format_tracking_time, parse_tracking_time, TrackingError, CSV_HEADER,
};
pub use validation::{
    validate_coach, validate_player, validate_team, validate_tournament, FieldErrors,
};
