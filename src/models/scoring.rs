//! ScoreType and ScoringEvent: the append-only record of points scored in a match.

use crate::models::player::PlayerId;
use crate::models::rugby_match::MatchId;
use crate::models::team::TeamId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a scoring event.
pub type ScoringEventId = Uuid;

/// Kind of score. Points per kind are fixed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoreType {
    Try,
    Conversion,
    Penalty,
    DropGoal,
}

impl ScoreType {
    pub const ALL: [ScoreType; 4] = [
        ScoreType::Try,
        ScoreType::Conversion,
        ScoreType::Penalty,
        ScoreType::DropGoal,
    ];

    /// Points awarded for this kind of score.
    pub fn points(self) -> u32 {
        match self {
            ScoreType::Try => 5,
            ScoreType::Conversion => 2,
            ScoreType::Penalty => 3,
            ScoreType::DropGoal => 3,
        }
    }
}

impl fmt::Display for ScoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScoreType::Try => "try",
            ScoreType::Conversion => "conversion",
            ScoreType::Penalty => "penalty",
            ScoreType::DropGoal => "drop-goal",
        };
        f.write_str(label)
    }
}

/// One score, as persisted. Never mutated after creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoringEvent {
    pub id: ScoringEventId,
    pub match_id: MatchId,
    pub team_id: TeamId,
    pub player_id: PlayerId,
    #[serde(rename = "event_type")]
    pub score_type: ScoreType,
    pub points: u32,
    /// Match clock at submission, already formatted (`M:SS`).
    pub match_time: String,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ScoringEvent {
    /// Build a new event; `points` is derived from `score_type`.
    pub fn new(
        match_id: MatchId,
        team_id: TeamId,
        player_id: PlayerId,
        score_type: ScoreType,
        match_time: impl Into<String>,
        comment: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            match_id,
            team_id,
            player_id,
            score_type,
            points: score_type.points(),
            match_time: match_time.into(),
            comment,
            created_at: Utc::now(),
        }
    }
}
