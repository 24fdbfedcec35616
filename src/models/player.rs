//! Player, PlayerForm and PlayerStats data structures.

use crate::models::scoring::ScoreType;
use crate::models::team::TeamId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Unique identifier for a player (used in match sheets and lookups).
pub type PlayerId = Uuid;

/// Per-match scoring counters for one player.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub tries: u32,
    pub conversions: u32,
    pub penalties: u32,
    pub drop_goals: u32,
}

impl PlayerStats {
    /// Count one score of the given kind.
    pub fn record(&mut self, score_type: ScoreType) {
        match score_type {
            ScoreType::Try => self.tries += 1,
            ScoreType::Conversion => self.conversions += 1,
            ScoreType::Penalty => self.penalties += 1,
            ScoreType::DropGoal => self.drop_goals += 1,
        }
    }

    /// Points represented by these counters.
    pub fn total_points(&self) -> u32 {
        self.tries * ScoreType::Try.points()
            + self.conversions * ScoreType::Conversion.points()
            + self.penalties * ScoreType::Penalty.points()
            + self.drop_goals * ScoreType::DropGoal.points()
    }
}

/// A player on a team roster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub team_id: TeamId,
    /// 1..=99, unique within the team.
    pub jersey_number: u8,
    pub name: String,
    pub position: Option<String>,
    pub age: Option<u8>,
    /// Centimetres.
    pub height: Option<f64>,
    /// Kilograms.
    pub weight: Option<f64>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Player {
    /// Create a player with only the required fields set.
    pub fn new(team_id: TeamId, jersey_number: u8, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_id,
            jersey_number,
            name: name.into(),
            position: None,
            age: None,
            height: None,
            weight: None,
            email: None,
            phone: None,
            created_at: Utc::now(),
        }
    }

    /// Copy the editable fields of a validated form onto this player.
    pub fn apply_form(&mut self, form: &PlayerForm) {
        if let Some(team_id) = form.team_id {
            self.team_id = team_id;
        }
        if let Some(n) = form.jersey_number {
            self.jersey_number = n as u8;
        }
        self.name = form.name.trim().to_string();
        self.position = form.position.clone();
        self.age = form.age.map(|a| a as u8);
        self.height = form.height;
        self.weight = form.weight;
        self.email = form.email.clone();
        self.phone = form.phone.clone();
    }
}

/// Create/update payload for a player. Raw numbers are kept wide so out-of-range input
/// is reported as a field error instead of a deserialization failure.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Validate)]
pub struct PlayerForm {
    pub name: String,
    #[validate(
        required(message = "Jersey number is required"),
        range(min = 1, max = 99, message = "Jersey number must be between 1 and 99")
    )]
    pub jersey_number: Option<i64>,
    #[validate(required(message = "Team selection is required"))]
    pub team_id: Option<TeamId>,
    #[serde(default)]
    pub position: Option<String>,
    #[validate(range(min = 16, max = 50, message = "Age must be between 16 and 50"))]
    #[serde(default)]
    pub age: Option<i64>,
    #[validate(range(exclusive_min = 0.0, message = "Height must be a positive number"))]
    #[serde(default)]
    pub height: Option<f64>,
    #[validate(range(exclusive_min = 0.0, message = "Weight must be a positive number"))]
    #[serde(default)]
    pub weight: Option<f64>,
    #[validate(email(message = "Invalid email format"))]
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl PlayerForm {
    /// Empty optional text fields count as absent.
    pub fn normalized(mut self) -> Self {
        self.position = blank_to_none(self.position);
        self.email = blank_to_none(self.email);
        self.phone = blank_to_none(self.phone);
        self
    }
}

pub(crate) fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
