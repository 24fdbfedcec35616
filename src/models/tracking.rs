//! Player tracking records captured against video time.

use crate::models::player::{blank_to_none, PlayerId};
use crate::models::team::TeamId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub type TrackingId = Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackingRecord {
    pub id: TrackingId,
    pub team_id: TeamId,
    pub player_id: PlayerId,
    /// Seconds into the video, centisecond precision.
    pub tracking_time: f64,
    pub action: String,
    pub description: Option<String>,
    pub field_position: Option<String>,
    /// Horizontal field coordinate.
    pub points_h: Option<f64>,
    /// Vertical field coordinate.
    pub points_v: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Tracking entry as typed by the operator. `time` is `M:SS.ss` / `MM:SS.ss`.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct TrackingForm {
    pub team_id: TeamId,
    pub time: String,
    #[validate(required(message = "Player is required"))]
    pub player_id: Option<PlayerId>,
    pub action: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub field_position: Option<String>,
    #[validate(range(min = 0.0, message = "Invalid horizontal position"))]
    #[serde(default)]
    pub points_h: Option<f64>,
    #[validate(range(min = 0.0, message = "Invalid vertical position"))]
    #[serde(default)]
    pub points_v: Option<f64>,
}

impl TrackingForm {
    pub fn normalized(mut self) -> Self {
        self.time = self.time.trim().to_string();
        self.action = self.action.trim().to_string();
        self.description = blank_to_none(self.description);
        self.field_position = blank_to_none(self.field_position);
        self
    }
}
