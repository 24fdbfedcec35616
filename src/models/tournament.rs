//! Tournament and TournamentForm.

use crate::models::player::blank_to_none;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    #[default]
    Upcoming,
    Ongoing,
    Completed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: TournamentStatus,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a new tournament in Upcoming state.
    pub fn new(name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            start_date,
            end_date,
            status: TournamentStatus::Upcoming,
            created_at: Utc::now(),
        }
    }

    /// Build from a form that already passed validation (both dates present).
    pub fn from_form(form: &TournamentForm) -> Option<Self> {
        let mut t = Self::new(form.name.trim(), form.start_date?, form.end_date?);
        t.description = form.description.clone();
        t.status = form.status;
        Some(t)
    }

    pub fn apply_form(&mut self, form: &TournamentForm) {
        self.name = form.name.trim().to_string();
        self.description = form.description.clone();
        if let Some(d) = form.start_date {
            self.start_date = d;
        }
        if let Some(d) = form.end_date {
            self.end_date = d;
        }
        self.status = form.status;
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, Validate)]
pub struct TournamentForm {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(required(message = "Start date is required"))]
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[validate(required(message = "End date is required"))]
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: TournamentStatus,
}

impl TournamentForm {
    pub fn normalized(mut self) -> Self {
        self.description = blank_to_none(self.description);
        self
    }
}
