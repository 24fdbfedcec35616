//! Team (roster entity) and TeamForm.

use crate::models::player::blank_to_none;
use crate::models::tournament::TournamentId;
use crate::models::user::{ResourceOwner, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Unique identifier for a team.
pub type TeamId = Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Emoji or image URL shown next to the name.
    pub logo: String,
    pub coach_email: Option<String>,
    /// Coach account that created (and may edit) this team. None for admin-created teams.
    pub coach_id: Option<UserId>,
    pub tournament_id: Option<TournamentId>,
    pub created_at: DateTime<Utc>,
}

impl Team {
    pub fn new(name: impl Into<String>, logo: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            logo: logo.into(),
            coach_email: None,
            coach_id: None,
            tournament_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn owner(&self) -> ResourceOwner {
        ResourceOwner {
            coach_id: self.coach_id,
            team_id: Some(self.id),
        }
    }

    pub fn apply_form(&mut self, form: &TeamForm) {
        self.name = form.name.trim().to_string();
        self.logo = form.logo.trim().to_string();
        self.coach_email = form.coach_email.clone();
        self.tournament_id = form.tournament_id;
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, Validate)]
pub struct TeamForm {
    pub name: String,
    pub logo: String,
    #[validate(email(message = "Invalid email format"))]
    #[serde(default)]
    pub coach_email: Option<String>,
    #[serde(default)]
    pub tournament_id: Option<TournamentId>,
}

impl TeamForm {
    pub fn normalized(mut self) -> Self {
        self.coach_email = blank_to_none(self.coach_email);
        self
    }
}
