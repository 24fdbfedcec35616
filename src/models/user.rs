//! Users, accounts, roles and per-page permissions.

use crate::models::player::blank_to_none;
use crate::models::team::TeamId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

/// Unique identifier for a coach or admin account.
pub type UserId = Uuid;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Coach,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("admin"),
            Role::Coach => f.write_str("coach"),
        }
    }
}

/// A page (or area of the API) that coaches need explicit permission for.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Tournaments,
    Teams,
    Players,
    Matches,
    Statistics,
    PlayerTracking,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Tournaments,
        Page::Teams,
        Page::Players,
        Page::Matches,
        Page::Statistics,
        Page::PlayerTracking,
    ];
}

/// Stored permission flags of a coach. Unset flags deserialize as false.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionSet {
    pub tournaments: bool,
    pub teams: bool,
    pub players: bool,
    pub matches: bool,
    pub statistics: bool,
    pub player_tracking: bool,
}

impl PermissionSet {
    /// Every flag set (an admin's effective permissions).
    pub fn all() -> Self {
        Self {
            tournaments: true,
            teams: true,
            players: true,
            matches: true,
            statistics: true,
            player_tracking: true,
        }
    }

    pub fn get(&self, page: Page) -> bool {
        match page {
            Page::Tournaments => self.tournaments,
            Page::Teams => self.teams,
            Page::Players => self.players,
            Page::Matches => self.matches,
            Page::Statistics => self.statistics,
            Page::PlayerTracking => self.player_tracking,
        }
    }

    pub fn set(&mut self, page: Page, allowed: bool) {
        let flag = match page {
            Page::Tournaments => &mut self.tournaments,
            Page::Teams => &mut self.teams,
            Page::Players => &mut self.players,
            Page::Matches => &mut self.matches,
            Page::Statistics => &mut self.statistics,
            Page::PlayerTracking => &mut self.player_tracking,
        };
        *flag = allowed;
    }
}

/// The logged-in identity carried by a session.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    pub full_name: String,
    pub email: Option<String>,
    /// Coach's own team, if assigned.
    pub team_id: Option<TeamId>,
}

/// A stored coach or admin account. Coaches and admins live in separate tables.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Account {
    pub id: UserId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub email: Option<String>,
    pub is_active: bool,
    pub team_id: Option<TeamId>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        full_name: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            password_hash: password_hash.into(),
            full_name: full_name.into(),
            email: None,
            is_active: true,
            team_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn to_user(&self, role: Role) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
            role,
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            team_id: self.team_id,
        }
    }
}

/// Who owns a coach-scoped resource (team, player, match, tracking record).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ResourceOwner {
    pub coach_id: Option<UserId>,
    pub team_id: Option<TeamId>,
}

impl ResourceOwner {
    pub fn coach(coach_id: UserId) -> Self {
        Self {
            coach_id: Some(coach_id),
            team_id: None,
        }
    }
}

/// Admin form for creating a coach account.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct CoachForm {
    #[validate(length(min = 3, max = 50, message = "Username must be 3 to 50 characters"))]
    pub username: String,
    pub full_name: String,
    #[validate(email(message = "Invalid email format"))]
    #[serde(default)]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[serde(default)]
    pub team_id: Option<TeamId>,
}

impl CoachForm {
    pub fn normalized(mut self) -> Self {
        self.username = self.username.trim().to_string();
        self.email = blank_to_none(self.email);
        self
    }
}
