//! Form validation: field rules from the `validator` derives plus duplicate checks against
//! existing rows. Errors are per-field messages for inline display.

use crate::models::{
    Account, CoachForm, Player, PlayerForm, PlayerId, Team, TeamForm, TeamId, Tournament,
    TournamentForm, TournamentId,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use validator::{Validate, ValidationErrors};

/// Field name -> message. The first message recorded for a field wins.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Run the derived rules of `form` and collect their messages.
    pub fn from_form<T: Validate>(form: &T) -> Self {
        let mut errors = Self::new();
        if let Err(e) = form.validate() {
            errors.absorb(&e);
        }
        errors
    }

    fn absorb(&mut self, errors: &ValidationErrors) {
        for (field, errs) in errors.field_errors() {
            if let Some(err) = errs.first() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", field));
                self.add(&field.to_string(), message);
            }
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

/// Validate a tournament form. `editing` is the id of the row being updated, if any.
pub fn validate_tournament(
    form: &TournamentForm,
    existing: &[Tournament],
    editing: Option<TournamentId>,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::from_form(form);
    let name = form.name.trim();
    if name.is_empty() {
        errors.add("name", "Tournament name is required");
    }
    if let (Some(start), Some(end)) = (form.start_date, form.end_date) {
        if start > end {
            errors.add("end_date", "End date must be after start date");
        }
    }
    let duplicate = existing
        .iter()
        .any(|t| t.name.eq_ignore_ascii_case(name) && Some(t.id) != editing);
    if !name.is_empty() && duplicate {
        errors.add("name", "Tournament name already exists");
    }
    errors.into_result()
}

/// Validate a team form. `editing` is the id of the row being updated, if any.
pub fn validate_team(
    form: &TeamForm,
    existing: &[Team],
    editing: Option<TeamId>,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::from_form(form);
    let name = form.name.trim();
    if name.is_empty() {
        errors.add("name", "Team name is required");
    }
    if form.logo.trim().is_empty() {
        errors.add("logo", "Team logo is required");
    }
    let duplicate = existing
        .iter()
        .any(|t| t.name.eq_ignore_ascii_case(name) && Some(t.id) != editing);
    if !name.is_empty() && duplicate {
        errors.add("name", "Team name already exists");
    }
    errors.into_result()
}

/// Validate a player form against the players already stored.
///
/// Jersey numbers must be unique within a team; the player being edited does not clash with itself.
pub fn validate_player(
    form: &PlayerForm,
    existing: &[Player],
    editing: Option<PlayerId>,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::from_form(form);
    if form.name.trim().is_empty() {
        errors.add("name", "Name is required");
    }
    if let (Some(number), Some(team_id)) = (form.jersey_number, form.team_id) {
        if !errors.has("jersey_number") {
            let taken = existing.iter().any(|p| {
                i64::from(p.jersey_number) == number && p.team_id == team_id && Some(p.id) != editing
            });
            if taken {
                errors.add("jersey_number", "Jersey number already exists in this team");
            }
        }
    }
    errors.into_result()
}

/// Validate a new coach account. Usernames are unique among coaches.
pub fn validate_coach(form: &CoachForm, existing: &[Account]) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::from_form(form);
    if form.full_name.trim().is_empty() {
        errors.add("full_name", "Full name is required");
    }
    if existing
        .iter()
        .any(|a| a.username.eq_ignore_ascii_case(form.username.trim()))
    {
        errors.add("username", "Username already exists");
    }
    errors.into_result()
}
