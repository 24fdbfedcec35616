//! Integration tests for form validation and duplicate checks.

use chrono::NaiveDate;
use rugby_scoring_web::logic::{validate_coach, validate_player, validate_team, validate_tournament};
use rugby_scoring_web::models::{CoachForm, PlayerForm, TeamForm, TournamentForm};
use rugby_scoring_web::{Account, Player, Team, Tournament};

fn player_form(team: &Team, jersey: i64, name: &str) -> PlayerForm {
    PlayerForm {
        name: name.to_string(),
        jersey_number: Some(jersey),
        team_id: Some(team.id),
        ..PlayerForm::default()
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn jersey_numbers_are_unique_per_team() {
    let lions = Team::new("Lions", "l.png");
    let sharks = Team::new("Sharks", "s.png");
    let existing = vec![Player::new(lions.id, 7, "Flanker")];

    let errors = validate_player(&player_form(&lions, 7, "New"), &existing, None).unwrap_err();
    assert_eq!(
        errors.get("jersey_number"),
        Some("Jersey number already exists in this team")
    );

    assert!(validate_player(&player_form(&sharks, 7, "New"), &existing, None).is_ok());
    assert!(validate_player(&player_form(&lions, 8, "New"), &existing, None).is_ok());
}

#[test]
fn editing_a_player_does_not_clash_with_itself() {
    let lions = Team::new("Lions", "l.png");
    let existing = vec![Player::new(lions.id, 7, "Flanker"), Player::new(lions.id, 8, "Number Eight")];
    let me = existing[0].id;

    assert!(validate_player(&player_form(&lions, 7, "Flanker"), &existing, Some(me)).is_ok());
    let errors = validate_player(&player_form(&lions, 8, "Flanker"), &existing, Some(me)).unwrap_err();
    assert!(errors.has("jersey_number"));
}

#[test]
fn player_field_rules() {
    let lions = Team::new("Lions", "l.png");
    let form = PlayerForm {
        name: "  ".to_string(),
        jersey_number: Some(100),
        team_id: None,
        age: Some(15),
        height: Some(0.0),
        weight: Some(-3.0),
        email: Some("not-an-email".to_string()),
        ..PlayerForm::default()
    };

    let errors = validate_player(&form, &[], None).unwrap_err();

    assert_eq!(errors.get("name"), Some("Name is required"));
    assert_eq!(errors.get("jersey_number"), Some("Jersey number must be between 1 and 99"));
    assert_eq!(errors.get("team_id"), Some("Team selection is required"));
    assert_eq!(errors.get("age"), Some("Age must be between 16 and 50"));
    assert_eq!(errors.get("height"), Some("Height must be a positive number"));
    assert_eq!(errors.get("weight"), Some("Weight must be a positive number"));
    assert_eq!(errors.get("email"), Some("Invalid email format"));

    let ok = PlayerForm {
        age: Some(16),
        height: Some(1.85),
        email: Some("wing@club.test".to_string()),
        ..player_form(&lions, 99, "Wing")
    };
    assert!(validate_player(&ok, &[], None).is_ok());
}

#[test]
fn missing_jersey_is_required_not_out_of_range() {
    let lions = Team::new("Lions", "l.png");
    let form = PlayerForm {
        jersey_number: None,
        ..player_form(&lions, 1, "Hooker")
    };
    let errors = validate_player(&form, &[], None).unwrap_err();
    assert_eq!(errors.get("jersey_number"), Some("Jersey number is required"));
}

#[test]
fn tournament_rules() {
    let existing = vec![Tournament::new("Spring Cup", date(2026, 3, 1), date(2026, 3, 31))];
    let form = TournamentForm {
        name: "spring cup".to_string(),
        start_date: Some(date(2026, 5, 10)),
        end_date: Some(date(2026, 5, 1)),
        ..TournamentForm::default()
    };

    let errors = validate_tournament(&form, &existing, None).unwrap_err();
    assert_eq!(errors.get("name"), Some("Tournament name already exists"));
    assert_eq!(errors.get("end_date"), Some("End date must be after start date"));

    // Renaming the same tournament keeps its own name legal.
    let rename = TournamentForm {
        name: "Spring Cup".to_string(),
        start_date: Some(date(2026, 3, 1)),
        end_date: Some(date(2026, 3, 1)),
        ..TournamentForm::default()
    };
    assert!(validate_tournament(&rename, &existing, Some(existing[0].id)).is_ok());

    let blank = TournamentForm::default();
    let errors = validate_tournament(&blank, &existing, None).unwrap_err();
    assert_eq!(errors.get("name"), Some("Tournament name is required"));
    assert!(errors.has("start_date"));
    assert!(errors.has("end_date"));
}

#[test]
fn team_rules() {
    let existing = vec![Team::new("Lions", "l.png")];
    let form = TeamForm {
        name: "LIONS".to_string(),
        logo: " ".to_string(),
        coach_email: Some("coach@".to_string()),
        tournament_id: None,
    };
    let errors = validate_team(&form, &existing, None).unwrap_err();
    assert_eq!(errors.get("name"), Some("Team name already exists"));
    assert_eq!(errors.get("logo"), Some("Team logo is required"));
    assert_eq!(errors.get("coach_email"), Some("Invalid email format"));

    let ok = TeamForm {
        name: "Lions".to_string(),
        logo: "new.png".to_string(),
        coach_email: None,
        tournament_id: None,
    };
    assert!(validate_team(&ok, &existing, Some(existing[0].id)).is_ok());
}

#[test]
fn coach_rules() {
    let existing = vec![Account::new("sam", "hash", "Sam")];
    let form = CoachForm {
        username: "SAM".to_string(),
        full_name: String::new(),
        email: None,
        password: "short".to_string(),
        team_id: None,
    };
    let errors = validate_coach(&form, &existing).unwrap_err();
    assert_eq!(errors.get("username"), Some("Username already exists"));
    assert_eq!(errors.get("full_name"), Some("Full name is required"));
    assert_eq!(errors.get("password"), Some("Password must be at least 8 characters"));
}
