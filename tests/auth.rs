//! Integration tests for login, page permissions, ownership checks and session expiry.

use chrono::{Duration as ChronoDuration, Utc};
use rugby_scoring_web::logic::{
    effective_permissions, page_access, Access, SessionRegistry, DEFAULT_COACH_IDLE_TIMEOUT,
};
use rugby_scoring_web::models::ResourceOwner;
use rugby_scoring_web::{
    authorize_mutation, check_permission, login, Account, LoginError, Page, PermissionSet, Role,
    User,
};
use std::time::Duration;

fn account(username: &str, password: &str) -> Account {
    Account::new(username, bcrypt::hash(password, 4).unwrap(), username.to_uppercase())
}

fn coach_user() -> User {
    Account::new("coach", "x", "Coach").to_user(Role::Coach)
}

fn admin_user() -> User {
    Account::new("admin", "x", "Admin").to_user(Role::Admin)
}

#[test]
fn admin_has_every_permission_whatever_is_stored() {
    let admin = admin_user();
    let nothing = PermissionSet::default();
    for page in Page::ALL {
        assert!(check_permission(Some(&admin), Some(&nothing), page));
        assert!(check_permission(Some(&admin), None, page));
    }
    assert_eq!(effective_permissions(&admin, Some(&nothing)), PermissionSet::all());
}

#[test]
fn coach_permission_is_the_stored_flag() {
    let coach = coach_user();
    let mut stored = PermissionSet::default();
    stored.set(Page::Matches, true);
    stored.set(Page::PlayerTracking, true);

    for page in Page::ALL {
        let expected = matches!(page, Page::Matches | Page::PlayerTracking);
        assert_eq!(check_permission(Some(&coach), Some(&stored), page), expected, "{page:?}");
    }
}

#[test]
fn coach_without_stored_flags_has_no_permission() {
    let coach = coach_user();
    for page in Page::ALL {
        assert!(!check_permission(Some(&coach), None, page));
    }
    assert_eq!(page_access(Some(&coach), None, Page::Teams), Access::Denied);
}

#[test]
fn anonymous_visitor_must_log_in() {
    assert!(!check_permission(None, Some(&PermissionSet::all()), Page::Statistics));
    assert_eq!(page_access(None, None, Page::Statistics), Access::LoginRequired);
    assert_eq!(
        page_access(Some(&admin_user()), None, Page::Statistics),
        Access::Granted
    );
}

#[test]
fn stored_flags_tolerate_missing_fields() {
    let stored: PermissionSet = serde_json::from_str(r#"{"teams": true}"#).unwrap();
    assert!(stored.teams);
    assert!(!stored.players);
    assert!(!stored.player_tracking);
}

#[test]
fn coach_mutates_only_owned_resources() {
    let mut coach = coach_user();
    let team_id = uuid::Uuid::new_v4();
    coach.team_id = Some(team_id);

    assert!(authorize_mutation(Some(&coach), &ResourceOwner::coach(coach.id)));
    assert!(authorize_mutation(
        Some(&coach),
        &ResourceOwner { coach_id: None, team_id: Some(team_id) }
    ));
    assert!(!authorize_mutation(Some(&coach), &ResourceOwner::coach(uuid::Uuid::new_v4())));
    assert!(!authorize_mutation(Some(&coach), &ResourceOwner::default()));
    assert!(!authorize_mutation(None, &ResourceOwner::coach(coach.id)));
    assert!(authorize_mutation(Some(&admin_user()), &ResourceOwner::default()));
}

#[test]
fn login_resolves_role_from_the_matching_table() {
    let coaches = vec![account("sam", "coachpass")];
    let admins = vec![account("root", "adminpass")];

    let coach = login(&coaches, &admins, "sam", "coachpass", None).unwrap();
    assert_eq!(coach.role, Role::Coach);
    assert_eq!(coach.username, "sam");

    let admin = login(&coaches, &admins, " root ", "adminpass", Some(Role::Admin)).unwrap();
    assert_eq!(admin.role, Role::Admin);
}

#[test]
fn coach_table_is_checked_before_admin_table() {
    let coaches = vec![account("alex", "shared-secret")];
    let admins = vec![account("alex", "shared-secret")];
    let user = login(&coaches, &admins, "alex", "shared-secret", None).unwrap();
    assert_eq!(user.role, Role::Coach);
    assert_eq!(user.id, coaches[0].id);

    // Same username, password only valid for the admin row.
    let admins = vec![account("alex", "admin-only")];
    let user = login(&coaches, &admins, "alex", "admin-only", None).unwrap();
    assert_eq!(user.role, Role::Admin);
}

#[test]
fn wrong_password_and_unknown_user_are_the_same_error() {
    let coaches = vec![account("sam", "coachpass")];
    assert_eq!(
        login(&coaches, &[], "sam", "nope", None),
        Err(LoginError::InvalidCredentials)
    );
    assert_eq!(
        login(&coaches, &[], "nobody", "coachpass", None),
        Err(LoginError::InvalidCredentials)
    );
    assert_eq!(
        login(&coaches, &[], "", "coachpass", None),
        Err(LoginError::MissingCredentials)
    );
}

#[test]
fn inactive_account_gets_its_own_error() {
    let mut sam = account("sam", "coachpass");
    sam.is_active = false;
    let err = login(&[sam], &[], "sam", "coachpass", None).unwrap_err();
    assert_eq!(err, LoginError::AccountInactive);
    assert_eq!(
        err.to_string(),
        "Your account has been deactivated. Please contact admin."
    );
}

#[test]
fn requested_role_must_match() {
    let coaches = vec![account("sam", "coachpass")];
    assert_eq!(
        login(&coaches, &[], "sam", "coachpass", Some(Role::Admin)),
        Err(LoginError::RoleMismatch)
    );
}

#[test]
fn coach_session_expires_after_two_idle_hours() {
    let mut registry = SessionRegistry::default();
    let start = Utc::now();
    let coach = registry.open(coach_user(), start);
    let admin = registry.open(admin_user(), start);

    assert!(registry.touch(coach, start + ChronoDuration::minutes(119)).is_some());
    // Activity at 1:59 restarts the idle timer.
    let later = start + ChronoDuration::minutes(119) + ChronoDuration::hours(2);
    assert!(registry.touch(coach, later).is_some());

    let expired_at = later + ChronoDuration::hours(2) + ChronoDuration::seconds(1);
    assert!(registry.touch(coach, expired_at).is_none());
    assert_eq!(registry.len(), 1);
    assert!(registry.touch(admin, expired_at).is_some());
    assert_eq!(DEFAULT_COACH_IDLE_TIMEOUT, Duration::from_secs(7200));
}

#[test]
fn sweep_logs_out_idle_coaches_only() {
    let mut registry = SessionRegistry::new(Duration::from_secs(60));
    let start = Utc::now();
    let idle = registry.open(coach_user(), start);
    let busy = registry.open(coach_user(), start);
    registry.open(admin_user(), start);

    registry.touch(busy, start + ChronoDuration::seconds(50));
    let gone = registry.expire_idle(start + ChronoDuration::seconds(90));

    assert_eq!(gone.len(), 1);
    assert_eq!(registry.len(), 2);
    let after_sweep = start + ChronoDuration::seconds(90);
    assert!(registry.touch(idle, after_sweep).is_none());
    assert!(registry.touch(busy, after_sweep).is_some());
}

#[test]
fn logout_and_revocation_close_sessions() {
    let mut registry = SessionRegistry::default();
    let coach = coach_user();
    let first = registry.open(coach.clone(), Utc::now());
    registry.open(coach.clone(), Utc::now());
    let admin = registry.open(admin_user(), Utc::now());

    assert_eq!(registry.close(admin).map(|u| u.role), Some(Role::Admin));
    assert_eq!(registry.revoke_user(coach.id), 2);
    assert!(registry.touch(first, Utc::now()).is_none());
    assert!(registry.is_empty());
}
