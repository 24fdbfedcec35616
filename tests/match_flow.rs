//! Integration tests for the match lifecycle: transitions, clock control and scheduling.

use chrono::{TimeZone, Utc};
use rugby_scoring_web::logic::{visible_to, ClockDriver, ScheduleForm};
use rugby_scoring_web::models::MatchSide;
use rugby_scoring_web::{
    change_status, schedule_match, toggle_timer, Account, Match, MatchError, MatchId, MatchStatus,
    Player, Role, Team, User,
};
use std::collections::HashSet;

/// Clock driver that records which matches it was asked to run.
#[derive(Default)]
struct RecordingClock {
    running: HashSet<MatchId>,
    calls: Vec<(&'static str, MatchId)>,
}

impl ClockDriver for RecordingClock {
    fn start(&mut self, match_id: MatchId) {
        self.running.insert(match_id);
        self.calls.push(("start", match_id));
    }

    fn stop(&mut self, match_id: MatchId) {
        self.running.remove(&match_id);
        self.calls.push(("stop", match_id));
    }
}

fn teams() -> (Team, Team, Vec<Player>) {
    let home = Team::new("Lions", "lions.png");
    let away = Team::new("Sharks", "sharks.png");
    let roster = vec![
        Player::new(home.id, 9, "Scrum Half"),
        Player::new(home.id, 1, "Prop"),
        Player::new(away.id, 10, "Fly Half"),
    ];
    (home, away, roster)
}

fn new_match() -> Match {
    let (home, away, roster) = teams();
    Match::new(
        MatchSide::from_roster(&home, &roster),
        MatchSide::from_roster(&away, &roster),
        Utc::now(),
    )
}

fn admin() -> User {
    Account::new("admin", "x", "Admin").to_user(Role::Admin)
}

fn coach() -> User {
    Account::new("coach", "x", "Coach").to_user(Role::Coach)
}

#[test]
fn full_match_lifecycle() {
    let mut m = new_match();
    let mut clock = RecordingClock::default();
    let admin = admin();
    assert_eq!((m.status, m.half, m.elapsed_seconds, m.timer_running), (MatchStatus::Upcoming, 1, 0, false));

    change_status(&mut m, &admin, MatchStatus::Live, &mut clock).unwrap();
    assert_eq!(m.status, MatchStatus::Live);
    assert!(m.timer_running);
    assert!(clock.running.contains(&m.id));
    assert_eq!(m.half, 1);

    m.elapsed_seconds = 40 * 60;
    change_status(&mut m, &admin, MatchStatus::HalfTime, &mut clock).unwrap();
    assert!(!m.timer_running);
    assert!(!clock.running.contains(&m.id));

    change_status(&mut m, &admin, MatchStatus::Live, &mut clock).unwrap();
    assert_eq!(m.half, 2);
    assert!(m.timer_running);
    assert!(clock.running.contains(&m.id));
    assert_eq!(m.elapsed_seconds, 40 * 60);

    change_status(&mut m, &admin, MatchStatus::Ended, &mut clock).unwrap();
    assert_eq!(m.status, MatchStatus::Ended);
    assert!(!m.timer_running);
    assert!(clock.running.is_empty());
    assert!(m.status.valid_next_states().is_empty());
}

#[test]
fn match_can_end_at_half_time() {
    let mut m = new_match();
    let mut clock = RecordingClock::default();
    for to in [MatchStatus::Live, MatchStatus::HalfTime, MatchStatus::Ended] {
        change_status(&mut m, &admin(), to, &mut clock).unwrap();
    }
    assert_eq!(m.status, MatchStatus::Ended);
    assert!(clock.running.is_empty());
}

#[test]
fn invalid_transitions_change_nothing() {
    let cases = [
        (MatchStatus::Upcoming, MatchStatus::HalfTime),
        (MatchStatus::Upcoming, MatchStatus::Ended),
        (MatchStatus::Upcoming, MatchStatus::Upcoming),
        (MatchStatus::Live, MatchStatus::Live),
        (MatchStatus::Live, MatchStatus::Upcoming),
        (MatchStatus::HalfTime, MatchStatus::HalfTime),
        (MatchStatus::HalfTime, MatchStatus::Upcoming),
        (MatchStatus::Ended, MatchStatus::Live),
        (MatchStatus::Ended, MatchStatus::HalfTime),
        (MatchStatus::Ended, MatchStatus::Upcoming),
    ];
    for (from, to) in cases {
        let mut m = new_match();
        m.status = from;
        m.timer_running = from == MatchStatus::Live;
        let mut clock = RecordingClock::default();

        let res = change_status(&mut m, &admin(), to, &mut clock);

        assert_eq!(res, Err(MatchError::InvalidTransition { from, to }), "{from} -> {to}");
        assert_eq!(m.status, from);
        assert_eq!(m.timer_running, from == MatchStatus::Live);
        assert_eq!(m.half, 1);
        assert!(clock.calls.is_empty());
    }
}

#[test]
fn next_states_follow_the_transition_table() {
    assert_eq!(MatchStatus::Upcoming.valid_next_states(), vec![MatchStatus::Live]);
    assert_eq!(
        MatchStatus::Live.valid_next_states(),
        vec![MatchStatus::HalfTime, MatchStatus::Ended]
    );
    assert_eq!(
        MatchStatus::HalfTime.valid_next_states(),
        vec![MatchStatus::Live, MatchStatus::Ended]
    );
    assert!(MatchStatus::Ended.valid_next_states().is_empty());
}

#[test]
fn only_admins_change_status() {
    let mut m = new_match();
    let coach = coach();
    m.coach_id = Some(coach.id);
    let mut clock = RecordingClock::default();

    let res = change_status(&mut m, &coach, MatchStatus::Live, &mut clock);

    assert_eq!(res, Err(MatchError::AdminOnly));
    assert_eq!(m.status, MatchStatus::Upcoming);
    assert!(clock.calls.is_empty());
}

#[test]
fn clock_advances_only_when_live_and_running() {
    let mut m = new_match();
    let mut clock = RecordingClock::default();

    assert!(!m.tick());
    assert_eq!(m.elapsed_seconds, 0);

    change_status(&mut m, &admin(), MatchStatus::Live, &mut clock).unwrap();
    for _ in 0..90 {
        m.tick();
    }
    assert_eq!(m.elapsed_seconds, 90);

    toggle_timer(&mut m, &admin(), &mut clock).unwrap();
    assert!(!m.tick());
    assert_eq!(m.elapsed_seconds, 90);

    toggle_timer(&mut m, &admin(), &mut clock).unwrap();
    assert!(m.tick());

    change_status(&mut m, &admin(), MatchStatus::HalfTime, &mut clock).unwrap();
    m.timer_running = true;
    assert!(!m.tick(), "half-time never ticks");
    assert_eq!(m.elapsed_seconds, 91);

    change_status(&mut m, &admin(), MatchStatus::Ended, &mut clock).unwrap();
    assert!(!m.tick());
    assert_eq!(m.elapsed_seconds, 91);
}

#[test]
fn timer_toggle_requires_live_match() {
    let mut m = new_match();
    let mut clock = RecordingClock::default();
    assert_eq!(toggle_timer(&mut m, &admin(), &mut clock), Err(MatchError::ClockNotLive));

    change_status(&mut m, &admin(), MatchStatus::Live, &mut clock).unwrap();
    assert_eq!(toggle_timer(&mut m, &admin(), &mut clock), Ok(false));
    assert!(!clock.running.contains(&m.id));
    assert_eq!(toggle_timer(&mut m, &admin(), &mut clock), Ok(true));
    assert!(clock.running.contains(&m.id));

    change_status(&mut m, &admin(), MatchStatus::HalfTime, &mut clock).unwrap();
    assert_eq!(toggle_timer(&mut m, &admin(), &mut clock), Err(MatchError::ClockNotLive));
    assert!(!m.timer_running);
}

#[test]
fn timer_toggle_by_coach_needs_ownership() {
    let mut m = new_match();
    let mut clock = RecordingClock::default();
    change_status(&mut m, &admin(), MatchStatus::Live, &mut clock).unwrap();

    let stranger = coach();
    assert_eq!(toggle_timer(&mut m, &stranger, &mut clock), Err(MatchError::Forbidden));
    assert!(m.timer_running);

    let owner = coach();
    m.coach_id = Some(owner.id);
    assert_eq!(toggle_timer(&mut m, &owner, &mut clock), Ok(false));

    let mut account = Account::new("home", "x", "Home Coach");
    account.team_id = Some(m.sides[0].team_id);
    let home_coach = account.to_user(Role::Coach);
    assert_eq!(toggle_timer(&mut m, &home_coach, &mut clock), Ok(true));
}

#[test]
fn schedule_builds_sheets_from_rosters() {
    let (home, away, roster) = teams();
    let when = Utc.with_ymd_and_hms(2026, 3, 14, 15, 0, 0).unwrap();
    let form = ScheduleForm {
        tournament_id: None,
        team1_id: Some(home.id),
        team2_id: Some(away.id),
        scheduled_date: Some(when),
        venue: Some("  Main Pitch ".to_string()),
    };

    let m = schedule_match(&form, &[home.clone(), away.clone()], &roster, &admin()).unwrap();

    assert_eq!(m.status, MatchStatus::Upcoming);
    assert_eq!(m.team_ids(), [home.id, away.id]);
    assert_eq!(m.venue.as_deref(), Some("Main Pitch"));
    assert_eq!(m.scheduled_date, when);
    assert_eq!(m.coach_id, None);
    let jerseys: Vec<u8> = m.sides[0].players.iter().map(|p| p.jersey_number).collect();
    assert_eq!(jerseys, vec![1, 9]);
    assert_eq!(m.sides[1].players.len(), 1);
    assert!(m.sides.iter().all(|s| s.score == 0));
}

#[test]
fn schedule_rejects_bad_team_choices() {
    let (home, away, roster) = teams();
    let all = [home.clone(), away.clone()];

    let same = ScheduleForm {
        tournament_id: None,
        team1_id: Some(home.id),
        team2_id: Some(home.id),
        scheduled_date: Some(Utc::now()),
        venue: None,
    };
    let errors = schedule_match(&same, &all, &roster, &admin()).unwrap_err();
    assert_eq!(errors.get("team2_id"), Some("A team cannot play itself"));

    let missing = ScheduleForm {
        tournament_id: None,
        team1_id: None,
        team2_id: Some(uuid::Uuid::new_v4()),
        scheduled_date: None,
        venue: None,
    };
    let errors = schedule_match(&missing, &all, &roster, &admin()).unwrap_err();
    assert_eq!(errors.get("team1_id"), Some("Team selection is required"));
    assert_eq!(errors.get("team2_id"), Some("Team not found"));
    assert_eq!(errors.get("scheduled_date"), Some("Scheduled date is required"));
}

#[test]
fn coach_schedules_own_matches_and_only_sees_those() {
    let (home, away, roster) = teams();
    let coach = coach();
    let form = ScheduleForm {
        tournament_id: None,
        team1_id: Some(home.id),
        team2_id: Some(away.id),
        scheduled_date: Some(Utc::now()),
        venue: None,
    };

    let mine = schedule_match(&form, &[home.clone(), away.clone()], &roster, &coach).unwrap();
    let theirs = schedule_match(&form, &[home, away], &roster, &admin()).unwrap();

    assert_eq!(mine.coach_id, Some(coach.id));
    assert!(visible_to(&coach, &mine));
    assert!(!visible_to(&coach, &theirs));
    assert!(visible_to(&admin(), &mine));
    assert!(visible_to(&admin(), &theirs));
}
