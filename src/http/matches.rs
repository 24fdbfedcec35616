use super::{list_response, lock, read, require_page, write, ApiError, Clock, Db, Sessions};
use crate::logic::{
    add_score, change_status, format_match_clock, is_admin, schedule_match, toggle_timer, visible_to,
    ScheduleForm, ScoreRequest,
};
use crate::models::{Match, MatchId, MatchStatus, Page, ScoringEvent, User};
use crate::store::Database;
use actix_session::Session;
use actix_web::{
    get, post, put,
    web::{Json, Path},
    HttpResponse,
};
use serde::{Deserialize, Serialize};

/// Live score board of one match.
#[derive(Serialize)]
struct MatchBoard<'a> {
    #[serde(flatten)]
    game: &'a Match,
    clock: String,
    next_states: Vec<MatchStatus>,
    events: Vec<&'a ScoringEvent>,
}

impl<'a> MatchBoard<'a> {
    fn of(game: &'a Match) -> Self {
        Self {
            game,
            clock: format_match_clock(game.elapsed_seconds),
            next_states: game.status.valid_next_states(),
            events: game.events_recent_first().collect(),
        }
    }
}

#[derive(Deserialize)]
struct StatusBody {
    status: MatchStatus,
}

#[derive(Serialize)]
struct TimerResponse {
    timer_running: bool,
    elapsed_seconds: u32,
    clock: String,
}

#[derive(Serialize)]
struct ScoreResponse<'a> {
    event: ScoringEvent,
    #[serde(flatten)]
    board: MatchBoard<'a>,
}

fn visible_match<'a>(db: &'a Database, user: &User, id: MatchId) -> Result<&'a Match, ApiError> {
    let m = db.matches.get(&id).ok_or_else(|| ApiError::not_found("Match"))?;
    if !visible_to(user, m) {
        return Err(ApiError::Forbidden("You are not allowed to view this match".to_string()));
    }
    Ok(m)
}

#[get("/api/matches")]
pub(super) async fn api_list_matches(
    db: Db,
    sessions: Sessions,
    session: Session,
) -> Result<HttpResponse, ApiError> {
    let user = require_page(&session, &sessions, &db, Page::Matches)?;
    Ok(list_response(&db, "matches", |g| {
        let mut list: Vec<&Match> = g.matches.values().filter(|m| visible_to(&user, m)).collect();
        list.sort_by_key(|m| m.scheduled_date);
        HttpResponse::Ok().json(list)
    }))
}

#[post("/api/matches")]
pub(super) async fn api_schedule_match(
    db: Db,
    sessions: Sessions,
    session: Session,
    body: Json<ScheduleForm>,
) -> Result<HttpResponse, ApiError> {
    let user = require_page(&session, &sessions, &db, Page::Matches)?;
    let mut g = write(&db)?;
    let m = schedule_match(&body, &g.teams, &g.players, &user)?;
    let board = serde_json::to_value(MatchBoard::of(&m)).map_err(|_| ApiError::internal())?;
    g.matches.insert(m.id, m);
    Ok(HttpResponse::Created().json(board))
}

#[get("/api/matches/{id}")]
pub(super) async fn api_get_match(
    db: Db,
    sessions: Sessions,
    session: Session,
    path: Path<MatchId>,
) -> Result<HttpResponse, ApiError> {
    let user = require_page(&session, &sessions, &db, Page::Matches)?;
    let g = read(&db)?;
    let m = visible_match(&g, &user, path.into_inner())?;
    Ok(HttpResponse::Ok().json(MatchBoard::of(m)))
}

#[put("/api/matches/{id}/status")]
pub(super) async fn api_change_status(
    db: Db,
    sessions: Sessions,
    clock: Clock,
    session: Session,
    path: Path<MatchId>,
    body: Json<StatusBody>,
) -> Result<HttpResponse, ApiError> {
    let user = require_page(&session, &sessions, &db, Page::Matches)?;
    let mut g = write(&db)?;
    let db = &mut *g;
    let m = db
        .matches
        .get_mut(&path.into_inner())
        .ok_or_else(|| ApiError::not_found("Match"))?;
    // Players added since scheduling join the sheet at kick-off.
    if is_admin(&user) && m.status == MatchStatus::Upcoming && body.status == MatchStatus::Live {
        for side in &mut m.sides {
            side.sync_roster(&db.players);
        }
    }
    let mut clock = lock(&clock)?;
    change_status(m, &user, body.status, &mut *clock)?;
    Ok(HttpResponse::Ok().json(MatchBoard::of(m)))
}

#[post("/api/matches/{id}/timer")]
pub(super) async fn api_toggle_timer(
    db: Db,
    sessions: Sessions,
    clock: Clock,
    session: Session,
    path: Path<MatchId>,
) -> Result<HttpResponse, ApiError> {
    let user = require_page(&session, &sessions, &db, Page::Matches)?;
    let mut g = write(&db)?;
    let m = g
        .matches
        .get_mut(&path.into_inner())
        .ok_or_else(|| ApiError::not_found("Match"))?;
    let mut clock = lock(&clock)?;
    let timer_running = toggle_timer(m, &user, &mut *clock)?;
    Ok(HttpResponse::Ok().json(TimerResponse {
        timer_running,
        elapsed_seconds: m.elapsed_seconds,
        clock: format_match_clock(m.elapsed_seconds),
    }))
}

#[post("/api/matches/{id}/scores")]
pub(super) async fn api_add_score(
    db: Db,
    sessions: Sessions,
    session: Session,
    path: Path<MatchId>,
    body: Json<ScoreRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = require_page(&session, &sessions, &db, Page::Matches)?;
    let mut g = write(&db)?;
    let db = &mut *g;
    let m = db
        .matches
        .get_mut(&path.into_inner())
        .ok_or_else(|| ApiError::not_found("Match"))?;
    let event = add_score(m, &user, &mut db.scoring_events, body.into_inner())?;
    Ok(HttpResponse::Created().json(ScoreResponse {
        event,
        board: MatchBoard::of(m),
    }))
}

#[get("/api/matches/{id}/events")]
pub(super) async fn api_list_events(
    db: Db,
    sessions: Sessions,
    session: Session,
    path: Path<MatchId>,
) -> Result<HttpResponse, ApiError> {
    let user = require_page(&session, &sessions, &db, Page::Matches)?;
    let g = read(&db)?;
    let m = visible_match(&g, &user, path.into_inner())?;
    let events: Vec<&ScoringEvent> = m.events_recent_first().collect();
    Ok(HttpResponse::Ok().json(events))
}
