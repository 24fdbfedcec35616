use super::{list_response, require_admin, require_page, write, ApiError, Db, Sessions};
use crate::logic::validate_tournament;
use crate::models::{Page, Tournament, TournamentForm, TournamentId};
use actix_session::Session;
use actix_web::{
    delete, get, post, put,
    web::{Json, Path},
    HttpResponse,
};

#[get("/api/tournaments")]
pub(super) async fn api_list_tournaments(
    db: Db,
    sessions: Sessions,
    session: Session,
) -> Result<HttpResponse, ApiError> {
    require_page(&session, &sessions, &db, Page::Tournaments)?;
    Ok(list_response(&db, "tournaments", |g| {
        let mut list: Vec<&Tournament> = g.tournaments.iter().collect();
        list.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        HttpResponse::Ok().json(list)
    }))
}

#[post("/api/tournaments")]
pub(super) async fn api_create_tournament(
    db: Db,
    sessions: Sessions,
    session: Session,
    body: Json<TournamentForm>,
) -> Result<HttpResponse, ApiError> {
    require_page(&session, &sessions, &db, Page::Tournaments)?;
    let user = require_admin(&session, &sessions)?;
    let form = body.into_inner().normalized();
    let mut g = write(&db)?;
    validate_tournament(&form, &g.tournaments, None)?;
    let tournament = Tournament::from_form(&form).ok_or_else(ApiError::internal)?;
    log::info!("{} created tournament '{}'", user.username, tournament.name);
    g.tournaments.push(tournament.clone());
    Ok(HttpResponse::Created().json(tournament))
}

#[put("/api/tournaments/{id}")]
pub(super) async fn api_update_tournament(
    db: Db,
    sessions: Sessions,
    session: Session,
    path: Path<TournamentId>,
    body: Json<TournamentForm>,
) -> Result<HttpResponse, ApiError> {
    require_page(&session, &sessions, &db, Page::Tournaments)?;
    require_admin(&session, &sessions)?;
    let id = path.into_inner();
    let form = body.into_inner().normalized();
    let mut g = write(&db)?;
    validate_tournament(&form, &g.tournaments, Some(id))?;
    let tournament = g
        .tournament_mut(id)
        .ok_or_else(|| ApiError::not_found("Tournament"))?;
    tournament.apply_form(&form);
    Ok(HttpResponse::Ok().json(&*tournament))
}

#[delete("/api/tournaments/{id}")]
pub(super) async fn api_delete_tournament(
    db: Db,
    sessions: Sessions,
    session: Session,
    path: Path<TournamentId>,
) -> Result<HttpResponse, ApiError> {
    require_page(&session, &sessions, &db, Page::Tournaments)?;
    let user = require_admin(&session, &sessions)?;
    let id = path.into_inner();
    let mut g = write(&db)?;
    let before = g.tournaments.len();
    g.tournaments.retain(|t| t.id != id);
    if g.tournaments.len() == before {
        return Err(ApiError::not_found("Tournament"));
    }
    log::info!("{} deleted tournament {}", user.username, id);
    Ok(HttpResponse::NoContent().finish())
}
