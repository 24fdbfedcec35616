use super::{list_response, require_page, write, ApiError, Db, Sessions};
use crate::logic::{authorize_mutation, validate_player, FieldErrors};
use crate::models::{Page, Player, PlayerForm, PlayerId, TeamId, User};
use crate::store::Database;
use actix_session::Session;
use actix_web::{
    delete, get, post, put,
    web::{Json, Path, Query},
    HttpResponse,
};
use serde::Deserialize;

#[derive(Deserialize)]
pub(super) struct TeamFilter {
    team_id: Option<TeamId>,
}

/// The form's team must exist and belong to the user.
fn check_team(db: &Database, user: &User, team_id: Option<TeamId>) -> Result<(), ApiError> {
    let Some(team_id) = team_id else {
        return Ok(());
    };
    let Some(team) = db.team(team_id) else {
        let mut errors = FieldErrors::new();
        errors.add("team_id", "Team not found");
        return Err(errors.into());
    };
    if !authorize_mutation(Some(user), &team.owner()) {
        return Err(ApiError::Forbidden(
            "You can only manage players of your own team".to_string(),
        ));
    }
    Ok(())
}

#[get("/api/players")]
pub(super) async fn api_list_players(
    db: Db,
    sessions: Sessions,
    session: Session,
    query: Query<TeamFilter>,
) -> Result<HttpResponse, ApiError> {
    require_page(&session, &sessions, &db, Page::Players)?;
    Ok(list_response(&db, "players", |g| {
        let list: Vec<&Player> = match query.team_id {
            Some(team_id) => g.team_players(team_id),
            None => {
                let mut all: Vec<&Player> = g.players.iter().collect();
                all.sort_by_key(|p| (p.team_id, p.jersey_number));
                all
            }
        };
        HttpResponse::Ok().json(list)
    }))
}

#[post("/api/players")]
pub(super) async fn api_create_player(
    db: Db,
    sessions: Sessions,
    session: Session,
    body: Json<PlayerForm>,
) -> Result<HttpResponse, ApiError> {
    let user = require_page(&session, &sessions, &db, Page::Players)?;
    let form = body.into_inner().normalized();
    let mut g = write(&db)?;
    check_team(&g, &user, form.team_id)?;
    validate_player(&form, &g.players, None)?;

    let (Some(team_id), Some(jersey)) = (form.team_id, form.jersey_number) else {
        return Err(ApiError::internal());
    };
    let mut player = Player::new(team_id, jersey as u8, form.name.trim());
    player.apply_form(&form);
    log::info!(
        "{} added player #{} '{}' to team {}",
        user.username,
        player.jersey_number,
        player.name,
        team_id
    );
    g.players.push(player.clone());
    Ok(HttpResponse::Created().json(player))
}

#[put("/api/players/{id}")]
pub(super) async fn api_update_player(
    db: Db,
    sessions: Sessions,
    session: Session,
    path: Path<PlayerId>,
    body: Json<PlayerForm>,
) -> Result<HttpResponse, ApiError> {
    let user = require_page(&session, &sessions, &db, Page::Players)?;
    let id = path.into_inner();
    let form = body.into_inner().normalized();
    let mut g = write(&db)?;
    let current_team = g.player(id).ok_or_else(|| ApiError::not_found("Player"))?.team_id;
    check_team(&g, &user, Some(current_team))?;
    check_team(&g, &user, form.team_id)?;
    validate_player(&form, &g.players, Some(id))?;
    let player = g.player_mut(id).ok_or_else(|| ApiError::not_found("Player"))?;
    player.apply_form(&form);
    Ok(HttpResponse::Ok().json(&*player))
}

#[delete("/api/players/{id}")]
pub(super) async fn api_delete_player(
    db: Db,
    sessions: Sessions,
    session: Session,
    path: Path<PlayerId>,
) -> Result<HttpResponse, ApiError> {
    let user = require_page(&session, &sessions, &db, Page::Players)?;
    let id = path.into_inner();
    let mut g = write(&db)?;
    let team_id = g.player(id).ok_or_else(|| ApiError::not_found("Player"))?.team_id;
    check_team(&g, &user, Some(team_id))?;
    g.players.retain(|p| p.id != id);
    log::info!("{} deleted player {}", user.username, id);
    Ok(HttpResponse::NoContent().finish())
}
