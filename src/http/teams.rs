use super::{list_response, require_page, write, ApiError, Db, Sessions};
use crate::logic::{authorize_mutation, validate_team};
use crate::models::{Page, Role, Team, TeamForm, TeamId};
use actix_session::Session;
use actix_web::{
    delete, get, post, put,
    web::{Json, Path},
    HttpResponse,
};

#[get("/api/teams")]
pub(super) async fn api_list_teams(
    db: Db,
    sessions: Sessions,
    session: Session,
) -> Result<HttpResponse, ApiError> {
    require_page(&session, &sessions, &db, Page::Teams)?;
    Ok(list_response(&db, "teams", |g| {
        let mut list: Vec<&Team> = g.teams.iter().collect();
        list.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        HttpResponse::Ok().json(list)
    }))
}

#[post("/api/teams")]
pub(super) async fn api_create_team(
    db: Db,
    sessions: Sessions,
    session: Session,
    body: Json<TeamForm>,
) -> Result<HttpResponse, ApiError> {
    let user = require_page(&session, &sessions, &db, Page::Teams)?;
    let form = body.into_inner().normalized();
    let mut g = write(&db)?;
    validate_team(&form, &g.teams, None)?;

    let mut team = Team::new(form.name.trim(), form.logo.trim());
    team.apply_form(&form);
    if user.role == Role::Coach {
        team.coach_id = Some(user.id);
    }
    log::info!("{} created team '{}'", user.username, team.name);
    g.teams.push(team.clone());
    Ok(HttpResponse::Created().json(team))
}

#[put("/api/teams/{id}")]
pub(super) async fn api_update_team(
    db: Db,
    sessions: Sessions,
    session: Session,
    path: Path<TeamId>,
    body: Json<TeamForm>,
) -> Result<HttpResponse, ApiError> {
    let user = require_page(&session, &sessions, &db, Page::Teams)?;
    let id = path.into_inner();
    let form = body.into_inner().normalized();
    let mut g = write(&db)?;
    let owner = g.team(id).ok_or_else(|| ApiError::not_found("Team"))?.owner();
    if !authorize_mutation(Some(&user), &owner) {
        return Err(ApiError::Forbidden("You can only edit your own team".to_string()));
    }
    validate_team(&form, &g.teams, Some(id))?;
    let team = g.team_mut(id).ok_or_else(|| ApiError::not_found("Team"))?;
    team.apply_form(&form);
    Ok(HttpResponse::Ok().json(&*team))
}

#[delete("/api/teams/{id}")]
pub(super) async fn api_delete_team(
    db: Db,
    sessions: Sessions,
    session: Session,
    path: Path<TeamId>,
) -> Result<HttpResponse, ApiError> {
    let user = require_page(&session, &sessions, &db, Page::Teams)?;
    let id = path.into_inner();
    let mut g = write(&db)?;
    let owner = g.team(id).ok_or_else(|| ApiError::not_found("Team"))?.owner();
    if !authorize_mutation(Some(&user), &owner) {
        return Err(ApiError::Forbidden("You can only delete your own team".to_string()));
    }
    g.delete_team(id);
    log::info!("{} deleted team {} and its players", user.username, id);
    Ok(HttpResponse::NoContent().finish())
}
