use super::{list_response, read, require_admin, write, ApiError, Db, Sessions};
use crate::logic::{hash_password, validate_coach};
use crate::models::{Account, CoachForm, PermissionSet, UserId};
use actix_session::Session;
use actix_web::{
    get, post, put,
    web::{Json, Path},
    HttpResponse,
};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct CoachRow<'a> {
    #[serde(flatten)]
    account: &'a Account,
    permissions: PermissionSet,
}

#[derive(Deserialize)]
struct ActiveBody {
    is_active: bool,
}

#[get("/api/admin/coaches")]
pub(super) async fn api_list_coaches(
    db: Db,
    sessions: Sessions,
    session: Session,
) -> Result<HttpResponse, ApiError> {
    require_admin(&session, &sessions)?;
    Ok(list_response(&db, "coaches", |g| {
        let mut rows: Vec<CoachRow> = g
            .coaches
            .iter()
            .map(|account| CoachRow {
                account,
                permissions: g.permissions_of(account.id).copied().unwrap_or_default(),
            })
            .collect();
        rows.sort_by(|a, b| a.account.username.cmp(&b.account.username));
        HttpResponse::Ok().json(rows)
    }))
}

#[post("/api/admin/coaches")]
pub(super) async fn api_create_coach(
    db: Db,
    sessions: Sessions,
    session: Session,
    body: Json<CoachForm>,
) -> Result<HttpResponse, ApiError> {
    let admin = require_admin(&session, &sessions)?;
    let form = body.into_inner().normalized();
    validate_coach(&form, &read(&db)?.coaches)?;

    let hash = hash_password(&form.password).map_err(|e| {
        log::error!("Could not hash password: {}", e);
        ApiError::internal()
    })?;
    let mut account = Account::new(form.username.as_str(), hash, form.full_name.trim());
    account.email = form.email.clone();
    account.team_id = form.team_id;

    let mut g = write(&db)?;
    // Re-check under the write lock; hashing ran without it.
    validate_coach(&form, &g.coaches)?;
    log::info!("{} created coach account '{}'", admin.username, account.username);
    g.add_coach(account.clone());
    Ok(HttpResponse::Created().json(CoachRow {
        account: &account,
        permissions: PermissionSet::default(),
    }))
}

#[put("/api/admin/coaches/{id}/active")]
pub(super) async fn api_set_coach_active(
    db: Db,
    sessions: Sessions,
    session: Session,
    path: Path<UserId>,
    body: Json<ActiveBody>,
) -> Result<HttpResponse, ApiError> {
    let admin = require_admin(&session, &sessions)?;
    let id = path.into_inner();
    {
        let mut g = write(&db)?;
        let coach = g.coach_mut(id).ok_or_else(|| ApiError::not_found("Coach"))?;
        coach.is_active = body.is_active;
        log::info!(
            "{} {} coach '{}'",
            admin.username,
            if body.is_active { "activated" } else { "deactivated" },
            coach.username
        );
    }
    if !body.is_active {
        let dropped = write(&sessions)?.revoke_user(id);
        if dropped > 0 {
            log::info!("Closed {} session(s) of deactivated coach {}", dropped, id);
        }
    }
    Ok(HttpResponse::NoContent().finish())
}

#[put("/api/admin/coaches/{id}/permissions")]
pub(super) async fn api_set_coach_permissions(
    db: Db,
    sessions: Sessions,
    session: Session,
    path: Path<UserId>,
    body: Json<PermissionSet>,
) -> Result<HttpResponse, ApiError> {
    let admin = require_admin(&session, &sessions)?;
    let id = path.into_inner();
    let mut g = write(&db)?;
    if g.coach(id).is_none() {
        return Err(ApiError::not_found("Coach"));
    }
    let permissions = body.into_inner();
    g.permissions.insert(id, permissions);
    log::info!("{} updated permissions of coach {}", admin.username, id);
    Ok(HttpResponse::Ok().json(permissions))
}
