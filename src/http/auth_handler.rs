use super::{current_user, read, session_id, store_session, write, ApiError, Db, Sessions};
use crate::logic::{effective_permissions, login};
use crate::models::{PermissionSet, Role, User};
use actix_session::Session;
use actix_web::{get, post, web::Json, HttpResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
struct LoginBody {
    username: String,
    password: String,
    #[serde(default)]
    role: Option<Role>,
}

#[derive(Serialize)]
struct MeResponse {
    user: User,
    permissions: PermissionSet,
}

fn me_response(db: &Db, user: User) -> Result<HttpResponse, ApiError> {
    let g = read(db)?;
    let permissions = effective_permissions(&user, g.permissions_of(user.id));
    Ok(HttpResponse::Ok().json(MeResponse { user, permissions }))
}

#[post("/api/auth/login")]
pub(super) async fn api_login(
    db: Db,
    sessions: Sessions,
    session: Session,
    body: Json<LoginBody>,
) -> Result<HttpResponse, ApiError> {
    let user = {
        let g = read(&db)?;
        login(&g.coaches, &g.admins, &body.username, &body.password, body.role)?
    };
    let id = write(&sessions)?.open(user.clone(), Utc::now());
    store_session(&session, id)?;
    me_response(&db, user)
}

#[post("/api/auth/logout")]
pub(super) async fn api_logout(sessions: Sessions, session: Session) -> Result<HttpResponse, ApiError> {
    if let Some(id) = session_id(&session) {
        if let Some(user) = write(&sessions)?.close(id) {
            log::info!("{} '{}' logged out", user.role, user.username);
        }
    }
    session.purge();
    Ok(HttpResponse::NoContent().finish())
}

#[get("/api/auth/me")]
pub(super) async fn api_me(
    db: Db,
    sessions: Sessions,
    session: Session,
) -> Result<HttpResponse, ApiError> {
    let user = current_user(&session, &sessions)?;
    me_response(&db, user)
}
