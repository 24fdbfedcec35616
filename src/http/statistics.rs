use super::{read, require_page, ApiError, Db, Sessions};
use crate::logic::compile_statistics;
use crate::models::Page;
use actix_session::Session;
use actix_web::{get, HttpResponse};

#[get("/api/statistics")]
pub(super) async fn api_statistics(
    db: Db,
    sessions: Sessions,
    session: Session,
) -> Result<HttpResponse, ApiError> {
    require_page(&session, &sessions, &db, Page::Statistics)?;
    let g = read(&db)?;
    let report = compile_statistics(
        &g.teams,
        &g.players,
        g.matches.values(),
        g.scoring_events.all(),
    );
    Ok(HttpResponse::Ok().json(report))
}
