use super::{list_response, read, require_page, write, ApiError, Db, Sessions};
use crate::logic::tracking::records_for_team;
use crate::logic::{authorize_mutation, build_record, export_csv, format_tracking_time, FieldErrors};
use crate::models::{Page, TeamId, TrackingForm, TrackingRecord};
use actix_session::Session;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{
    get, post,
    web::{Json, Query},
    HttpResponse,
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
struct TeamFilter {
    team_id: Option<TeamId>,
}

#[derive(Deserialize)]
struct ExportQuery {
    team_id: TeamId,
}

/// A record with its time rendered for display.
#[derive(Serialize)]
struct TrackingRow<'a> {
    #[serde(flatten)]
    record: &'a TrackingRecord,
    time: String,
}

impl<'a> From<&'a TrackingRecord> for TrackingRow<'a> {
    fn from(record: &'a TrackingRecord) -> Self {
        Self {
            record,
            time: format_tracking_time(record.tracking_time),
        }
    }
}

#[get("/api/tracking")]
pub(super) async fn api_list_tracking(
    db: Db,
    sessions: Sessions,
    session: Session,
    query: Query<TeamFilter>,
) -> Result<HttpResponse, ApiError> {
    require_page(&session, &sessions, &db, Page::PlayerTracking)?;
    Ok(list_response(&db, "tracking records", |g| {
        let rows: Vec<TrackingRow> = match query.team_id {
            Some(team_id) => records_for_team(&g.tracking, team_id)
                .into_iter()
                .map(TrackingRow::from)
                .collect(),
            None => g.tracking.iter().map(TrackingRow::from).collect(),
        };
        HttpResponse::Ok().json(rows)
    }))
}

#[post("/api/tracking")]
pub(super) async fn api_create_tracking(
    db: Db,
    sessions: Sessions,
    session: Session,
    body: Json<TrackingForm>,
) -> Result<HttpResponse, ApiError> {
    let user = require_page(&session, &sessions, &db, Page::PlayerTracking)?;
    let form = body.into_inner().normalized();
    let mut g = write(&db)?;
    let Some(team) = g.team(form.team_id) else {
        let mut errors = FieldErrors::new();
        errors.add("team_id", "Team not found");
        return Err(errors.into());
    };
    if !authorize_mutation(Some(&user), &team.owner()) {
        return Err(ApiError::Forbidden(
            "You can only track players of your own team".to_string(),
        ));
    }
    let record = build_record(&form, &g.players)?;
    log::info!(
        "{} tracked '{}' at {} for player {}",
        user.username,
        record.action,
        format_tracking_time(record.tracking_time),
        record.player_id
    );
    g.tracking.push(record.clone());
    Ok(HttpResponse::Created().json(TrackingRow::from(&record)))
}

#[get("/api/tracking/export")]
pub(super) async fn api_export_tracking(
    db: Db,
    sessions: Sessions,
    session: Session,
    query: Query<ExportQuery>,
) -> Result<HttpResponse, ApiError> {
    require_page(&session, &sessions, &db, Page::PlayerTracking)?;
    let g = read(&db)?;
    let team = g
        .team(query.team_id)
        .ok_or_else(|| ApiError::not_found("Team"))?;
    let csv = export_csv(&g.tracking, &g.players, team.id)?;
    let filename = format!(
        "tracking_{}_{}.csv",
        team.name.replace(|c: char| !c.is_ascii_alphanumeric(), "_"),
        chrono::Utc::now().format("%Y-%m-%d")
    );
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(filename)],
        })
        .body(csv))
}
