//! JSON API: handlers, shared state and the session cookie.

mod admin;
mod api_error;
mod auth_handler;
mod health;
mod matches;
mod players;
mod statistics;
mod teams;
mod tournaments;
mod tracking;

pub use api_error::ApiError;

use crate::logic::{page_access, Access, IntervalClock, SessionId, SessionRegistry, TickFn};
use crate::models::{MatchId, Page, User};
use crate::store::Database;
use actix_session::config::CookieContentSecurity;
use actix_session::storage::CookieSessionStore;
use actix_session::{Session, SessionMiddleware};
use actix_web::cookie::Key;
use actix_web::web::{self, Data};
use actix_web::HttpResponse;
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

/// Every table, shared by all workers.
pub type Db = Data<RwLock<Database>>;
/// Server-side half of the login sessions.
pub type Sessions = Data<RwLock<SessionRegistry>>;
/// Tickers of running match clocks.
pub type Clock = Data<Mutex<IntervalClock>>;

/// Cookie entry holding the opaque [`SessionId`].
const SESSION_ID_KEY: &str = "session_id";

/// Shared state handed to every worker.
#[derive(Clone)]
pub struct AppHandles {
    pub db: Db,
    pub sessions: Sessions,
    pub clock: Clock,
}

impl AppHandles {
    /// Wrap `database` and build a clock whose ticks advance matches in it.
    pub fn new(database: Database, coach_idle_timeout: Duration, clock_tick: Duration) -> Self {
        let db: Db = Data::new(RwLock::new(database));
        let tick_db = db.clone();
        let on_tick: TickFn = Arc::new(move |match_id: MatchId| match tick_db.write() {
            Ok(mut g) => g.matches.get_mut(&match_id).is_some_and(|m| m.tick()),
            Err(_) => false,
        });
        Self {
            db,
            sessions: Data::new(RwLock::new(SessionRegistry::new(coach_idle_timeout))),
            clock: Data::new(Mutex::new(IntervalClock::new(clock_tick, on_tick))),
        }
    }

    /// Register state and every API route.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.db.clone())
            .app_data(self.sessions.clone())
            .app_data(self.clock.clone())
            .service(health::api_health)
            .service(auth_handler::api_login)
            .service(auth_handler::api_logout)
            .service(auth_handler::api_me)
            .service(tournaments::api_list_tournaments)
            .service(tournaments::api_create_tournament)
            .service(tournaments::api_update_tournament)
            .service(tournaments::api_delete_tournament)
            .service(teams::api_list_teams)
            .service(teams::api_create_team)
            .service(teams::api_update_team)
            .service(teams::api_delete_team)
            .service(players::api_list_players)
            .service(players::api_create_player)
            .service(players::api_update_player)
            .service(players::api_delete_player)
            .service(matches::api_list_matches)
            .service(matches::api_schedule_match)
            .service(matches::api_get_match)
            .service(matches::api_change_status)
            .service(matches::api_toggle_timer)
            .service(matches::api_add_score)
            .service(matches::api_list_events)
            .service(statistics::api_statistics)
            .service(tracking::api_export_tracking)
            .service(tracking::api_list_tracking)
            .service(tracking::api_create_tracking)
            .service(admin::api_list_coaches)
            .service(admin::api_create_coach)
            .service(admin::api_set_coach_active)
            .service(admin::api_set_coach_permissions);
    }
}

/// Signed cookie session carrying only the session id.
pub fn session_middleware(key: Key, cookie_secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("rugby_session".to_string())
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_secure(cookie_secure)
        .build()
}

pub(crate) fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, ApiError> {
    lock.read().map_err(|_| ApiError::internal())
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, ApiError> {
    lock.write().map_err(|_| ApiError::internal())
}

/// Answer a list request under the read lock. Reads fail open: a poisoned lock answers `[]`.
pub(crate) fn list_response<T>(
    lock: &RwLock<T>,
    what: &str,
    respond: impl FnOnce(&T) -> HttpResponse,
) -> HttpResponse {
    match lock.read() {
        Ok(g) => respond(&g),
        Err(_) => {
            log::error!("Failed to load {}, answering with an empty list", what);
            HttpResponse::Ok().json(Vec::<serde_json::Value>::new())
        }
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, ApiError> {
    mutex.lock().map_err(|_| ApiError::internal())
}

/// Resolve the logged-in user and count the request as activity.
/// An expired or unknown session is cleared from the cookie.
pub(crate) fn current_user(session: &Session, sessions: &Sessions) -> Result<User, ApiError> {
    let id = session
        .get::<SessionId>(SESSION_ID_KEY)
        .ok()
        .flatten()
        .ok_or_else(ApiError::login_required)?;
    let user = write(sessions)?.touch(id, Utc::now());
    match user {
        Some(user) => Ok(user),
        None => {
            session.purge();
            Err(ApiError::Unauthorized(
                "Your session has expired. Please log in again.".to_string(),
            ))
        }
    }
}

/// Logged in and allowed on `page`.
pub(crate) fn require_page(
    session: &Session,
    sessions: &Sessions,
    db: &Db,
    page: Page,
) -> Result<User, ApiError> {
    let user = current_user(session, sessions)?;
    // Without readable flags a coach is denied; admins need none.
    let stored = match db.read() {
        Ok(g) => g.permissions_of(user.id).copied(),
        Err(_) => {
            log::error!("Failed to load permissions of '{}'", user.username);
            None
        }
    };
    match page_access(Some(&user), stored.as_ref(), page) {
        Access::Granted => Ok(user),
        Access::LoginRequired => Err(ApiError::login_required()),
        Access::Denied => {
            log::warn!("User '{}' denied access to {:?}", user.username, page);
            Err(ApiError::page_denied())
        }
    }
}

pub(crate) fn require_admin(session: &Session, sessions: &Sessions) -> Result<User, ApiError> {
    let user = current_user(session, sessions)?;
    if !crate::logic::is_admin(&user) {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }
    Ok(user)
}

pub(crate) fn store_session(session: &Session, id: SessionId) -> Result<(), ApiError> {
    session.renew();
    session
        .insert(SESSION_ID_KEY, id)
        .map_err(|_| ApiError::internal())
}

pub(crate) fn session_id(session: &Session) -> Option<SessionId> {
    session.get::<SessionId>(SESSION_ID_KEY).ok().flatten()
}
