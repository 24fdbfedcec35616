//! Single binary web server: JSON API under /api.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. See `Config` for the environment variables it reads.

use actix_web::{cookie::Key, middleware::Logger, App, HttpServer};
use chrono::Utc;
use rugby_scoring_web::logic::hash_password;
use rugby_scoring_web::{session_middleware, Account, AppHandles, Config, Database};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| std::io::Error::other(e.to_string()))?;
    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let mut database = Database::new();
    match &config.admin_password {
        Some(password) => {
            let hash = hash_password(password).map_err(|e| std::io::Error::other(e.to_string()))?;
            database.add_admin(Account::new(config.admin_username.as_str(), hash, "Administrator"));
            log::info!("Bootstrap admin account '{}' ready", config.admin_username);
        }
        None => log::warn!("ADMIN_PASSWORD not set: no admin account can log in"),
    }

    let key = match &config.session_key {
        Some(bytes) => Key::from(bytes.as_slice()),
        None => {
            log::warn!("SESSION_KEY not set: sessions will not survive a restart");
            Key::generate()
        }
    };

    let handles = AppHandles::new(database, config.coach_idle_timeout, config.clock_tick);

    // Background task: log out coaches idle past the timeout
    let sessions_sweep = handles.sessions.clone();
    let sweep_every = config.session_sweep;
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(sweep_every);
        loop {
            interval.tick().await;
            let mut g = match sessions_sweep.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            for user in g.expire_idle(Utc::now()) {
                log::info!("Logged out coach '{}' after inactivity", user.username);
            }
        }
    });

    let cookie_secure = config.cookie_secure;
    HttpServer::new(move || {
        App::new()
            .wrap(session_middleware(key.clone(), cookie_secure))
            .wrap(Logger::default())
            .configure(|cfg| handles.configure(cfg))
    })
    .bind(bind)?
    .run()
    .await
}
