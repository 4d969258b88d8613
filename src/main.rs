use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use useradmin::config::AppConfig;
use useradmin::{build_admin, configure, db, not_found, session_middleware};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Ignoring unreadable .env file: {e}");
        }
    }
    env_logger::init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let store = db::open_store(&config).await.map_err(std::io::Error::other)?;
    let admin = build_admin(store, &config);
    db::seed_admin(admin.user_manager(), admin.role_manager(), &config.admin)
        .await
        .map_err(std::io::Error::other)?;

    // Load from SESSION_KEY for sessions that survive restarts
    let secret_key = match config.session_key.as_deref() {
        Some(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Some(val) => {
            log::warn!("SESSION_KEY too short ({} bytes, need 64+), generating random key", val.len());
            Key::generate()
        }
        None => {
            log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let admin = web::Data::new(admin);
    let secure = config.session_cookie_secure;

    log::info!("Starting server at http://{}", config.bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(session_middleware(secret_key.clone(), secure))
            .wrap(middleware::Logger::default())
            .app_data(admin.clone())
            .configure(configure)
            // Default 404 handler (must be registered last)
            .default_service(web::to(not_found))
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
