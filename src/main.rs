use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use partnerme::auth::{self, rate_limit::RateLimiter};
use partnerme::config::Config;
use partnerme::handlers::{self, Limiters, MediaState};
use partnerme::media::{PassthroughProcessor, store::MediaStore};
use partnerme::moderation::cleanup;
use partnerme::db;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    std::fs::create_dir_all("data").expect("Failed to create data directory");

    let pool = db::init_pool(&config.database_url)
        .await
        .expect("Failed to create DB pool");
    db::run_migrations(&pool).await.expect("Failed to run migrations");

    let admin_hash = auth::password::hash_password("admin123")
        .expect("Failed to hash default password");
    db::seed_admin(&pool, &admin_hash)
        .await
        .expect("Failed to seed admin user");

    let media_store = MediaStore::new(&config.upload_dir).expect("Failed to init upload dir");
    let media_state = MediaState {
        store: media_store,
        processor: Arc::new(PassthroughProcessor),
    };

    let limiters = Limiters {
        login: RateLimiter::new(config.login_max_attempts, config.login_window),
        submit: RateLimiter::new(config.submit_max_attempts, config.submit_window),
        upload: RateLimiter::new(config.upload_max_attempts, config.upload_window),
    };

    cleanup::spawn_scheduler(pool.clone(), config.upload_dir.clone(), config.orphan_retention);

    // Session encryption key from SESSION_KEY for persistence across restarts.
    let secret_key = match std::env::var("SESSION_KEY") {
        Ok(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Ok(val) => {
            log::warn!(
                "SESSION_KEY too short ({} bytes, need 64+) - generating random key",
                val.len()
            );
            Key::generate()
        }
        Err(_) => {
            log::warn!("No SESSION_KEY set - generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let bind_addr = config.bind_addr.clone();
    let max_upload_bytes = config.max_upload_bytes;
    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(
            CookieSessionStore::default(),
            secret_key.clone(),
        )
        .cookie_secure(false)
        .cookie_http_only(true)
        .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(limiters.clone()))
            .app_data(web::Data::new(media_state.clone()))
            .app_data(web::PayloadConfig::new(max_upload_bytes + 1024))
            // Admin session
            .route("/admin/login", web::post().to(handlers::auth_handlers::login))
            .route("/admin/logout", web::post().to(handlers::auth_handlers::logout))
            // Public API
            .service(
                web::scope("/api")
                    .route(
                        "/submissions/anonymous",
                        web::post().to(handlers::submission_handlers::create_anonymous),
                    )
                    .route("/upload", web::post().to(handlers::upload_handlers::upload))
                    .route("/ideas", web::get().to(handlers::idea_handlers::list))
                    .route("/ideas/{id}", web::get().to(handlers::idea_handlers::detail))
                    .route(
                        "/ideas/{id}/partnership-requests",
                        web::post().to(handlers::partnership_handlers::create),
                    )
                    // Admin review surface
                    .service(
                        web::scope("/admin")
                            .wrap(actix_web::middleware::from_fn(
                                auth::middleware::require_admin_session,
                            ))
                            .wrap(actix_web::middleware::from_fn(
                                auth::middleware::require_json_content_type,
                            ))
                            .route(
                                "/submissions/pending",
                                web::get().to(handlers::review_handlers::pending),
                            )
                            .route(
                                "/submissions/stats",
                                web::get().to(handlers::review_handlers::stats),
                            )
                            .route(
                                "/submissions/{id}",
                                web::get().to(handlers::review_handlers::detail),
                            )
                            .route(
                                "/submissions/{id}",
                                web::patch().to(handlers::review_handlers::edit),
                            )
                            .route(
                                "/submissions/{id}/approve",
                                web::patch().to(handlers::review_handlers::approve),
                            )
                            .route(
                                "/submissions/{id}/reject",
                                web::patch().to(handlers::review_handlers::reject),
                            )
                            .route(
                                "/submissions/{id}/flag",
                                web::patch().to(handlers::review_handlers::flag),
                            )
                            .route(
                                "/submissions/{id}/unflag",
                                web::patch().to(handlers::review_handlers::unflag),
                            )
                            .route(
                                "/partnership-requests",
                                web::get().to(handlers::partnership_handlers::list),
                            )
                            .route(
                                "/partnership-requests/{id}",
                                web::patch().to(handlers::partnership_handlers::update_status),
                            ),
                    ),
            )
            // Default JSON 404 (registered last)
            .default_service(web::to(|| async {
                actix_web::HttpResponse::NotFound().json(serde_json::json!({
                    "success": false,
                    "error": { "code": "NOT_FOUND", "message": "Not found" }
                }))
            }))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
