pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod openapi;
pub mod schema;
pub mod state;

use actix_web::{error, middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use db::{create_pool, DbPool};
pub use state::AppState;

use errors::AppError;
use openapi::ApiDoc;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// Registers every route plus body/query error handlers that report
/// malformed input as `400 {"error": ...}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        error::Error::from(AppError::BadRequest(err.to_string()))
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        error::Error::from(AppError::BadRequest(err.to_string()))
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        error::Error::from(AppError::BadRequest(err.to_string()))
    }))
    .route("/", web::get().to(handlers::health))
    .service(
        web::scope("/api/user")
            .route("/menu-items", web::get().to(handlers::menu::list_menu_items))
            .route("/menu-items/{id}", web::get().to(handlers::menu::get_menu_item))
            .service(
                web::resource("/cart")
                    .route(web::get().to(handlers::cart::get_cart))
                    .route(web::post().to(handlers::cart::add_to_cart))
                    .route(web::put().to(handlers::cart::update_cart))
                    .route(web::delete().to(handlers::cart::clear_cart)),
            )
            .route(
                "/cart/{menu_item_id}",
                web::delete().to(handlers::cart::remove_from_cart),
            )
            .service(
                web::resource("/orders")
                    .route(web::post().to(handlers::orders::create_order))
                    .route(web::get().to(handlers::orders::list_orders)),
            )
            .route("/orders/{order_id}", web::get().to(handlers::orders::get_order))
            .route(
                "/orders/{order_id}/cancel",
                web::put().to(handlers::orders::cancel_order),
            ),
    )
    .service(
        web::scope("/api/delivery")
            .route(
                "/orders",
                web::get().to(handlers::delivery::list_assigned_orders),
            )
            .route(
                "/orders/{order_id}/status",
                web::put().to(handlers::delivery::update_order_status),
            ),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: web::Data<AppState>,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let openapi = ApiDoc::openapi();
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            .configure(configure)
    })
    .bind((host.to_string(), port))?
    .run())
}
