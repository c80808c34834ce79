use std::io;
use std::sync::Arc;

use actix_web::web;
use dotenvy::dotenv;
use quickbite_orders::config::Config;
use quickbite_orders::infrastructure::jwt::JwtVerifier;
use quickbite_orders::{build_server, create_pool, run_migrations, AppState};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(io::Error::other)?;

    let pool = create_pool(&config.database_url, config.db_pool_size).map_err(io::Error::other)?;
    run_migrations(&pool).map_err(io::Error::other)?;

    let identity = Arc::new(JwtVerifier::new(&config.jwt_secret));
    let state = web::Data::new(AppState::with_postgres(pool, identity));

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(state, &config.host, config.port)?.await
}
