mod config;
mod db;
mod entities;
mod error;
mod extract;
mod models;
mod routes;
mod store;
mod templates;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{config::Config, store::MovieStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: MovieStore,
}

pub fn app(state: Arc<AppState>) -> Router {
    let assets = ServeDir::new(&state.config.public_dir);

    Router::new()
        .route("/", get(routes::list).post(routes::create))
        .route("/add", get(routes::add_form))
        .route("/movies/{id_or_title}", get(routes::show).post(routes::update))
        .route("/movies/edit/{id}", get(routes::edit_form))
        .route("/movies/delete/{id}", get(routes::delete))
        .fallback_service(assets)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,movieshelf=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    // Requests fail at the store until the database is reachable.
    let store = match db::connect_and_migrate(&config.database_url).await {
        Ok(db) => {
            tracing::info!("database connection successful");
            MovieStore::new(db)
        }
        Err(err) => {
            tracing::error!(error = %err, "database connection error");
            MovieStore::disconnected()
        }
    };

    let state = Arc::new(AppState { config: config.clone(), store });

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app(state)).with_graceful_shutdown(shutdown_signal()).await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
