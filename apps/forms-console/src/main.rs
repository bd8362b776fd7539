//! Forms Console Server
//!
//! Admin console for building, versioning and previewing workflow forms.
//!
//! - Pages (`/`, `/dashboard`, `/preview/:form_id`) sit behind the request
//!   gate, which redirects to the auth app login or to `/forbidden`
//! - The JSON API under `/api` checks the session itself and answers 401/403
//! - Forms live in memory for the lifetime of the process

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use clap::Parser;
use console_auth::AuthConfig;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod error;
mod gate;
mod guard;
mod handlers;
mod models;
mod pages;
mod preferences;
mod request;
mod state;

use state::AppState;

/// Command-line arguments for the forms console
#[derive(Parser, Debug)]
#[command(name = "forms-console")]
#[command(about = "Admin console for building and versioning forms")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Forms
        .route("/forms", get(handlers::list_forms).post(handlers::create_form))
        .route(
            "/forms/:id",
            get(handlers::get_form)
                .patch(handlers::update_form)
                .delete(handlers::delete_form),
        )
        // Selection
        .route(
            "/selection",
            get(handlers::get_selection).put(handlers::select_form),
        )
        .route("/selection/version", put(handlers::select_version))
        // Editing session
        .route("/forms/:id/edit", post(handlers::start_editing))
        .route(
            "/editing",
            get(handlers::get_editing).delete(handlers::cancel_editing),
        )
        .route(
            "/editing/fields",
            post(handlers::add_field).put(handlers::replace_fields),
        )
        .route(
            "/editing/fields/:field_id",
            patch(handlers::update_field).delete(handlers::delete_field),
        )
        .route("/editing/reorder", post(handlers::reorder_fields))
        // Versions
        .route(
            "/forms/:id/versions",
            get(handlers::list_versions).post(handlers::save_version),
        )
        // Preview
        .route("/forms/:id/preview/prefill", post(handlers::preview_prefill))
        .route("/forms/:id/preview/output", post(handlers::preview_output))
        // Token and preferences
        .route("/token", get(handlers::get_token))
        .route(
            "/preferences",
            put(handlers::update_preferences).delete(handlers::clear_preferences),
        )
}

/// Full router with the request gate in front of every route
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Pages
        .route("/", get(pages::dashboard))
        .route("/dashboard", get(pages::dashboard))
        .route("/preview/:form_id", get(pages::preview))
        // Public
        .route("/health", get(handlers::health))
        .route("/forbidden", get(pages::forbidden))
        .route("/logout", get(pages::logout))
        .nest("/api", api_routes())
        .fallback(pages::not_found)
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    gate::require_admin,
                )),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting forms console on {}:{}", args.host, args.port);

    let state = Arc::new(AppState::new(AuthConfig::from_env())?);
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
