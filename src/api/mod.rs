//! Lifeboard REST API
//!
//! HTTP API layer for Lifeboard, built with Axum.
//!
//! # Endpoints
//!
//! ## Page
//! - `GET /` - Single-page shell (creates missing tables)
//!
//! ## Study
//! - `GET /api/dashboard_metrics` - Pomodoro totals, exams, weak topics
//! - `GET /api/subjects` - Subjects with lectures
//! - `POST /api/subjects` - Create a subject
//! - `POST /api/subjects/:id/lectures` - Append a lecture
//! - `PUT /api/lectures/:id` - Update lecture progress
//! - `GET /api/exams` - List exams
//! - `POST /api/exams` - Create an exam
//! - `GET /api/mistakes` - List mistakes
//! - `POST /api/mistakes` - Log a mistake
//! - `POST /api/pomodoro` - Log a pomodoro session
//! - `GET /api/subjects/:id/lectures/:number/flashcards` - Flashcards
//! - `POST /api/flashcards` - Create a flashcard
//!
//! ## Courses
//! - `GET /api/courses` - List courses
//! - `POST /api/courses` - Create a course
//! - `GET /api/courses/:id` - One course or null
//! - `POST /api/courses/:id/units` - Append a unit
//! - `PUT /api/course_units/:id` - Toggle unit completion
//!
//! ## Gym
//! - `GET /api/gym/planner` - Weekly planner
//! - `PUT /api/gym/planner` - Upsert a day's plan
//! - `PUT /api/gym/plan/:id/complete` - Complete a plan
//! - `GET /api/gym/exercises` - Exercise catalog
//! - `POST /api/gym/exercises` - Add an exercise
//! - `GET /api/gym/prs` - Personal records
//!
//! ## Basketball
//! - `POST /api/basketball/players` - Add a player
//! - `GET /api/basketball/data` - Players, tags, shots, box score
//! - `POST /api/basketball/tags` - Tag a video event
//! - `POST /api/basketball/shots` - Record a shot
//!
//! ## Schedule
//! - `GET /api/schedule` - A day's entries
//! - `POST /api/schedule` - Create an event
//!
//! ## Reset
//! - `POST /api/reset/:section` - Wipe subjects, courses, gym or basketball
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use lifeboard::api::{serve, ApiConfig, AppState};
//! use lifeboard::storage::{Database, DatabaseConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::open(&DatabaseConfig::new("./lifeboard.db"))?;
//!     let config = ApiConfig::default();
//!
//!     serve(AppState::new(db, config.clone()), &config).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Study routes
        .route("/dashboard_metrics", get(routes::dashboard::dashboard_metrics))
        .route(
            "/subjects",
            get(routes::study::list_subjects).post(routes::study::create_subject),
        )
        .route("/subjects/:id/lectures", post(routes::study::add_lecture))
        .route(
            "/subjects/:id/lectures/:number/flashcards",
            get(routes::study::list_flashcards),
        )
        .route("/lectures/:id", put(routes::study::update_lecture))
        .route(
            "/exams",
            get(routes::study::list_exams).post(routes::study::create_exam),
        )
        .route(
            "/mistakes",
            get(routes::study::list_mistakes).post(routes::study::create_mistake),
        )
        .route("/pomodoro", post(routes::study::log_pomodoro))
        .route("/flashcards", post(routes::study::create_flashcard))
        // Course routes
        .route(
            "/courses",
            get(routes::courses::list_courses).post(routes::courses::create_course),
        )
        .route("/courses/:id", get(routes::courses::get_course))
        .route("/courses/:id/units", post(routes::courses::add_unit))
        .route("/course_units/:id", put(routes::courses::update_unit))
        // Gym routes
        .route(
            "/gym/planner",
            get(routes::gym::get_planner).put(routes::gym::update_planner),
        )
        .route("/gym/plan/:id/complete", put(routes::gym::complete_plan))
        .route(
            "/gym/exercises",
            get(routes::gym::list_exercises).post(routes::gym::create_exercise),
        )
        .route("/gym/prs", get(routes::gym::list_prs))
        // Basketball routes
        .route("/basketball/players", post(routes::basketball::create_player))
        .route("/basketball/data", get(routes::basketball::get_data))
        .route("/basketball/tags", post(routes::basketball::create_tag))
        .route("/basketball/shots", post(routes::basketball::create_shot))
        // Schedule routes
        .route(
            "/schedule",
            get(routes::schedule::get_schedule).post(routes::schedule::create_event),
        )
        // Reset routes
        .route("/reset/:section", post(routes::reset::reset_section));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.cors_origins);
    let shared_state = Arc::new(state);

    Router::new()
        .route("/", get(routes::index::index))
        .nest("/api", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Permissive CORS unless specific origins are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Lifeboard listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Lifeboard shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
