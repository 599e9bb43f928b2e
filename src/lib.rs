//! # Lifeboard
//!
//! Personal multi-domain tracking dashboard: study progress, online courses,
//! gym planning, basketball stats and a daily schedule, stored in SQLite and
//! served as a JSON API plus a single page.
//!
//! ## Modules
//!
//! - [`storage`]: SQLite schema, connection pool and per-domain queries
//! - [`metrics`]: Derived numbers (pomodoro totals, PR detection, box score)
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML and environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lifeboard::storage::{gym, Database, DatabaseConfig};
//! use lifeboard::storage::gym::NewExercise;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::open(&DatabaseConfig::new("./lifeboard.db"))?;
//!
//!     db.write(|tx| {
//!         gym::create_exercise(tx, &NewExercise {
//!             name: "Squat".to_string(),
//!             ..Default::default()
//!         })
//!     })
//!     .await?;
//!
//!     let prs = db.read(gym::list_prs).await?;
//!     println!("{} personal records", prs.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod metrics;
pub mod storage;

// Re-export top-level types for convenience
pub use storage::{Database, DatabaseConfig, StorageError, StorageResult};

pub use metrics::{
    box_score, estimated_one_rep_max, parse_lift, LiftParse, PlayerStats, PomodoroTotals,
    PrTracker, TimeWindows,
};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{Config, ConfigError};
