//! Lifeboard Storage
//!
//! SQLite persistence for every tracked domain:
//!
//! - **pool**: Connection pool and the blocking-task bridge
//! - **schema**: Idempotent table creation and the default player
//! - **types**: Row types shared by every domain
//! - **study**: Subjects, lectures, flashcards, exams, mistakes, pomodoro
//! - **courses**: Courses and their units
//! - **gym**: Exercise catalog, plans and personal records
//! - **basketball**: Players, video tags and shots
//! - **schedule**: Custom events and daily schedule assembly
//! - **reset**: Per-domain bulk deletion
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! Handler → Database::read / Database::write
//!         → spawn_blocking → pooled Connection (BEGIN IMMEDIATE for writes)
//!         → domain function (SQL) → row types
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use lifeboard::storage::{study, Database, DatabaseConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::open(&DatabaseConfig::new("./lifeboard.db"))?;
//!
//!     let subject = db.write(|tx| study::create_subject(tx, "Anatomy")).await?;
//!     db.write(move |tx| study::add_lecture(tx, subject.id)).await?;
//!
//!     let subjects = db.read(study::list_subjects).await?;
//!     println!("{} subjects", subjects.len());
//!     Ok(())
//! }
//! ```

pub mod basketball;
pub mod courses;
pub mod error;
pub mod gym;
pub mod pool;
pub mod reset;
pub mod schedule;
pub mod schema;
pub mod study;
pub mod types;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use pool::{Database, DatabaseConfig};
pub use reset::{ResetSection, ResetSummary};
pub use types::*;
