//! polls-server: questions, choices and voting over HTTP
//!
//! Published questions are listed newest first, shown with their choices,
//! voted on, and shown again with vote counts. Storage sits behind the
//! [`PollStore`] trait: PostgreSQL in production, in-memory for tests.

pub mod clock;
pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod polls;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, PollsConfig};
pub use db::{Choice, DbError, Question, QuestionWithChoices};
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
pub use models::{NewQuestion, ValidationError};
pub use polls::VoteOutcome;
pub use store::{MemoryStore, PgStore, PollStore};
