//! # Scheduler Core Library
//!
//! Recurring to-do items driven by a compact repeat grammar.
//!
//! ## Core Modules
//!
//! - [`grammar`]: Parsing of repeat strings (`d 7`, `y`, `w 1,3`, `m -1 2`)
//! - [`recurrence`]: Next-occurrence engine
//! - [`lifecycle`]: Pending/recurring completion state machine
//! - [`gateway`]: Validated create/edit/list/complete/delete operations
//! - [`repository`]: Storage trait and its SQLite implementation
//! - [`auth`]: Token issuance and verification
//! - [`db`]: Database connection and migration management
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use scheduler_core::{
//!     auth::PasswordAuthenticator, db, gateway::{SchedulingGateway, SystemClock},
//!     lifecycle::TaskLifecycle, models::TaskRequest, repository::SqliteRepository,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = db::establish_connection("scheduler.db").await?;
//!     let gateway = SchedulingGateway::new(
//!         Arc::new(SqliteRepository::new(pool)),
//!         Arc::new(PasswordAuthenticator::new(None)),
//!         Arc::new(SystemClock),
//!         TaskLifecycle::default(),
//!     );
//!
//!     let id = gateway
//!         .create_task(None, TaskRequest {
//!             title: "Water the plants".to_string(),
//!             repeat: Some("d 3".to_string()),
//!             ..Default::default()
//!         })
//!         .await?;
//!     gateway.complete_task(None, &id).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod dates;
pub mod db;
pub mod error;
pub mod gateway;
pub mod grammar;
pub mod lifecycle;
pub mod models;
pub mod recurrence;
pub mod repository;
