//! Database layer for data persistence and access.
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  (api::handlers - HTTP routers)
//! └──────┬──────┘
//!        │  Arc<dyn Store>
//!        ↓
//! ┌─────────────┐
//! │    Store    │  (db::store - PgStore | InMemoryStore)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (db::handlers - parameterized queries)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │  PostgreSQL │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`store`]: The [`store::Store`] trait and its backends
//! - [`handlers`]: Repository implementations over a `PgConnection`
//! - [`models`]: Database record structures matching table schemas
//! - [`errors`]: Database-specific error types
//!
//! # Conventions
//!
//! Soft-deleted rows (`deleted_at IS NOT NULL`) are invisible to every read, and every
//! credential statement is scoped to a single owner.
//!
//! # Migrations
//!
//! Migrations live in `migrations/` and are embedded at compile time. [`crate::migrator`]
//! exposes them:
//!
//! ```ignore
//! tana_api::migrator().run(&pool).await?;
//! ```

pub mod errors;
pub mod handlers;
pub mod models;
pub mod store;
