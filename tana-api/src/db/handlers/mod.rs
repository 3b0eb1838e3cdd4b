//! Repository implementations for database access.
//!
//! Each repository wraps a `&mut PgConnection` (a pooled connection or an open transaction)
//! and exposes strongly-typed, parameterized queries returning models from
//! [`crate::db::models`]. Callers own the transaction boundary:
//!
//! ```ignore
//! use tana_api::db::handlers::Credentials;
//!
//! let mut tx = pool.begin().await?;
//! let mut repo = Credentials::new(&mut tx);
//! if repo.lock_owner(owner_id).await? {
//!     let live = repo.count_live(owner_id).await?;
//!     // ...
//! }
//! tx.commit().await?;
//! ```
//!
//! - [`Credentials`]: owner-scoped, soft-delete-aware credential queries
//! - [`Users`]: profile reads and partial updates
//! - [`Reference`]: generic reader for read-only lookup tables

pub mod credentials;
pub mod reference;
pub mod users;

pub use credentials::Credentials;
pub use reference::Reference;
pub use users::Users;
