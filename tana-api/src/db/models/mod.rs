//! Database record models matching table schemas.
//!
//! These structs correspond directly to table rows and derive `sqlx::FromRow`. They are kept
//! separate from the API models in [`crate::api::models`] so the storage and wire
//! representations can evolve independently; conversions live on the API side.
//!
//! - [`credentials`]: API key/secret pairs owned by a user
//! - [`users`]: User profiles
//! - [`mmlu`]: Read-only reference entries

pub mod credentials;
pub mod mmlu;
pub mod users;
