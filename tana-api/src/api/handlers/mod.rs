//! HTTP request handlers for all API endpoints.
//!
//! Handlers are thin: they authenticate through the [`Session`](crate::auth::session::Session)
//! extractor, validate input, call the [`Store`](crate::db::store::Store) and map the result to
//! an API model. Failures are returned as [`crate::errors::Error`], which renders the status code
//! and JSON body and does the logging.
//!
//! # Handler Modules
//!
//! - [`credentials`]: API key/secret generation, listing and soft deletion, scoped to the caller
//! - [`users`]: the caller's own profile (`/users/me`)
//! - [`mmlu`]: read-only reference lookup, no authentication
//! - [`health`]: readiness check

pub mod credentials;
pub mod health;
pub mod mmlu;
pub mod users;
