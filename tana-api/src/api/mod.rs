//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`models`]**: Request/response data structures
//! - **[`validation`]**: Declarative field rules for request payloads
//!
//! # API Structure
//!
//! - **Credentials** (`/credentials/*`): per-user API key/secret pairs, at most
//!   `credentials.max_per_user` live at a time
//! - **Users** (`/users/me`): read and partially update the caller's profile
//! - **Mmlu** (`/mmlu/*`, also `/reference/*`): static reference table
//!
//! These are nested under `api_prefix` when one is configured. Documentation is served at
//! `/docs`.

pub mod handlers;
pub mod models;
pub mod validation;
