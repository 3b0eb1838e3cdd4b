//! API request and response data models.
//!
//! These structures define the public JSON contract and are kept apart from the row types in
//! [`crate::db::models`], with `From` conversions in one direction only (row to response).
//! Everything here derives `utoipa::ToSchema` for the generated OpenAPI document.
//!
//! - [`credentials`]: Credential listings and the one-time creation response carrying the secret
//! - [`users`]: Profile responses, the partial update payload and its per-field error map
//! - [`mmlu`]: Reference table entries
//! - [`messages`]: Plain acknowledgement bodies

pub mod credentials;
pub mod messages;
pub mod mmlu;
pub mod users;
