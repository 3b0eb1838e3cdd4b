//! Request authentication.
//!
//! Callers present an `Authorization: Bearer <token>` header carrying an HS256 JWT signed with
//! the configured `secret_key`. Tokens are minted by the account service (or by
//! `tana-api --issue-token <USER_ID>` during development); this service only verifies them.
//!
//! Handlers opt in by taking a [`session::Session`] argument:
//!
//! ```ignore
//! async fn handler(session: Session) -> Result<Json<Response>> {
//!     // session.id is the authenticated user
//! }
//! ```
//!
//! A missing, malformed, expired, or wrongly-signed token rejects the request with
//! `401 Unauthorized` before the handler body runs.
//!
//! # Modules
//!
//! - [`current_user`]: the [`session::Session`] extractor
//! - [`session`]: token creation and verification

pub mod current_user;
pub mod session;
