use crate::{
    AppState,
    auth::session::{self, Session},
    errors::{Error, Result},
};
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::{debug, instrument, trace};

/// Pull the token out of an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Result<&str> {
    let header = parts.headers.get(AUTHORIZATION).ok_or_else(|| {
        trace!("No Authorization header present");
        Error::Unauthenticated { message: None }
    })?;

    let value = header.to_str().map_err(|_| Error::Unauthenticated { message: None })?;

    let (scheme, token) = value.split_once(' ').ok_or(Error::Unauthenticated { message: None })?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        trace!(scheme, "Unsupported Authorization scheme");
        return Err(Error::Unauthenticated { message: None });
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(Error::Unauthenticated { message: None });
    }

    Ok(token)
}

/// Session Guard: resolves the request's bearer token to a [`Session`].
///
/// Runs before the handler body, so a rejected request never touches the store.
impl FromRequestParts<AppState> for Session {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token = bearer_token(parts)?;
        let session = session::verify_session_token(token, &state.config)?;
        debug!(user_id = session.id, "Authenticated session");
        Ok(session)
    }
}
