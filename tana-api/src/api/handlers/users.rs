use crate::{
    AppState,
    api::models::messages::MessageResponse,
    api::models::users::{UpdateValidationErrors, UserResponse, UserUpdate},
    api::validation::validate_user_update,
    auth::session::Session,
    db::models::users::UserUpdateDBRequest,
    errors::{Error, Result},
    types::Resource,
};
use axum::{
    extract::{State, rejection::JsonRejection},
    response::Json,
};
use tracing::{info, instrument, warn};

fn missing_user(session: &Session) -> Error {
    // A signed session for an id with no live row means tokens were issued against another database
    warn!(user_id = session.id, "Valid session has no backing user row");
    Error::NotFound {
        resource: Resource::User,
        id: session.id.to_string(),
    }
}

/// Get the caller's own profile.
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "users",
    summary = "Get current user",
    responses(
        (status = 200, description = "The caller's profile", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "The session has no backing user"),
        (status = 500, description = "Internal server error"),
    ),
    security(("BearerAuth" = []))
)]
#[instrument(skip(state), fields(user_id = session.id))]
pub async fn get_me(State(state): State<AppState>, session: Session) -> Result<Json<UserResponse>> {
    match state.store.get_user(session.id).await? {
        Some(user) => Ok(Json(UserResponse::from(user))),
        None => Err(missing_user(&session)),
    }
}

/// Partially update the caller's own profile.
///
/// Only the fields present in the body are written. Empty strings count as absent.
#[utoipa::path(
    patch,
    path = "/users/me",
    tag = "users",
    summary = "Update current user",
    request_body = UserUpdate,
    responses(
        (status = 200, description = "Profile updated", body = MessageResponse),
        (status = 400, description = "Malformed body or per-field validation errors", body = UpdateValidationErrors),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "The session has no backing user"),
        (status = 409, description = "Email already in use"),
        (status = 500, description = "Internal server error"),
    ),
    security(("BearerAuth" = []))
)]
#[instrument(skip(state, payload), fields(user_id = session.id))]
pub async fn update_me(
    State(state): State<AppState>,
    session: Session,
    payload: std::result::Result<Json<UserUpdate>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let Json(update) = payload.map_err(|rejection| Error::BadRequest {
        message: rejection.body_text(),
    })?;

    let update = update.normalized();
    validate_user_update(&update).map_err(|errors| Error::Validation { errors })?;

    let request = UserUpdateDBRequest::new(update);
    if request.is_empty() {
        // Nothing to write, but the caller must still exist
        return match state.store.get_user(session.id).await? {
            Some(_) => Ok(Json(MessageResponse::new("Profile updated successfully"))),
            None => Err(missing_user(&session)),
        };
    }

    match state.store.update_user(session.id, request).await? {
        Some(_) => {
            info!("Profile updated");
            Ok(Json(MessageResponse::new("Profile updated successfully")))
        }
        None => Err(missing_user(&session)),
    }
}

#[cfg(test)]
mod tests {
    use crate::api::models::messages::MessageResponse;
    use crate::api::models::users::{UpdateValidationErrors, UserResponse};
    use crate::test_utils::{bearer, create_test_app, seed_test_user};
    use axum::http::StatusCode;
    use serde_json::json;

    #[test_log::test(tokio::test)]
    async fn test_get_me_returns_own_profile() {
        let (server, store) = create_test_app();
        let user = seed_test_user(&store, "me@example.com");
        seed_test_user(&store, "someone-else@example.com");

        let response = server.get("/users/me").authorization_bearer(bearer(user.id)).await;
        response.assert_status_ok();
        let me: UserResponse = response.json();
        assert_eq!(me.id, user.id);
        assert_eq!(me.email, "me@example.com");
    }

    #[test_log::test(tokio::test)]
    async fn test_get_me_without_backing_row_is_not_found() {
        let (server, _store) = create_test_app();

        server
            .get("/users/me")
            .authorization_bearer(bearer(4242))
            .await
            .assert_status_not_found();
    }

    #[test_log::test(tokio::test)]
    async fn test_invalid_email_is_rejected_without_write() {
        let (server, store) = create_test_app();
        let user = seed_test_user(&store, "before@example.com");

        for email in ["not-an-email", "a<b>@example.com", "user.@example.com", "x,y@example.com"] {
            let response = server
                .patch("/users/me")
                .authorization_bearer(bearer(user.id))
                .json(&json!({ "email": email }))
                .await;
            response.assert_status_bad_request();
            let errors: UpdateValidationErrors = response.json();
            assert_eq!(errors.email_error.as_deref(), Some("Invalid email format!"), "{email}");
            assert!(errors.name_error.is_none());
            assert!(errors.password_error.is_none());
        }

        let me: UserResponse = server.get("/users/me").authorization_bearer(bearer(user.id)).await.json();
        assert_eq!(me.email, "before@example.com");
        assert_eq!(me.updated_at, user.updated_at);
    }

    #[test_log::test(tokio::test)]
    async fn test_every_failing_field_is_reported() {
        let (server, store) = create_test_app();
        let user = seed_test_user(&store, "fields@example.com");

        let response = server
            .patch("/users/me")
            .authorization_bearer(bearer(user.id))
            .json(&json!({ "name": "A", "last_name": "B", "phone": "123", "email": "x@" }))
            .await;
        response.assert_status_bad_request();
        let errors: UpdateValidationErrors = response.json();
        assert!(errors.name_error.is_some());
        assert!(errors.last_name_error.is_some());
        assert!(errors.phone_error.is_some());
        assert!(errors.email_error.is_some());
    }

    #[test_log::test(tokio::test)]
    async fn test_name_only_update_is_partial_and_idempotent() {
        let (server, store) = create_test_app();
        let user = seed_test_user(&store, "partial@example.com");

        for _ in 0..2 {
            let response = server
                .patch("/users/me")
                .authorization_bearer(bearer(user.id))
                .json(&json!({ "name": "Grace" }))
                .await;
            response.assert_status_ok();
            assert_eq!(
                response.json::<MessageResponse>(),
                MessageResponse::new("Profile updated successfully")
            );

            let me: UserResponse = server.get("/users/me").authorization_bearer(bearer(user.id)).await.json();
            assert_eq!(me.name, "Grace");
            assert_eq!(me.last_name, user.last_name);
            assert_eq!(me.email, user.email);
            assert_eq!(me.phone, user.phone);
            assert_eq!(me.photo_url, user.photo_url);
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_client_cannot_set_identity_or_verification() {
        let (server, store) = create_test_app();
        let user = seed_test_user(&store, "identity@example.com");
        let other = seed_test_user(&store, "other@example.com");

        server
            .patch("/users/me")
            .authorization_bearer(bearer(user.id))
            .json(&json!({ "id": other.id, "verified": true, "last_name": "Hopper" }))
            .await
            .assert_status_ok();

        let me: UserResponse = server.get("/users/me").authorization_bearer(bearer(user.id)).await.json();
        assert_eq!(me.id, user.id);
        assert_eq!(me.verified, user.verified);
        assert_eq!(me.last_name, "Hopper");

        let untouched: UserResponse = server.get("/users/me").authorization_bearer(bearer(other.id)).await.json();
        assert_eq!(untouched.last_name, other.last_name);
    }

    #[test_log::test(tokio::test)]
    async fn test_empty_strings_are_ignored() {
        let (server, store) = create_test_app();
        let user = seed_test_user(&store, "empty@example.com");

        server
            .patch("/users/me")
            .authorization_bearer(bearer(user.id))
            .json(&json!({ "name": "", "email": "" }))
            .await
            .assert_status_ok();

        let me: UserResponse = server.get("/users/me").authorization_bearer(bearer(user.id)).await.json();
        assert_eq!(me.name, user.name);
        assert_eq!(me.email, user.email);
    }

    #[test_log::test(tokio::test)]
    async fn test_malformed_json_is_bad_request() {
        let (server, store) = create_test_app();
        let user = seed_test_user(&store, "json@example.com");

        server
            .patch("/users/me")
            .authorization_bearer(bearer(user.id))
            .text("{\"name\": ")
            .content_type("application/json")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[test_log::test(tokio::test)]
    async fn test_taken_email_conflicts() {
        let (server, store) = create_test_app();
        let user = seed_test_user(&store, "first@example.com");
        seed_test_user(&store, "second@example.com");

        server
            .patch("/users/me")
            .authorization_bearer(bearer(user.id))
            .json(&json!({ "email": "second@example.com" }))
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[test_log::test(tokio::test)]
    async fn test_unauthenticated_requests_never_reach_storage() {
        let (server, store) = create_test_app();

        for response in [
            server.get("/credentials").await,
            server.get("/credentials/1").await,
            server.post("/credentials/generate").await,
            server.delete("/credentials/1").await,
            server.get("/credentials/abc").await,
            server.delete("/credentials/abc").await,
            server.get("/users/me").await,
            server.patch("/users/me").json(&json!({ "name": "Mallory" })).await,
            server.get("/users/me").authorization_bearer("not-a-jwt").await,
        ] {
            response.assert_status_unauthorized();
            assert_eq!(response.json::<MessageResponse>(), MessageResponse::new("Unauthorized"));
        }

        assert_eq!(store.call_count(), 0);
    }
}
