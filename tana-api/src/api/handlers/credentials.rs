use crate::{
    AppState,
    api::models::credentials::{CreatedCredential, CredentialCreatedResponse, CredentialResponse},
    api::models::messages::MessageResponse,
    auth::session::Session,
    crypto::{generate_api_key, generate_api_secret},
    db::models::credentials::CredentialCreateDBRequest,
    db::store::CredentialInsert,
    errors::{Error, Result},
    types::{CredentialId, Resource},
};
use axum::{
    extract::{Path, State},
    response::Json,
};
use tracing::{info, instrument};

/// List the caller's live credentials, oldest first.
///
/// Secrets are never included.
#[utoipa::path(
    get,
    path = "/credentials",
    tag = "credentials",
    summary = "List credentials",
    responses(
        (status = 200, description = "Live credentials owned by the caller", body = [CredentialResponse]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error"),
    ),
    security(("BearerAuth" = []))
)]
#[instrument(skip(state), fields(user_id = session.id))]
pub async fn list_credentials(State(state): State<AppState>, session: Session) -> Result<Json<Vec<CredentialResponse>>> {
    let credentials = state
        .store
        .list_credentials(session.id, state.config.credentials.max_per_user)
        .await?;

    Ok(Json(credentials.into_iter().map(CredentialResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/credentials/{id}",
    tag = "credentials",
    summary = "Get credential",
    params(
        ("id" = i64, Path, description = "Credential ID"),
    ),
    responses(
        (status = 200, description = "The credential", body = CredentialResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No live credential with this ID belongs to the caller"),
        (status = 500, description = "Internal server error"),
    ),
    security(("BearerAuth" = []))
)]
#[instrument(skip(state), fields(user_id = session.id))]
pub async fn get_credential(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<CredentialId>,
) -> Result<Json<CredentialResponse>> {
    match state.store.get_credential(id, session.id).await? {
        Some(credential) => Ok(Json(CredentialResponse::from(credential))),
        None => Err(Error::NotFound {
            resource: Resource::Credential,
            id: id.to_string(),
        }),
    }
}

/// Generate a new key/secret pair for the caller.
///
/// The response is the only time the secret is ever returned.
#[utoipa::path(
    post,
    path = "/credentials/generate",
    tag = "credentials",
    summary = "Generate credential",
    responses(
        (status = 200, description = "Credential created", body = CredentialCreatedResponse),
        (status = 400, description = "The caller already holds the maximum number of credentials"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "The caller has no user record"),
        (status = 500, description = "Internal server error"),
    ),
    security(("BearerAuth" = []))
)]
#[instrument(skip(state), fields(user_id = session.id))]
pub async fn generate_credential(State(state): State<AppState>, session: Session) -> Result<Json<CredentialCreatedResponse>> {
    let limit = state.config.credentials.max_per_user;
    let request = CredentialCreateDBRequest {
        owner_id: session.id,
        api_key: generate_api_key(),
        api_secret: generate_api_secret(state.config.credentials.secret_length),
    };

    match state.store.create_credential(request, limit).await? {
        CredentialInsert::Created(credential) => {
            info!(credential_id = credential.id, "Credential created");
            Ok(Json(CredentialCreatedResponse {
                message: "create success".to_string(),
                credential: CreatedCredential::from(credential),
            }))
        }
        CredentialInsert::QuotaReached { live } => {
            info!(live, limit, "Credential quota reached");
            Err(Error::QuotaExceeded {
                resource: Resource::Credential,
                limit,
            })
        }
    }
}

/// Soft-delete one of the caller's credentials.
///
/// Unknown IDs, other users' credentials and already-deleted credentials all answer 404.
#[utoipa::path(
    delete,
    path = "/credentials/{id}",
    tag = "credentials",
    summary = "Delete credential",
    params(
        ("id" = i64, Path, description = "Credential ID"),
    ),
    responses(
        (status = 200, description = "Credential deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No live credential with this ID belongs to the caller"),
        (status = 500, description = "Internal server error"),
    ),
    security(("BearerAuth" = []))
)]
#[instrument(skip(state), fields(user_id = session.id))]
pub async fn delete_credential(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<CredentialId>,
) -> Result<Json<MessageResponse>> {
    if !state.store.soft_delete_credential(id, session.id).await? {
        return Err(Error::NotFound {
            resource: Resource::Credential,
            id: id.to_string(),
        });
    }

    info!(credential_id = id, "Credential deleted");
    Ok(Json(MessageResponse::new("deleted")))
}
