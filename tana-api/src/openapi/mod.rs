//! OpenAPI documentation for the HTTP API, served by Scalar at `/docs`.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::api;

/// Session tokens go in the `Authorization` header.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "BearerAuth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Session token authentication:\n\n\
                            ```\nAuthorization: Bearer YOUR_SESSION_TOKEN\n```",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    paths(
        api::handlers::credentials::list_credentials,
        api::handlers::credentials::get_credential,
        api::handlers::credentials::generate_credential,
        api::handlers::credentials::delete_credential,
        api::handlers::users::get_me,
        api::handlers::users::update_me,
        api::handlers::mmlu::list_mmlu,
        api::handlers::mmlu::get_mmlu,
        api::handlers::mmlu::list_reference,
        api::handlers::mmlu::get_reference,
        api::handlers::health::healthz,
    ),
    components(
        schemas(
            api::models::credentials::CredentialResponse,
            api::models::credentials::CreatedCredential,
            api::models::credentials::CredentialCreatedResponse,
            api::models::users::UserResponse,
            api::models::users::UserUpdate,
            api::models::users::UpdateValidationErrors,
            api::models::mmlu::MmluResponse,
            api::models::messages::MessageResponse,
        )
    ),
    tags(
        (name = "credentials", description = "API key/secret pairs owned by the caller. The secret is shown once, at creation."),
        (name = "users", description = "The caller's own profile."),
        (name = "mmlu", description = "Read-only reference table, served under both `/mmlu` and `/reference`."),
        (name = "health", description = "Readiness check against the store."),
    ),
    info(
        title = "Tana API",
        version = "0.4.0",
        description = "Credential management, profile and reference lookup API.

## Authentication

Authenticated endpoints take a session token in the `Authorization` header:

```
Authorization: Bearer YOUR_SESSION_TOKEN
```

## Errors

Errors are JSON objects with a `message` field, except profile validation failures, which return
a map of per-field errors such as `{\"email_error\": \"Invalid email format!\"}`.",
    ),
)]
pub struct ApiDoc;
