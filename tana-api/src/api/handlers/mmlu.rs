use crate::{
    AppState,
    api::models::mmlu::MmluResponse,
    errors::{Error, Result},
    types::{MmluId, Resource},
};
use axum::{
    extract::{Path, State},
    response::Json,
};
use tracing::instrument;

/// List every mmlu entry, ordered by id.
#[utoipa::path(
    get,
    path = "/mmlu",
    tag = "mmlu",
    summary = "List mmlu entries",
    responses(
        (status = 200, description = "All entries", body = [MmluResponse]),
        (status = 500, description = "Internal server error"),
    )
)]
#[instrument(skip(state))]
pub async fn list_mmlu(State(state): State<AppState>) -> Result<Json<Vec<MmluResponse>>> {
    let entries = state.store.list_mmlu().await?;
    Ok(Json(entries.into_iter().map(MmluResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/mmlu/{id}",
    tag = "mmlu",
    summary = "Get mmlu entry",
    params(
        ("id" = i64, Path, description = "Entry ID"),
    ),
    responses(
        (status = 200, description = "The entry", body = MmluResponse),
        (status = 404, description = "No entry with this ID"),
        (status = 500, description = "Internal server error"),
    )
)]
#[instrument(skip(state))]
pub async fn get_mmlu(State(state): State<AppState>, Path(id): Path<MmluId>) -> Result<Json<MmluResponse>> {
    state
        .store
        .get_mmlu(id)
        .await?
        .map(|entry| Json(MmluResponse::from(entry)))
        .ok_or_else(|| Error::NotFound {
            resource: Resource::Mmlu,
            id: id.to_string(),
        })
}

/// `/mmlu` under the name the frontend uses.
#[utoipa::path(
    get,
    path = "/reference",
    tag = "mmlu",
    summary = "List reference entries",
    responses(
        (status = 200, description = "All entries", body = [MmluResponse]),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn list_reference(state: State<AppState>) -> Result<Json<Vec<MmluResponse>>> {
    list_mmlu(state).await
}

#[utoipa::path(
    get,
    path = "/reference/{id}",
    tag = "mmlu",
    summary = "Get reference entry",
    params(
        ("id" = i64, Path, description = "Entry ID"),
    ),
    responses(
        (status = 200, description = "The entry", body = MmluResponse),
        (status = 404, description = "No entry with this ID"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn get_reference(state: State<AppState>, id: Path<MmluId>) -> Result<Json<MmluResponse>> {
    get_mmlu(state, id).await
}

#[cfg(test)]
mod tests {
    use crate::api::models::mmlu::MmluResponse;
    use crate::test_utils::create_test_app;

    #[test_log::test(tokio::test)]
    async fn test_list_and_get_without_authentication() {
        let (server, store) = create_test_app();
        let calm = store.seed_mmlu("Calm", "A calm entry", "calm", "https://example.com/calm.png");
        let bold = store.seed_mmlu("Bold", "A bold entry", "bold", "");

        let listed: Vec<MmluResponse> = server.get("/mmlu").await.json();
        assert_eq!(listed.iter().map(|e| e.id).collect::<Vec<_>>(), vec![calm.id, bold.id]);

        let entry: MmluResponse = server.get(&format!("/mmlu/{}", bold.id)).await.json();
        assert_eq!(entry.name, "Bold");
        assert_eq!(entry.feeling, "bold");
    }

    #[test_log::test(tokio::test)]
    async fn test_reference_alias_serves_same_rows() {
        let (server, store) = create_test_app();
        let entry = store.seed_mmlu("Calm", "A calm entry", "calm", "");

        let via_mmlu: Vec<MmluResponse> = server.get("/mmlu").await.json();
        let via_reference: Vec<MmluResponse> = server.get("/reference").await.json();
        assert_eq!(via_mmlu, via_reference);

        let one: MmluResponse = server.get(&format!("/reference/{}", entry.id)).await.json();
        assert_eq!(one.id, entry.id);
    }

    #[test_log::test(tokio::test)]
    async fn test_empty_table_and_unknown_id() {
        let (server, _store) = create_test_app();

        let listed: Vec<MmluResponse> = server.get("/mmlu").await.json();
        assert!(listed.is_empty());

        server.get("/mmlu/77").await.assert_status_not_found();
        server.get("/mmlu/seventy").await.assert_status_bad_request();
    }
}
