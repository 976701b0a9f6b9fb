//! Route definitions for the form stub server.
//!
//! Implements the endpoints `formkit-client` calls, with bodies that
//! deserialize cleanly into the shared wire types (camelCase JSON).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use formkit_core::{
    ApiErrorBody, FieldValues, FormSchema, PaginatedResponse, Pagination, SortOrder, Submission,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::store::AppState;

const MAX_PAGE_SIZE: u32 = 100;

/// Build the complete router with all stub routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/form-schema", get(form_schema))
        .route(
            "/api/submissions",
            get(submissions_list).post(submission_create),
        )
        .route(
            "/api/submissions/{id}",
            get(submission_get)
                .put(submission_update)
                .delete(submission_delete),
        )
        .fallback(not_implemented)
        .with_state(state)
}

fn reject(status: StatusCode, body: ApiErrorBody) -> Response {
    (status, Json(body)).into_response()
}

fn not_found() -> Response {
    reject(
        StatusCode::NOT_FOUND,
        ApiErrorBody::message("Submission not found"),
    )
}

// ── Health ──────────────────────────────────────────────────────────

async fn health() -> StatusCode {
    StatusCode::OK
}

// ── Schema ──────────────────────────────────────────────────────────

async fn form_schema(State(state): State<AppState>) -> Json<FormSchema> {
    Json(state.validator().schema().clone())
}

// ── Submissions ─────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParams {
    page: Option<u32>,
    limit: Option<u32>,
    sort_by: Option<String>,
    sort_order: Option<String>,
    search: Option<String>,
}

async fn submissions_list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Response {
    if let Some(sort_by) = params.sort_by.as_deref() {
        if sort_by != "createdAt" {
            return reject(
                StatusCode::BAD_REQUEST,
                ApiErrorBody::message(format!("Unsupported sort field '{sort_by}'")),
            );
        }
    }
    let order = match params.sort_order.as_deref() {
        None => SortOrder::default(),
        Some(raw) => match raw.parse::<SortOrder>() {
            Ok(order) => order,
            Err(reason) => {
                return reject(StatusCode::BAD_REQUEST, ApiErrorBody::message(reason))
            }
        },
    };
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(10).clamp(1, MAX_PAGE_SIZE);

    let all = state.matching(params.search.as_deref(), order);
    let total_count = all.len() as u64;
    let total_pages = total_count.div_ceil(u64::from(limit)) as u32;
    let start = (page as usize - 1) * limit as usize;
    let data: Vec<Submission> = all.into_iter().skip(start).take(limit as usize).collect();

    Json(PaginatedResponse {
        success: true,
        data,
        pagination: Pagination {
            page,
            limit,
            total_pages,
            total_count,
        },
    })
    .into_response()
}

/// Parse a JSON body into values for the served schema's fields.
///
/// Keys that are not schema fields are dropped. On failure the rejection
/// response is returned instead.
fn accept_values(state: &AppState, body: Value) -> Result<FieldValues, Response> {
    let mut values: FieldValues = serde_json::from_value(body).map_err(|e| {
        tracing::warn!(error = %e, "malformed submission body");
        reject(
            StatusCode::BAD_REQUEST,
            ApiErrorBody::message("Invalid submission body"),
        )
    })?;
    values.retain(|id, _| state.validator().field(id).is_some());

    let errors = state.validator().validate_all(&values);
    if errors.is_empty() {
        Ok(values)
    } else {
        tracing::warn!(fields = ?errors.keys().collect::<Vec<_>>(), "submission failed validation");
        Err(reject(
            StatusCode::BAD_REQUEST,
            ApiErrorBody::with_field_errors("Validation failed", errors),
        ))
    }
}

async fn submission_create(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let data = match accept_values(&state, body) {
        Ok(data) => data,
        Err(resp) => return resp,
    };
    let submission = Submission {
        id: Uuid::new_v4().to_string(),
        created_at: Utc::now(),
        data,
    };
    tracing::info!(id = %submission.id, "submission created");
    state
        .submissions()
        .insert(submission.id.clone(), submission.clone());

    (
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Submission created",
            "data": submission
        })),
    )
        .into_response()
}

async fn submission_get(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.submissions().get(&id) {
        Some(entry) => Json(entry.value().clone()).into_response(),
        None => not_found(),
    }
}

async fn submission_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if !state.submissions().contains_key(&id) {
        return not_found();
    }
    let data = match accept_values(&state, body) {
        Ok(data) => data,
        Err(resp) => return resp,
    };
    match state.submissions().get_mut(&id) {
        Some(mut entry) => {
            entry.data = data;
            tracing::info!(%id, "submission updated");
            Json(json!({
                "success": true,
                "message": "Submission updated",
                "data": entry.value().clone()
            }))
            .into_response()
        }
        // Deleted concurrently between the check and the write.
        None => not_found(),
    }
}

async fn submission_delete(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.submissions().remove(&id) {
        Some(_) => {
            tracing::info!(%id, "submission deleted");
            Json(json!({ "success": true, "message": "Submission deleted" })).into_response()
        }
        None => not_found(),
    }
}

async fn not_implemented() -> StatusCode {
    StatusCode::NOT_IMPLEMENTED
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use formkit_core::{FieldDescriptor, FieldType, ValidationRule};
    use formkit_validate::SchemaValidator;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let schema = FormSchema {
            title: "Contact".into(),
            description: "Reach out".into(),
            fields: vec![
                FieldDescriptor::new("name", FieldType::Text, "Name")
                    .required()
                    .with_validation(ValidationRule::length(Some(2), None)),
                FieldDescriptor::new("topics", FieldType::MultiSelect, "Topics")
                    .with_options(["billing", "support"])
                    .with_validation(ValidationRule::selections(None, Some(1))),
            ],
        };
        AppState::new(SchemaValidator::new(schema).unwrap())
    }

    fn test_app() -> Router {
        router(test_state())
    }

    async fn body_json(resp: Response) -> Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    }

    fn get_request(uri: &str) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn health_returns_200() {
        let resp = test_app().oneshot(get_request("/health")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn serves_the_schema() {
        let resp = test_app()
            .oneshot(get_request("/api/form-schema"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["title"], "Contact");
        assert_eq!(body["fields"][1]["type"], "multi-select");
    }

    #[tokio::test]
    async fn invalid_submission_returns_field_errors() {
        let resp = test_app()
            .oneshot(json_request(
                "POST",
                "/api/submissions",
                json!({ "name": "A", "topics": ["billing", "support"] }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["errors"]["name"], "Name must be at least 2 characters");
        assert_eq!(body["errors"]["topics"], "Topics must not exceed 1 selection(s)");
    }

    #[tokio::test]
    async fn object_values_are_a_malformed_body() {
        let resp = test_app()
            .oneshot(json_request(
                "POST",
                "/api/submissions",
                json!({ "name": { "first": "Ada" } }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "Invalid submission body");
    }

    #[tokio::test]
    async fn submission_crud_lifecycle() {
        let app = test_app();

        // Create; unknown keys are dropped.
        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/submissions",
                json!({ "name": "Ada", "topics": ["billing"], "extra": "x" }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created = body_json(resp).await;
        assert_eq!(created["success"], true);
        let id = created["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(created["data"]["data"]["name"], "Ada");
        assert!(created["data"]["data"].get("extra").is_none());

        // Get
        let uri = format!("/api/submissions/{id}");
        let resp = app.clone().oneshot(get_request(&uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let fetched: Submission = serde_json::from_value(body_json(resp).await).unwrap();
        assert_eq!(fetched.id, id);

        // Update keeps id and creation time.
        let resp = app
            .clone()
            .oneshot(json_request("PUT", &uri, json!({ "name": "Grace" })))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let updated = body_json(resp).await;
        assert_eq!(updated["data"]["data"]["name"], "Grace");
        let updated: Submission = serde_json::from_value(updated["data"].clone()).unwrap();
        assert_eq!(updated.created_at, fetched.created_at);

        // Delete
        let req = axum::http::Request::builder()
            .method("DELETE")
            .uri(&uri)
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        // Get after delete → 404
        let resp = app.clone().oneshot(get_request(&uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["error"], "Submission not found");
    }

    #[tokio::test]
    async fn update_of_missing_record_is_404() {
        let resp = test_app()
            .oneshot(json_request(
                "PUT",
                "/api/submissions/nope",
                json!({ "name": "Ada" }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_paginates_and_searches() {
        let app = test_app();
        for name in ["Ada", "Grace", "Linus"] {
            let resp = app
                .clone()
                .oneshot(json_request(
                    "POST",
                    "/api/submissions",
                    json!({ "name": name }),
                ))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let resp = app
            .clone()
            .oneshot(get_request("/api/submissions?page=2&limit=2&sortBy=createdAt&sortOrder=asc"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let page: PaginatedResponse = serde_json::from_value(body_json(resp).await).unwrap();
        assert_eq!(page.pagination.total_count, 3);
        assert_eq!(page.pagination.total_pages, 2);
        assert_eq!(page.pagination.page, 2);
        assert_eq!(page.data.len(), 1);

        let resp = app
            .clone()
            .oneshot(get_request("/api/submissions?search=GRACE"))
            .await
            .unwrap();
        let page: PaginatedResponse = serde_json::from_value(body_json(resp).await).unwrap();
        assert_eq!(page.pagination.total_count, 1);
        assert_eq!(page.data[0].data["name"].display(), "Grace");
    }

    #[tokio::test]
    async fn list_rejects_unknown_sort_field() {
        let resp = test_app()
            .oneshot(get_request("/api/submissions?sortBy=name"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_route_returns_501() {
        let resp = test_app()
            .oneshot(get_request("/api/unknown"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
    }
}
