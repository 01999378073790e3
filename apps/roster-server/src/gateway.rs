use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use roster_core::{QueryErrorBody, QueryRequest, UserData, UsersData};
use serde_json::{json, Value};
use tracing::debug;

use crate::datasource::UserDirectory;

pub type SharedDirectory = Arc<UserDirectory>;

/// Request rejection: the only error the gateway itself produces. Anything
/// that deserializes runs to completion; absent records come back as `null`.
pub struct ValidationError(QueryErrorBody);

impl ValidationError {
    fn new(message: impl Into<String>) -> Self {
        Self(QueryErrorBody::validation(message))
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self.0)).into_response()
    }
}

/// POST /query - dispatch a named query operation.
pub async fn query(
    State(directory): State<SharedDirectory>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<Value>, ValidationError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!("rejecting malformed query: {rejection}");
        ValidationError::new(rejection.body_text())
    })?;

    Ok(Json(dispatch(&directory, request).await))
}

/// Runs one operation against the data source and shapes its response body.
pub async fn dispatch(directory: &UserDirectory, request: QueryRequest) -> Value {
    match request {
        QueryRequest::Users { page } => {
            let users = directory.list_page(page).await.to_vec();
            debug!(page, count = users.len(), "served users page");
            json!(UsersData { users })
        }
        QueryRequest::User { username } => {
            let user = directory.find_by_key(&username).await.cloned();
            debug!(%username, found = user.is_some(), "served user lookup");
            json!(UserData { user })
        }
        QueryRequest::SpammyUsers => {
            let users = directory.spammy_users().await;
            debug!(count = users.len(), "served spammy listing");
            json!(UsersData { users })
        }
    }
}

/// GET /health - liveness probe.
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
