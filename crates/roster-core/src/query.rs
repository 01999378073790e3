use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::UserRecord;

/// A request to the query gateway. The `operation` tag mirrors the named
/// query shapes the server exposes; serde enforces argument presence and
/// primitive types, which is the only validation the gateway performs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum QueryRequest {
    Users { page: i64 },
    User { username: String },
    SpammyUsers,
}

/// Response body for `users` and `spammyUsers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersData {
    pub users: Vec<UserRecord>,
}

/// Response body for `user`. An absent record is `user: null`, never an
/// error; the gateway does not synthesize not-found failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserData {
    pub user: Option<UserRecord>,
}

/// Wire shape for gateway-side request rejections.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[error("{error}: {message}")]
pub struct QueryErrorBody {
    pub error: String,
    pub message: String,
}

impl QueryErrorBody {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            error: "validation".to_string(),
            message: message.into(),
        }
    }
}
