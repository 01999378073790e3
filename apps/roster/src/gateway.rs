use async_trait::async_trait;
use reqwest::StatusCode;
use roster_core::{QueryErrorBody, QueryRequest, UserData, UserRecord, UsersData};
use thiserror::Error;

/// Failure reaching or decoding the query endpoint. Rendered by the view as
/// an error string for the affected query only; never retried. An absent
/// record is `Ok(None)`, not an error.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server rejected request: {0}")]
    Validation(QueryErrorBody),
    #[error("unexpected status {0}")]
    Status(StatusCode),
}

/// Seam between the client and the query gateway, so the state machine and
/// prefetch coordinator can run against a mock in tests.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn list_page(&self, page: u32) -> Result<Vec<UserRecord>, TransportError>;

    async fn find_by_key(&self, username: &str) -> Result<Option<UserRecord>, TransportError>;
}

/// `Gateway` over HTTP against a roster-server `POST /query` endpoint.
pub struct HttpGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/query", base_url.trim_end_matches('/')),
        }
    }

    async fn post(&self, request: &QueryRequest) -> Result<reqwest::Response, TransportError> {
        let response = self.client.post(&self.endpoint).json(request).send().await?;
        let status = response.status();
        if status == StatusCode::BAD_REQUEST {
            if let Ok(body) = response.json::<QueryErrorBody>().await {
                return Err(TransportError::Validation(body));
            }
            return Err(TransportError::Status(status));
        }
        if !status.is_success() {
            return Err(TransportError::Status(status));
        }
        Ok(response)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn list_page(&self, page: u32) -> Result<Vec<UserRecord>, TransportError> {
        let response = self
            .post(&QueryRequest::Users { page: page as i64 })
            .await?;
        let data: UsersData = response.json().await?;
        Ok(data.users)
    }

    async fn find_by_key(&self, username: &str) -> Result<Option<UserRecord>, TransportError> {
        let response = self
            .post(&QueryRequest::User {
                username: username.to_string(),
            })
            .await?;
        let data: UserData = response.json().await?;
        Ok(data.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let gateway = HttpGateway::new("http://127.0.0.1:4000/");
        assert_eq!(gateway.endpoint, "http://127.0.0.1:4000/query");
    }
}
