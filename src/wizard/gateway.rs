use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::database::models::application::{Application, ApplicationDraft};

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Connectivity failure or an unparseable response
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with an error status
    #[error("server rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Seam between the wizard state machine and the draft-persistence API.
/// Tests drive the machine with an in-memory implementation.
#[async_trait]
pub trait DraftGateway: Send + Sync {
    /// Upsert the full form snapshot; returns the persisted record so
    /// the caller can adopt the server-assigned identifier
    async fn save_draft(&self, draft: &ApplicationDraft) -> Result<Application, GatewayError>;
}

/// reqwest-backed gateway used by the CLI client
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    pub async fn list(&self) -> Result<Vec<Application>, GatewayError> {
        let res = self
            .client
            .get(format!("{}/applications", self.base_url))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        parse_envelope(res).await
    }

    pub async fn fetch(&self, id: Uuid) -> Result<Application, GatewayError> {
        let res = self
            .client
            .get(format!("{}/applications/{}", self.base_url, id))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        parse_envelope(res).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), GatewayError> {
        let res = self
            .client
            .delete(format!("{}/applications/{}", self.base_url, id))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let _: Value = parse_envelope(res).await?;
        Ok(())
    }
}

#[async_trait]
impl DraftGateway for HttpGateway {
    async fn save_draft(&self, draft: &ApplicationDraft) -> Result<Application, GatewayError> {
        let res = self
            .client
            .post(format!("{}/applications", self.base_url))
            .bearer_auth(&self.token)
            .json(draft)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        parse_envelope(res).await
    }
}

/// Unwrap the `{"success": true, "data": ...}` envelope, turning error
/// statuses into [`GatewayError::Rejected`] with the server's message
async fn parse_envelope<T: DeserializeOwned>(res: reqwest::Response) -> Result<T, GatewayError> {
    let status = res.status();
    let body: Value = res
        .json()
        .await
        .map_err(|e| GatewayError::Transport(e.to_string()))?;

    if !status.is_success() {
        let message = body
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("unexpected server error")
            .to_string();
        return Err(GatewayError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_value(body.get("data").cloned().unwrap_or(Value::Null))
        .map_err(|e| GatewayError::Transport(format!("unexpected response shape: {}", e)))
}
