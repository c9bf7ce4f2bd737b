use crate::infrastructure::credential_store::CredentialStore;
use crate::infrastructure::error::ApiError;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

/// Single seam to the remote service. Repositories and services stay
/// generic over this so tests can script responses without a socket.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, ApiError>;
}

/// Issues requests over reqwest, attaching `Authorization: Token <token>`
/// whenever a credential is stored. An unauthorized response empties the
/// credential store before the error reaches the caller, so no payload
/// inspection can confuse "expired" with "no data". No retry here; a
/// single failed attempt surfaces immediately.
pub struct HttpGateway<S: CredentialStore> {
    client: Client,
    base_url: Url,
    credential_store: Arc<S>,
}

impl<S: CredentialStore> HttpGateway<S> {
    pub fn new(base_url: &str, credential_store: Arc<S>) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|error| ApiError::Internal(format!("invalid api base url: {error}")))?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        Ok(Self {
            client: Client::new(),
            base_url,
            credential_store,
        })
    }

    pub fn credential_store(&self) -> &Arc<S> {
        &self.credential_store
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|error| ApiError::Internal(format!("invalid request path '{path}': {error}")))
    }
}

#[async_trait]
impl<S: CredentialStore> ApiGateway for HttpGateway<S> {
    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, ApiError> {
        let endpoint = self.endpoint(path)?;
        let mut request = match method {
            HttpMethod::Get => self.client.get(endpoint),
            HttpMethod::Post => self.client.post(endpoint),
            HttpMethod::Patch => self.client.patch(endpoint),
            HttpMethod::Delete => self.client.delete(endpoint),
        };

        if let Some(credential) = self.credential_store.get()? {
            request = request.header("Authorization", format!("Token {}", credential.token));
        }
        request = match body {
            Some(payload) => request.json(&payload),
            None => request.header("Content-Type", "application/json"),
        };

        let response = request
            .send()
            .await
            .map_err(|error| ApiError::Unreachable(error.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|error| ApiError::Unreachable(format!("failed reading response: {error}")))?;

        interpret_response(status, &body, self.credential_store.as_ref())
    }
}

/// Maps a raw response onto the error taxonomy. Split out of the transport
/// so the unauthorized and remote-error paths are testable without a
/// server.
fn interpret_response<S: CredentialStore>(
    status: u16,
    body: &str,
    credential_store: &S,
) -> Result<serde_json::Value, ApiError> {
    if status == 401 {
        credential_store.clear()?;
        return Err(ApiError::SessionExpired);
    }
    if !(200..300).contains(&status) {
        return Err(ApiError::Remote {
            status,
            message: remote_message(status, body),
        });
    }
    if body.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    serde_json::from_str(body)
        .map_err(|error| ApiError::Payload(format!("invalid response body: {error}; body={body}")))
}

fn remote_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "message", "error"] {
            if let Some(text) = value.get(key).and_then(serde_json::Value::as_str) {
                return text.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("http {status}")
    } else {
        trimmed.to_string()
    }
}
