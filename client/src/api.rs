use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use shared::{Envelope, Member};

use crate::form::{FormErrors, MemberForm};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{0}")]
    Invalid(FormErrors),
    #[error("{}", display_api(.message, .detail))]
    Api {
        status: StatusCode,
        message: String,
        detail: Option<String>,
    },
    #[error("Could not reach the API: {0}")]
    Transport(#[from] reqwest::Error),
}

fn display_api(message: &str, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!("{message}: {detail}"),
        None => message.to_string(),
    }
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

/// Thin wrapper over the `/api/members` endpoints that unwraps the envelope.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn members_url(&self) -> String {
        format!("{}/api/members", self.base_url)
    }

    fn member_url(&self, id: i64) -> String {
        format!("{}/api/members/{id}", self.base_url)
    }

    pub async fn list(&self) -> Result<Vec<Member>, ClientError> {
        self.send(self.http.get(self.members_url()), "Failed to fetch members")
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Member, ClientError> {
        self.send(
            self.http.get(self.member_url(id)),
            "Failed to load member data",
        )
        .await
    }

    pub async fn create(&self, form: &MemberForm) -> Result<Member, ClientError> {
        self.send(
            self.http.post(self.members_url()).json(form),
            "Failed to add member",
        )
        .await
    }

    pub async fn update(&self, id: i64, form: &MemberForm) -> Result<Member, ClientError> {
        self.send(
            self.http.put(self.member_url(id)).json(form),
            "Failed to update member",
        )
        .await
    }

    pub async fn delete(&self, id: i64) -> Result<Member, ClientError> {
        self.send(
            self.http.delete(self.member_url(id)),
            "Failed to delete member",
        )
        .await
    }

    /// Returns the envelope's `data` on success. Any other outcome becomes
    /// [`ClientError::Api`], preferring the server's own message over
    /// `fallback`.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        tracing::debug!(%status, bytes = body.len(), "API response");

        if status.is_success() {
            if let Ok(Envelope {
                success: true,
                data: Some(data),
                ..
            }) = serde_json::from_slice::<Envelope<T>>(&body)
            {
                return Ok(data);
            }
        }

        let (message, detail) = match serde_json::from_slice::<Envelope<serde_json::Value>>(&body)
        {
            Ok(envelope) => (
                envelope.message.unwrap_or_else(|| fallback.to_string()),
                envelope.error,
            ),
            Err(_) => (fallback.to_string(), None),
        };

        Err(ClientError::Api {
            status,
            message,
            detail,
        })
    }
}
