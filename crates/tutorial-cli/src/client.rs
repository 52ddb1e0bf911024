//! # Tutorials API Client
//!
//! Typed async client over the REST endpoints exposed by `tutorial-api`.
//! Non-success responses are decoded from the API's JSON error body into
//! [`ClientError::Api`].

use std::time::Duration;

use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tutorial_core::{NewTutorial, Tutorial, TutorialId, TutorialPatch};
use url::Url;

use crate::error::ClientError;

const API_PREFIX: &str = "api/tutorials";

/// Result of an update or delete.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MutationResult {
    pub message: String,
    pub count: u64,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Client for the tutorials API.
#[derive(Debug, Clone)]
pub struct TutorialClient {
    http: reqwest::Client,
    base_url: Url,
}

impl TutorialClient {
    /// Create a client for the API rooted at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        Ok(Self { http, base_url })
    }

    /// The normalized base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `POST /api/tutorials`
    pub async fn create(&self, req: &NewTutorial) -> Result<Tutorial, ClientError> {
        let url = self.base_url.join(API_PREFIX)?;
        let resp = self.send(Method::POST, url, Some(req)).await?;
        decode(resp, "POST /api/tutorials").await
    }

    /// `GET /api/tutorials[?title=]`
    pub async fn list(&self, title: Option<&str>) -> Result<Vec<Tutorial>, ClientError> {
        let mut url = self.base_url.join(API_PREFIX)?;
        if let Some(title) = title {
            url.query_pairs_mut().append_pair("title", title);
        }
        let resp = self.send::<()>(Method::GET, url, None).await?;
        decode(resp, "GET /api/tutorials").await
    }

    /// `GET /api/tutorials/published`
    pub async fn published(&self) -> Result<Vec<Tutorial>, ClientError> {
        let url = self.base_url.join(&format!("{API_PREFIX}/published"))?;
        let resp = self.send::<()>(Method::GET, url, None).await?;
        decode(resp, "GET /api/tutorials/published").await
    }

    /// `GET /api/tutorials/{id}`
    pub async fn get(&self, id: &TutorialId) -> Result<Tutorial, ClientError> {
        let url = self.base_url.join(&format!("{API_PREFIX}/{id}"))?;
        let resp = self.send::<()>(Method::GET, url, None).await?;
        decode(resp, &format!("GET /api/tutorials/{id}")).await
    }

    /// `PUT /api/tutorials/{id}`
    pub async fn update(
        &self,
        id: &TutorialId,
        patch: &TutorialPatch,
    ) -> Result<MutationResult, ClientError> {
        let url = self.base_url.join(&format!("{API_PREFIX}/{id}"))?;
        let resp = self.send(Method::PUT, url, Some(patch)).await?;
        decode(resp, &format!("PUT /api/tutorials/{id}")).await
    }

    /// `DELETE /api/tutorials/{id}`
    pub async fn delete(&self, id: &TutorialId) -> Result<MutationResult, ClientError> {
        let url = self.base_url.join(&format!("{API_PREFIX}/{id}"))?;
        let resp = self.send::<()>(Method::DELETE, url, None).await?;
        decode(resp, &format!("DELETE /api/tutorials/{id}")).await
    }

    /// `DELETE /api/tutorials`
    pub async fn delete_all(&self) -> Result<MutationResult, ClientError> {
        let url = self.base_url.join(API_PREFIX)?;
        let resp = self.send::<()>(Method::DELETE, url, None).await?;
        decode(resp, "DELETE /api/tutorials").await
    }

    async fn send<B: serde::Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Response, ClientError> {
        let endpoint = format!("{method} {}", url.path());
        tracing::debug!(%endpoint, "sending request");
        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        request
            .send()
            .await
            .map_err(|e| ClientError::Http { endpoint, source: e })
    }
}

async fn decode<T: DeserializeOwned>(resp: Response, endpoint: &str) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<ErrorEnvelope>(&text) {
            Ok(envelope) => (envelope.error.code, envelope.error.message),
            Err(_) => ("UNKNOWN".to_string(), text),
        };
        return Err(ClientError::Api {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            code,
            message,
        });
    }

    resp.json().await.map_err(|e| ClientError::Deserialization {
        endpoint: endpoint.to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let client = TutorialClient::new("http://localhost:8080", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8080/");

        let client =
            TutorialClient::new("http://proxy.local/backend", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.base_url().join(API_PREFIX).unwrap().as_str(),
            "http://proxy.local/backend/api/tutorials"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = TutorialClient::new("::nope::", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ClientError::Url(_)));
    }
}
