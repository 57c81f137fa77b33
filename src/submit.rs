use crate::csrf::{ CsrfToken, CSRF_HEADER };
use crate::error::SubmitError;
use async_trait::async_trait;
use reqwest::header::{ ACCEPT, CONTENT_TYPE };
use reqwest::{ Client, Request, Response, StatusCode };
use serde::Serialize;
use url::Url;

/// Path of the blocklist endpoint, relative to the application root.
pub const BLOCKLIST_PATH: &str = "/api/source_preference/blocklist.json";

/// Request body for adding one domain.
#[derive(Debug, Serialize)]
pub struct BlocklistEntry<'a> {
    pub domain: &'a str,
}

/// One network call that adds a domain to the remote blocklist.
#[async_trait]
pub trait Submit: Send + Sync {
    async fn submit(&self, domain: &str, token: &CsrfToken) -> Result<(), SubmitError>;
}

/// `Submit` over HTTP against the application's blocklist endpoint.
#[derive(Debug, Clone)]
pub struct HttpSubmit {
    client: Client,
    endpoint: Url,
}

impl HttpSubmit {
    /// Creates a new `HttpSubmit` posting to `BLOCKLIST_PATH` under `base_url`.
    ///
    /// # Arguments
    ///
    /// * `client` - The session client. Cookies and default headers set on it go out with
    ///   every submission.
    /// * `base_url` - Root of the web application.
    pub fn new(client: Client, base_url: &Url) -> Result<Self, url::ParseError> {
        let endpoint = base_url.join(BLOCKLIST_PATH)?;
        Ok(HttpSubmit { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Builds the POST for `domain` without sending it.
    pub fn request(&self, domain: &str, token: &CsrfToken) -> Result<Request, reqwest::Error> {
        self.client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .header(ACCEPT, "application/json")
            .header(CSRF_HEADER, token.as_str())
            .json(&(BlocklistEntry { domain }))
            .build()
    }
}

#[async_trait]
impl Submit for HttpSubmit {
    async fn submit(&self, domain: &str, token: &CsrfToken) -> Result<(), SubmitError> {
        let request = self.request(domain, token)?;
        tracing::debug!(domain, endpoint = %self.endpoint, "posting blocklist entry");

        let response = self.client.execute(request).await?;
        interpret_response(response).await
    }
}

/// Decides whether the registry acknowledged a submission.
///
/// A 2xx answer counts only when its body is JSON; the shape of that JSON is not inspected.
/// `204 No Content` is accepted without a body.
pub async fn interpret_response(response: Response) -> Result<(), SubmitError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(SubmitError::Rejected { status, body });
    }
    if status == StatusCode::NO_CONTENT {
        return Ok(());
    }

    serde_json::from_str::<serde_json::Value>(&body)
        .map(|_| ())
        .map_err(|source| SubmitError::MalformedAck { status, source })
}
