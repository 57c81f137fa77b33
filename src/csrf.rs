//! # CSRF Token Module
//!
//! Anti-forgery tokens for the blocklist endpoint. The web application renders its token as
//! `<meta name="csrf-token" content="...">`; providers either hand out a token the caller
//! already has or scrape it from a page loaded over the authenticated session.

use crate::error::CredentialError;
use async_trait::async_trait;
use reqwest::header::HeaderValue;
use reqwest::Client;
use scraper::{ Html, Selector };
use std::fmt;
use url::Url;

/// Header the token travels in.
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// An opaque anti-forgery token.
#[derive(Clone, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    pub fn new(token: impl Into<String>) -> Result<Self, CredentialError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(CredentialError::EmptyToken);
        }
        if HeaderValue::from_str(&token).is_err() {
            return Err(CredentialError::InvalidToken);
        }
        Ok(CsrfToken(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CsrfToken(<redacted>)")
    }
}

/// Source of the token attached to every submission of a run.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn csrf_token(&self) -> Result<CsrfToken, CredentialError>;
}

/// A token supplied up front, e.g. copied from the browser.
#[derive(Debug, Clone)]
pub struct StaticToken(CsrfToken);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Result<Self, CredentialError> {
        Ok(StaticToken(CsrfToken::new(token)?))
    }
}

#[async_trait]
impl CredentialProvider for StaticToken {
    async fn csrf_token(&self) -> Result<CsrfToken, CredentialError> {
        Ok(self.0.clone())
    }
}

/// Loads a page of the web application and reads the token from its `csrf-token` meta tag.
///
/// The client must carry the session (cookies) the page is rendered for, otherwise the
/// application hands out a token that the blocklist endpoint will not accept.
pub struct MetaTagToken {
    client: Client,
    page_url: Url,
}

impl MetaTagToken {
    pub fn new(client: Client, page_url: Url) -> Self {
        MetaTagToken { client, page_url }
    }
}

#[async_trait]
impl CredentialProvider for MetaTagToken {
    async fn csrf_token(&self) -> Result<CsrfToken, CredentialError> {
        tracing::debug!(page = %self.page_url, "fetching csrf token");

        let html = self.client
            .get(self.page_url.clone())
            .send().await?
            .error_for_status()?
            .text().await?;

        parse_csrf_token(&html).ok_or_else(||
            CredentialError::MissingToken(self.page_url.to_string())
        )
    }
}

/// Extracts the `csrf-token` meta tag content from an HTML document.
pub fn parse_csrf_token(html: &str) -> Option<CsrfToken> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(r#"meta[name="csrf-token"]"#).ok()?;

    document
        .select(&selector)
        .filter_map(|meta| meta.value().attr("content"))
        .find_map(|content| CsrfToken::new(content).ok())
}
