use crate::blocklist::DomainList;
use crate::csrf::{ CredentialProvider, MetaTagToken };
use crate::error::{ ConfigError, CredentialError };
use crate::submit::HttpSubmit;
use crate::{ submit_all, SubmissionOutcome, SubmitMode };
use reqwest::cookie::Jar;
use reqwest::header::{ HeaderMap, HeaderValue, USER_AGENT };
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub struct SubmitterBuilder {
    base_url: Option<String>,
    timeout: u64,
    ssl_verify: bool,
    proxy: Option<String>,
    session_cookie: Option<String>,
    user_agent: Option<String>,
    mode: SubmitMode,
}

impl Default for SubmitterBuilder {
    fn default() -> Self {
        SubmitterBuilder {
            base_url: None,
            timeout: 10,
            ssl_verify: true,
            proxy: None,
            session_cookie: None,
            user_agent: None,
            mode: SubmitMode::Sequential,
        }
    }
}

impl SubmitterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Request timeout in seconds, applied to the token page and every submission.
    pub fn timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn ssl_verify(mut self, ssl_verify: bool) -> Self {
        self.ssl_verify = ssl_verify;
        self
    }

    pub fn proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    /// Raw `Cookie` header of the logged-in browser session.
    pub fn session_cookie(mut self, cookie: Option<String>) -> Self {
        self.session_cookie = cookie;
        self
    }

    pub fn user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn mode(mut self, mode: SubmitMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn build(self) -> Result<Submitter, ConfigError> {
        let base_url = Url::parse(self.base_url.as_deref().ok_or(ConfigError::MissingBaseUrl)?)?;

        let mut headers = HeaderMap::new();
        if let Some(user_agent) = self.user_agent {
            let value = HeaderValue::from_str(&user_agent).map_err(|_|
                ConfigError::InvalidHeader("user-agent")
            )?;
            headers.insert(USER_AGENT, value);
        }

        // The jar keeps the session current when the app rotates it with Set-Cookie.
        let jar = match self.session_cookie {
            Some(cookie) => session_jar(&cookie, &base_url)?,
            None => Jar::default(),
        };

        let client_builder = Client::builder()
            .timeout(Duration::from_secs(self.timeout))
            .danger_accept_invalid_certs(!self.ssl_verify)
            .cookie_provider(Arc::new(jar))
            .default_headers(headers);

        let client_builder = if let Some(proxy_url) = self.proxy {
            client_builder.proxy(reqwest::Proxy::all(proxy_url)?)
        } else {
            client_builder
        };

        let client = client_builder.build()?;
        let submit = HttpSubmit::new(client.clone(), &base_url)?;

        Ok(Submitter {
            client,
            base_url,
            submit,
            mode: self.mode,
        })
    }
}

/// Seeds a cookie jar with the `name=value` pairs of a browser `Cookie` header, scoped to the
/// whole host so they reach the blocklist endpoint whatever path `base_url` has.
fn session_jar(cookie: &str, base_url: &Url) -> Result<Jar, ConfigError> {
    if HeaderValue::from_str(cookie).is_err() {
        return Err(ConfigError::InvalidHeader("cookie"));
    }

    let jar = Jar::default();
    for pair in cookie
        .split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty()) {
        if !pair.contains('=') {
            return Err(ConfigError::InvalidHeader("cookie"));
        }
        jar.add_cookie_str(&format!("{}; Path=/", pair), base_url);
    }

    Ok(jar)
}

/// A configured session against one web application.
pub struct Submitter {
    client: Client,
    base_url: Url,
    submit: HttpSubmit,
    mode: SubmitMode,
}

impl Submitter {
    pub fn mode(&self) -> SubmitMode {
        self.mode
    }

    pub fn http_submit(&self) -> &HttpSubmit {
        &self.submit
    }

    /// A `MetaTagToken` that reads the token from `page_path` over this session.
    pub fn meta_tag_provider(&self, page_path: &str) -> Result<MetaTagToken, CredentialError> {
        let page_url = self.base_url.join(page_path)?;
        Ok(MetaTagToken::new(self.client.clone(), page_url))
    }

    /// Fetches the token once, then submits every domain.
    ///
    /// # Arguments
    ///
    /// * `domains` - The domains to add, in submission order.
    /// * `credentials` - Where the anti-forgery token comes from.
    ///
    /// # Returns
    ///
    /// One outcome per domain, or a `CredentialError` if no token could be obtained, in which
    /// case nothing was submitted.
    pub async fn run(
        &self,
        domains: &DomainList,
        credentials: &dyn CredentialProvider
    ) -> Result<Vec<SubmissionOutcome>, CredentialError> {
        let token = credentials.csrf_token().await?;
        Ok(submit_all(domains, &token, &self.submit, self.mode).await)
    }
}
