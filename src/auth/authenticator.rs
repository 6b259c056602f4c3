use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{is_expired, Clock, SystemClock, Token, TokenProvider, TokenStore};
use crate::client::{endpoints, send_json};
use crate::error::{Error, Result};

/// The JSON login payload on disk. Its format belongs to the platform; it is
/// forwarded without inspection.
#[derive(Debug, Clone)]
pub struct CredentialsFile {
    path: PathBuf,
}

impl CredentialsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the payload with newlines stripped.
    pub fn read_payload(&self) -> Result<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content.replace('\n', "")),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::CredentialsMissing {
                path: self.path.clone(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

/// Logs in against `/login` whenever the stored token is missing or stale.
pub struct Authenticator<S> {
    http: reqwest::Client,
    base_url: String,
    credentials: CredentialsFile,
    store: S,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl<S: TokenStore> Authenticator<S> {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        credentials: CredentialsFile,
        store: S,
        ttl: Duration,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            credentials,
            store,
            clock: Arc::new(SystemClock),
            ttl,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn login(&self) -> Result<Token> {
        let payload = self.credentials.read_payload()?;
        let url = format!("{}{}", self.base_url, endpoints::LOGIN);
        debug!(url = %url, "requesting new token");

        let request = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(payload);

        // Any refusal from /login means the credentials were not accepted.
        let response = match send_json::<LoginResponse>(endpoints::LOGIN, request).await {
            Err(Error::UnexpectedStatus { endpoint, status }) => {
                return Err(Error::AuthenticationRejected { endpoint, status })
            }
            other => other?,
        };

        Ok(Token::new(response.token))
    }

    fn cached(&self, threshold: Duration) -> Option<Token> {
        match self.store.load() {
            Ok(Some(stored)) if !is_expired(stored.written_at, self.clock.now(), threshold) => {
                Some(stored.token)
            }
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "could not read cached token, treating it as stale");
                None
            }
        }
    }
}

#[async_trait]
impl<S: TokenStore> TokenProvider for Authenticator<S> {
    async fn acquire(&self) -> Result<Token> {
        if let Some(token) = self.cached(self.ttl) {
            debug!("using cached token");
            return Ok(token);
        }

        let token = self.login().await?;
        self.store.save(&token)?;
        info!("obtained new token");
        Ok(token)
    }

    fn is_stale(&self, threshold: Duration) -> bool {
        self.cached(threshold).is_none()
    }
}
