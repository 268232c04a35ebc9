use crate::{Error, Result};
use pcoin_types::{Credentials, LeaderboardEntry, PlayRequest, PlayResponse, User};
use reqwest::{Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const USER_PATH: &str = "api/user";
const LOGIN_PATH: &str = "api/login";
const REGISTER_PATH: &str = "api/register";
const LOGOUT_PATH: &str = "api/logout";
const LEADERBOARD_PATH: &str = "api/leaderboard";
const PLAY_PATH: &str = "api/games/play";

/// Controls how failed requests are retried.
///
/// Only transient failures are retried: connection errors, timeouts and
/// `429`/`502`/`503`/`504` responses. Non-idempotent requests (POST) are sent
/// once unless `retry_non_idempotent` is set.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub retry_non_idempotent: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(2),
            retry_non_idempotent: false,
        }
    }
}

impl RetryPolicy {
    fn attempts(&self, idempotent: bool) -> usize {
        if idempotent || self.retry_non_idempotent {
            self.max_attempts.max(1)
        } else {
            1
        }
    }

    fn backoff(&self, attempt: usize) -> Duration {
        let factor = 1u32 << attempt.min(16) as u32;
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout()
}

/// Client for the P COIN API server.
///
/// The session cookie set by the server on login lives in the client's
/// in-memory cookie jar and is dropped with the client.
#[derive(Clone)]
pub struct Client {
    pub base_url: Url,
    http: reqwest::Client,
    retry_policy: RetryPolicy,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        match base_url.scheme() {
            "http" | "https" => {}
            other => return Err(Error::InvalidScheme(other.to_string())),
        }
        // Relative joins replace the last path segment unless the base ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(DEFAULT_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url,
            http,
            retry_policy: RetryPolicy::default(),
        })
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Fetch the signed-in user, or `None` when there is no session.
    pub async fn current_user(&self) -> Result<Option<User>> {
        let url = self.endpoint(USER_PATH)?;
        match self.get_with_retry(url).await {
            Ok(response) => Ok(Some(decode(response).await?)),
            Err(err) if err.status() == Some(StatusCode::UNAUTHORIZED) => {
                debug!("no active session");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<User> {
        let url = self.endpoint(LOGIN_PATH)?;
        let response = self.post_json_with_retry(url, credentials).await?;
        decode(response).await
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<User> {
        let url = self.endpoint(REGISTER_PATH)?;
        let response = self.post_json_with_retry(url, credentials).await?;
        decode(response).await
    }

    pub async fn logout(&self) -> Result<()> {
        let url = self.endpoint(LOGOUT_PATH)?;
        self.post_json_with_retry(url, &serde_json::json!({})).await?;
        Ok(())
    }

    /// Fetch the leaderboard in the order the server ranks it.
    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        let url = self.endpoint(LEADERBOARD_PATH)?;
        let response = self.get_with_retry(url).await?;
        decode(response).await
    }

    /// Play one round. Never retried: a duplicate would place a second bet.
    pub async fn play(&self, request: &PlayRequest) -> Result<PlayResponse> {
        let url = self.endpoint(PLAY_PATH)?;
        let response = check(self.http.post(url).json(request).send().await?).await?;
        decode(response).await
    }

    pub async fn get_with_retry(&self, url: Url) -> Result<Response> {
        self.send_with_retry(true, || self.http.get(url.clone())).await
    }

    pub async fn post_json_with_retry<T: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &T,
    ) -> Result<Response> {
        self.send_with_retry(false, || self.http.post(url.clone()).json(body)).await
    }

    async fn send_with_retry<F>(&self, idempotent: bool, build: F) -> Result<Response>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let attempts = self.retry_policy.attempts(idempotent);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let last = attempt >= attempts;
            match build().send().await {
                Ok(response) if !last && is_retryable_status(response.status()) => {
                    warn!(
                        status = %response.status(),
                        url = %response.url(),
                        attempt,
                        "retryable status"
                    );
                }
                Ok(response) => return check(response).await,
                Err(err) if !last && is_retryable_error(&err) => {
                    warn!(error = %err, attempt, "retryable request error");
                }
                Err(err) => return Err(err.into()),
            }
            tokio::time::sleep(self.retry_policy.backoff(attempt - 1)).await;
        }
    }
}

/// Turn non-success responses into errors carrying the body text.
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    debug!(%status, body = %body, "request failed");
    if body.is_empty() {
        return Err(Error::Failed(status));
    }
    Err(Error::FailedWithBody { status, body })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| {
        warn!(error = %err, len = bytes.len(), "failed to decode response body");
        Error::Decode(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(350),
            retry_non_idempotent: false,
        };
        assert_eq!(policy.backoff(0), Duration::from_millis(100));
        assert_eq!(policy.backoff(1), Duration::from_millis(200));
        assert_eq!(policy.backoff(2), Duration::from_millis(350));
        assert_eq!(policy.backoff(40), Duration::from_millis(350));
    }

    #[test]
    fn non_idempotent_requests_get_one_attempt_by_default() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts(true), 3);
        assert_eq!(policy.attempts(false), 1);
        let policy = RetryPolicy {
            retry_non_idempotent: true,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.attempts(false), 3);
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = Client::new("http://localhost:5000/casino").unwrap();
        assert_eq!(
            client.endpoint(USER_PATH).unwrap().as_str(),
            "http://localhost:5000/casino/api/user"
        );
    }
}
