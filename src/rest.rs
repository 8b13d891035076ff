use crate::client::{create_http_client, Config};
use crate::context::Context;
use crate::error::{check_response, sanitize_url, Error, Result};
use crate::response::{Destination, Response};
use crate::time_entries::TimeEntriesService;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, Request};
use serde::Serialize;
use std::fmt;
use std::time::Instant;

/// Header carrying the account a request acts on
pub const ACCOUNT_ID_HEADER: &str = "Harvest-Account-Id";

/// Client for the Harvest API.
///
/// Holds only immutable configuration, so it can be cloned and shared
/// between tasks freely.
#[derive(Clone)]
pub struct Client {
    /// HTTP client
    http: reqwest::Client,
    /// Configuration
    pub config: Config,
    /// Personal access token or OAuth2 access token
    pub access_token: String,
    /// Account the requests act on
    pub account_id: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("access_token", &"REDACTED")
            .field("account_id", &self.account_id)
            .finish()
    }
}

impl Client {
    /// Create a new client with default configuration
    pub fn new(access_token: impl Into<String>, account_id: impl Into<String>) -> Result<Self> {
        Self::with_config(access_token, account_id, Config::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(
        access_token: impl Into<String>,
        account_id: impl Into<String>,
        config: Config,
    ) -> Result<Self> {
        let http = create_http_client(&config)?;
        Ok(Self::with_http_client(http, access_token, account_id, config))
    }

    /// Create a new client around an existing HTTP client
    pub fn with_http_client(
        http: reqwest::Client,
        access_token: impl Into<String>,
        account_id: impl Into<String>,
        config: Config,
    ) -> Self {
        Client {
            http,
            config,
            access_token: access_token.into(),
            account_id: account_id.into(),
        }
    }

    /// Time entry endpoints
    pub fn time_entries(&self) -> TimeEntriesService<'_> {
        TimeEntriesService::new(self)
    }

    /// Build an API request.
    ///
    /// `path` is resolved relative to the base URL and API version and may
    /// carry a query string. If `body` is given it is sent as JSON.
    pub fn new_request<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Request>
    where
        B: Serialize + ?Sized,
    {
        let base = &self.config.base_url;
        if !base.path().ends_with('/') {
            return Err(Error::BaseUrlTrailingSlash(base.to_string()));
        }
        let url = base.join(&format!("{}{}", self.config.api_version, path))?;

        let mut builder = self
            .http
            .request(method, url)
            .header(AUTHORIZATION, format!("Bearer {}", self.access_token))
            .header(ACCOUNT_ID_HEADER, &self.account_id);

        if !self.config.user_agent.is_empty() {
            builder = builder.header(USER_AGENT, &self.config.user_agent);
        }

        if let Some(body) = body {
            let mut buf = serde_json::to_vec(body).map_err(Error::Serialize)?;
            buf.push(b'\n');
            builder = builder.header(CONTENT_TYPE, "application/json").body(buf);
        }

        builder
            .build()
            .map_err(|e| Error::RequestBuild(e.to_string()))
    }

    /// Send a request and handle the response.
    ///
    /// The body is decoded into `dest` as JSON, or copied as is when the
    /// destination offers a raw sink. An empty body leaves `dest` untouched.
    /// Error statuses are returned as [`Error::Auth`] or [`Error::Api`].
    ///
    /// `ctx` must be given. If it is cancelled or times out before the
    /// response is read, its error is returned.
    pub async fn do_request(
        &self,
        ctx: Option<&Context>,
        req: Request,
        dest: Option<&mut (dyn Destination + Send)>,
    ) -> Result<Response> {
        let ctx = ctx.ok_or(Error::MissingContext)?;

        let method = req.method().clone();
        let url = sanitize_url(req.url());
        let start = Instant::now();

        let exchange = async {
            let resp = self.http.execute(req).await?;
            let status = resp.status();
            let headers = resp.headers().clone();
            let body = resp.bytes().await?;
            Ok::<_, reqwest::Error>((status, headers, body))
        };

        let result = tokio::select! {
            biased;
            err = ctx.done() => return Err(err.into()),
            result = exchange => result,
        };

        let (status, headers, body) = match result {
            Ok(parts) => parts,
            Err(e) => return Err(transport_error(ctx, e)),
        };

        tracing::debug!(
            method = %method,
            url = %url,
            status = status.as_u16(),
            elapsed = ?start.elapsed(),
            "harvest request"
        );

        let response = Response::new(method, url, status, headers);
        check_response(&response, &body)?;

        if let Some(dest) = dest {
            if let Some(sink) = dest.raw_sink() {
                sink.write_all(&body)?;
            } else if !is_blank(&body) {
                if let Err(source) = dest.decode(&body) {
                    return Err(Error::Decode {
                        source,
                        response: Box::new(response),
                    });
                }
            }
        }

        Ok(response)
    }
}

/// Pick the error for a failed exchange. The context's error says more
/// than whatever the transport saw.
fn transport_error(ctx: &Context, mut e: reqwest::Error) -> Error {
    if let Some(err) = ctx.err() {
        return err.into();
    }
    if let Some(u) = e.url_mut() {
        *u = sanitize_url(u);
    }
    Error::Transport(e)
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextError;
    use std::collections::HashMap;

    fn client() -> Client {
        Client::new("token-123", "4567").unwrap()
    }

    #[test]
    fn test_client_defaults() {
        let c = client();
        assert_eq!(c.config.base_url.as_str(), "https://api.harvestapp.com/");
        assert_eq!(c.access_token, "token-123");
        assert_eq!(c.account_id, "4567");
    }

    #[test]
    fn test_new_request_headers() {
        let req = client()
            .new_request::<()>(Method::GET, "time_entries?page=2", None)
            .unwrap();

        assert_eq!(*req.method(), Method::GET);
        assert_eq!(
            req.url().as_str(),
            "https://api.harvestapp.com/v2/time_entries?page=2"
        );
        assert_eq!(req.headers()[AUTHORIZATION], "Bearer token-123");
        assert_eq!(req.headers()[ACCOUNT_ID_HEADER], "4567");
        assert!(req.headers()[USER_AGENT]
            .to_str()
            .unwrap()
            .starts_with("harvest-rs/"));
        assert!(req.headers().get(CONTENT_TYPE).is_none());
        assert!(req.body().is_none());
    }

    #[test]
    fn test_new_request_json_body_is_not_html_escaped() {
        let mut body = HashMap::new();
        body.insert("notes", "<b>fix</b> & deploy");

        let req = client()
            .new_request(Method::POST, "time_entries", Some(&body))
            .unwrap();

        assert_eq!(req.headers()[CONTENT_TYPE], "application/json");
        let sent = req.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(sent, b"{\"notes\":\"<b>fix</b> & deploy\"}\n");
    }

    #[test]
    fn test_new_request_without_user_agent() {
        let config = Config::default().with_user_agent("");
        let c = Client::with_config("t", "1", config).unwrap();
        let req = c.new_request::<()>(Method::GET, "users/me", None).unwrap();
        assert!(req.headers().get(USER_AGENT).is_none());
    }

    #[test]
    fn test_new_request_requires_trailing_slash() {
        let config = Config::new("https://api.harvestapp.com/custom").unwrap();
        let c = Client::with_config("t", "1", config).unwrap();

        // Checked on every call, not only once.
        for _ in 0..2 {
            let err = c
                .new_request::<()>(Method::GET, "time_entries", None)
                .unwrap_err();
            assert!(matches!(err, Error::BaseUrlTrailingSlash(_)));
            assert!(err.to_string().contains("https://api.harvestapp.com/custom"));
        }
    }

    #[tokio::test]
    async fn test_do_request_requires_context() {
        let c = client();
        let req = c.new_request::<()>(Method::GET, "time_entries", None).unwrap();
        let err = c.do_request(None, req, None).await.unwrap_err();
        assert!(matches!(err, Error::MissingContext));
    }

    #[test]
    fn test_debug_redacts_access_token() {
        let c = Client::new("secret-token", "4567").unwrap();
        let printed = format!("{:?}", c);
        assert!(!printed.contains("secret-token"), "{}", printed);
        assert!(printed.contains("REDACTED"));
        assert!(printed.contains("4567"));
    }

    async fn refused() -> reqwest::Error {
        reqwest::Client::new()
            .get("http://127.0.0.1:1/v2/time_entries")
            .send()
            .await
            .unwrap_err()
    }

    #[tokio::test]
    async fn test_context_error_overrides_transport_error() {
        let (ctx, cancel) = Context::background().with_cancel();
        cancel.cancel();
        let err = transport_error(&ctx, refused().await);
        assert!(matches!(err, Error::Context(ContextError::Canceled)), "{:?}", err);

        let expired = Context::background().with_deadline(tokio::time::Instant::now());
        let err = transport_error(&expired, refused().await);
        assert!(matches!(err, Error::Context(ContextError::DeadlineExceeded)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_live_context_keeps_transport_error() {
        let err = transport_error(&Context::background(), refused().await);
        assert!(matches!(err, Error::Transport(_)), "{:?}", err);
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(b""));
        assert!(is_blank(b" \n\t"));
        assert!(!is_blank(b"{}"));
    }
}
