use crate::context::ContextError;
use crate::response::Response;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;
use url::Url;

/// Main error type for API operations
#[derive(Debug, Error)]
pub enum Error {
    /// Base URL is not usable as a join root
    #[error("base URL must have a trailing slash, but {0:?} does not")]
    BaseUrlTrailingSlash(String),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Request body could not be encoded
    #[error("failed to serialize request body: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Request building error
    #[error("failed to build request: {0}")]
    RequestBuild(String),

    /// No execution context was supplied
    #[error("context must be non-nil")]
    MissingContext,

    /// The context was cancelled or timed out
    #[error(transparent)]
    Context(#[from] ContextError),

    /// HTTP transport error
    #[error("HTTP client error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server rejected the credentials (401)
    #[error(transparent)]
    Auth(AuthError),

    /// Any other failing status, including 202 Accepted
    #[error(transparent)]
    Api(ErrorResponse),

    /// A successful response carried a body that is not the expected JSON
    #[error("failed to decode response body: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        response: Box<Response>,
    },

    /// Writing the body to a raw sink failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this error is an authentication failure (401)
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Auth(_))
    }

    /// Check if this error is a not found error (404)
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// Get the HTTP status code if the server answered
    pub fn status_code(&self) -> Option<u16> {
        self.response().map(|r| r.status.as_u16())
    }

    /// The response that caused this error, if any
    pub fn response(&self) -> Option<&Response> {
        match self {
            Error::Auth(e) => Some(&e.response),
            Error::Api(e) => Some(&e.response),
            Error::Decode { response, .. } => Some(response),
            _ => None,
        }
    }
}

/// Result type for API operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error envelope returned by the API
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    error: Option<String>,
    error_description: Option<String>,
}

/// ErrorResponse reports an error caused by an API request
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    /// HTTP response that caused this error
    pub response: Response,
    /// Error code from the body
    pub error_code: String,
    /// Error message from the body
    pub error_description: String,
    /// Raw body, kept so callers can inspect it again
    pub body: Vec<u8>,
}

impl ErrorResponse {
    fn parse(response: Response, body: &[u8]) -> Self {
        // A body that is not the error envelope leaves both fields empty.
        let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
        ErrorResponse {
            response,
            error_code: parsed.error.unwrap_or_default(),
            error_description: parsed.error_description.unwrap_or_default(),
            body: body.to_vec(),
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} {} {}",
            self.response.method,
            self.response.url,
            self.response.status.as_u16(),
            self.error_code,
            self.error_description
        )
    }
}

impl std::error::Error for ErrorResponse {}

/// AuthError is returned for 401 Unauthorized responses
#[derive(Debug, Clone)]
pub struct AuthError(pub ErrorResponse);

impl std::ops::Deref for AuthError {
    type Target = ErrorResponse;

    fn deref(&self) -> &ErrorResponse {
        &self.0
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.error_code, self.error_description)
    }
}

impl std::error::Error for AuthError {}

/// Check a response for errors.
///
/// A response is an error if its status is outside the 200 range or equal
/// to 202 Accepted. Error bodies are expected to hold the JSON error
/// envelope; 401 is reported as [`Error::Auth`], everything else as
/// [`Error::Api`].
pub fn check_response(response: &Response, body: &[u8]) -> Result<()> {
    let code = response.status.as_u16();
    if (200..=299).contains(&code) && code != 202 {
        return Ok(());
    }

    let error = ErrorResponse::parse(response.clone(), body);
    match code {
        401 => Err(Error::Auth(AuthError(error))),
        _ => Err(Error::Api(error)),
    }
}

/// Strip credentials from a URL before it ends up in an error message
pub fn sanitize_url(url: &Url) -> Url {
    let mut url = url.clone();
    if url.password().is_some() {
        let _ = url.set_password(Some("REDACTED"));
    }

    if url.query_pairs().any(|(k, _)| k == "access_token") {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| {
                let v = if k == "access_token" { "REDACTED".into() } else { v.into_owned() };
                (k.into_owned(), v)
            })
            .collect();
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
    url
}
