use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::Write;
use url::Url;

/// Pagination block embedded in list responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub per_page: u32,
    pub total_pages: u32,
    pub total_entries: u32,
    pub next_page: Option<u32>,
    pub previous_page: Option<u32>,
    pub page: u32,
}

/// Response wraps the metadata of an HTTP response from the API and
/// provides computed page numbers for list endpoints.
#[derive(Debug, Clone)]
pub struct Response {
    /// Method of the request that produced this response
    pub method: Method,
    /// Sanitized request URL
    pub url: Url,
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,

    /// Always 1 once pagination is populated
    pub first_page: u32,
    /// Total number of pages
    pub last_page: u32,
    /// Page after the current one, clamped to the last page
    pub next_page: u32,
    /// Page before the current one, clamped to the first page
    pub previous_page: u32,
}

impl Response {
    pub(crate) fn new(method: Method, url: Url, status: StatusCode, headers: HeaderMap) -> Self {
        Response {
            method,
            url,
            status,
            headers,
            first_page: 0,
            last_page: 0,
            next_page: 0,
            previous_page: 0,
        }
    }

    /// Fill in the page navigation numbers from a pagination block.
    /// Next and previous are clamped to the last and first page.
    pub fn populate_page_values(&mut self, pagination: &Pagination) {
        self.first_page = 1;
        self.last_page = pagination.total_pages;
        self.next_page = pagination.page.saturating_add(1).min(self.last_page);
        self.previous_page = pagination.page.saturating_sub(1).max(self.first_page);
    }
}

/// Destination for a successful response body.
///
/// The dispatcher asks for [`raw_sink`](Destination::raw_sink) first and
/// copies the body there untouched when one is offered; otherwise it calls
/// [`decode`](Destination::decode) with the JSON body.
pub trait Destination {
    /// Decode a non-empty JSON body
    fn decode(&mut self, body: &[u8]) -> serde_json::Result<()>;

    /// Writer that takes the raw body instead of decoding it
    fn raw_sink(&mut self) -> Option<&mut dyn Write> {
        None
    }
}

/// Decodes the body as JSON into `T`. An empty body leaves the value as is.
///
/// Only the first JSON value is read; anything after it is ignored.
#[derive(Debug, Clone, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: DeserializeOwned> Destination for Json<T> {
    fn decode(&mut self, body: &[u8]) -> serde_json::Result<()> {
        if let Some(value) = serde_json::Deserializer::from_slice(body).into_iter::<T>().next() {
            self.0 = value?;
        }
        Ok(())
    }
}

/// Receives the raw response body, e.g. for CSV or PDF exports
#[derive(Debug, Default)]
pub struct RawBody<W>(pub W);

impl<W> RawBody<W> {
    pub fn into_inner(self) -> W {
        self.0
    }
}

impl<W: Write> Destination for RawBody<W> {
    fn decode(&mut self, body: &[u8]) -> serde_json::Result<()> {
        self.0.write_all(body).map_err(serde_json::Error::io)
    }

    fn raw_sink(&mut self) -> Option<&mut dyn Write> {
        Some(&mut self.0)
    }
}
