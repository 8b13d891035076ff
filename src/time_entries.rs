use crate::context::Context;
use crate::error::Result;
use crate::options::{add_options, ListOptions, QueryOptions};
use crate::response::{Json, Pagination, Response};
use crate::rest::Client;
use reqwest::Method;
use serde::{Deserialize, Serialize};

/// Project a time entry is booked on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub id: u64,
    pub name: String,
}

/// User who tracked a time entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: u64,
    pub name: String,
}

/// Task a time entry is booked on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    pub id: u64,
    pub name: String,
}

/// A tracked block of time, as returned by the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeEntry {
    pub id: u64,
    pub hours: f64,
    pub notes: Option<String>,
    pub project: Project,
    pub user: User,
    pub task: Task,
    pub spent_date: String,
}

/// Optional parameters for [`TimeEntriesService::list`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeEntriesListOptions {
    /// Only entries with a spent date on or after this date
    pub from: Option<String>,
    /// Only entries with a spent date on or before this date
    pub to: Option<String>,
    pub list: ListOptions,
}

impl TimeEntriesListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.list.page = page;
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.list.per_page = per_page;
        self
    }
}

impl QueryOptions for TimeEntriesListOptions {
    fn query_pairs(&self, pairs: &mut Vec<(&'static str, String)>) {
        if let Some(from) = self.from.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("from", from.to_string()));
        }
        if let Some(to) = self.to.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("to", to.to_string()));
        }
        self.list.query_pairs(pairs);
    }
}

/// One page of the time entry listing
#[derive(Debug, Default, Deserialize)]
struct Page {
    #[serde(flatten)]
    pagination: Pagination,
    #[serde(default)]
    time_entries: Vec<TimeEntry>,
}

/// Time entry endpoints
#[derive(Debug, Clone, Copy)]
pub struct TimeEntriesService<'a> {
    client: &'a Client,
}

impl<'a> TimeEntriesService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        TimeEntriesService { client }
    }

    /// List time entries, newest first as ordered by the server.
    ///
    /// The returned [`Response`] has its page numbers filled in from the
    /// pagination block of the page.
    pub async fn list(
        &self,
        ctx: &Context,
        opts: Option<&TimeEntriesListOptions>,
    ) -> Result<(Vec<TimeEntry>, Response)> {
        let path = add_options("time_entries", opts);
        let req = self.client.new_request::<()>(Method::GET, &path, None)?;

        let mut page = Json(Page::default());
        let mut resp = self.client.do_request(Some(ctx), req, Some(&mut page)).await?;

        let page = page.into_inner();
        resp.populate_page_values(&page.pagination);

        Ok((page.time_entries, resp))
    }
}
