//! # harvest - client for the Harvest v2 REST API
//!
//! A small async client for the [Harvest](https://www.getharvest.com/)
//! time tracking API. It builds authenticated requests, sends them,
//! decodes JSON responses, computes page navigation for list endpoints
//! and turns error statuses into typed errors.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use harvest::{Client, Context, TimeEntriesListOptions};
//!
//! # async fn run() -> harvest::Result<()> {
//! let client = Client::new("access_token", "account_id")?;
//! let ctx = Context::background();
//!
//! let opts = TimeEntriesListOptions::new()
//!     .from("20240101")
//!     .to("20240115")
//!     .per_page(100);
//!
//! let (entries, resp) = client.time_entries().list(&ctx, Some(&opts)).await?;
//! println!("{} entries, page {} of {}", entries.len(), resp.next_page, resp.last_page);
//! # Ok(())
//! # }
//! ```
//!
//! ## Cancellation
//!
//! Every call is bound to a [`Context`]. Cancelling it, or letting its
//! deadline pass, aborts the call and returns [`Error::Context`].
//!
//! ```no_run
//! use harvest::{Client, Context, Error};
//! use std::time::Duration;
//!
//! # async fn run(client: Client) {
//! let ctx = Context::background().with_timeout(Duration::from_secs(5));
//! match client.time_entries().list(&ctx, None).await {
//!     Ok((entries, _)) => println!("{} entries", entries.len()),
//!     Err(e) if e.is_auth_error() => eprintln!("check your token: {}", e),
//!     Err(Error::Context(e)) => eprintln!("gave up: {}", e),
//!     Err(e) => eprintln!("request failed: {}", e),
//! }
//! # }
//! ```

pub mod client;
pub mod context;
pub mod error;
pub mod options;
pub mod response;
pub mod rest;
pub mod time_entries;

// Re-export main types for convenience
pub use client::Config;
pub use context::{CancelHandle, Context, ContextError};
pub use error::{check_response, AuthError, Error, ErrorResponse, Result};
pub use options::{add_options, ListOptions, QueryOptions};
pub use response::{Destination, Json, Pagination, RawBody, Response};
pub use rest::Client;
pub use time_entries::{Project, Task, TimeEntriesListOptions, TimeEntriesService, TimeEntry, User};
