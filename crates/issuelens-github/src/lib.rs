//! IssueLens GitHub Source
//!
//! Fetches the open issues of a repository through the REST API, drops pull
//! requests and bot-authored issues, and serializes each remaining issue to
//! the JSON text handed to extraction.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod filter;
mod source;

pub use error::GitHubError;
pub use filter::{AuthorFilter, DEFAULT_DENIED_AUTHORS};
pub use source::{GitHubIssueSource, DEFAULT_API_URL, PER_PAGE};
