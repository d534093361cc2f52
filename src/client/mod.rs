//! Backend proxy client
//!
//! [`Fetcher`] is the only seam between the binders and the network.
//! [`HttpFetcher`] talks to the real proxy; tests substitute in-process
//! implementations.

pub mod http;
pub mod retry;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::query::ResourceRequest;

pub use http::HttpFetcher;
pub use retry::{fetch_with_retry, RetryPolicy};

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Issue `request` and return the decoded JSON body of a 2xx response.
    async fn get_json(&self, request: &ResourceRequest) -> Result<Value>;
}
