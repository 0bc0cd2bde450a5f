//! API Gateway
//!
//! Maps typed diary operations onto a single GraphQL endpoint.
//!
//! ## Architecture
//!
//! - **ApiGateway**: the transport seam, one `execute` call for queries and mutations
//! - **GraphQlClient**: `reqwest` implementation posting `{query, variables}`
//! - **DiaryApi**: typed operation catalog on top of any gateway
//!
//! No retries and no timeout are configured here; callers decide.

mod client;
mod error;
mod operations;

pub use client::GraphQlClient;
pub use error::{ApiError, ApiResult};
pub use operations::{DiaryApi, Operation};

use async_trait::async_trait;
use serde_json::{Map, Value};

/// A single request/response shape for every diary operation
#[async_trait]
pub trait ApiGateway: Send + Sync {
    /// Run one GraphQL document with its variables and return the `data` object
    async fn execute(&self, operation: &str, variables: Map<String, Value>) -> ApiResult<Value>;
}

