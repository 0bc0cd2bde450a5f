//! GraphQL HTTP Client
//!
//! Posts `{query, variables}` to the diary application's endpoint on a
//! Linera node service and unwraps the `{data, errors}` envelope.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ApiError, ApiGateway, ApiResult};
use crate::config::{ConfigError, ServiceConfig};

/// GraphQL client bound to one application endpoint
pub struct GraphQlClient {
    client: Client,
    endpoint: String,
}

impl GraphQlClient {
    /// Create a client for an already assembled endpoint URL
    ///
    /// No request timeout is set; a hung request waits on the transport.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Create a client from service configuration
    pub fn from_config(config: &ServiceConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.graphql_url()?))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ApiGateway for GraphQlClient {
    async fn execute(&self, operation: &str, variables: Map<String, Value>) -> ApiResult<Value> {
        let body = GraphQlRequest {
            query: operation,
            variables: &variables,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ApiError::Transport(format!("Service unavailable at {}", self.endpoint))
                } else {
                    ApiError::Transport(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        let envelope: GraphQlResponse = response.json().await.map_err(|e| {
            ApiError::Transport(format!("Undecodable response ({}): {}", status, e))
        })?;

        envelope.into_data()
    }
}

// ============================================
// Request/Response DTOs
// ============================================

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: &'a Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

impl GraphQlResponse {
    /// First error wins; a response with neither data nor errors is a transport fault
    fn into_data(self) -> ApiResult<Value> {
        if let Some(first) = self.errors.into_iter().next() {
            return Err(ApiError::Application(first.message));
        }
        match self.data {
            Some(Value::Null) | None => Err(ApiError::Transport(
                "Response carried no data".to_string(),
            )),
            Some(data) => Ok(data),
        }
    }
}
