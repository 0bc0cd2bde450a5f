//! # Diary
//!
//! Client for a personal diary application hosted on a Linera chain and
//! reached through the node service's GraphQL endpoint.
//!
//! ## Modules
//!
//! - [`session`]: initialized/unlocked state machine, entry cache, view derivation
//! - [`gateway`]: single-endpoint GraphQL transport and the typed operation catalog
//! - [`render`]: renderer boundary plus display helpers and a terminal renderer
//! - [`store`]: tab-session and durable key-value stores, theme preference
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use diary::{GraphQlClient, MemoryStore, SessionController, TerminalRenderer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GraphQlClient::new("http://localhost:8080/chains/<chain>/applications/<app>");
//!     let mut diary = SessionController::new(client, TerminalRenderer::new(), MemoryStore::new());
//!
//!     diary.boot().await;
//!     diary.initialize("correct horse battery").await?;
//!     diary.add_entry("Day 1", "Hello", "correct horse battery").await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod gateway;
pub mod render;
pub mod session;
pub mod store;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::{Config, ConfigError, LoggingConfig, ServiceConfig, StorageConfig};

pub use gateway::{ApiError, ApiGateway, ApiResult, DiaryApi, GraphQlClient, Operation};

pub use render::{Renderer, StatusLevel, TerminalRenderer};

pub use session::{
    search_action, DiaryError, DiaryResult, SearchAction, Session, SessionController, View,
};

pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError, Theme};

pub use types::{Entry, EntryCollection, EntryId};
