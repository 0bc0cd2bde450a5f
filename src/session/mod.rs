//! Session/State Controller
//!
//! Owns the initialized/unlocked state machine and the entry cache, gates
//! writes on a caller-supplied secret phrase, and pushes the derived view
//! into a [`Renderer`](crate::render::Renderer).
//!
//! ## Data Flow
//!
//! 1. The front end relays raw input to a controller operation
//! 2. Local validation short-circuits before any request
//! 3. One round trip through the [`ApiGateway`](crate::gateway::ApiGateway)
//! 4. State and cache are updated, then the view is redrawn

mod controller;
mod error;
mod search;
mod state;

pub use controller::{SessionController, MIN_PHRASE_LEN, UNLOCKED_KEY};
pub use error::{DiaryError, DiaryResult};
pub use search::{search_action, SearchAction};
pub use state::{Session, View};
