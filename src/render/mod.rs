//! Renderer Boundary
//!
//! The controller pushes a [`View`] and, for the diary view, the cached
//! entries into a renderer. Presentation, escaping and status display are
//! the renderer's business.

mod format;
mod terminal;

pub use format::{escape_html, format_relative, format_relative_now, truncate, PREVIEW_LEN};
pub use terminal::TerminalRenderer;

use crate::session::View;
use crate::types::EntryCollection;

/// Severity of a transient status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Error,
}

/// Presentation capability injected into the controller
pub trait Renderer {
    /// Draw the active view; `entries` is only given for [`View::Diary`]
    fn render(&mut self, view: View, entries: Option<&EntryCollection>);

    /// Show a transient status line
    fn show_status(&mut self, message: &str, level: StatusLevel);

    /// Raised before and lowered after every round trip
    fn set_loading(&mut self, _loading: bool) {}
}
