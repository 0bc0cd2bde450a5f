//! Terminal renderer used by the `diary` binary

use std::io::{self, Stdout, Write};

use super::{format_relative_now, truncate, Renderer, StatusLevel, PREVIEW_LEN};
use crate::session::View;
use crate::types::{Entry, EntryCollection};

/// Plain-text renderer writing to stdout (or any writer)
pub struct TerminalRenderer<W: Write = Stdout> {
    out: W,
    quiet: bool,
}

impl TerminalRenderer<Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for TerminalRenderer<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out, quiet: false }
    }

    /// Suppress view output and informational status lines
    pub fn set_quiet(&mut self, quiet: bool) {
        self.quiet = quiet;
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print one entry in full
    pub fn show_entry(&mut self, entry: &Entry) {
        let result = self.write_entry(entry);
        report(result);
    }

    fn write_entry(&mut self, entry: &Entry) -> io::Result<()> {
        writeln!(self.out, "#{}  {}", entry.id, entry.title)?;
        writeln!(self.out, "{}", format_relative_now(entry.timestamp))?;
        writeln!(self.out)?;
        writeln!(self.out, "{}", entry.content)
    }

    fn write_view(&mut self, view: View, entries: Option<&EntryCollection>) -> io::Result<()> {
        match view {
            View::Create => {
                writeln!(self.out, "No diary exists on this chain yet.")?;
                writeln!(self.out, "Create one with:  diary init --phrase <secret phrase>")?;
            }
            View::Unlock => {
                writeln!(self.out, "Diary is locked.")?;
                writeln!(self.out, "Unlock with:  diary unlock --phrase <secret phrase>")?;
            }
            View::Diary => match entries {
                Some(entries) if !entries.is_empty() => {
                    for entry in entries.sorted_for_display() {
                        writeln!(
                            self.out,
                            "#{:<5} {:<40} {}",
                            entry.id,
                            truncate(&entry.title, 40),
                            format_relative_now(entry.timestamp)
                        )?;
                        writeln!(self.out, "       {}", preview(&entry.content))?;
                    }
                }
                _ => {
                    writeln!(self.out, "No entries yet.")?;
                    writeln!(self.out, "Write one with:  diary add <title> <content> --phrase <secret phrase>")?;
                }
            },
        }
        Ok(())
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, view: View, entries: Option<&EntryCollection>) {
        if self.quiet {
            return;
        }
        let result = self.write_view(view, entries);
        report(result);
    }

    fn show_status(&mut self, message: &str, level: StatusLevel) {
        if self.quiet && level == StatusLevel::Info {
            return;
        }
        let marker = match level {
            StatusLevel::Info => "-",
            StatusLevel::Success => "✓",
            StatusLevel::Error => "✗",
        };
        let result = writeln!(self.out, "{} {}", marker, message);
        report(result);
    }

    fn set_loading(&mut self, loading: bool) {
        tracing::trace!(loading, "Loading indicator");
    }
}

/// Terminal output is best effort; a closed pipe is logged, not fatal
fn report(result: io::Result<()>) {
    if let Err(e) = result {
        tracing::warn!("Failed to write to terminal: {}", e);
    }
}

/// Single-line preview of entry content
fn preview(content: &str) -> String {
    let flat: String = content
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    truncate(&flat, PREVIEW_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::entry;

    fn output(renderer: TerminalRenderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_diary_view_lists_newest_first() {
        let mut renderer = TerminalRenderer::with_writer(Vec::new());
        let entries = EntryCollection::new(vec![
            entry(0, "First", "old news", 1_000),
            entry(1, "Second", "line one\nline two", 2_000),
        ]);

        renderer.render(View::Diary, Some(&entries));
        let text = output(renderer);

        let second = text.find("Second").unwrap();
        let first = text.find("First").unwrap();
        assert!(second < first);
        assert!(text.contains("line one line two"));
    }

    #[test]
    fn test_empty_diary_view() {
        let mut renderer = TerminalRenderer::with_writer(Vec::new());
        renderer.render(View::Diary, Some(&EntryCollection::default()));
        assert!(output(renderer).contains("No entries yet."));
    }

    #[test]
    fn test_locked_view_and_status() {
        let mut renderer = TerminalRenderer::with_writer(Vec::new());
        renderer.render(View::Unlock, None);
        renderer.show_status("Incorrect secret phrase", StatusLevel::Error);

        let text = output(renderer);
        assert!(text.contains("Diary is locked."));
        assert!(text.contains("✗ Incorrect secret phrase"));
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failures_are_absorbed() {
        let mut renderer = TerminalRenderer::with_writer(ClosedPipe);
        renderer.render(View::Diary, Some(&EntryCollection::default()));
        renderer.show_status("Entry saved!", StatusLevel::Success);
        renderer.show_entry(&entry(0, "a", "b", 1));
    }

    #[test]
    fn test_show_entry_prints_full_content() {
        let mut renderer = TerminalRenderer::with_writer(Vec::new());
        renderer.show_entry(&entry(4, "Trip", "line one\nline two", 1));
        let text = output(renderer);
        assert!(text.starts_with("#4  Trip\n"));
        assert!(text.ends_with("\nline one\nline two\n"));
    }

    #[test]
    fn test_quiet_keeps_outcomes() {
        let mut renderer = TerminalRenderer::with_writer(Vec::new());
        renderer.set_quiet(true);
        renderer.render(View::Create, None);
        renderer.show_status("Connecting...", StatusLevel::Info);
        renderer.show_status("Entry saved", StatusLevel::Success);

        assert_eq!(output(renderer), "✓ Entry saved\n");
    }
}
