//! ASCII window: the terminal itself.
//!
//! The whole screen is redrawn every presented tick with absolute cursor
//! positioning, one escape-coded string written at once so a frame never
//! appears half drawn.

use std::io::{self, Stdout, Write};

use super::raw_mode::RawModeGuard;
use super::status_bar::{fit_to_width, Hud, StatusBar, HELP_LINE};
use crate::ascii::AsciiFrame;
use crate::pipeline::TickOutput;

/// Build the escape-coded screen contents for one frame.
///
/// The art starts at the top-left corner and is clipped to the terminal.
/// The status line takes the last row and the help line the row above it;
/// art rows never overlap them.
///
/// # Arguments
/// * `ascii` - Frame to draw
/// * `status` - Status text, or `None` to hide the status line
/// * `help` - Help text, or `None` to hide the help line
/// * `cols`, `rows` - Terminal size
/// * `out` - Cleared and filled with the screen contents
pub fn compose_screen(
    ascii: &AsciiFrame,
    status: Option<&str>,
    help: Option<&str>,
    cols: u16,
    rows: u16,
    out: &mut String,
) {
    out.clear();
    let reserved = status.is_some() as u16 + help.is_some() as u16;
    let art_rows = rows.saturating_sub(reserved);
    let width = cols as usize;

    let mut lines = ascii.rows();
    for row in 0..art_rows {
        out.push_str(&format!("\x1b[{};1H", row + 1));
        if let Some(line) = lines.next() {
            out.extend(line.iter().take(width));
        }
        out.push_str("\x1b[K");
    }

    let mut next_row = art_rows + 1;
    if let Some(help) = help {
        out.push_str(&format!("\x1b[{};1H\x1b[2m", next_row));
        out.push_str(&fit_to_width(help, width));
        out.push_str("\x1b[0m");
        next_row += 1;
    }
    if let Some(status) = status {
        out.push_str(&format!("\x1b[{};1H\x1b[7m", next_row));
        out.push_str(&fit_to_width(status, width));
        out.push_str("\x1b[0m");
    }
}

/// Terminal view owning raw mode for its lifetime.
pub struct TerminalView {
    stdout: Stdout,
    guard: RawModeGuard,
    status_bar: StatusBar,
    size: (u16, u16),
    screen: String,
}

impl TerminalView {
    /// Take over the terminal (raw mode, alternate screen).
    pub fn open(status_bar: StatusBar) -> io::Result<Self> {
        let guard = RawModeGuard::enter()?;
        let size = crossterm::terminal::size()?;
        Ok(Self {
            stdout: io::stdout(),
            guard,
            status_bar,
            size,
            screen: String::new(),
        })
    }

    /// Terminal size as (columns, rows).
    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    /// Record a new terminal size; the next draw clears the screen.
    pub fn resize(&mut self, cols: u16, rows: u16) -> io::Result<()> {
        self.size = (cols, rows);
        self.stdout.write_all(b"\x1b[2J")?;
        self.stdout.flush()
    }

    /// Draw one tick.
    pub fn draw(&mut self, output: &TickOutput, hud: &Hud) -> io::Result<()> {
        let status = self
            .status_bar
            .visible
            .then(|| self.status_bar.format(output, hud));
        let help = hud.show_help.then_some(HELP_LINE);

        let (cols, rows) = self.size;
        compose_screen(
            &output.ascii,
            status.as_deref(),
            help,
            cols,
            rows,
            &mut self.screen,
        );

        self.stdout.write_all(self.screen.as_bytes())?;
        self.stdout.flush()
    }

    /// Restore the terminal.
    pub fn close(mut self) -> io::Result<()> {
        self.guard.exit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> AsciiFrame {
        AsciiFrame::from_chars("abcdefghijkl".chars().collect(), 4, 3)
    }

    #[test]
    fn test_compose_positions_every_row() {
        let mut out = String::new();
        compose_screen(&frame(), None, None, 10, 3, &mut out);
        assert_eq!(
            out,
            "\x1b[1;1Habcd\x1b[K\x1b[2;1Hefgh\x1b[K\x1b[3;1Hijkl\x1b[K"
        );
    }

    #[test]
    fn test_compose_clips_to_terminal() {
        let mut out = String::new();
        compose_screen(&frame(), None, None, 2, 2, &mut out);
        assert_eq!(out, "\x1b[1;1Hab\x1b[K\x1b[2;1Hef\x1b[K");
    }

    #[test]
    fn test_compose_reserves_bottom_rows() {
        let mut out = String::new();
        compose_screen(&frame(), Some("status"), Some("help"), 8, 4, &mut out);
        // two art rows, then help on row 3 and status on row 4
        assert!(out.contains("\x1b[2;1Hefgh\x1b[K"));
        assert!(!out.contains("ijkl"));
        assert!(out.contains("\x1b[3;1H\x1b[2mhelp    \x1b[0m"));
        assert!(out.ends_with("\x1b[4;1H\x1b[7mstatus  \x1b[0m"));
    }

    #[test]
    fn test_compose_blanks_rows_below_art() {
        let mut out = String::new();
        compose_screen(&frame(), None, None, 4, 5, &mut out);
        assert!(out.ends_with("\x1b[4;1H\x1b[K\x1b[5;1H\x1b[K"));
    }

    #[test]
    fn test_compose_empty_frame() {
        let mut out = String::new();
        compose_screen(&AsciiFrame::default(), Some("s"), None, 3, 2, &mut out);
        assert_eq!(out, "\x1b[1;1H\x1b[K\x1b[2;1H\x1b[7ms  \x1b[0m");
    }
}
