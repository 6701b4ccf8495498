//! Terminal takeover for the ASCII view: raw mode, alternate screen and a
//! hidden cursor, undone on drop and on panic.

use crossterm::cursor::{Hide, Show};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use std::io;
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};

/// Set while the terminal is taken over; read by the panic hook.
static TERMINAL_TAKEN: AtomicBool = AtomicBool::new(false);

/// Undo the takeover if it is still in effect.
///
/// Safe to call from several places: only the first caller restores.
fn restore() -> io::Result<()> {
    if !TERMINAL_TAKEN.swap(false, Ordering::SeqCst) {
        return Ok(());
    }
    let shown = crossterm::execute!(io::stdout(), Show, LeaveAlternateScreen);
    disable_raw_mode()?;
    shown
}

/// Holds the terminal for the ASCII view until dropped.
#[derive(Debug)]
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    /// Take over the terminal.
    ///
    /// # Errors
    /// Fails when stdout is not a terminal.
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();

        enable_raw_mode()?;
        TERMINAL_TAKEN.store(true, Ordering::SeqCst);
        if let Err(e) = crossterm::execute!(io::stdout(), EnterAlternateScreen, Hide) {
            let _ = restore();
            return Err(e);
        }
        Ok(Self { _private: () })
    }

    /// Give the terminal back now, reporting failures. Drop does the same
    /// silently.
    pub fn exit(&mut self) -> io::Result<()> {
        restore()
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = restore();
    }
}

/// Restore the terminal before the default hook prints a panic, so the
/// message is readable. Installed once.
fn install_panic_hook() {
    static INSTALLED: AtomicBool = AtomicBool::new(false);
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return;
    }

    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore();
        previous(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_without_takeover_is_noop() {
        assert!(restore().is_ok());
    }

    #[test]
    fn test_enter_and_exit() {
        // Needs a real TTY
        match RawModeGuard::enter() {
            Ok(mut guard) => {
                assert!(TERMINAL_TAKEN.load(Ordering::SeqCst));
                guard.exit().unwrap();
                assert!(!TERMINAL_TAKEN.load(Ordering::SeqCst));
            }
            Err(e) => eprintln!("Skipping test (no TTY): {}", e),
        }
    }

    #[test]
    fn test_panic_hook_installs_once() {
        install_panic_hook();
        install_panic_hook();
    }
}
