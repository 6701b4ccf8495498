//! Keyboard command mapping.
//!
//! Keys arrive through crossterm in raw mode and are turned into
//! [`Command`]s the tick loop executes between ticks.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::controller::ControlAction;

/// Something the user asked for from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// A parameter change, applied through the controller
    Control(ControlAction),
    Screenshot,
    ToggleRecording,
    ToggleHelp,
    Quit,
}

/// Map a key event to a command.
///
/// Keys:
/// - `+`/`=` brighter, `-` darker
/// - `]` denser ramp, `[` sparser ramp
/// - `t` toggle tracking, `r` reset
/// - `s` screenshot, space start/stop recording
/// - `h` toggle help
/// - `q`, Esc, Ctrl+C quit
pub fn command_for_key(event: KeyEvent) -> Option<Command> {
    // Some terminals report releases too; act on presses only
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let KeyEvent {
        code, modifiers, ..
    } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Command::Quit),
            _ => None,
        };
    }

    let command = match code {
        KeyCode::Char('+') | KeyCode::Char('=') => {
            Command::Control(ControlAction::IncreaseBrightness)
        }
        KeyCode::Char('-') | KeyCode::Char('_') => {
            Command::Control(ControlAction::DecreaseBrightness)
        }
        KeyCode::Char(']') => Command::Control(ControlAction::IncreaseDensity),
        KeyCode::Char('[') => Command::Control(ControlAction::DecreaseDensity),
        KeyCode::Char('t') | KeyCode::Char('T') => Command::Control(ControlAction::ToggleTracking),
        KeyCode::Char('r') | KeyCode::Char('R') => Command::Control(ControlAction::Reset),
        KeyCode::Char('s') | KeyCode::Char('S') => Command::Screenshot,
        KeyCode::Char(' ') => Command::ToggleRecording,
        KeyCode::Char('h') | KeyCode::Char('H') => Command::ToggleHelp,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Command::Quit,
        _ => return None,
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_brightness_keys() {
        let up = Some(Command::Control(ControlAction::IncreaseBrightness));
        assert_eq!(command_for_key(press(KeyCode::Char('+'))), up);
        assert_eq!(command_for_key(press(KeyCode::Char('='))), up);
        assert_eq!(
            command_for_key(press(KeyCode::Char('-'))),
            Some(Command::Control(ControlAction::DecreaseBrightness))
        );
    }

    #[test]
    fn test_density_keys() {
        assert_eq!(
            command_for_key(press(KeyCode::Char(']'))),
            Some(Command::Control(ControlAction::IncreaseDensity))
        );
        assert_eq!(
            command_for_key(press(KeyCode::Char('['))),
            Some(Command::Control(ControlAction::DecreaseDensity))
        );
    }

    #[test]
    fn test_tracking_and_reset() {
        assert_eq!(
            command_for_key(press(KeyCode::Char('t'))),
            Some(Command::Control(ControlAction::ToggleTracking))
        );
        assert_eq!(
            command_for_key(press(KeyCode::Char('r'))),
            Some(Command::Control(ControlAction::Reset))
        );
    }

    #[test]
    fn test_capture_keys() {
        assert_eq!(command_for_key(press(KeyCode::Char('s'))), Some(Command::Screenshot));
        assert_eq!(
            command_for_key(press(KeyCode::Char(' '))),
            Some(Command::ToggleRecording)
        );
        assert_eq!(command_for_key(press(KeyCode::Char('h'))), Some(Command::ToggleHelp));
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(command_for_key(press(KeyCode::Char('q'))), Some(Command::Quit));
        assert_eq!(command_for_key(press(KeyCode::Esc)), Some(Command::Quit));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(command_for_key(ctrl_c), Some(Command::Quit));
    }

    #[test]
    fn test_unmapped_keys() {
        assert_eq!(command_for_key(press(KeyCode::Char('x'))), None);
        assert_eq!(command_for_key(press(KeyCode::Enter)), None);
        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(command_for_key(ctrl_s), None);
    }

    #[test]
    fn test_release_is_ignored() {
        let mut event = press(KeyCode::Char('q'));
        event.kind = KeyEventKind::Release;
        assert_eq!(command_for_key(event), None);
    }
}
