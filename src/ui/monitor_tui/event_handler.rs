use crossterm::event::KeyCode;

use crate::core::telemetry::VisibilityKey;

/// Events that can occur in the watch TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorEvent {
    /// Quit the application
    Quit,
    /// Toggle help overlay
    ToggleHelp,
    /// Show or hide one chart category
    ToggleCategory(VisibilityKey),
    /// Enable or disable the whole panel
    TogglePanel,
    /// Drop all chart history
    ClearBuffers,
    /// No action
    None,
}

impl MonitorEvent {
    pub fn from_key(code: KeyCode) -> Self {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => MonitorEvent::Quit,
            KeyCode::Char('?') | KeyCode::Char('h') => MonitorEvent::ToggleHelp,
            KeyCode::Char('p') => MonitorEvent::TogglePanel,
            KeyCode::Char('c') => MonitorEvent::ClearBuffers,
            KeyCode::Char(digit @ '1'..='8') => {
                let index = digit as usize - '1' as usize;
                MonitorEvent::ToggleCategory(VisibilityKey::ALL[index])
            }
            _ => MonitorEvent::None,
        }
    }
}
