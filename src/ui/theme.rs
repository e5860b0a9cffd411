//! Color theme for the TUI

use ratatui::style::{Color, Modifier, Style};

use crate::controller::StatusKind;

#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,

    pub primary: Color,
    pub accent: Color,

    pub success: Color,
    pub error: Color,
    pub info: Color,

    pub border: Color,
    pub border_focused: Color,
    pub selection: Color,
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(22, 22, 30),
            foreground: Color::Rgb(230, 230, 240),
            muted: Color::Rgb(120, 120, 140),

            primary: Color::Rgb(130, 170, 255),
            accent: Color::Rgb(255, 180, 100),

            success: Color::Rgb(130, 255, 170),
            error: Color::Rgb(255, 130, 130),
            info: Color::Rgb(100, 200, 255),

            border: Color::Rgb(60, 60, 80),
            border_focused: Color::Rgb(130, 170, 255),
            selection: Color::Rgb(50, 60, 90),
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::Rgb(250, 250, 252),
            foreground: Color::Rgb(30, 30, 40),
            muted: Color::Rgb(130, 130, 150),

            primary: Color::Rgb(60, 100, 200),
            accent: Color::Rgb(220, 130, 50),

            success: Color::Rgb(50, 180, 100),
            error: Color::Rgb(220, 80, 80),
            info: Color::Rgb(50, 150, 220),

            border: Color::Rgb(200, 200, 210),
            border_focused: Color::Rgb(60, 100, 200),
            selection: Color::Rgb(220, 230, 250),
        }
    }

    pub fn base_style(&self) -> Style {
        Style::default().bg(self.background).fg(self.foreground)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }

    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.selection)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn link_style(&self) -> Style {
        Style::default()
            .fg(self.info)
            .add_modifier(Modifier::UNDERLINED)
    }

    /// Foreground for a status line or a history status cell.
    pub fn status_style(&self, kind: StatusKind) -> Style {
        let color = match kind {
            StatusKind::Info => self.info,
            StatusKind::Success => self.success,
            StatusKind::Error => self.error,
        };
        Style::default().fg(color)
    }

    /// Buttons that cannot be pressed right now.
    pub fn disabled_style(&self) -> Style {
        Style::default()
            .fg(self.muted)
            .add_modifier(Modifier::DIM)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

pub struct Icons;

impl Icons {
    pub const SUCCESS: &'static str = "✓";
    pub const ERROR: &'static str = "✗";
    pub const INFO: &'static str = "ℹ";
    pub const DOWNLOAD: &'static str = "⬇";
    pub const CHEVRON_LEFT: &'static str = "‹";
    pub const CHEVRON_RIGHT: &'static str = "›";
    pub const POINTER: &'static str = "▶";

    pub fn for_status(kind: StatusKind) -> &'static str {
        match kind {
            StatusKind::Info => Self::INFO,
            StatusKind::Success => Self::SUCCESS,
            StatusKind::Error => Self::ERROR,
        }
    }
}
