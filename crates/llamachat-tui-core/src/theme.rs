//! Color themes for the TUI.

use llamachat_core::Mode;
use ratatui::style::{Color, Modifier, Style};

/// Color theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Theme name.
    pub name: String,

    // Background hierarchy
    /// Base background - backdrop behind dialogs.
    pub background: Color,
    /// Panel background (dialogs).
    pub background_panel: Color,
    /// Element background (header bar, inputs, selected items).
    pub background_element: Color,

    // Text colors
    /// Primary text color.
    pub text: Color,
    /// Muted/secondary text.
    pub text_muted: Color,

    /// Primary accent.
    pub primary: Color,

    // Semantic colors
    /// Warning color (orange/yellow).
    pub warning: Color,
    /// Error color (red).
    pub error: Color,

    // Border colors
    /// Default border.
    pub border: Color,
    /// Active/focused border.
    pub border_active: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Get the theme for a stored mode value. Unknown values get the dark theme.
    pub fn for_mode(mode: &str) -> Self {
        match Mode::parse(mode) {
            Some(Mode::Light) => Self::light(),
            Some(Mode::Dark) | None => Self::dark(),
        }
    }

    /// Dark theme on a zinc palette.
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),

            background: Color::Rgb(9, 9, 11),           // #09090b - zinc-950
            background_panel: Color::Rgb(39, 39, 42),   // #27272a - zinc-800
            background_element: Color::Rgb(63, 63, 70), // #3f3f46 - zinc-700

            text: Color::Rgb(212, 212, 216),       // #d4d4d8 - zinc-300
            text_muted: Color::Rgb(161, 161, 170), // #a1a1aa - zinc-400

            primary: Color::Rgb(250, 178, 131), // #fab283 (peach/orange)

            warning: Color::Rgb(245, 167, 66),  // #f5a742
            error: Color::Rgb(224, 108, 117),   // #e06c75

            border: Color::Rgb(63, 63, 70),           // zinc-700
            border_active: Color::Rgb(82, 82, 91),    // #52525b - zinc-600
        }
    }

    /// Light theme.
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),

            background: Color::Rgb(228, 228, 231), // #e4e4e7 - zinc-200
            background_panel: Color::Rgb(255, 255, 255),
            background_element: Color::Rgb(244, 244, 245), // #f4f4f5 - zinc-100

            text: Color::Rgb(30, 30, 30),
            text_muted: Color::Rgb(113, 113, 122), // #71717a - zinc-500

            primary: Color::Rgb(200, 120, 60),

            warning: Color::Rgb(200, 130, 30),
            error: Color::Rgb(200, 60, 70),

            border: Color::Rgb(212, 212, 216), // zinc-300
            border_active: Color::Rgb(50, 100, 200),
        }
    }

    // Style helper methods

    /// Base text style.
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    /// Muted text style.
    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    /// Warning style.
    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.warning)
    }

    /// Error style.
    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    /// Border style (not focused).
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Active border style.
    pub fn border_active_style(&self) -> Style {
        Style::default().fg(self.border_active)
    }

    /// Style with panel background and text color.
    pub fn panel_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.background_panel)
    }

    /// Backdrop style behind modal dialogs.
    pub fn backdrop_style(&self) -> Style {
        Style::default().bg(self.background)
    }

    /// Bold text style.
    pub fn bold(&self) -> Style {
        Style::default().fg(self.text).add_modifier(Modifier::BOLD)
    }

    pub fn dim_style(&self) -> Style {
        self.muted_style()
    }

    pub fn highlight_style(&self) -> Style {
        Style::default().fg(self.primary)
    }
}
