//! Color palettes for the three themes. Purely cosmetic.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// `None` keeps the terminal's own colors.
    pub background: Option<Color>,
    pub foreground: Option<Color>,
    pub heading: Color,
    pub label: Color,
    pub accent: Color,
    pub muted: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Default => Self {
                background: None,
                foreground: None,
                heading: Color::Rgb(0x00, 0x7b, 0xff),
                label: Color::Reset,
                accent: Color::Cyan,
                muted: Color::Gray,
            },
            Theme::Dark => Self {
                background: Some(Color::Rgb(0x2b, 0x2b, 0x2b)),
                foreground: Some(Color::White),
                heading: Color::Rgb(0xff, 0xa5, 0x00),
                label: Color::White,
                accent: Color::Rgb(0xff, 0xa5, 0x00),
                muted: Color::Gray,
            },
            Theme::LightBlue => Self {
                background: Some(Color::Rgb(0xe0, 0xf7, 0xfa)),
                foreground: Some(Color::Rgb(0x00, 0x79, 0x6b)),
                heading: Color::Rgb(0x00, 0x7b, 0xff),
                label: Color::Rgb(0x00, 0x79, 0x6b),
                accent: Color::Rgb(0x00, 0x79, 0x6b),
                muted: Color::DarkGray,
            },
        }
    }

    pub fn base(&self) -> Style {
        let mut style = Style::default();
        if let Some(bg) = self.background {
            style = style.bg(bg);
        }
        if let Some(fg) = self.foreground {
            style = style.fg(fg);
        }
        style
    }

    pub fn heading_style(&self) -> Style {
        self.base().fg(self.heading).add_modifier(Modifier::BOLD)
    }

    pub fn label_style(&self) -> Style {
        self.base().fg(self.label)
    }

    pub fn muted_style(&self) -> Style {
        self.base().fg(self.muted)
    }

    pub fn focus_style(&self) -> Style {
        Style::default().fg(Color::Black).bg(self.accent)
    }
}
