// src/tui/theme.rs — Color scheme and style definitions for the TUI dashboard.

use ratatui::style::{Color, Modifier, Style};

use crate::dashboard::NoticeLevel;
use crate::files::FileKind;

/// Blue/purple palette of the web dashboard.
pub struct Theme;

impl Theme {
    // ── Brand colors ─────────────────────────────────────────────
    pub const BLUE: Color = Color::Rgb(59, 130, 246);
    pub const PURPLE: Color = Color::Rgb(147, 51, 234);
    pub const WHITE: Color = Color::Rgb(240, 240, 245);
    pub const GREEN: Color = Color::Rgb(34, 197, 94);
    pub const RED: Color = Color::Rgb(239, 68, 68);
    pub const TEAL: Color = Color::Rgb(20, 184, 166);
    pub const GRAY: Color = Color::Rgb(130, 130, 150);
    pub const DIM: Color = Color::Rgb(80, 80, 100);

    // ── Semantic styles ──────────────────────────────────────────

    /// Main title / header bar.
    pub fn header() -> Style {
        Style::default()
            .fg(Theme::BLUE)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Theme::DIM)
    }

    /// Border of the pane that receives keys.
    pub fn border_focus() -> Style {
        Style::default().fg(Theme::BLUE)
    }

    pub fn text() -> Style {
        Style::default().fg(Theme::WHITE)
    }

    pub fn text_dim() -> Style {
        Style::default().fg(Theme::GRAY)
    }

    pub fn success() -> Style {
        Style::default().fg(Theme::GREEN)
    }

    pub fn error() -> Style {
        Style::default().fg(Theme::RED)
    }

    /// Reply headings.
    pub fn heading() -> Style {
        Style::default()
            .fg(Theme::WHITE)
            .add_modifier(Modifier::BOLD)
    }

    /// `**emphasised**` runs inside a subheading.
    pub fn emphasis() -> Style {
        Style::default()
            .fg(Theme::BLUE)
            .add_modifier(Modifier::BOLD)
    }

    pub fn bullet() -> Style {
        Style::default().fg(Theme::PURPLE)
    }

    pub fn user_label() -> Style {
        Style::default()
            .fg(Theme::BLUE)
            .add_modifier(Modifier::BOLD)
    }

    pub fn assistant_label() -> Style {
        Style::default()
            .fg(Theme::TEAL)
            .add_modifier(Modifier::BOLD)
    }

    /// Selected document row.
    pub fn list_selected() -> Style {
        Style::default()
            .bg(Color::Rgb(40, 40, 60))
            .fg(Theme::WHITE)
    }

    /// Key hint in the footer.
    pub fn key_hint() -> Style {
        Style::default().fg(Theme::BLUE)
    }

    /// Description next to key hint.
    pub fn key_desc() -> Style {
        Style::default().fg(Theme::GRAY)
    }

    /// Glyph color per file type, like the web file icons.
    pub fn file_kind(kind: FileKind) -> Style {
        match kind {
            FileKind::Pdf => Style::default().fg(Theme::RED),
            FileKind::Word => Style::default().fg(Theme::BLUE),
            FileKind::Text => Style::default().fg(Theme::GREEN),
            FileKind::Other => Style::default().fg(Theme::GRAY),
        }
    }

    pub fn notice(level: NoticeLevel) -> Style {
        match level {
            NoticeLevel::Success => Theme::success().add_modifier(Modifier::BOLD),
            NoticeLevel::Error => Theme::error().add_modifier(Modifier::BOLD),
        }
    }
}
