// src/tui/widgets/input.rs — Multi-line message box.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::theme::Theme;

/// Editable text with a cursor measured in chars.
#[derive(Debug, Default)]
pub struct InputState {
    buffer: String,
    cursor: usize,
}

impl InputState {
    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn byte_index(&self) -> usize {
        self.buffer
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }

    pub fn insert(&mut self, c: char) {
        let idx = self.byte_index();
        self.buffer.insert(idx, c);
        self.cursor += 1;
    }

    pub fn newline(&mut self) {
        self.insert('\n');
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let idx = self.byte_index();
        self.buffer.remove(idx);
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.buffer.chars().count());
    }

    /// Empty the box and hand back its contents.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }
}

pub fn render(f: &mut Frame, area: Rect, input: &InputState, busy: bool) {
    let title = if busy {
        " Waiting for the backend... "
    } else {
        " Ask about your documents (Enter send, Alt-Enter newline) "
    };
    let block = Block::default()
        .title(Span::styled(title, Theme::text_dim()))
        .borders(Borders::ALL)
        .border_style(if busy {
            Theme::border()
        } else {
            Theme::border_focus()
        });

    let mut lines: Vec<Line> = input
        .text()
        .split('\n')
        .map(|l| Line::from(Span::styled(l.to_string(), Theme::text())))
        .collect();
    if input.is_empty() {
        lines = vec![Line::from(Span::styled(
            "Type a question, a /command, or drop a file path",
            Theme::text_dim(),
        ))];
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}
