// src/tui/widgets/documents.rs — Documents sidebar.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::client::DocumentInfo;
use crate::files::FileKind;
use crate::tui::theme::Theme;

pub fn render(
    f: &mut Frame,
    area: Rect,
    docs: &[DocumentInfo],
    uploading: bool,
    state: &mut ListState,
) {
    let title = if uploading {
        " Documents (uploading...) ".to_string()
    } else {
        format!(" Documents ({}) ", docs.len())
    };
    let block = Block::default()
        .title(Span::styled(title, Theme::header()))
        .borders(Borders::ALL)
        .border_style(Theme::border());

    if docs.is_empty() {
        let empty = List::new(vec![
            ListItem::new(Line::from(Span::styled(
                "No documents uploaded yet",
                Theme::text_dim(),
            ))),
            ListItem::new(Line::from(Span::styled(
                "/upload <path> to add one",
                Theme::text_dim(),
            ))),
        ])
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = docs.iter().map(document_item).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Theme::list_selected())
        .highlight_symbol("> ");
    f.render_stateful_widget(list, area, state);
}

fn document_item(doc: &DocumentInfo) -> ListItem<'static> {
    let kind = FileKind::from_filename(&doc.filename);
    ListItem::new(vec![
        Line::from(vec![
            Span::styled(format!("{} ", kind.glyph()), Theme::file_kind(kind)),
            Span::styled(doc.filename.clone(), Theme::text()),
        ]),
        Line::from(Span::styled(
            format!("    {}", doc.upload_day()),
            Theme::text_dim(),
        )),
    ])
}

/// Keep the selection inside the list after it changes length.
pub fn clamp_selection(state: &mut ListState, len: usize) {
    match (state.selected(), len) {
        (_, 0) => state.select(None),
        (None, _) => state.select(Some(0)),
        (Some(i), n) if i >= n => state.select(Some(n - 1)),
        _ => {}
    }
}

pub fn select_next(state: &mut ListState, len: usize) {
    if len == 0 {
        return;
    }
    let i = state.selected().map(|i| (i + 1).min(len - 1)).unwrap_or(0);
    state.select(Some(i));
}

pub fn select_prev(state: &mut ListState, len: usize) {
    if len == 0 {
        return;
    }
    let i = state.selected().map(|i| i.saturating_sub(1)).unwrap_or(0);
    state.select(Some(i));
}
