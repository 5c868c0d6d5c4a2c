// src/tui/widgets/chat.rs — Transcript pane.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::client::SourceRef;
use crate::dashboard::ChatMessage;
use crate::files::FileKind;
use crate::format::{format_reply, Segment};
use crate::tui::theme::Theme;

/// `scroll_back` counts lines up from the bottom.
pub fn render(
    f: &mut Frame,
    area: Rect,
    messages: &[ChatMessage],
    thinking: bool,
    show_sources: bool,
    scroll_back: u16,
) {
    let block = Block::default()
        .title(Span::styled(" Chat ", Theme::header()))
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let lines = if messages.is_empty() && !thinking {
        welcome_lines()
    } else {
        transcript_lines(messages, thinking, show_sources)
    };

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    let offset = scroll_offset(&paragraph, area, scroll_back);
    f.render_widget(paragraph.block(block).scroll((offset, 0)), area);
}

/// Top row to show so the last wrapped row sits on the bottom border,
/// moved up by `scroll_back`. Measured without the block, inside the borders.
fn scroll_offset(paragraph: &Paragraph, area: Rect, scroll_back: u16) -> u16 {
    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2) as usize;
    let rows = paragraph.line_count(inner_width);
    let bottom = rows.saturating_sub(inner_height);
    u16::try_from(bottom.saturating_sub(scroll_back as usize)).unwrap_or(u16::MAX)
}

fn welcome_lines() -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(Span::styled("Welcome to Knowledge Copilot", Theme::header())),
        Line::from(""),
        Line::from(Span::styled(
            "Upload documents and ask questions about them.",
            Theme::text_dim(),
        )),
        Line::from(Span::styled(
            "Try: \"Summarize my notes\" or /help for commands.",
            Theme::text_dim(),
        )),
    ]
}

/// Flatten the conversation into styled lines.
pub fn transcript_lines(
    messages: &[ChatMessage],
    thinking: bool,
    show_sources: bool,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in messages {
        if message.is_user() {
            lines.push(Line::from(vec![
                Span::styled("You ", Theme::user_label()),
                Span::styled(message.at.format("%H:%M").to_string(), Theme::text_dim()),
            ]));
            for l in message.content.lines() {
                lines.push(Line::from(Span::styled(l.to_string(), Theme::text())));
            }
        } else {
            lines.push(Line::from(vec![
                Span::styled("Copilot ", Theme::assistant_label()),
                Span::styled(message.at.format("%H:%M").to_string(), Theme::text_dim()),
            ]));
            if message.error {
                lines.push(Line::from(Span::styled(
                    message.content.clone(),
                    Theme::error(),
                )));
            } else {
                lines.extend(format_reply(&message.content).iter().map(segment_line));
            }
            if show_sources {
                lines.extend(source_lines(&message.sources));
            }
        }
        lines.push(Line::from(""));
    }

    if thinking {
        lines.push(Line::from(Span::styled("Copilot ", Theme::assistant_label())));
        lines.push(Line::from(Span::styled("Thinking...", Theme::text_dim())));
    }
    lines
}

fn segment_line(segment: &Segment) -> Line<'static> {
    match segment {
        Segment::Heading(text) => Line::from(Span::styled(format!("▍{text}"), Theme::heading())),
        Segment::Subheading(spans) => Line::from(
            spans
                .iter()
                .map(|s| {
                    let style = if s.emphasized {
                        Theme::emphasis()
                    } else {
                        Theme::heading()
                    };
                    Span::styled(s.text.clone(), style)
                })
                .collect::<Vec<_>>(),
        ),
        Segment::Bullet(text) => Line::from(vec![
            Span::styled("  • ", Theme::bullet()),
            Span::styled(text.clone(), Theme::text()),
        ]),
        Segment::KeyPoint { concept, detail } => {
            let mut spans = vec![
                Span::styled("  • ", Theme::bullet()),
                Span::styled(concept.clone(), Theme::heading()),
            ];
            if let Some(d) = detail {
                spans.push(Span::styled(format!(" {d}"), Theme::text_dim()));
            }
            Line::from(spans)
        }
        Segment::Paragraph(text) => Line::from(Span::styled(text.clone(), Theme::text())),
    }
}

fn source_lines(sources: &[SourceRef]) -> Vec<Line<'static>> {
    if sources.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![Line::from(Span::styled("  Sources", Theme::text_dim()))];
    for source in sources {
        let kind = FileKind::from_filename(&source.filename);
        lines.push(Line::from(vec![
            Span::styled(format!("    {} ", kind.glyph()), Theme::file_kind(kind)),
            Span::styled(source.filename.clone(), Theme::text_dim()),
        ]));
    }
    lines
}
