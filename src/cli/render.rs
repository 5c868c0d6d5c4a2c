// src/cli/render.rs — Styled line output for the CLI and chat REPL

use crossterm::style::Stylize;

use crate::client::{DocumentInfo, SourceRef};
use crate::dashboard::{ChatMessage, Notice, NoticeLevel};
use crate::files::FileKind;
use crate::format::{format_reply, Segment};

/// Print an assistant reply with heading/bullet styling.
pub fn print_reply(content: &str) {
    for segment in format_reply(content) {
        println!("{}", styled_segment(&segment));
    }
}

fn styled_segment(segment: &Segment) -> String {
    match segment {
        Segment::Heading(text) => format!("\n{}", text.as_str().bold().blue()),
        Segment::Subheading(spans) => spans
            .iter()
            .map(|s| {
                if s.emphasized {
                    s.text.as_str().bold().cyan().to_string()
                } else {
                    s.text.as_str().bold().to_string()
                }
            })
            .collect(),
        Segment::Bullet(text) => format!("  {} {}", "•".magenta(), text),
        Segment::KeyPoint { concept, detail } => match detail {
            Some(d) => format!("  {} {}\n    {}", "•".magenta(), concept.as_str().bold(), d),
            None => format!("  {} {}", "•".magenta(), concept.as_str().bold()),
        },
        Segment::Paragraph(text) => text.clone(),
    }
}

pub fn print_message(message: &ChatMessage, show_sources: bool) {
    if message.is_user() {
        println!("{} {}", "you:".bold().green(), message.content);
        return;
    }
    if message.error {
        println!("{}", message.content.as_str().red());
        return;
    }
    print_reply(&message.content);
    if show_sources {
        print_sources(&message.sources);
    }
}

pub fn print_sources(sources: &[SourceRef]) {
    if sources.is_empty() {
        return;
    }
    println!();
    println!("  {}", "Sources".dim());
    for source in sources {
        let kind = FileKind::from_filename(&source.filename);
        println!("    {} {}", kind.glyph().dim(), source.filename);
    }
}

pub fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        match notice.level {
            NoticeLevel::Success => eprintln!("  {} {}", "✓".green(), notice.message),
            NoticeLevel::Error => eprintln!("  {} {}", "✗".red(), notice.message),
        }
    }
}

/// One row of the documents table, unstyled.
pub fn document_line(doc: &DocumentInfo) -> String {
    format!(
        "{}  {:<36}  {:<10}  {}  [{}]  {}",
        FileKind::from_filename(&doc.filename).glyph(),
        doc.id,
        doc.upload_day(),
        doc.filename,
        doc.file_type_label(),
        if doc.processed { "" } else { "(processing)" },
    )
    .trim_end()
    .to_string()
}

pub fn print_documents(docs: &[DocumentInfo]) {
    if docs.is_empty() {
        println!("  No documents uploaded yet.");
        return;
    }
    println!("  {} document(s):", docs.len());
    for doc in docs {
        println!("  {}", document_line(doc));
    }
}
