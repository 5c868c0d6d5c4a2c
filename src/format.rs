// src/format.rs — Heuristic layout of assistant replies
//
// Turns the plain text of an answer into typed segments that a view can
// style. Classification is line-based and purely lexical.

use regex::Regex;
use std::sync::OnceLock;

/// Lines mentioning these are always treated as headings.
const HEADING_WORDS: &[&str] = &["Philosophy", "Strategies", "Rituals", "Execution"];

/// Lines with a colon shorter than this are headings. Lengths here are
/// counted in UTF-16 code units, the unit the backend's web client measures.
const HEADING_MAX_LEN: usize = 120;

/// Comma-separated bullets longer than this are treated as key points.
const KEY_POINT_MIN_LEN: usize = 50;

/// A run of subheading text; `emphasized` runs were wrapped in `**`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub emphasized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Heading(String),
    Subheading(Vec<Span>),
    Bullet(String),
    /// A bullet split into a lead concept and its explanation.
    KeyPoint {
        concept: String,
        detail: Option<String>,
    },
    Paragraph(String),
}

fn bullet_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:[*\-•]\s+|[0-9]+\.\s+)").expect("valid bullet regex"))
}

fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

fn is_heading(line: &str) -> bool {
    HEADING_WORDS.iter().any(|w| line.contains(w))
        || (line.contains(':')
            && !line.contains("because")
            && utf16_len(line) < HEADING_MAX_LEN)
}

fn subheading(line: &str) -> Vec<Span> {
    line.split("**")
        .enumerate()
        .map(|(i, part)| Span {
            text: part.to_string(),
            emphasized: i % 2 == 1,
        })
        .collect()
}

fn bullet(text: &str) -> Segment {
    let is_key_point =
        text.contains(':') || (text.contains(',') && utf16_len(text) > KEY_POINT_MIN_LEN);
    if !is_key_point {
        return Segment::Bullet(text.to_string());
    }

    let (concept, detail) = match text.split_once(':') {
        Some((head, rest)) => (head, rest.trim()),
        None => (text, ""),
    };
    Segment::KeyPoint {
        concept: concept.trim().to_string(),
        detail: (!detail.is_empty()).then(|| detail.to_string()),
    }
}

fn classify(line: &str) -> Segment {
    if is_heading(line) {
        return Segment::Heading(line.replace('*', "").trim().to_string());
    }
    if line.contains("**") {
        return Segment::Subheading(subheading(line));
    }
    if let Some(marker) = bullet_marker().find(line) {
        return bullet(line[marker.end()..].trim());
    }
    Segment::Paragraph(line.to_string())
}

/// Split a reply into segments, one per non-blank line.
pub fn format_reply(content: &str) -> Vec<Segment> {
    content
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(classify)
        .collect()
}

/// Plain-text rendering of a single segment, without styling.
pub fn plain_text(segment: &Segment) -> String {
    match segment {
        Segment::Heading(t) | Segment::Bullet(t) | Segment::Paragraph(t) => t.clone(),
        Segment::Subheading(spans) => spans.iter().map(|s| s.text.as_str()).collect(),
        Segment::KeyPoint { concept, detail } => match detail {
            Some(d) => format!("{concept}: {d}"),
            None => concept.clone(),
        },
    }
}
