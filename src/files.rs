// src/files.rs — Upload packaging and filename classification

use std::path::{Path, PathBuf};

use crate::infra::errors::CopilotError;
use crate::infra::paths;

/// Extensions offered by the upload picker. The backend does its own checks.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "docx", "txt", "md", "eml", "html"];

/// Display classification of a filename, used for list glyphs and colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Word,
    Text,
    Other,
}

impl FileKind {
    pub fn from_filename(filename: &str) -> Self {
        match extension_of(filename).as_deref() {
            Some("pdf") => FileKind::Pdf,
            Some("docx") | Some("doc") => FileKind::Word,
            Some("txt") | Some("md") => FileKind::Text,
            _ => FileKind::Other,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            FileKind::Pdf => "PDF",
            FileKind::Word => "DOC",
            FileKind::Text => "TXT",
            FileKind::Other => "   ",
        }
    }
}

/// Lower-cased extension after the last dot, if any.
pub fn extension_of(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Whether `filename` passes the picker filter.
pub fn is_accepted(filename: &str, accepted: &[String]) -> bool {
    match extension_of(filename) {
        Some(ext) => accepted.iter().any(|a| a.eq_ignore_ascii_case(&ext)),
        None => false,
    }
}

/// MIME type sent with the multipart part; the backend records it as the
/// document's file type.
pub fn content_type_for(filename: &str) -> &'static str {
    match extension_of(filename).as_deref() {
        Some("pdf") => "application/pdf",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("doc") => "application/msword",
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        Some("eml") => "message/rfc822",
        Some("html") | Some("htm") => "text/html",
        _ => "application/octet-stream",
    }
}

/// A single file ready to be sent as the `file` field of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let content_type = content_type_for(&filename).to_string();
        Self {
            filename,
            content_type,
            bytes,
        }
    }

    /// Read a file from disk without any extension filtering.
    pub async fn read(path: &Path) -> Result<Self, CopilotError> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                CopilotError::Config(format!("'{}' has no usable file name", path.display()))
            })?
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(filename, bytes))
    }

    /// Picker path: reject extensions outside `accepted`, then read.
    pub async fn pick(path: &Path, accepted: &[String]) -> Result<Self, CopilotError> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        if !is_accepted(filename, accepted) {
            return Err(CopilotError::UnsupportedFile {
                filename: path.display().to_string(),
                accepted: accepted.join(", "),
            });
        }
        Self::read(path).await
    }
}

/// Path typed after `/upload`: surrounding quotes dropped, leading `~/`
/// expanded to the home directory.
pub fn resolve_user_path(raw: &str) -> PathBuf {
    let raw = raw.trim().trim_matches(|c| c == '\'' || c == '"');
    match (raw.strip_prefix("~/"), paths::dirs_home()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(raw),
    }
}

/// Interpret a chat input line as a file dropped onto the terminal.
///
/// Terminals paste a dropped file as its path, sometimes quoted and
/// sometimes with backslash-escaped spaces. Only existing files with an
/// accepted extension count.
pub fn dropped_path(input: &str, accepted: &[String]) -> Option<PathBuf> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.contains('\n') {
        return None;
    }

    let unquoted = ['\'', '"']
        .iter()
        .find_map(|q| {
            trimmed
                .strip_prefix(*q)
                .and_then(|rest| rest.strip_suffix(*q))
        })
        .map(str::to_string)
        .unwrap_or_else(|| trimmed.replace("\\ ", " "));

    let unquoted = match unquoted.strip_prefix("file://") {
        Some(rest) => rest.to_string(),
        None => unquoted,
    };

    let path = PathBuf::from(unquoted);
    let name = path.file_name()?.to_str()?;
    if is_accepted(name, accepted) && path.is_file() {
        Some(path)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted() -> Vec<String> {
        ACCEPTED_EXTENSIONS.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_file_kind() {
        assert_eq!(FileKind::from_filename("Report.PDF"), FileKind::Pdf);
        assert_eq!(FileKind::from_filename("memo.docx"), FileKind::Word);
        assert_eq!(FileKind::from_filename("old.doc"), FileKind::Word);
        assert_eq!(FileKind::from_filename("notes.md"), FileKind::Text);
        assert_eq!(FileKind::from_filename("a.txt"), FileKind::Text);
        assert_eq!(FileKind::from_filename("mail.eml"), FileKind::Other);
        assert_eq!(FileKind::from_filename("README"), FileKind::Other);
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("a.tar.GZ").as_deref(), Some("gz"));
        assert_eq!(extension_of("noext"), None);
        assert_eq!(extension_of("trailing."), None);
        assert_eq!(extension_of(".md").as_deref(), Some("md"));
    }

    #[test]
    fn test_is_accepted() {
        let acc = accepted();
        assert!(is_accepted("paper.pdf", &acc));
        assert!(is_accepted("Page.HTML", &acc));
        assert!(!is_accepted("page.htm", &acc));
        assert!(!is_accepted("binary.exe", &acc));
        assert!(!is_accepted("Makefile", &acc));
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("x.pdf"), "application/pdf");
        assert_eq!(content_type_for("x.md"), "text/markdown");
        assert_eq!(content_type_for("x.eml"), "message/rfc822");
        assert_eq!(content_type_for("x.bin"), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_pick_rejects_unaccepted_extension() {
        let err = UploadFile::pick(Path::new("/tmp/whatever.exe"), &accepted())
            .await
            .unwrap_err();
        assert!(matches!(err, CopilotError::UnsupportedFile { .. }));
    }

    #[tokio::test]
    async fn test_pick_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "# Notes").unwrap();

        let file = UploadFile::pick(&path, &accepted()).await.unwrap();
        assert_eq!(file.filename, "notes.md");
        assert_eq!(file.content_type, "text/markdown");
        assert_eq!(file.bytes, b"# Notes");
    }

    #[test]
    fn test_dropped_path_variants() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my report.pdf");
        std::fs::write(&path, b"%PDF").unwrap();
        let shown = path.display().to_string();
        let acc = accepted();

        assert_eq!(dropped_path(&format!("'{shown}'"), &acc), Some(path.clone()));
        assert_eq!(dropped_path(&format!("\"{shown}\"\n"), &acc), Some(path.clone()));
        assert_eq!(
            dropped_path(&shown.replace(' ', "\\ "), &acc),
            Some(path.clone())
        );
        assert_eq!(dropped_path(&format!("file://{shown}"), &acc), Some(path));
    }

    #[test]
    fn test_dropped_path_ignores_questions_and_missing_files() {
        let acc = accepted();
        assert_eq!(dropped_path("What does notes.md say?", &acc), None);
        assert_eq!(dropped_path("/definitely/not/here.pdf", &acc), None);
        assert_eq!(dropped_path("", &acc), None);
    }

    #[test]
    fn test_resolve_user_path() {
        assert_eq!(
            resolve_user_path("'/tmp/my notes.md'"),
            PathBuf::from("/tmp/my notes.md")
        );
        assert_eq!(resolve_user_path("docs/a.pdf"), PathBuf::from("docs/a.pdf"));
        if let Some(home) = paths::dirs_home() {
            assert_eq!(resolve_user_path("~/x.pdf"), home.join("x.pdf"));
            assert_eq!(resolve_user_path("\"~/x.pdf\""), home.join("x.pdf"));
        }
    }
}
