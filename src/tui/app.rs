// src/tui/app.rs — TUI application state, event loop, and rendering.

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, ListState, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::cli::chat::{SlashCommand, HELP_LINES};
use crate::cli::Context;
use crate::client::Auth;
use crate::dashboard::{Dashboard, Notice};
use crate::files::{dropped_path, resolve_user_path, UploadFile};
use crate::session::SessionManager;

use super::theme::Theme;
use super::widgets::{self, documents, input::InputState};

// ── Actions ──────────────────────────────────────────────────────

/// What a key press asks the event loop to do.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    None,
    Quit,
    Send(String),
    Command(SlashCommand),
    Upload(PathBuf),
    Refresh,
    DeleteSelected,
}

// ── App state ────────────────────────────────────────────────────

struct App {
    dash: Dashboard,
    session: SessionManager,
    input: InputState,
    doc_state: ListState,
    notice: Option<Notice>,
    /// Help / info panel shown over the chat until the next key.
    overlay: Option<(String, Vec<String>)>,
    online: bool,
    show_sources: bool,
    accepted: Vec<String>,
    scroll_back: u16,
}

impl App {
    fn new(dash: Dashboard, session: SessionManager, ctx: &Context) -> Self {
        Self {
            dash,
            session,
            input: InputState::default(),
            doc_state: ListState::default(),
            notice: None,
            overlay: None,
            online: false,
            show_sources: ctx.config.chat.show_sources,
            accepted: ctx.accepted_extensions().to_vec(),
            scroll_back: 0,
        }
    }

    /// Move dashboard notices into the footer; the newest one wins.
    fn absorb_notices(&mut self) {
        if let Some(latest) = self.dash.take_notices().into_iter().last() {
            self.notice = Some(latest);
        }
        documents::clamp_selection(&mut self.doc_state, self.dash.documents().len());
    }

    fn show_overlay(&mut self, title: &str, lines: Vec<String>) {
        self.overlay = Some((title.to_string(), lines));
    }

    fn selected_document_id(&self) -> Option<String> {
        let i = self.doc_state.selected()?;
        self.dash.documents().get(i).map(|d| d.id.clone())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        if self.overlay.take().is_some() && key.code == KeyCode::Esc {
            return Action::None;
        }

        match key.code {
            KeyCode::Char('c') if ctrl => Action::Quit,
            KeyCode::Esc => Action::Quit,
            KeyCode::Char('r') if ctrl => Action::Refresh,
            KeyCode::Char('d') if ctrl => {
                if self.dash.sidebar_open() {
                    Action::DeleteSelected
                } else {
                    Action::None
                }
            }
            KeyCode::F(2) => {
                self.dash.toggle_sidebar();
                Action::None
            }
            KeyCode::Up => {
                documents::select_prev(&mut self.doc_state, self.dash.documents().len());
                Action::None
            }
            KeyCode::Down => {
                documents::select_next(&mut self.doc_state, self.dash.documents().len());
                Action::None
            }
            KeyCode::PageUp => {
                self.scroll_back = self.scroll_back.saturating_add(5);
                Action::None
            }
            KeyCode::PageDown => {
                self.scroll_back = self.scroll_back.saturating_sub(5);
                Action::None
            }
            KeyCode::Enter if alt => {
                self.input.newline();
                Action::None
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.input.backspace();
                Action::None
            }
            KeyCode::Left => {
                self.input.left();
                Action::None
            }
            KeyCode::Right => {
                self.input.right();
                Action::None
            }
            KeyCode::Char(c) if !ctrl => {
                self.input.insert(c);
                Action::None
            }
            _ => Action::None,
        }
    }

    /// Pasted text: a dropped file uploads, anything else is typed.
    fn handle_paste(&mut self, text: &str) -> Action {
        if self.input.is_empty() {
            if let Some(path) = dropped_path(text, &self.accepted) {
                return Action::Upload(path);
            }
        }
        for c in text.chars() {
            self.input.insert(c);
        }
        Action::None
    }

    fn submit(&mut self) -> Action {
        if self.dash.is_loading() {
            return Action::None;
        }
        let text = self.input.take();
        if let Some(cmd) = SlashCommand::parse(&text) {
            return match cmd {
                SlashCommand::Quit => Action::Quit,
                other => Action::Command(other),
            };
        }
        if let Some(path) = dropped_path(&text, &self.accepted) {
            return Action::Upload(path);
        }
        if text.trim().is_empty() {
            return Action::None;
        }
        self.scroll_back = 0;
        Action::Send(text)
    }
}

// ── Public entry point ───────────────────────────────────────────

/// Launch the full-screen dashboard. Returns when the user quits (Esc / Ctrl-C).
pub async fn run_dashboard(ctx: &Context) -> anyhow::Result<()> {
    let session = ctx.restored_session().await;
    let dash = Dashboard::new(session.backend(), session.auth())
        .with_sidebar(ctx.config.chat.sidebar);
    let mut app = App::new(dash, session, ctx);

    app.online = ctx.backend.health().await.is_ok();
    app.dash.refresh_documents().await;
    app.absorb_notices();

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, &mut app, ctx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    ctx: &Context,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let action = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
            Event::Paste(text) => app.handle_paste(&text),
            _ => Action::None,
        };

        match action {
            Action::None => {}
            Action::Quit => return Ok(()),
            Action::Send(text) => {
                if let Some(request) = app.dash.begin_query(&text) {
                    // Show the question and "Thinking..." before waiting.
                    terminal.draw(|f| render(f, app))?;
                    let backend = app.dash.backend();
                    let auth = app.dash.auth().clone();
                    let result = backend.query(&auth, request).await;
                    app.dash.finish_query(result);
                }
            }
            Action::Upload(path) => upload(terminal, app, &path).await?,
            Action::Refresh => {
                app.dash.refresh_documents().await;
            }
            Action::DeleteSelected => {
                if let Some(id) = app.selected_document_id() {
                    app.dash.delete(&id).await;
                }
            }
            Action::Command(cmd) => run_command(terminal, app, ctx, cmd).await?,
        }
        app.absorb_notices();
    }
}

async fn upload(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    path: &std::path::Path,
) -> anyhow::Result<()> {
    match UploadFile::pick(path, &app.accepted).await {
        Ok(file) => {
            app.show_overlay("Upload", vec![format!("Uploading {}...", file.filename)]);
            terminal.draw(|f| render(f, app))?;
            app.dash.upload(file).await;
            app.overlay = None;
        }
        Err(e) => app.notice = Some(Notice::error(e.to_string())),
    }
    Ok(())
}

async fn run_command(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    ctx: &Context,
    cmd: SlashCommand,
) -> anyhow::Result<()> {
    match cmd {
        SlashCommand::Docs => {
            app.dash.refresh_documents().await;
            if !app.dash.sidebar_open() {
                app.dash.toggle_sidebar();
            }
        }
        SlashCommand::Upload(raw) => {
            upload(terminal, app, &resolve_user_path(&raw)).await?;
        }
        SlashCommand::Delete(id) => {
            app.dash.delete(&id).await;
        }
        SlashCommand::Sidebar => {
            app.dash.toggle_sidebar();
        }
        SlashCommand::New => {
            app.dash.new_conversation();
            app.scroll_back = 0;
        }
        SlashCommand::Whoami => {
            let lines = match app.session.user() {
                Some(u) => {
                    let mut lines = vec![format!("User:   {}", u.display_name())];
                    if let Some(email) = &u.email {
                        lines.push(format!("Email:  {email}"));
                    }
                    lines
                }
                None => vec!["Not signed in. Run `kcopilot login`.".to_string()],
            };
            app.show_overlay("Account", lines);
        }
        SlashCommand::Logout => {
            app.session.logout();
            app.dash.set_auth(Auth::Anonymous);
            app.show_overlay("Account", vec!["Signed out.".to_string()]);
        }
        SlashCommand::Help => {
            let mut lines: Vec<String> = HELP_LINES.iter().map(|l| l.to_string()).collect();
            lines.push(String::new());
            lines.push("F2 sidebar  ↑/↓ select  Ctrl-D delete  Ctrl-R refresh".into());
            lines.push("PgUp/PgDn scroll  Alt-Enter newline  Esc quit".into());
            lines.push(format!("API: {}", ctx.api_url));
            app.show_overlay("Help", lines);
        }
        SlashCommand::Usage(usage) => {
            app.notice = Some(Notice::error(format!("Usage: {usage}")));
        }
        SlashCommand::Unknown(other) => {
            app.notice = Some(Notice::error(format!(
                "Unknown command: {other}. Type /help for commands."
            )));
        }
        SlashCommand::Quit => {}
    }
    Ok(())
}

// ── Rendering ────────────────────────────────────────────────────

fn render(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),    // Chat + sidebar
            Constraint::Length(5), // Input
            Constraint::Length(1), // Footer / notice
        ])
        .split(size);

    render_header(f, chunks[0], app);

    let body = if app.dash.sidebar_open() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(34), Constraint::Min(30)])
            .split(chunks[1]);
        widgets::documents::render(
            f,
            cols[0],
            app.dash.documents(),
            app.dash.is_uploading(),
            &mut app.doc_state,
        );
        cols[1]
    } else {
        chunks[1]
    };

    widgets::chat::render(
        f,
        body,
        app.dash.transcript().messages(),
        app.dash.is_loading(),
        app.show_sources,
        app.scroll_back,
    );
    if let Some((title, lines)) = &app.overlay {
        render_overlay(f, body, title, lines);
    }

    widgets::input::render(f, chunks[2], &app.input, app.dash.is_loading());
    render_footer(f, chunks[3], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let user = app
        .session
        .user()
        .map(|u| u.display_name().to_string())
        .unwrap_or_else(|| "signed out".into());
    let status = if app.online {
        Span::styled("● online", Theme::success())
    } else {
        Span::styled("● offline", Theme::error())
    };

    let line = Line::from(vec![
        Span::styled(" Knowledge Copilot ", Theme::header()),
        Span::styled("  ", Theme::text_dim()),
        Span::styled(user, Theme::text()),
        Span::styled("  ", Theme::text_dim()),
        status,
    ]);
    let p = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );
    f.render_widget(p, area);
}

fn render_overlay(f: &mut Frame, area: Rect, title: &str, lines: &[String]) {
    let height = (lines.len() as u16 + 2).min(area.height);
    let width = area.width.saturating_sub(4).min(72);
    let rect = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };
    let text: Vec<Line> = lines
        .iter()
        .map(|l| Line::from(Span::styled(l.clone(), Theme::text())))
        .collect();
    let p = Paragraph::new(text)
        .block(
            Block::default()
                .title(Span::styled(format!(" {title} "), Theme::header()))
                .borders(Borders::ALL)
                .border_style(Theme::border_focus()),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    if let Some(notice) = app.notice.as_ref().filter(|n| !n.is_expired(Instant::now())) {
        let p = Paragraph::new(Line::from(Span::styled(
            format!(" {}", notice.message),
            Theme::notice(notice.level),
        )));
        f.render_widget(p, area);
        return;
    }

    let hints = Line::from(vec![
        Span::styled(" Esc", Theme::key_hint()),
        Span::styled(" quit  ", Theme::key_desc()),
        Span::styled("F2", Theme::key_hint()),
        Span::styled(" sidebar  ", Theme::key_desc()),
        Span::styled("\u{2191}\u{2193}", Theme::key_hint()),
        Span::styled(" select  ", Theme::key_desc()),
        Span::styled("^D", Theme::key_hint()),
        Span::styled(" delete  ", Theme::key_desc()),
        Span::styled("^R", Theme::key_hint()),
        Span::styled(" refresh  ", Theme::key_desc()),
        Span::styled("/help", Theme::key_hint()),
        Span::styled(" commands", Theme::key_desc()),
    ]);
    f.render_widget(Paragraph::new(hints), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{DocumentInfo, MockKnowledgeBackend};
    use crate::infra::config::Config;
    use crate::session::MemorySessionStore;
    use std::sync::Arc;

    fn app_with(mock: MockKnowledgeBackend) -> App {
        let backend: Arc<dyn crate::client::KnowledgeBackend> = Arc::new(mock);
        let ctx = Context {
            config: Config::default(),
            config_path: None,
            backend: Arc::clone(&backend),
            api_url: url::Url::parse("http://localhost:8000").unwrap(),
        };
        let session =
            SessionManager::new(Arc::clone(&backend), Box::new(MemorySessionStore::new()));
        let dash = Dashboard::new(backend, Auth::Anonymous);
        App::new(dash, session, &ctx)
    }

    fn app() -> App {
        app_with(MockKnowledgeBackend::new())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_enter_sends_typed_question() {
        let mut app = app();
        type_text(&mut app, "What is X?");
        assert_eq!(
            app.handle_key(key(KeyCode::Enter)),
            Action::Send("What is X?".into())
        );
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_blank_enter_does_nothing() {
        let mut app = app();
        type_text(&mut app, "   ");
        assert_eq!(app.handle_key(key(KeyCode::Enter)), Action::None);
    }

    #[test]
    fn test_alt_enter_inserts_newline() {
        let mut app = app();
        type_text(&mut app, "a");
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT));
        type_text(&mut app, "b");
        assert_eq!(app.input.text(), "a\nb");
    }

    #[test]
    fn test_slash_commands_and_quit() {
        let mut app = app();
        type_text(&mut app, "/new");
        assert_eq!(
            app.handle_key(key(KeyCode::Enter)),
            Action::Command(SlashCommand::New)
        );
        type_text(&mut app, "/quit");
        assert_eq!(app.handle_key(key(KeyCode::Enter)), Action::Quit);
        assert_eq!(
            app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
    }

    #[test]
    fn test_f2_toggles_sidebar_and_ctrl_d_needs_it() {
        let mut app = app();
        assert!(app.dash.sidebar_open());
        let ctrl_d = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert_eq!(app.handle_key(ctrl_d), Action::DeleteSelected);

        app.handle_key(key(KeyCode::F(2)));
        assert!(!app.dash.sidebar_open());
        assert_eq!(app.handle_key(ctrl_d), Action::None);
    }

    #[test]
    fn test_paste_of_dropped_file_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "# notes").unwrap();

        let mut app = app();
        let pasted = format!("'{}'", path.display());
        assert_eq!(app.handle_paste(&pasted), Action::Upload(path));

        assert_eq!(app.handle_paste("just text"), Action::None);
        assert_eq!(app.input.text(), "just text");
    }

    #[tokio::test]
    async fn test_selection_follows_document_list() {
        let mut mock = MockKnowledgeBackend::new();
        mock.expect_list_documents().returning(|_| {
            Ok(vec![
                DocumentInfo {
                    id: "d1".into(),
                    filename: "a.pdf".into(),
                    upload_date: "2026-01-01".into(),
                    file_type: None,
                    processed: true,
                },
                DocumentInfo {
                    id: "d2".into(),
                    filename: "b.md".into(),
                    upload_date: "2026-01-02".into(),
                    file_type: None,
                    processed: true,
                },
            ])
        });

        let mut app = app_with(mock);
        assert_eq!(app.selected_document_id(), None);

        app.dash.refresh_documents().await;
        app.absorb_notices();
        assert_eq!(app.selected_document_id().as_deref(), Some("d1"));

        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected_document_id().as_deref(), Some("d2"));
    }
}
