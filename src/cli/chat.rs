// src/cli/chat.rs — Interactive REPL over the dashboard

use crossterm::style::Stylize;

use super::auth::print_profile;
use super::render::{print_documents, print_message, print_notices};
use super::Context;
use crate::client::Auth;
use crate::dashboard::Dashboard;
use crate::files::{dropped_path, resolve_user_path, UploadFile};
use crate::session::SessionManager;

/// A `/command` typed into the chat input. Shared with the full-screen view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Docs,
    Upload(String),
    Delete(String),
    Sidebar,
    New,
    Whoami,
    Logout,
    Help,
    Quit,
    /// Known command with a missing argument.
    Usage(&'static str),
    Unknown(String),
}

impl SlashCommand {
    /// `None` when the line is an ordinary question.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed == "quit" || trimmed == "exit" {
            return Some(SlashCommand::Quit);
        }
        if !trimmed.starts_with('/') {
            return None;
        }

        let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
            Some((c, a)) => (c, a.trim()),
            None => (trimmed, ""),
        };

        Some(match cmd {
            "/docs" => SlashCommand::Docs,
            "/upload" if arg.is_empty() => SlashCommand::Usage("/upload <path>"),
            "/upload" => SlashCommand::Upload(arg.to_string()),
            "/delete" if arg.is_empty() => SlashCommand::Usage("/delete <document-id>"),
            "/delete" => SlashCommand::Delete(arg.to_string()),
            "/sidebar" => SlashCommand::Sidebar,
            "/new" => SlashCommand::New,
            "/whoami" => SlashCommand::Whoami,
            "/logout" => SlashCommand::Logout,
            "/help" => SlashCommand::Help,
            "/quit" | "/exit" => SlashCommand::Quit,
            other => SlashCommand::Unknown(other.to_string()),
        })
    }
}

pub const HELP_LINES: &[&str] = &[
    "/docs               List uploaded documents",
    "/upload <path>      Upload a file (or paste/drop its path)",
    "/delete <id>        Delete a document",
    "/sidebar            Toggle the documents list",
    "/new                Start a new conversation",
    "/whoami             Show the signed-in user",
    "/logout             Sign out",
    "/help               Show this help",
    "/quit, quit, exit   End session",
];

/// Run the interactive chat REPL.
pub async fn run_chat(ctx: &Context) -> anyhow::Result<()> {
    let mut session = ctx.restored_session().await;
    let mut dash = Dashboard::new(session.backend(), session.auth())
        .with_sidebar(ctx.config.chat.sidebar);

    let who = session
        .user()
        .map(|u| u.display_name().to_string())
        .unwrap_or_else(|| "signed out".into());
    eprintln!(
        "kcopilot v{} | {} | {}\n",
        env!("CARGO_PKG_VERSION"),
        ctx.api_url,
        who,
    );

    dash.refresh_documents().await;
    print_notices(dash.take_notices());
    if dash.sidebar_open() {
        print_documents(dash.documents());
    }
    if dash.transcript().is_empty() {
        eprintln!("Ask anything about your documents. Type /help for commands.\n");
    }

    while let Some(input) = read_input() {
        if let Some(cmd) = SlashCommand::parse(&input) {
            if cmd == SlashCommand::Quit {
                break;
            }
            handle_slash_command(cmd, ctx, &mut session, &mut dash).await;
            print_notices(dash.take_notices());
            continue;
        }

        if input.trim().is_empty() {
            continue;
        }

        // A pasted/dropped file path uploads instead of asking.
        if let Some(path) = dropped_path(&input, ctx.accepted_extensions()) {
            upload_path(ctx, &mut dash, &path.display().to_string()).await;
            print_notices(dash.take_notices());
            continue;
        }

        eprintln!("{}", "Thinking...".dim());
        dash.send(&input).await;
        print_notices(dash.take_notices());
        if let Some(reply) = dash.transcript().last() {
            print_message(reply, ctx.config.chat.show_sources);
            println!();
        }
    }

    eprintln!(
        "\nSession: {} message(s), {} document(s)",
        dash.transcript().len(),
        dash.documents().len(),
    );
    Ok(())
}

fn read_input() -> Option<String> {
    use std::io::{self, BufRead, Write};

    print!("> ");
    io::stdout().flush().ok();

    let stdin = io::stdin();
    let mut line = String::new();
    match stdin.lock().read_line(&mut line) {
        Ok(0) => None, // EOF
        Ok(_) => Some(line),
        Err(_) => None,
    }
}

async fn upload_path(ctx: &Context, dash: &mut Dashboard, raw: &str) {
    let path = resolve_user_path(raw);
    match UploadFile::pick(&path, ctx.accepted_extensions()).await {
        Ok(file) => {
            eprintln!("  Uploading {}...", file.filename);
            if dash.upload(file).await && dash.sidebar_open() {
                print_documents(dash.documents());
            }
        }
        Err(e) => eprintln!("  {e}"),
    }
}

async fn handle_slash_command(
    cmd: SlashCommand,
    ctx: &Context,
    session: &mut SessionManager,
    dash: &mut Dashboard,
) {
    match cmd {
        SlashCommand::Docs => {
            if dash.refresh_documents().await {
                print_documents(dash.documents());
            }
        }
        SlashCommand::Upload(path) => upload_path(ctx, dash, &path).await,
        SlashCommand::Delete(id) => {
            if dash.delete(&id).await && dash.sidebar_open() {
                print_documents(dash.documents());
            }
        }
        SlashCommand::Sidebar => {
            if dash.toggle_sidebar() {
                eprintln!("  Documents list shown after changes.");
                print_documents(dash.documents());
            } else {
                eprintln!("  Documents list hidden.");
            }
        }
        SlashCommand::New => {
            dash.new_conversation();
            eprintln!("  Started a new conversation.");
        }
        SlashCommand::Whoami => match session.user() {
            Some(user) => print_profile(user),
            None => eprintln!("  Not signed in. Run `kcopilot login`."),
        },
        SlashCommand::Logout => {
            session.logout();
            dash.set_auth(Auth::Anonymous);
            eprintln!("  Signed out.");
        }
        SlashCommand::Help => {
            eprintln!("Slash commands:");
            for line in HELP_LINES {
                eprintln!("  {line}");
            }
        }
        SlashCommand::Usage(usage) => eprintln!("  Usage: {usage}"),
        SlashCommand::Unknown(other) => {
            eprintln!("Unknown command: {}. Type /help for commands.", other);
        }
        SlashCommand::Quit => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_question_is_not_a_command() {
        assert_eq!(SlashCommand::parse("What is in notes.md?"), None);
        assert_eq!(SlashCommand::parse(""), None);
    }

    #[test]
    fn test_quit_aliases() {
        for q in ["quit", "exit", "/quit", " /exit \n"] {
            assert_eq!(SlashCommand::parse(q), Some(SlashCommand::Quit), "{q}");
        }
    }

    #[test]
    fn test_commands_with_arguments() {
        assert_eq!(
            SlashCommand::parse("/upload ~/Docs/my file.pdf"),
            Some(SlashCommand::Upload("~/Docs/my file.pdf".into()))
        );
        assert_eq!(
            SlashCommand::parse("/delete abc-123"),
            Some(SlashCommand::Delete("abc-123".into()))
        );
        assert_eq!(
            SlashCommand::parse("/delete"),
            Some(SlashCommand::Usage("/delete <document-id>"))
        );
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            SlashCommand::parse("/model gpt"),
            Some(SlashCommand::Unknown("/model".into()))
        );
    }
}
