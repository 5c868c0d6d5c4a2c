// src/cli/mod.rs — CLI definition (clap derive)

pub mod ask;
pub mod auth;
pub mod chat;
pub mod docs;
pub mod render;
pub mod status;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::client::{ApiClient, KnowledgeBackend};
use crate::infra::config::Config;
use crate::session::{FileSessionStore, SessionManager};

#[derive(Parser)]
#[command(
    name = "kcopilot",
    about = "Chat with your documents from the terminal",
    version
)]
pub struct Cli {
    /// Config file path
    #[arg(long)]
    pub config: Option<String>,

    /// Backend base URL (overrides KCOPILOT_API_URL and the config file)
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(short, long)]
        username: Option<String>,
        /// Prompted (masked) when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        username: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Backend URL, health and session
    Status,
    /// Manage indexed documents
    Docs {
        #[command(subcommand)]
        action: DocsAction,
    },
    /// Ask a single question and print the answer
    Ask {
        #[arg(required = true, trailing_var_arg = true)]
        question: Vec<String>,
    },
    /// Interactive chat session (default)
    Chat,
    /// Full-screen dashboard
    Dashboard,
}

#[derive(Subcommand, Clone)]
pub enum DocsAction {
    /// List indexed documents
    List,
    /// Upload one or more files
    Upload {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Delete a document by id
    Delete { id: String },
}

/// Shared handles for a single CLI invocation.
pub struct Context {
    pub config: Config,
    /// The file `config` was read from; `None` when running on defaults.
    pub config_path: Option<PathBuf>,
    pub backend: Arc<dyn KnowledgeBackend>,
    pub api_url: url::Url,
}

impl Context {
    pub fn new(
        config: Config,
        config_path: Option<PathBuf>,
        api_url: Option<&str>,
    ) -> anyhow::Result<Self> {
        let client = ApiClient::from_config(&config, api_url)?;
        let api_url = client.base_url().clone();
        Ok(Self {
            config,
            config_path,
            backend: Arc::new(client),
            api_url,
        })
    }

    /// A session backed by the on-disk token, not yet restored.
    pub fn session(&self) -> SessionManager {
        SessionManager::new(
            Arc::clone(&self.backend),
            Box::new(FileSessionStore::default_location()),
        )
    }

    /// Restore the stored session if there is one. The backend serves
    /// documents and answers anonymously too, so a stale token only warns.
    pub async fn restored_session(&self) -> SessionManager {
        let mut session = self.session();
        if let Err(e) = session.restore().await {
            eprintln!("  Session expired ({e}); continuing signed out.");
        }
        session
    }

    pub fn accepted_extensions(&self) -> &[String] {
        &self.config.upload.accepted_extensions
    }
}
