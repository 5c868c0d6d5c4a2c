// src/cli/status.rs — Backend and session status

use std::path::Path;

use super::Context;
use crate::infra::paths;

/// Display backend reachability and who we are signed in as.
pub async fn show_status(ctx: &Context) -> anyhow::Result<()> {
    println!("kcopilot v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("  Config:   {}", config_line(ctx.config_path.as_deref()));
    println!("  API:      {}", ctx.api_url);

    match ctx.backend.health().await {
        Ok(h) if !h.message.is_empty() => println!("  Backend:  online ({})", h.message),
        Ok(_) => println!("  Backend:  online"),
        Err(e) => println!("  Backend:  unreachable ({e})"),
    }

    let mut session = ctx.session();
    match session.restore().await {
        Ok(true) => {
            let name = session.user().map(|u| u.display_name()).unwrap_or("?");
            println!("  Session:  signed in as {name}");
        }
        Ok(false) => println!("  Session:  signed out"),
        Err(e) => println!("  Session:  expired ({e})"),
    }
    println!("  Token:    {}", paths::session_file_path().display());

    Ok(())
}

fn config_line(path: Option<&Path>) -> String {
    match path {
        Some(p) => format!("{} (loaded)", p.display()),
        None => "(using defaults)".to_string(),
    }
}
