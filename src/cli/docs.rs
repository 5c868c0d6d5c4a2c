// src/cli/docs.rs — `kcopilot docs` subcommands

use super::render::{print_documents, print_notices};
use super::{Context, DocsAction};
use crate::dashboard::Dashboard;
use crate::files::UploadFile;

pub async fn run_docs(ctx: &Context, action: DocsAction) -> anyhow::Result<()> {
    let session = ctx.restored_session().await;
    let mut dash = Dashboard::new(session.backend(), session.auth());

    match action {
        DocsAction::List => {
            let ok = dash.refresh_documents().await;
            print_notices(dash.take_notices());
            if !ok {
                anyhow::bail!("could not list documents");
            }
            print_documents(dash.documents());
        }
        DocsAction::Upload { paths } => {
            let mut failed = 0usize;
            for path in &paths {
                let file = match UploadFile::pick(path, ctx.accepted_extensions()).await {
                    Ok(f) => f,
                    Err(e) => {
                        eprintln!("  Skipping {}: {e}", path.display());
                        failed += 1;
                        continue;
                    }
                };
                eprintln!("  Uploading {}...", file.filename);
                if !dash.upload(file).await {
                    failed += 1;
                }
                print_notices(dash.take_notices());
            }
            print_documents(dash.documents());
            if failed > 0 {
                anyhow::bail!("{failed} of {} upload(s) failed", paths.len());
            }
        }
        DocsAction::Delete { id } => {
            let ok = dash.delete(&id).await;
            print_notices(dash.take_notices());
            if !ok {
                anyhow::bail!("could not delete document {id}");
            }
            print_documents(dash.documents());
        }
    }
    Ok(())
}
