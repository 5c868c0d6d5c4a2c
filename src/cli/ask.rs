// src/cli/ask.rs — One-shot question

use super::render::{print_message, print_notices};
use super::Context;
use crate::dashboard::Dashboard;

pub async fn run_ask(ctx: &Context, question: &str) -> anyhow::Result<()> {
    let session = ctx.restored_session().await;
    let mut dash = Dashboard::new(session.backend(), session.auth());

    if !dash.send(question).await {
        anyhow::bail!("question is empty");
    }
    print_notices(dash.take_notices());

    let Some(reply) = dash.transcript().last() else {
        return Ok(());
    };
    print_message(reply, ctx.config.chat.show_sources);
    if reply.error {
        anyhow::bail!("the backend could not answer");
    }
    Ok(())
}
