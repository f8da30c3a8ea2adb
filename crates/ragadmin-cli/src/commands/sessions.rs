use crate::context::AppContext;
use anyhow::Result;

pub async fn list(app: &AppContext) -> Result<()> {
    app.controller.settle_route().await?;

    for summary in app.controller.summaries().await {
        let marker = if summary.is_current { "*" } else { " " };
        println!(
            "{} {}  {} ({} messages)",
            marker, summary.id, summary.title, summary.message_count
        );
    }
    Ok(())
}

pub async fn create(app: &AppContext) -> Result<()> {
    let session_id = app.controller.new_chat().await?;
    println!("✨ Started new chat {}", session_id);
    Ok(())
}
