use crate::context::AppContext;
use anyhow::Result;

pub async fn list(app: &AppContext) -> Result<()> {
    let models = app.controller.refresh_models().await;
    let selected = app.controller.selected_model().await;

    if models.is_empty() {
        println!("{} (default; {} offered no models)", selected, app.config.backend_url);
        return Ok(());
    }
    for model in models {
        let marker = if model == selected { "*" } else { " " };
        println!("{} {}", marker, model);
    }
    Ok(())
}
