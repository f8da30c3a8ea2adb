use crate::context::AppContext;
use anyhow::{Result, bail};
use std::path::PathBuf;

pub async fn run(app: &AppContext, files: &[PathBuf]) -> Result<()> {
    let outcomes = app.controller.upload(files).await;

    let failed = outcomes.iter().filter(|o| !o.is_success()).count();
    if failed > 0 {
        bail!("{} of {} uploads failed", failed, outcomes.len());
    }
    Ok(())
}
