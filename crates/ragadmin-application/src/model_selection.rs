use tokio::sync::RwLock;

/// Models offered by the backend and the one currently selected.
pub struct ModelSelection {
    available: RwLock<Vec<String>>,
    selected: RwLock<String>,
}

impl ModelSelection {
    /// Starts with no offered models and `default_model` selected.
    pub fn new(default_model: impl Into<String>) -> Self {
        Self {
            available: RwLock::new(Vec::new()),
            selected: RwLock::new(default_model.into()),
        }
    }

    /// Records a fetched model list, selecting its first entry.
    ///
    /// An empty list leaves the current selection untouched.
    pub async fn apply_fetched(&self, models: Vec<String>) {
        if let Some(first) = models.first() {
            *self.selected.write().await = first.clone();
        }
        *self.available.write().await = models;
    }

    pub async fn select(&self, model: impl Into<String>) {
        let model = model.into();
        if !self.available.read().await.iter().any(|m| *m == model) {
            tracing::warn!("[ModelSelection] Selecting model '{}' not offered by the backend", model);
        }
        *self.selected.write().await = model;
    }

    pub async fn selected(&self) -> String {
        self.selected.read().await.clone()
    }

    pub async fn available(&self) -> Vec<String> {
        self.available.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_fetched_model_is_selected() {
        let selection = ModelSelection::new("llama2");
        selection
            .apply_fetched(vec!["mistral".to_string(), "phi3".to_string()])
            .await;

        assert_eq!(selection.selected().await, "mistral");
        assert_eq!(selection.available().await, vec!["mistral", "phi3"]);
    }

    #[tokio::test]
    async fn test_empty_list_keeps_default() {
        let selection = ModelSelection::new("llama2");
        selection.apply_fetched(Vec::new()).await;
        assert_eq!(selection.selected().await, "llama2");
    }

    #[tokio::test]
    async fn test_explicit_selection() {
        let selection = ModelSelection::new("llama2");
        selection
            .apply_fetched(vec!["mistral".to_string(), "phi3".to_string()])
            .await;
        selection.select("phi3").await;
        assert_eq!(selection.selected().await, "phi3");
    }
}
