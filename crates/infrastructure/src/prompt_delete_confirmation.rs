use async_trait::async_trait;
use dialoguer::{Select, theme::ColorfulTheme};
use teamtrack_application::DeleteConfirmation;
use teamtrack_core::RecordId;
use tracing::warn;

const CANCEL: usize = 0;
const DELETE: usize = 1;

/// Terminal prompt offering `Cancel` and `Delete`.
///
/// `Cancel` is preselected. A prompt that cannot be shown counts as a
/// cancellation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptDeleteConfirmation;

impl PromptDeleteConfirmation {
    /// Creates a terminal delete prompt.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DeleteConfirmation for PromptDeleteConfirmation {
    async fn confirm_delete(&self, resource: &str, item_id: RecordId) -> bool {
        let prompt = format!("Are you sure you want to delete {resource} '{item_id}'?");
        let selection = tokio::task::spawn_blocking(move || {
            Select::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .items(&["Cancel", "Delete"])
                .default(CANCEL)
                .interact()
        })
        .await;

        match selection {
            Ok(Ok(choice)) => choice == DELETE,
            Ok(Err(error)) => {
                warn!(resource, item_id = %item_id, error = %error, "delete prompt failed");
                false
            }
            Err(error) => {
                warn!(resource, item_id = %item_id, error = %error, "delete prompt task failed");
                false
            }
        }
    }
}

/// Confirmation that always gives the same answer, for non-interactive runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedDeleteConfirmation {
    answer: bool,
}

impl FixedDeleteConfirmation {
    /// Confirms every delete.
    #[must_use]
    pub fn always() -> Self {
        Self { answer: true }
    }

    /// Declines every delete.
    #[must_use]
    pub fn never() -> Self {
        Self { answer: false }
    }
}

#[async_trait]
impl DeleteConfirmation for FixedDeleteConfirmation {
    async fn confirm_delete(&self, _resource: &str, _item_id: RecordId) -> bool {
        self.answer
    }
}
