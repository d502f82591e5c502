//! Applications registered with the tr8n service.

use serde::Serialize;

use crate::api::types::ApplicationRow;

/// An application the logged-in translator may register keys against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Application {
    pub name: String,
    /// Empty when the service has no description for the application.
    pub description: String,
    /// Key identifying the application on register calls.
    pub key: String,
}

impl Application {
    #[must_use]
    pub const fn new(name: String, description: String, key: String) -> Self {
        Self { name, description, key }
    }

    /// Quick-pick row shown by the host editor.
    #[must_use]
    pub fn option(&self) -> Vec<String> {
        if self.description.is_empty() {
            vec![self.name.clone(), "No description".to_string()]
        } else {
            vec![self.name.clone(), self.description.clone()]
        }
    }
}

impl From<ApplicationRow> for Application {
    fn from(row: ApplicationRow) -> Self {
        Self { name: row.name, description: row.description.unwrap_or_default(), key: row.key }
    }
}
