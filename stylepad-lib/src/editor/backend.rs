//! Where edits go once they have been applied to the page.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;

use crate::error::EditorError;

pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// One property change, in the shape the save endpoint accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleEdit {
    pub selector: String,
    /// Camel-case (`fontSize`).
    pub property: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct EditorConfig {
    pub api_url: String,
    pub auto_save: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            api_url: DEFAULT_API_URL.to_string(),
            auto_save: true,
        }
    }
}

pub trait StyleBackend {
    /// Hands an edit off for persistence without waiting for the outcome.
    fn forward(&self, edit: StyleEdit);

    /// Erases every persisted rule.
    fn clear_all(&self) -> impl Future<Output = Result<(), EditorError>>;
}

/// Talks to the stylesheet service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    runtime: Handle,
}

impl HttpBackend {
    /// `runtime` runs the fire-and-forget save requests.
    pub fn new(config: &EditorConfig, runtime: Handle) -> Self {
        HttpBackend {
            client: reqwest::Client::new(),
            base_url: config.api_url.trim_end_matches('/').to_string(),
            runtime,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl StyleBackend for HttpBackend {
    fn forward(&self, edit: StyleEdit) {
        let client = self.client.clone();
        let url = self.url("/api/save-css");
        self.runtime.spawn(async move {
            let result = client
                .post(&url)
                .json(&edit)
                .send()
                .await
                .and_then(|response| response.error_for_status());
            match result {
                Ok(_) => log::debug!("saved {} {{ {} }}", edit.selector, edit.property),
                Err(e) => log::warn!("Auto-save failed (is server running?): {}", e),
            }
        });
    }

    async fn clear_all(&self) -> Result<(), EditorError> {
        self.client
            .delete(self.url("/api/clear-css"))
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map(|_| ())
            .map_err(|e| {
                log::error!("Failed to clear: {}", e);
                EditorError::ServerUnreachable(e.to_string())
            })
    }
}
