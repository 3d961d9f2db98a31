//! Fetches the panel view from a running `tvpaneld` over HTTP.

use async_trait::async_trait;
use serde::Deserialize;

use panel::display::PanelViewSource;
use panel::model::PanelView;
use tvpanel_core::ServiceError;

/// `{"error": {"code": .., "message": ..}}` as returned by the server.
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct HttpViewSource {
    http: reqwest::Client,
    url: String,
}

impl HttpViewSource {
    pub fn new(base_url: &str, department_id: &str, panel_id: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: view_url(base_url, department_id, panel_id),
        }
    }
}

pub fn view_url(base_url: &str, department_id: &str, panel_id: &str) -> String {
    format!(
        "{}/panel/v1/departments/{}/panels/{}/view",
        base_url.trim_end_matches('/'),
        department_id,
        panel_id
    )
}

#[async_trait]
impl PanelViewSource for HttpViewSource {
    async fn fetch(&self) -> Result<PanelView, ServiceError> {
        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ServiceError::Unavailable(format!("network: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(match status.as_u16() {
                404 => ServiceError::NotFound(message),
                code => ServiceError::Unavailable(format!("HTTP {code}: {message}")),
            });
        }

        resp.json::<PanelView>()
            .await
            .map_err(|e| ServiceError::Internal(format!("decode: {e}")))
    }
}
