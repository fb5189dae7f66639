use crate::error::{AppError, AppResult};
use reqwest::Client;
use serde_json::Value;

/// 把原始提交 JSON 原样转发到管理员配置的中继地址
#[derive(Clone)]
pub struct RelayService {
    http: Client,
}

impl RelayService {
    pub fn new() -> Self {
        let http = Client::builder()
            .user_agent("sweeps-backend/relay")
            .build()
            .expect("reqwest client");
        Self { http }
    }

    pub async fn forward(&self, relay_url: &str, payload: &Value) -> AppResult<()> {
        let resp = self.http.post(relay_url).json(payload).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            log::error!(
                "Relay forward failed: HTTP {} url {} body {}",
                status.as_u16(),
                relay_url,
                body
            );
            return Err(AppError::ExternalApiError(format!(
                "Relay webhook error: HTTP {}",
                status.as_u16()
            )));
        }

        log::info!("中继转发成功: {relay_url}");
        Ok(())
    }
}

impl Default for RelayService {
    fn default() -> Self {
        Self::new()
    }
}
