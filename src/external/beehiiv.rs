use crate::config::BeehiivConfig;
use crate::error::{AppError, AppResult};
use reqwest::Client;
use serde_json::{Value, json};

/// 需要在 Beehiiv 出版物上存在的自定义字段
const CUSTOM_FIELDS: [&str; 3] = ["first_name", "last_name", "referral_count"];

#[derive(Clone)]
pub struct BeehiivService {
    http: Client,
    cfg: BeehiivConfig,
}

impl BeehiivService {
    pub fn new(cfg: BeehiivConfig) -> Self {
        let http = Client::builder()
            .user_agent("sweeps-backend/beehiiv")
            .build()
            .expect("reqwest client");
        Self { http, cfg }
    }

    pub fn is_enabled(&self) -> bool {
        !self.cfg.api_key.is_empty() && !self.cfg.publication_id.is_empty()
    }

    /// 创建或重新激活订阅, 返回 Beehiiv 的原始响应体
    /// tag 是活动配置的 beehiiv_tag, 有则带上
    pub async fn create_subscription(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
        tag: Option<&str>,
    ) -> AppResult<Value> {
        let url = format!(
            "{}/publications/{}/subscriptions",
            self.cfg.base_url, self.cfg.publication_id
        );

        let mut req_body = json!({
            "email": email,
            "double_opt_in": false,
            "utm_source": "website",
            "utm_campaign": "sweepstakes",
            "send_welcome_email": true,
            "reactivate_existing": true,
            "custom_fields": [
                { "id": "first_name", "value": first_name },
                { "id": "last_name", "value": last_name },
            ],
        });
        if let Some(tag) = tag {
            req_body["tags"] = json!([tag]);
        }

        log::debug!("Beehiiv subscription request: {req_body}");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.cfg.api_key)
            .json(&req_body)
            .send()
            .await?;

        let status = resp.status();
        let body: Value = resp.json().await?;

        if !status.is_success() {
            log::error!(
                "Beehiiv subscription failed: HTTP {} body {}",
                status.as_u16(),
                body
            );
            return Err(AppError::ExternalApiError(format!(
                "Beehiiv API error: HTTP {}",
                status.as_u16()
            )));
        }

        log::info!("Beehiiv 订阅成功: {email}");
        Ok(body)
    }

    /// 把最新的推荐次数推送到订阅者的自定义字段
    pub async fn update_referral_count(
        &self,
        subscription_id: &str,
        referral_count: i32,
    ) -> AppResult<()> {
        let url = format!(
            "{}/publications/{}/subscriptions/{}",
            self.cfg.base_url, self.cfg.publication_id, subscription_id
        );

        let req_body = json!({
            "custom_fields": [
                { "id": "referral_count", "value": referral_count.to_string() },
            ],
        });

        let resp = self
            .http
            .patch(&url)
            .bearer_auth(&self.cfg.api_key)
            .json(&req_body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            log::error!(
                "Beehiiv custom field update failed: HTTP {} body {}",
                status.as_u16(),
                body
            );
            return Err(AppError::ExternalApiError(format!(
                "Beehiiv API error: HTTP {}",
                status.as_u16()
            )));
        }

        Ok(())
    }

    /// 确保订阅表单用到的自定义字段都已创建, 幂等
    pub async fn ensure_custom_fields(&self) -> AppResult<()> {
        let url = format!(
            "{}/publications/{}/custom_fields",
            self.cfg.base_url, self.cfg.publication_id
        );

        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.cfg.api_key)
            .send()
            .await?;

        let status = resp.status();
        let body: Value = resp.json().await?;
        if !status.is_success() {
            log::error!(
                "Beehiiv custom field list failed: HTTP {} body {}",
                status.as_u16(),
                body
            );
            return Err(AppError::ExternalApiError(format!(
                "Beehiiv API error: HTTP {}",
                status.as_u16()
            )));
        }

        let existing: Vec<String> = body["data"]
            .as_array()
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(|f| f["name"].as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default();

        for name in CUSTOM_FIELDS {
            if existing.iter().any(|e| e == name) {
                continue;
            }

            let req_body = json!({
                "name": name,
                "kind": "string",
                "display": name,
            });

            let resp = self
                .http
                .post(&url)
                .bearer_auth(&self.cfg.api_key)
                .json(&req_body)
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                log::error!(
                    "Beehiiv custom field create failed: HTTP {} body {}",
                    status.as_u16(),
                    body
                );
                return Err(AppError::ExternalApiError(format!(
                    "Beehiiv API error: HTTP {}",
                    status.as_u16()
                )));
            }

            log::info!("Beehiiv 自定义字段已创建: {name}");
        }

        Ok(())
    }

    /// 从订阅响应中提取订阅者ID, 兼容 data 包裹和裸对象两种形态
    pub fn extract_subscription_id(body: &Value) -> Option<String> {
        body["data"]["id"]
            .as_str()
            .or_else(|| body["id"].as_str())
            .map(|s| s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_subscription_id_from_data_envelope() {
        let body = json!({ "data": { "id": "sub_123", "email": "a@b.com" } });
        assert_eq!(
            BeehiivService::extract_subscription_id(&body),
            Some("sub_123".to_string())
        );
    }

    #[test]
    fn test_extract_subscription_id_from_bare_object() {
        let body = json!({ "id": "sub_456" });
        assert_eq!(
            BeehiivService::extract_subscription_id(&body),
            Some("sub_456".to_string())
        );
    }

    #[test]
    fn test_extract_subscription_id_missing() {
        let body = json!({ "data": { "email": "a@b.com" } });
        assert_eq!(BeehiivService::extract_subscription_id(&body), None);
    }

    #[test]
    fn test_disabled_without_credentials() {
        let svc = BeehiivService::new(BeehiivConfig::default());
        assert!(!svc.is_enabled());

        let svc = BeehiivService::new(BeehiivConfig {
            api_key: "key".into(),
            publication_id: "pub_1".into(),
            ..Default::default()
        });
        assert!(svc.is_enabled());
    }
}
