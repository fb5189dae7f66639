use crate::config::PapConfig;
use crate::error::{AppError, AppResult};
use reqwest::Client;
use serde_json::{Value, json};

#[derive(Clone)]
pub struct PapService {
    http: Client,
    cfg: PapConfig,
}

impl PapService {
    pub fn new(cfg: PapConfig) -> Self {
        let http = Client::builder()
            .user_agent("sweeps-backend/pap")
            .build()
            .expect("reqwest client");
        Self { http, cfg }
    }

    pub fn is_enabled(&self) -> bool {
        !self.cfg.api_url.is_empty()
    }

    /// 按邮箱查询已有的联盟账号ID, 不存在返回 None
    pub async fn get_affiliate_id(&self, email: &str) -> AppResult<Option<String>> {
        let resp = self
            .http
            .get(&self.cfg.api_url)
            .query(&[("action", "getAffiliateId"), ("email", email)])
            .send()
            .await?;

        let status = resp.status();
        let body: Value = resp.json().await?;

        if !status.is_success() {
            log::error!(
                "PAP getAffiliateId failed: HTTP {} body {}",
                status.as_u16(),
                body
            );
            return Err(AppError::ExternalApiError(format!(
                "PAP API error: HTTP {}",
                status.as_u16()
            )));
        }

        Ok(Self::extract_affiliate_id(&body))
    }

    /// 创建联盟账号并返回分配的ID
    pub async fn create_affiliate(&self, email: &str, name: &str) -> AppResult<String> {
        let req_body = json!({
            "action": "createAffiliate",
            "email": email,
            "name": name,
        });

        let resp = self
            .http
            .post(&self.cfg.api_url)
            .json(&req_body)
            .send()
            .await?;

        let status = resp.status();
        let body: Value = resp.json().await?;

        if !status.is_success() {
            log::error!(
                "PAP createAffiliate failed: HTTP {} body {}",
                status.as_u16(),
                body
            );
            return Err(AppError::ExternalApiError(format!(
                "PAP API error: HTTP {}",
                status.as_u16()
            )));
        }

        Self::extract_affiliate_id(&body).ok_or_else(|| {
            log::error!("PAP createAffiliate response missing affiliate_id: {body}");
            AppError::ExternalApiError("PAP affiliate id missing in response".to_string())
        })
    }

    /// affiliate_id 在不同版本的 PAP 接口里有字符串和数字两种形态
    fn extract_affiliate_id(body: &Value) -> Option<String> {
        match &body["affiliate_id"] {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_affiliate_id_string() {
        let body = json!({ "affiliate_id": "aff-42" });
        assert_eq!(
            PapService::extract_affiliate_id(&body),
            Some("aff-42".to_string())
        );
    }

    #[test]
    fn test_extract_affiliate_id_number() {
        let body = json!({ "affiliate_id": 42 });
        assert_eq!(
            PapService::extract_affiliate_id(&body),
            Some("42".to_string())
        );
    }

    #[test]
    fn test_extract_affiliate_id_absent() {
        assert_eq!(PapService::extract_affiliate_id(&json!({})), None);
        assert_eq!(
            PapService::extract_affiliate_id(&json!({ "affiliate_id": "" })),
            None
        );
        assert_eq!(
            PapService::extract_affiliate_id(&json!({ "affiliate_id": null })),
            None
        );
    }
}
