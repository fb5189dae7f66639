use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReferralUrlRequest {
    #[schema(example = "jane@example.com")]
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReferralUrlResponse {
    pub affiliate_id: String,
    pub referral_url: String,
}

/// 联盟网络回调事件, 单一 schema:
/// - 点击: type = "click", sweeps 携带推荐人 affiliate_id
/// - 转化: affiliate_id + click_id + status (+ email)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PapWebhookEvent {
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub sweeps: Option<String>,
    pub affiliate_id: Option<String>,
    pub click_id: Option<String>,
    pub status: Option<String>,
    pub email: Option<String>,
}

impl PapWebhookEvent {
    pub fn is_click(&self) -> bool {
        self.event_type.as_deref() == Some("click")
    }
}

/// 回调处理结果: 联盟网络把 404 视为终态, 不会重试
#[derive(Debug, PartialEq, Eq)]
pub enum PapOutcome {
    Processed,
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_event_shape() {
        let event: PapWebhookEvent =
            serde_json::from_str(r#"{"type":"click","sweeps":"ref-123"}"#).unwrap();
        assert!(event.is_click());
        assert_eq!(event.sweeps.as_deref(), Some("ref-123"));
        assert!(event.affiliate_id.is_none());
    }

    #[test]
    fn test_conversion_event_shape() {
        let event: PapWebhookEvent = serde_json::from_str(
            r#"{"affiliate_id":"aff-1","click_id":"c1","status":"approved","email":"x@example.com"}"#,
        )
        .unwrap();
        assert!(!event.is_click());
        assert_eq!(event.affiliate_id.as_deref(), Some("aff-1"));
        assert_eq!(event.click_id.as_deref(), Some("c1"));
        assert_eq!(event.status.as_deref(), Some("approved"));
    }

    #[test]
    fn test_unrecognized_field_names_are_ignored() {
        let event: PapWebhookEvent = serde_json::from_str(
            r#"{"refid":"aff-1","clickid":"c1","commission_status":"approved"}"#,
        )
        .unwrap();
        assert!(event.affiliate_id.is_none());
        assert!(event.click_id.is_none());
        assert!(event.status.is_none());
    }
}
