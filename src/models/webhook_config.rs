use crate::entities::webhook_config_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WebhookConfigResponse {
    pub relay_url: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<webhook_config_entity::Model> for WebhookConfigResponse {
    fn from(m: webhook_config_entity::Model) -> Self {
        Self {
            relay_url: m.relay_url,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateWebhookConfigRequest {
    /// 置空表示停用中继转发
    #[schema(example = "https://hooks.example.com/catch/abc123")]
    pub relay_url: Option<String>,
}
