use crate::entities::sweepstakes_entry_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EntrySubmissionRequest {
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[schema(example = "Jane")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    /// 不传时使用当前激活的活动
    pub sweepstakes_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EntryResponse {
    pub id: Uuid,
    pub sweepstakes_id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub entry_count: i32,
    pub referral_count: i32,
    pub affiliate_id: Option<String>,
    pub referral_url: Option<String>,
    pub beehiiv_subscriber_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<sweepstakes_entry_entity::Model> for EntryResponse {
    fn from(m: sweepstakes_entry_entity::Model) -> Self {
        Self {
            id: m.id,
            sweepstakes_id: m.sweepstakes_id,
            email: m.email,
            first_name: m.first_name,
            last_name: m.last_name,
            entry_count: m.entry_count,
            referral_count: m.referral_count,
            affiliate_id: m.affiliate_id,
            referral_url: m.referral_url,
            beehiiv_subscriber_id: m.beehiiv_subscriber_id,
            created_at: m.created_at,
        }
    }
}

/// 报名结果: 新建成功或者该邮箱已报名
#[derive(Debug)]
pub enum SubmissionOutcome {
    Created {
        entry: EntryResponse,
        beehiiv: Option<serde_json::Value>,
    },
    Duplicate {
        entry: EntryResponse,
    },
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EntryQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sweepstakes_id: Option<Uuid>,
    /// 按邮箱精确过滤
    pub email: Option<String>,
}
