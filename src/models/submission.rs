use crate::entities::form_submission_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FormSubmissionResponse {
    pub id: Uuid,
    pub submission_data: serde_json::Value,
    pub beehiiv_id: Option<String>,
    pub processed: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<form_submission_entity::Model> for FormSubmissionResponse {
    fn from(m: form_submission_entity::Model) -> Self {
        Self {
            id: m.id,
            submission_data: m.submission_data,
            beehiiv_id: m.beehiiv_id,
            processed: m.processed,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmissionQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub processed: Option<bool>,
}
