use crate::entities::sweepstakes_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// 落地页展示用的活动信息
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SweepstakesResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub prize_info: Option<String>,
    pub prize_value_cents: Option<i64>,
    pub is_active: bool,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl From<sweepstakes_entity::Model> for SweepstakesResponse {
    fn from(m: sweepstakes_entity::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            prize_info: m.prize_info,
            prize_value_cents: m.prize_value_cents,
            is_active: m.is_active,
            start_date: m.start_date,
            end_date: m.end_date,
        }
    }
}
