use crate::entities::admin_user_entity;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminLoginRequest {
    #[schema(example = "admin@example.com")]
    pub email: String,
    #[schema(example = "password123")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminInfo {
    pub id: Uuid,
    pub email: String,
}

impl From<admin_user_entity::Model> for AdminInfo {
    fn from(m: admin_user_entity::Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminAuthResponse {
    pub admin: AdminInfo,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}
