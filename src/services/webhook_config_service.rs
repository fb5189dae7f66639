use crate::entities::webhook_config_entity as wc;
use crate::error::{AppError, AppResult};
use crate::models::{UpdateWebhookConfigRequest, WebhookConfigResponse};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryOrder, Set,
};
use uuid::Uuid;

/// 中继地址持久化在数据库而不是浏览器本地存储, 全局一行
#[derive(Clone)]
pub struct WebhookConfigService {
    pool: DatabaseConnection,
}

impl WebhookConfigService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn get(&self) -> AppResult<WebhookConfigResponse> {
        let model = self.first_row().await?;
        Ok(model.map(Into::into).unwrap_or(WebhookConfigResponse {
            relay_url: None,
            updated_at: None,
        }))
    }

    /// 给其它服务用的便捷读取
    pub async fn get_relay_url(&self) -> AppResult<Option<String>> {
        let model = self.first_row().await?;
        Ok(model.and_then(|m| m.relay_url).filter(|u| !u.is_empty()))
    }

    pub async fn update(
        &self,
        request: UpdateWebhookConfigRequest,
    ) -> AppResult<WebhookConfigResponse> {
        let relay_url = match request.relay_url {
            Some(url) => {
                let url = url.trim().to_string();
                if url.is_empty() {
                    None
                } else {
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        return Err(AppError::ValidationError(
                            "relay_url must be an http(s) URL".to_string(),
                        ));
                    }
                    Some(url)
                }
            }
            None => None,
        };

        let updated = match self.first_row().await? {
            Some(existing) => {
                let mut am = existing.into_active_model();
                am.relay_url = Set(relay_url);
                am.updated_at = Set(Some(Utc::now()));
                am.update(&self.pool).await?
            }
            None => {
                wc::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    relay_url: Set(relay_url),
                    ..Default::default()
                }
                .insert(&self.pool)
                .await?
            }
        };

        Ok(updated.into())
    }

    async fn first_row(&self) -> AppResult<Option<wc::Model>> {
        let model = wc::Entity::find()
            .order_by_asc(wc::Column::CreatedAt)
            .one(&self.pool)
            .await?;
        Ok(model)
    }
}
