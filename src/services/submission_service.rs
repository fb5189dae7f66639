use crate::entities::form_submission_entity as submissions;
use crate::error::{AppError, AppResult};
use crate::external::{BeehiivService, RelayService};
use crate::models::{FormSubmissionResponse, PaginatedResponse, PaginationParams, SubmissionQuery};
use crate::services::WebhookConfigService;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde_json::Value;
use uuid::Uuid;

#[derive(Clone)]
pub struct SubmissionService {
    pool: DatabaseConnection,
    beehiiv: BeehiivService,
    relay: RelayService,
    webhook_config_service: WebhookConfigService,
}

impl SubmissionService {
    pub fn new(
        pool: DatabaseConnection,
        beehiiv: BeehiivService,
        relay: RelayService,
        webhook_config_service: WebhookConfigService,
    ) -> Self {
        Self {
            pool,
            beehiiv,
            relay,
            webhook_config_service,
        }
    }

    /// 处理一条原始表单提交
    ///
    /// 逻辑:
    /// 1. 先落审计行 (processed=false), 后续任何一步失败都有原始报文可查
    /// 2. 按报文里的 email 订阅邮件平台, 失败直接报错, 行留在未处理状态
    /// 3. 订阅成功后回写 beehiiv_id 并标记 processed
    /// 4. 配置了中继地址就原样转发, 转发失败算请求失败; 未配置则跳过
    pub async fn process(&self, payload: Value) -> AppResult<FormSubmissionResponse> {
        log::info!("收到中继提交: {payload}");

        let mut row = submissions::ActiveModel {
            id: Set(Uuid::new_v4()),
            submission_data: Set(payload.clone()),
            processed: Set(false),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        let email = payload["email"]
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                log::warn!("中继提交缺少 email, 审计行已保留: {}", row.id);
                AppError::ValidationError("email is required".to_string())
            })?
            .to_string();

        if self.beehiiv.is_enabled() {
            let first_name = payload["first_name"].as_str().unwrap_or("");
            let last_name = payload["last_name"].as_str().unwrap_or("");

            let body = self
                .beehiiv
                .create_subscription(&email, first_name, last_name, None)
                .await?;

            let mut am = row.into_active_model();
            am.beehiiv_id = Set(BeehiivService::extract_subscription_id(&body));
            am.processed = Set(true);
            am.updated_at = Set(Some(Utc::now()));
            row = am.update(&self.pool).await?;
        } else {
            log::warn!("Beehiiv 未配置, 审计行保持未处理: {}", row.id);
        }

        match self.webhook_config_service.get_relay_url().await? {
            Some(relay_url) => {
                self.relay.forward(&relay_url, &payload).await?;
            }
            None => {
                log::warn!("未配置中继地址, 跳过转发: {}", row.id);
            }
        }

        Ok(row.into())
    }

    /// 审计日志分页查询
    pub async fn list(
        &self,
        query: &SubmissionQuery,
    ) -> AppResult<PaginatedResponse<FormSubmissionResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);
        let offset = params.get_offset();
        let limit = params.get_limit();

        let mut base_query = submissions::Entity::find();
        if let Some(processed) = query.processed {
            base_query = base_query.filter(submissions::Column::Processed.eq(processed));
        }

        let total = base_query.clone().count(&self.pool).await? as i64;

        let items_models = base_query
            .order_by(submissions::Column::CreatedAt, Order::Desc)
            .limit(limit as u64)
            .offset(offset as u64)
            .all(&self.pool)
            .await?;

        let items: Vec<FormSubmissionResponse> =
            items_models.into_iter().map(Into::into).collect();

        Ok(PaginatedResponse::new(
            items,
            params.page.unwrap_or(1),
            limit,
            total,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BeehiivConfig;
    use crate::entities::webhook_config_entity as wc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn service(db: DatabaseConnection) -> SubmissionService {
        SubmissionService::new(
            db.clone(),
            BeehiivService::new(BeehiivConfig::default()),
            RelayService::new(),
            WebhookConfigService::new(db),
        )
    }

    fn stored_row(payload: Value) -> submissions::Model {
        submissions::Model {
            id: Uuid::new_v4(),
            submission_data: payload,
            beehiiv_id: None,
            processed: false,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        }
    }

    #[tokio::test]
    async fn test_process_keeps_audit_row_when_email_missing() {
        let payload = json!({ "first_name": "Jane" });
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored_row(payload.clone())]])
            .into_connection();

        let err = service(db.clone()).process(payload).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        // 报文先落库再校验
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("INSERT"));
    }

    #[tokio::test]
    async fn test_process_without_relay_or_beehiiv_stores_unprocessed() {
        let payload = json!({ "email": "jane@example.com" });
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored_row(payload.clone())]])
            .append_query_results([Vec::<wc::Model>::new()])
            .into_connection();

        let resp = service(db.clone()).process(payload).await.unwrap();
        assert!(!resp.processed);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("INSERT"));
        assert!(!log.contains("UPDATE"));
    }

    #[tokio::test]
    async fn test_list_filters_by_processed() {
        let row = stored_row(json!({ "email": "a@b.com" }));

        let count_row: BTreeMap<&str, sea_orm::Value> =
            [("num_items", sea_orm::Value::BigInt(Some(1)))]
                .into_iter()
                .collect();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![count_row]])
            .append_query_results([vec![row.clone()]])
            .into_connection();

        let query = SubmissionQuery {
            page: Some(1),
            page_size: Some(10),
            processed: Some(false),
        };
        let page = service(db.clone()).list(&query).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id, row.id);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("processed"));
    }
}
