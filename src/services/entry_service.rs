use crate::entities::{sweepstakes_entity as sweeps, sweepstakes_entry_entity as entries};
use crate::error::{AppError, AppResult};
use crate::external::{BeehiivService, RelayService};
use crate::models::{
    EntryQuery, EntryResponse, EntrySubmissionRequest, PaginatedResponse, PaginationParams,
    SubmissionOutcome,
};
use crate::services::{SweepstakesService, WebhookConfigService};
use crate::utils::{normalize_email, validate_email};
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct EntryService {
    pool: DatabaseConnection,
    beehiiv: BeehiivService,
    relay: RelayService,
    sweepstakes_service: SweepstakesService,
    webhook_config_service: WebhookConfigService,
}

impl EntryService {
    pub fn new(
        pool: DatabaseConnection,
        beehiiv: BeehiivService,
        relay: RelayService,
        sweepstakes_service: SweepstakesService,
        webhook_config_service: WebhookConfigService,
    ) -> Self {
        Self {
            pool,
            beehiiv,
            relay,
            sweepstakes_service,
            webhook_config_service,
        }
    }

    /// 报名提交
    ///
    /// 逻辑:
    /// 1. 校验字段, 未指定活动时取当前激活的活动
    /// 2. 条件插入报名行 (插入与查重一条语句完成, 冲突即已报名)
    /// 3. 已报名 -> 返回 Duplicate, 带已有行, 前端照常进入 thank-you 页
    /// 4. 调 Beehiiv 创建订阅; 失败向上抛, 报名行保留不回滚
    /// 5. 配置了中继地址则转发原始载荷, 失败只记日志
    /// 6. 回填订阅者ID, 失败只记日志
    pub async fn submit(&self, request: EntrySubmissionRequest) -> AppResult<SubmissionOutcome> {
        validate_email(&request.email)?;
        let email = normalize_email(&request.email);
        let first_name = request.first_name.trim().to_string();
        let last_name = request.last_name.trim().to_string();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(AppError::ValidationError(
                "first_name and last_name are required".to_string(),
            ));
        }

        let sweepstakes = self.resolve_sweepstakes(request.sweepstakes_id).await?;

        let am = entries::ActiveModel {
            id: Set(Uuid::new_v4()),
            sweepstakes_id: Set(sweepstakes.id),
            email: Set(email.clone()),
            first_name: Set(first_name.clone()),
            last_name: Set(last_name.clone()),
            terms_accepted: Set(true),
            entry_count: Set(1),
            referral_count: Set(0),
            beehiiv_synced: Set(false),
            ..Default::default()
        };

        let insert_result = entries::Entity::insert(am)
            .on_conflict(
                OnConflict::columns([entries::Column::SweepstakesId, entries::Column::Email])
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&self.pool)
            .await;

        match insert_result {
            Ok(_) => {}
            Err(DbErr::RecordNotInserted) => {
                let existing = self.find_entry(sweepstakes.id, &email).await?;
                log::info!("重复报名: {email} (活动 {})", sweepstakes.id);
                return Ok(SubmissionOutcome::Duplicate {
                    entry: existing.into(),
                });
            }
            Err(e) => return Err(e.into()),
        }

        let mut entry = self.find_entry(sweepstakes.id, &email).await?;

        let beehiiv_body = if self.beehiiv.is_enabled() {
            Some(
                self.beehiiv
                    .create_subscription(
                        &email,
                        &first_name,
                        &last_name,
                        sweepstakes.beehiiv_tag.as_deref(),
                    )
                    .await?,
            )
        } else {
            log::warn!("Beehiiv 未配置, 跳过订阅同步: {email}");
            None
        };

        self.forward_to_relay(&request).await;

        if let Some(body) = &beehiiv_body
            && let Some(subscriber_id) = BeehiivService::extract_subscription_id(body)
        {
            match self.backfill_subscriber_id(entry.clone(), &subscriber_id).await {
                Ok(updated) => entry = updated,
                Err(e) => log::warn!("订阅者ID回填失败: {email}: {e}"),
            }
        }

        Ok(SubmissionOutcome::Created {
            entry: entry.into(),
            beehiiv: beehiiv_body,
        })
    }

    pub(crate) async fn resolve_sweepstakes(
        &self,
        sweepstakes_id: Option<Uuid>,
    ) -> AppResult<sweeps::Model> {
        match sweepstakes_id {
            Some(id) => sweeps::Entity::find_by_id(id)
                .one(&self.pool)
                .await?
                .ok_or_else(|| AppError::ValidationError(format!("unknown sweepstakes: {id}"))),
            None => self
                .sweepstakes_service
                .find_active_model()
                .await?
                .ok_or_else(|| {
                    AppError::ValidationError("no_active_sweepstakes".to_string())
                }),
        }
    }

    async fn find_entry(&self, sweepstakes_id: Uuid, email: &str) -> AppResult<entries::Model> {
        entries::Entity::find()
            .filter(entries::Column::SweepstakesId.eq(sweepstakes_id))
            .filter(entries::Column::Email.eq(email))
            .one(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::InternalError(format!("entry disappeared after insert: {email}"))
            })
    }

    async fn forward_to_relay(&self, request: &EntrySubmissionRequest) {
        let relay_url = match self.webhook_config_service.get_relay_url().await {
            Ok(Some(url)) => url,
            Ok(None) => return,
            Err(e) => {
                log::warn!("读取中继配置失败: {e}");
                return;
            }
        };

        let payload = match serde_json::to_value(request) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("中继载荷序列化失败: {e}");
                return;
            }
        };

        if let Err(e) = self.relay.forward(&relay_url, &payload).await {
            log::warn!("中继转发失败 (不影响报名): {e}");
        }
    }

    async fn backfill_subscriber_id(
        &self,
        entry: entries::Model,
        subscriber_id: &str,
    ) -> AppResult<entries::Model> {
        let mut am = entry.into_active_model();
        am.beehiiv_subscriber_id = Set(Some(subscriber_id.to_string()));
        am.beehiiv_synced = Set(true);
        am.beehiiv_synced_at = Set(Some(Utc::now()));
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&self.pool).await?;
        Ok(updated)
    }

    /// 报名表分页查询
    pub async fn list(&self, query: &EntryQuery) -> AppResult<PaginatedResponse<EntryResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);
        let offset = params.get_offset();
        let limit = params.get_limit();

        let mut base_query = entries::Entity::find();
        if let Some(sweepstakes_id) = query.sweepstakes_id {
            base_query = base_query.filter(entries::Column::SweepstakesId.eq(sweepstakes_id));
        }
        if let Some(email) = query.email.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            base_query = base_query.filter(entries::Column::Email.eq(normalize_email(email)));
        }

        let total = base_query.clone().count(&self.pool).await? as i64;

        let items_models = base_query
            .order_by(entries::Column::CreatedAt, Order::Desc)
            .limit(limit as u64)
            .offset(offset as u64)
            .all(&self.pool)
            .await?;

        let items: Vec<EntryResponse> = items_models.into_iter().map(Into::into).collect();

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

    fn service(db: DatabaseConnection) -> EntryService {
        EntryService::new(
            db.clone(),
            BeehiivService::new(BeehiivConfig::default()),
            RelayService::new(),
            SweepstakesService::new(db.clone()),
            WebhookConfigService::new(db),
        )
    }

    fn active_sweepstakes() -> sweeps::Model {
        sweeps::Model {
            id: Uuid::new_v4(),
            title: "Win Big Giveaway".to_string(),
            description: None,
            prize_info: None,
            prize_value_cents: None,
            draw_type: "automatic".to_string(),
            entries_to_draw: 1,
            beehiiv_tag: None,
            is_active: true,
            start_date: Utc::now(),
            end_date: Utc::now(),
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        }
    }

    fn entry_row(sweepstakes_id: Uuid, email: &str) -> entries::Model {
        entries::Model {
            id: Uuid::new_v4(),
            sweepstakes_id,
            email: email.to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            terms_accepted: true,
            entry_count: 1,
            referral_count: 0,
            affiliate_id: None,
            referral_url: None,
            beehiiv_subscriber_id: None,
            beehiiv_synced: false,
            beehiiv_synced_at: None,
            is_winner: false,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        }
    }

    fn request(email: &str) -> EntrySubmissionRequest {
        EntrySubmissionRequest {
            email: email.to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            sweepstakes_id: None,
        }
    }

    #[tokio::test]
    async fn test_submit_creates_entry_with_initial_counts() {
        let sweepstakes = active_sweepstakes();
        let entry = entry_row(sweepstakes.id, "jane@example.com");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // 激活活动查询, 条件插入 RETURNING, 回读报名行, 中继配置查询
            .append_query_results([vec![sweepstakes.clone()]])
            .append_query_results([vec![entry.clone()]])
            .append_query_results([vec![entry.clone()]])
            .append_query_results([Vec::<wc::Model>::new()])
            .into_connection();

        let outcome = service(db.clone())
            .submit(request(" Jane@Example.COM "))
            .await
            .unwrap();

        match outcome {
            SubmissionOutcome::Created { entry, beehiiv } => {
                assert_eq!(entry.email, "jane@example.com");
                assert_eq!(entry.entry_count, 1);
                assert_eq!(entry.referral_count, 0);
                assert!(beehiiv.is_none());
            }
            other => panic!("expected Created, got {other:?}"),
        }

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("INSERT"));
        assert!(log.contains("ON CONFLICT"));
    }

    #[tokio::test]
    async fn test_submit_duplicate_returns_existing_entry() {
        let sweepstakes = active_sweepstakes();
        let existing = entry_row(sweepstakes.id, "jane@example.com");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![sweepstakes.clone()]])
            // 冲突: RETURNING 一行都没有
            .append_query_results([Vec::<entries::Model>::new()])
            .append_query_results([vec![existing.clone()]])
            .into_connection();

        let outcome = service(db.clone())
            .submit(request("jane@example.com"))
            .await
            .unwrap();

        match outcome {
            SubmissionOutcome::Duplicate { entry } => {
                assert_eq!(entry.id, existing.id);
            }
            other => panic!("expected Duplicate, got {other:?}"),
        }

        // 重复提交绝不更新已有行
        let log = format!("{:?}", db.into_transaction_log());
        assert!(!log.contains("UPDATE"));
    }

    #[tokio::test]
    async fn test_submit_invalid_email_touches_nothing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = service(db.clone())
            .submit(request("not-an-email"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_submit_without_active_sweepstakes() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<sweeps::Model>::new()])
            .into_connection();

        let err = service(db.clone())
            .submit(request("jane@example.com"))
            .await
            .unwrap_err();

        match err {
            AppError::ValidationError(msg) => assert_eq!(msg, "no_active_sweepstakes"),
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }
}
