use crate::config::ReferralConfig;
use crate::entities::{referral_entity as referrals, sweepstakes_entry_entity as entries};
use crate::error::{AppError, AppResult};
use crate::external::{BeehiivService, PapService};
use crate::models::{PapOutcome, PapWebhookEvent, ReferralUrlRequest, ReferralUrlResponse};
use crate::utils::{normalize_email, validate_email};
use chrono::Utc;
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct ReferralService {
    pool: DatabaseConnection,
    beehiiv: BeehiivService,
    pap: PapService,
    referral_config: ReferralConfig,
}

impl ReferralService {
    pub fn new(
        pool: DatabaseConnection,
        beehiiv: BeehiivService,
        pap: PapService,
        referral_config: ReferralConfig,
    ) -> Self {
        Self {
            pool,
            beehiiv,
            pap,
            referral_config,
        }
    }

    /// 生成分享链接
    ///
    /// 逻辑:
    /// 1. 本地报名行已有 affiliate_id 直接复用
    /// 2. 否则先查 PAP 已有账号, 没有再创建 (查询优先保证幂等)
    /// 3. 拼出分享链接并把标识回写到该邮箱的报名行
    pub async fn generate_referral_url(
        &self,
        request: ReferralUrlRequest,
    ) -> AppResult<ReferralUrlResponse> {
        validate_email(&request.email)?;
        let email = normalize_email(&request.email);

        let entry = entries::Entity::find()
            .filter(entries::Column::Email.eq(&email))
            .order_by_desc(entries::Column::CreatedAt)
            .one(&self.pool)
            .await?;

        let affiliate_id = match entry.as_ref().and_then(|e| e.affiliate_id.clone()) {
            Some(id) => id,
            None => {
                if !self.pap.is_enabled() {
                    return Err(AppError::ConfigError(
                        "PAP affiliate API is not configured".to_string(),
                    ));
                }

                match self.pap.get_affiliate_id(&email).await? {
                    Some(id) => id,
                    None => {
                        let name = format!(
                            "{} {}",
                            request.first_name.as_deref().unwrap_or(""),
                            request.last_name.as_deref().unwrap_or("")
                        )
                        .trim()
                        .to_string();
                        self.pap.create_affiliate(&email, &name).await?
                    }
                }
            }
        };

        let base_url = self.referral_config.base_url.trim();
        if base_url.is_empty() {
            return Err(AppError::ConfigError(
                "referral base URL is not configured".to_string(),
            ));
        }
        let referral_url = Self::compose_referral_url(base_url, &affiliate_id);

        self.persist_affiliate(entry.as_ref(), &email, &affiliate_id, &referral_url)
            .await?;

        Ok(ReferralUrlResponse {
            affiliate_id,
            referral_url,
        })
    }

    /// 联盟网络回调入口, click 和 conversion 共用
    pub async fn handle_webhook(&self, event: PapWebhookEvent) -> AppResult<PapOutcome> {
        if event.is_click() {
            self.handle_click(event).await
        } else {
            self.handle_conversion(event).await
        }
    }

    async fn handle_click(&self, event: PapWebhookEvent) -> AppResult<PapOutcome> {
        let affiliate_id = event
            .sweeps
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::ValidationError("missing sweeps parameter".to_string()))?
            .to_string();

        let Some(entry) = self.find_entry_by_affiliate(&affiliate_id).await? else {
            log::warn!("点击回调找不到对应报名行: affiliate_id={affiliate_id}");
            return Ok(PapOutcome::NotFound(format!(
                "no entry for affiliate id {affiliate_id}"
            )));
        };

        let Some(updated) = self.increment_referral_count(entry.id).await? else {
            return Ok(PapOutcome::NotFound(format!(
                "no entry for affiliate id {affiliate_id}"
            )));
        };

        log::info!(
            "点击回调: affiliate_id={affiliate_id} referral_count={}",
            updated.referral_count
        );
        self.push_referral_count(&updated).await;

        Ok(PapOutcome::Processed)
    }

    /// 只有 approved 状态才会产生任何写入; 其余状态直接确认并忽略,
    /// 联盟网络会重复推送 pending / declined 等中间态
    async fn handle_conversion(&self, event: PapWebhookEvent) -> AppResult<PapOutcome> {
        let status = event
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::ValidationError("missing status".to_string()))?
            .to_string();

        if status != "approved" {
            log::info!("忽略未批准的转化回调: status={status}");
            return Ok(PapOutcome::Processed);
        }

        let affiliate_id = event
            .affiliate_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::ValidationError("missing affiliate_id".to_string()))?
            .to_string();
        let click_id = event
            .click_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::ValidationError("missing click_id".to_string()))?
            .to_string();

        let Some(entry) = self.find_entry_by_affiliate(&affiliate_id).await? else {
            log::warn!("转化回调找不到对应报名行: affiliate_id={affiliate_id}");
            return Ok(PapOutcome::NotFound(format!(
                "no entry for affiliate id {affiliate_id}"
            )));
        };

        let existing = referrals::Entity::find()
            .filter(referrals::Column::TrackingId.eq(&click_id))
            .one(&self.pool)
            .await?;

        match existing {
            Some(referral) if referral.converted => {
                // 同一转化重复推送, 不再加计数
                log::info!("转化已处理过: tracking_id={click_id}");
                return Ok(PapOutcome::Processed);
            }
            Some(referral) => {
                let mut am = referral.into_active_model();
                am.converted = Set(true);
                am.updated_at = Set(Some(Utc::now()));
                am.update(&self.pool).await?;
            }
            None => match event.email.as_deref() {
                Some(email) => {
                    referrals::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        referrer_id: Set(Some(entry.id)),
                        referred_email: Set(normalize_email(email)),
                        tracking_id: Set(Some(click_id.clone())),
                        converted: Set(true),
                        ..Default::default()
                    }
                    .insert(&self.pool)
                    .await?;
                }
                None => {
                    log::warn!("转化回调缺少 email, 跳过推荐明细: tracking_id={click_id}");
                }
            },
        }

        let Some(updated) = self.increment_referral_count(entry.id).await? else {
            return Ok(PapOutcome::NotFound(format!(
                "no entry for affiliate id {affiliate_id}"
            )));
        };

        log::info!(
            "转化回调已入账: affiliate_id={affiliate_id} referral_count={}",
            updated.referral_count
        );
        self.push_referral_count(&updated).await;

        Ok(PapOutcome::Processed)
    }

    async fn find_entry_by_affiliate(
        &self,
        affiliate_id: &str,
    ) -> AppResult<Option<entries::Model>> {
        let entry = entries::Entity::find()
            .filter(entries::Column::AffiliateId.eq(affiliate_id))
            .one(&self.pool)
            .await?;
        Ok(entry)
    }

    /// 计数自增必须在数据库端完成, 并发回调下读改写会丢更新
    async fn increment_referral_count(
        &self,
        entry_id: Uuid,
    ) -> AppResult<Option<entries::Model>> {
        let result = entries::Entity::update_many()
            .col_expr(
                entries::Column::ReferralCount,
                Expr::col(entries::Column::ReferralCount).add(1),
            )
            .filter(entries::Column::Id.eq(entry_id))
            .exec(&self.pool)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        let updated = entries::Entity::find_by_id(entry_id).one(&self.pool).await?;
        Ok(updated)
    }

    /// 推荐数推回 Beehiiv 自定义字段; 任何失败都不阻塞回调本身
    async fn push_referral_count(&self, entry: &entries::Model) {
        if !self.beehiiv.is_enabled() {
            return;
        }

        let Some(subscriber_id) = entry.beehiiv_subscriber_id.as_deref() else {
            log::warn!("报名行没有订阅者ID, 无法同步推荐数: {}", entry.email);
            return;
        };

        if let Err(e) = self
            .beehiiv
            .update_referral_count(subscriber_id, entry.referral_count)
            .await
        {
            log::warn!("Beehiiv 推荐数同步失败 (忽略): {e}");
        }
    }

    async fn persist_affiliate(
        &self,
        entry: Option<&entries::Model>,
        email: &str,
        affiliate_id: &str,
        referral_url: &str,
    ) -> AppResult<()> {
        if let Some(e) = entry
            && e.affiliate_id.as_deref() == Some(affiliate_id)
            && e.referral_url.as_deref() == Some(referral_url)
        {
            return Ok(());
        }

        let result = entries::Entity::update_many()
            .set(entries::ActiveModel {
                affiliate_id: Set(Some(affiliate_id.to_string())),
                referral_url: Set(Some(referral_url.to_string())),
                updated_at: Set(Some(Utc::now())),
                ..Default::default()
            })
            .filter(entries::Column::Email.eq(email))
            .exec(&self.pool)
            .await?;

        if result.rows_affected == 0 {
            log::warn!("该邮箱没有报名行, affiliate_id 未落库: {email}");
        }

        Ok(())
    }

    fn compose_referral_url(base_url: &str, affiliate_id: &str) -> String {
        format!("{}?sweeps={}", base_url.trim_end_matches('/'), affiliate_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BeehiivConfig, PapConfig};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn service(db: DatabaseConnection, base_url: &str) -> ReferralService {
        ReferralService::new(
            db,
            BeehiivService::new(BeehiivConfig::default()),
            PapService::new(PapConfig::default()),
            ReferralConfig {
                base_url: base_url.to_string(),
            },
        )
    }

    fn entry_row(affiliate_id: Option<&str>, referral_url: Option<&str>) -> entries::Model {
        entries::Model {
            id: Uuid::new_v4(),
            sweepstakes_id: Uuid::new_v4(),
            email: "jane@example.com".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            terms_accepted: true,
            entry_count: 1,
            referral_count: 0,
            affiliate_id: affiliate_id.map(|s| s.to_string()),
            referral_url: referral_url.map(|s| s.to_string()),
            beehiiv_subscriber_id: None,
            beehiiv_synced: false,
            beehiiv_synced_at: None,
            is_winner: false,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        }
    }

    fn click_event(sweeps: Option<&str>) -> PapWebhookEvent {
        PapWebhookEvent {
            event_type: Some("click".to_string()),
            sweeps: sweeps.map(|s| s.to_string()),
            affiliate_id: None,
            click_id: None,
            status: None,
            email: None,
        }
    }

    fn conversion_event(status: &str) -> PapWebhookEvent {
        PapWebhookEvent {
            event_type: None,
            sweeps: None,
            affiliate_id: Some("aff-1".to_string()),
            click_id: Some("c1".to_string()),
            status: Some(status.to_string()),
            email: Some("friend@example.com".to_string()),
        }
    }

    #[tokio::test]
    async fn test_click_increments_counter_in_database() {
        let entry = entry_row(Some("ref-123"), None);
        let mut updated = entry.clone();
        updated.referral_count = 1;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![entry]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([vec![updated]])
            .into_connection();

        let outcome = service(db.clone(), "")
            .handle_webhook(click_event(Some("ref-123")))
            .await
            .unwrap();
        assert_eq!(outcome, PapOutcome::Processed);

        // 自增表达式必须下推到数据库
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains(r#""referral_count" = "referral_count" + 1"#));
    }

    #[tokio::test]
    async fn test_click_unknown_affiliate_mutates_nothing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entries::Model>::new()])
            .into_connection();

        let outcome = service(db.clone(), "")
            .handle_webhook(click_event(Some("ghost")))
            .await
            .unwrap();
        assert!(matches!(outcome, PapOutcome::NotFound(_)));

        let log = format!("{:?}", db.into_transaction_log());
        assert!(!log.contains("UPDATE"));
    }

    #[tokio::test]
    async fn test_click_without_sweeps_is_validation_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = service(db.clone(), "")
            .handle_webhook(click_event(None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_pending_conversion_is_accepted_without_any_query() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let outcome = service(db.clone(), "")
            .handle_webhook(conversion_event("pending"))
            .await
            .unwrap();
        assert_eq!(outcome, PapOutcome::Processed);
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_approved_conversion_unknown_affiliate_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entries::Model>::new()])
            .into_connection();

        let outcome = service(db.clone(), "")
            .handle_webhook(conversion_event("approved"))
            .await
            .unwrap();
        assert!(matches!(outcome, PapOutcome::NotFound(_)));

        let log = format!("{:?}", db.into_transaction_log());
        assert!(!log.contains("UPDATE"));
        assert!(!log.contains("INSERT"));
    }

    #[tokio::test]
    async fn test_approved_conversion_creates_referral_and_increments() {
        let entry = entry_row(Some("aff-1"), None);
        let mut updated = entry.clone();
        updated.referral_count = 1;

        let referral = referrals::Model {
            id: Uuid::new_v4(),
            referrer_id: Some(entry.id),
            referred_email: "friend@example.com".to_string(),
            tracking_id: Some("c1".to_string()),
            converted: true,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // 报名行查询, 推荐明细查询, 明细插入 RETURNING, 计数自增, 回读
            .append_query_results([vec![entry]])
            .append_query_results([Vec::<referrals::Model>::new()])
            .append_query_results([vec![referral]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([vec![updated]])
            .into_connection();

        let outcome = service(db.clone(), "")
            .handle_webhook(conversion_event("approved"))
            .await
            .unwrap();
        assert_eq!(outcome, PapOutcome::Processed);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("referrals"));
        assert!(log.contains(r#""referral_count" = "referral_count" + 1"#));
    }

    #[tokio::test]
    async fn test_redelivered_conversion_does_not_double_count() {
        let entry = entry_row(Some("aff-1"), None);
        let referral = referrals::Model {
            id: Uuid::new_v4(),
            referrer_id: Some(entry.id),
            referred_email: "friend@example.com".to_string(),
            tracking_id: Some("c1".to_string()),
            converted: true,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![entry]])
            .append_query_results([vec![referral]])
            .into_connection();

        let outcome = service(db.clone(), "")
            .handle_webhook(conversion_event("approved"))
            .await
            .unwrap();
        assert_eq!(outcome, PapOutcome::Processed);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(!log.contains("UPDATE"));
    }

    #[tokio::test]
    async fn test_generate_url_reuses_persisted_affiliate_without_writes() {
        let entry = entry_row(Some("aff-9"), Some("https://site.example.com?sweeps=aff-9"));
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![entry]])
            .into_connection();

        let resp = service(db.clone(), "https://site.example.com")
            .generate_referral_url(ReferralUrlRequest {
                email: "jane@example.com".to_string(),
                first_name: None,
                last_name: None,
            })
            .await
            .unwrap();

        assert_eq!(resp.affiliate_id, "aff-9");
        assert_eq!(resp.referral_url, "https://site.example.com?sweeps=aff-9");

        // 第二次调用是纯读取
        let log = format!("{:?}", db.into_transaction_log());
        assert!(!log.contains("UPDATE"));
    }

    #[tokio::test]
    async fn test_generate_url_backfills_missing_referral_url() {
        let entry = entry_row(Some("aff-9"), None);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![entry]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let resp = service(db.clone(), "https://site.example.com/")
            .generate_referral_url(ReferralUrlRequest {
                email: "jane@example.com".to_string(),
                first_name: None,
                last_name: None,
            })
            .await
            .unwrap();

        assert_eq!(resp.referral_url, "https://site.example.com?sweeps=aff-9");

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("UPDATE"));
    }

    #[tokio::test]
    async fn test_generate_url_requires_pap_when_no_local_affiliate() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entries::Model>::new()])
            .into_connection();

        let err = service(db, "https://site.example.com")
            .generate_referral_url(ReferralUrlRequest {
                email: "jane@example.com".to_string(),
                first_name: None,
                last_name: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn test_compose_referral_url_normalizes_trailing_slash() {
        assert_eq!(
            ReferralService::compose_referral_url("https://a.com/", "x1"),
            "https://a.com?sweeps=x1"
        );
        assert_eq!(
            ReferralService::compose_referral_url("https://a.com", "x1"),
            "https://a.com?sweeps=x1"
        );
    }
}
