use crate::models::{PapOutcome, PapWebhookEvent};
use crate::services::{ReferralService, SubmissionService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

/// 联盟网络回调处理器
///
/// 点击: {"type":"click","sweeps":<affiliate_id>}
/// 转化: {"affiliate_id","click_id","status","email"}
#[utoipa::path(
    post,
    path = "/webhook/pap",
    tag = "webhook",
    request_body = PapWebhookEvent,
    responses(
        (status = 200, description = "回调已处理 (未批准的转化也算处理完成)"),
        (status = 404, description = "找不到对应的报名行, 联盟网络不应重试"),
        (status = 500, description = "数据库错误, 联盟网络可以重试")
    )
)]
pub async fn pap_webhook(
    referral_service: web::Data<ReferralService>,
    event: web::Json<PapWebhookEvent>,
) -> Result<HttpResponse> {
    match referral_service.handle_webhook(event.into_inner()).await {
        Ok(PapOutcome::Processed) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Ok(PapOutcome::NotFound(message)) => Ok(HttpResponse::NotFound().json(json!({
            "success": false,
            "error": message,
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 原始表单中继处理器, 收什么转发什么
#[utoipa::path(
    post,
    path = "/webhook/submission",
    tag = "webhook",
    responses(
        (status = 200, description = "已入库并转发"),
        (status = 400, description = "报文缺少 email"),
        (status = 500, description = "下游服务失败, 审计行保留")
    )
)]
pub async fn submission_webhook(
    submission_service: web::Data<SubmissionService>,
    payload: web::Json<serde_json::Value>,
) -> Result<HttpResponse> {
    match submission_service.process(payload.into_inner()).await {
        Ok(_) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn webhook_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/webhook")
            .route("/pap", web::post().to(pap_webhook))
            .route("/submission", web::post().to(submission_webhook)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BeehiivConfig, PapConfig, ReferralConfig};
    use crate::entities::sweepstakes_entry_entity as entries;
    use crate::external::{BeehiivService, PapService};
    use actix_web::{App, http::StatusCode, test};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use serde_json::Value;

    fn referral_service(db: DatabaseConnection) -> ReferralService {
        ReferralService::new(
            db,
            BeehiivService::new(BeehiivConfig::default()),
            PapService::new(PapConfig::default()),
            ReferralConfig {
                base_url: String::new(),
            },
        )
    }

    #[actix_web::test]
    async fn test_pap_webhook_unknown_affiliate_returns_404_shape() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entries::Model>::new()])
            .into_connection();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(referral_service(db)))
                .configure(webhook_config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/webhook/pap")
            .set_json(json!({ "type": "click", "sweeps": "ghost" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], json!(false));
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn test_pap_webhook_pending_conversion_returns_200() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(referral_service(db)))
                .configure(webhook_config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/webhook/pap")
            .set_json(json!({
                "affiliate_id": "aff-1",
                "click_id": "c1",
                "status": "pending",
                "email": "x@example.com"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], json!(true));
    }
}
