use crate::models::*;
use crate::services::{EntryService, SubmissionService, WebhookConfigService};
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

fn get_admin_id_from_request(req: &HttpRequest) -> Option<Uuid> {
    req.extensions().get::<Uuid>().copied()
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/entries",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<u32>, Query, description = "页码, 从 1 开始"),
        ("page_size" = Option<u32>, Query, description = "每页条数, 默认 20"),
        ("sweepstakes_id" = Option<String>, Query, description = "按活动过滤"),
        ("email" = Option<String>, Query, description = "按邮箱精确过滤")
    ),
    responses(
        (status = 200, description = "报名列表"),
        (status = 401, description = "未认证")
    )
)]
pub async fn list_entries(
    entry_service: web::Data<EntryService>,
    query: web::Query<EntryQuery>,
) -> Result<HttpResponse> {
    match entry_service.list(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/submissions",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<u32>, Query, description = "页码, 从 1 开始"),
        ("page_size" = Option<u32>, Query, description = "每页条数, 默认 20"),
        ("processed" = Option<bool>, Query, description = "按处理状态过滤")
    ),
    responses(
        (status = 200, description = "原始提交审计列表"),
        (status = 401, description = "未认证")
    )
)]
pub async fn list_submissions(
    submission_service: web::Data<SubmissionService>,
    query: web::Query<SubmissionQuery>,
) -> Result<HttpResponse> {
    match submission_service.list(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/webhook-config",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "当前中继配置", body = WebhookConfigResponse),
        (status = 401, description = "未认证")
    )
)]
pub async fn get_webhook_config(
    webhook_config_service: web::Data<WebhookConfigService>,
) -> Result<HttpResponse> {
    match webhook_config_service.get().await {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": resp
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/webhook-config",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = UpdateWebhookConfigRequest,
    responses(
        (status = 200, description = "中继配置已更新", body = WebhookConfigResponse),
        (status = 400, description = "地址不是 http(s) URL"),
        (status = 401, description = "未认证")
    )
)]
pub async fn update_webhook_config(
    req: HttpRequest,
    webhook_config_service: web::Data<WebhookConfigService>,
    request: web::Json<UpdateWebhookConfigRequest>,
) -> Result<HttpResponse> {
    match webhook_config_service.update(request.into_inner()).await {
        Ok(resp) => {
            if let Some(admin_id) = get_admin_id_from_request(&req) {
                log::info!("管理员 {admin_id} 更新了中继地址: {:?}", resp.relay_url);
            }
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "data": resp
            })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/entries", web::get().to(list_entries))
            .route("/submissions", web::get().to(list_submissions))
            .route("/webhook-config", web::get().to(get_webhook_config))
            .route("/webhook-config", web::put().to(update_webhook_config)),
    );
}
