use crate::models::*;
use crate::services::EntryService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/api/v1/entries",
    tag = "entries",
    request_body = EntrySubmissionRequest,
    responses(
        (status = 200, description = "报名成功, 返回报名行与邮件平台响应"),
        (status = 400, description = "参数错误或已报名 (error=duplicate_entry)"),
        (status = 500, description = "下游服务失败")
    )
)]
pub async fn submit_entry(
    entry_service: web::Data<EntryService>,
    request: web::Json<EntrySubmissionRequest>,
) -> Result<HttpResponse> {
    match entry_service.submit(request.into_inner()).await {
        Ok(SubmissionOutcome::Created { entry, beehiiv }) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "entry": entry,
            "beehiiv": beehiiv,
        }))),
        // 已报名也带上已有行, 前端照常跳 thank-you 页
        Ok(SubmissionOutcome::Duplicate { entry }) => {
            Ok(HttpResponse::BadRequest().json(json!({
                "success": false,
                "error": "duplicate_entry",
                "entry": entry,
            })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

pub fn entry_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/entries", web::post().to(submit_entry));
}
