use crate::services::LegalService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/v1/legal/{doc_type}",
    tag = "legal",
    params(
        ("doc_type" = String, Path, description = "文档类型, 如 privacy_policy / terms_conditions")
    ),
    responses(
        (status = 200, description = "法律文档内容", body = crate::models::LegalDocumentResponse),
        (status = 404, description = "文档不存在")
    )
)]
pub async fn get_legal_document(
    legal_service: web::Data<LegalService>,
    doc_type: web::Path<String>,
) -> Result<HttpResponse> {
    match legal_service.get_by_type(&doc_type).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": resp
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn legal_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/legal").route("/{doc_type}", web::get().to(get_legal_document)));
}
