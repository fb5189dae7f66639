use crate::services::SweepstakesService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/v1/sweepstakes/active",
    tag = "sweepstakes",
    responses(
        (status = 200, description = "当前激活的活动", body = crate::models::SweepstakesResponse),
        (status = 404, description = "没有激活的活动")
    )
)]
pub async fn get_active_sweepstakes(
    sweepstakes_service: web::Data<SweepstakesService>,
) -> Result<HttpResponse> {
    match sweepstakes_service.get_active().await {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": resp
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn sweepstakes_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/sweepstakes").route("/active", web::get().to(get_active_sweepstakes)));
}
