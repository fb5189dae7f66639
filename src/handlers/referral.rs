use crate::models::*;
use crate::services::ReferralService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/api/v1/referrals/url",
    tag = "referrals",
    request_body = ReferralUrlRequest,
    responses(
        (status = 200, description = "返回分享链接", body = ReferralUrlResponse),
        (status = 400, description = "邮箱格式错误"),
        (status = 500, description = "联盟接口失败")
    )
)]
pub async fn generate_referral_url(
    referral_service: web::Data<ReferralService>,
    request: web::Json<ReferralUrlRequest>,
) -> Result<HttpResponse> {
    match referral_service
        .generate_referral_url(request.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "affiliateId": resp.affiliate_id,
            "referralUrl": resp.referral_url,
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn referral_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/referrals").route("/url", web::post().to(generate_referral_url)));
}
