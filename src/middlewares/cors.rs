use actix_cors::Cors;

/// 落地页会部署在任意营销域名下, 这里完全放开
pub fn create_cors() -> Cors {
    Cors::default()
        .allowed_origin_fn(|_, _req_head| true)
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        // 放宽 Header, 防止前端自定义 Header 导致预检失败
        .allow_any_header()
        .max_age(3600)
}
