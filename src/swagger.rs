use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::entry::submit_entry,
        handlers::referral::generate_referral_url,
        handlers::webhook::pap_webhook,
        handlers::webhook::submission_webhook,
        handlers::sweepstakes::get_active_sweepstakes,
        handlers::legal::get_legal_document,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::admin::list_entries,
        handlers::admin::list_submissions,
        handlers::admin::get_webhook_config,
        handlers::admin::update_webhook_config,
    ),
    components(
        schemas(
            EntrySubmissionRequest,
            EntryResponse,
            EntryQuery,
            ReferralUrlRequest,
            ReferralUrlResponse,
            PapWebhookEvent,
            SweepstakesResponse,
            LegalDocumentResponse,
            FormSubmissionResponse,
            SubmissionQuery,
            WebhookConfigResponse,
            UpdateWebhookConfigRequest,
            AdminLoginRequest,
            RefreshTokenRequest,
            AdminInfo,
            AdminAuthResponse,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "entries", description = "Sweepstakes entry API"),
        (name = "referrals", description = "Referral link API"),
        (name = "webhook", description = "Affiliate and form relay webhooks"),
        (name = "sweepstakes", description = "Active sweepstakes API"),
        (name = "legal", description = "Legal document API"),
        (name = "auth", description = "Admin authentication API"),
        (name = "admin", description = "Admin management API"),
    ),
    info(
        title = "Sweeps Backend API",
        version = "1.0.0",
        description = "Sweepstakes landing page backend REST API documentation"
    ),
    servers(
        (url = "/", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
