use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use sweeps_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::{BeehiivService, PapService, RelayService},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection");

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // 创建JWT服务
    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expires_in,
        config.jwt.refresh_token_expires_in,
    );

    // 创建外部服务
    let beehiiv_service = BeehiivService::new(config.beehiiv.clone());
    let pap_service = PapService::new(config.pap.clone());
    let relay_service = RelayService::new();

    // 创建服务
    let auth_service = AuthService::new(pool.clone(), jwt_service.clone());
    let sweepstakes_service = SweepstakesService::new(pool.clone());
    let webhook_config_service = WebhookConfigService::new(pool.clone());
    let legal_service = LegalService::new(pool.clone());
    let entry_service = EntryService::new(
        pool.clone(),
        beehiiv_service.clone(),
        relay_service.clone(),
        sweepstakes_service.clone(),
        webhook_config_service.clone(),
    );
    let referral_service = ReferralService::new(
        pool.clone(),
        beehiiv_service.clone(),
        pap_service.clone(),
        config.referral.clone(),
    );
    let submission_service = SubmissionService::new(
        pool.clone(),
        beehiiv_service.clone(),
        relay_service.clone(),
        webhook_config_service.clone(),
    );

    // 按配置创建首个管理员账号
    if let Err(e) = auth_service
        .ensure_bootstrap_admin(&config.admin.email, &config.admin.password)
        .await
    {
        log::error!("Failed to bootstrap admin account: {e:?}");
    }

    // 确保邮件平台的自定义字段存在, 失败不阻塞启动
    if beehiiv_service.is_enabled()
        && let Err(e) = beehiiv_service.ensure_custom_fields().await
    {
        log::warn!("Failed to ensure Beehiiv custom fields: {e:?}");
    }

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(sweepstakes_service.clone()))
            .app_data(web::Data::new(webhook_config_service.clone()))
            .app_data(web::Data::new(legal_service.clone()))
            .app_data(web::Data::new(entry_service.clone()))
            .app_data(web::Data::new(referral_service.clone()))
            .app_data(web::Data::new(submission_service.clone()))
            .configure(swagger_config)
            .configure(handlers::webhook_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::auth_config)
                    .configure(handlers::entry_config)
                    .configure(handlers::referral_config)
                    .configure(handlers::sweepstakes_config)
                    .configure(handlers::legal_config)
                    .configure(handlers::admin_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
