use crate::entities::admin_user_entity as admins;
use crate::error::{AppError, AppResult};
use crate::models::{AdminAuthResponse, AdminLoginRequest};
use crate::utils::{JwtService, hash_password, normalize_email, verify_password};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService) -> Self {
        Self { pool, jwt_service }
    }

    pub async fn login(&self, request: AdminLoginRequest) -> AppResult<AdminAuthResponse> {
        let email = normalize_email(&request.email);

        let admin = admins::Entity::find()
            .filter(admins::Column::Email.eq(&email))
            .one(&self.pool)
            .await?;

        // 账号不存在与密码错误返回同一条信息
        let admin = admin
            .ok_or_else(|| AppError::AuthError("Invalid email or password".to_string()))?;

        if !verify_password(&request.password, &admin.password_hash)? {
            return Err(AppError::AuthError("Invalid email or password".to_string()));
        }

        self.issue_tokens(admin)
    }

    pub async fn refresh_token(&self, token: &str) -> AppResult<AdminAuthResponse> {
        let claims = self.jwt_service.verify_refresh_token(token)?;
        let admin_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::AuthError("Invalid token subject".to_string()))?;

        let admin = admins::Entity::find_by_id(admin_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Admin account no longer exists".to_string()))?;

        self.issue_tokens(admin)
    }

    /// 启动时按配置创建管理员账号, 已存在或未配置则跳过
    pub async fn ensure_bootstrap_admin(&self, email: &str, password: &str) -> AppResult<()> {
        if email.is_empty() || password.is_empty() {
            return Ok(());
        }

        let email = normalize_email(email);
        let existing = admins::Entity::find()
            .filter(admins::Column::Email.eq(&email))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Ok(());
        }

        let password_hash = hash_password(password)?;
        admins::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.clone()),
            password_hash: Set(password_hash),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("管理员账号已创建: {email}");
        Ok(())
    }

    fn issue_tokens(&self, admin: admins::Model) -> AppResult<AdminAuthResponse> {
        let access_token = self
            .jwt_service
            .generate_access_token(admin.id, &admin.email)?;
        let refresh_token = self
            .jwt_service
            .generate_refresh_token(admin.id, &admin.email)?;
        let expires_in = self.jwt_service.get_access_token_expires_in();

        Ok(AdminAuthResponse {
            admin: admin.into(),
            access_token,
            refresh_token,
            expires_in,
        })
    }
}
