use crate::entities::legal_document_entity as legal;
use crate::error::{AppError, AppResult};
use crate::models::LegalDocumentResponse;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

#[derive(Clone)]
pub struct LegalService {
    pool: DatabaseConnection,
}

impl LegalService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 按类型取法律文档 (privacy_policy / terms_conditions), 同类型取最近更新的
    pub async fn get_by_type(&self, doc_type: &str) -> AppResult<LegalDocumentResponse> {
        let doc_type = doc_type.trim().to_lowercase();
        if doc_type.is_empty() {
            return Err(AppError::ValidationError(
                "document type is required".to_string(),
            ));
        }

        let model = legal::Entity::find()
            .filter(legal::Column::DocType.eq(&doc_type))
            .order_by_desc(legal::Column::UpdatedAt)
            .one(&self.pool)
            .await?;

        model
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("legal document not found: {doc_type}")))
    }
}
