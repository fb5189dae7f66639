use crate::entities::legal_document_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LegalDocumentResponse {
    pub doc_type: String,
    pub title: String,
    pub content: String,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<legal_document_entity::Model> for LegalDocumentResponse {
    fn from(m: legal_document_entity::Model) -> Self {
        Self {
            doc_type: m.doc_type,
            title: m.title,
            content: m.content,
            updated_at: m.updated_at,
        }
    }
}
