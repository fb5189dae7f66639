use crate::entities::sweepstakes_entity as sweeps;
use crate::error::{AppError, AppResult};
use crate::models::SweepstakesResponse;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

#[derive(Clone)]
pub struct SweepstakesService {
    pool: DatabaseConnection,
}

impl SweepstakesService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 获取当前激活的活动, 多个激活时取最新创建的
    pub async fn get_active(&self) -> AppResult<SweepstakesResponse> {
        let model = self.find_active_model().await?;
        model
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("no_active_sweepstakes".to_string()))
    }

    pub(crate) async fn find_active_model(&self) -> AppResult<Option<sweeps::Model>> {
        let model = sweeps::Entity::find()
            .filter(sweeps::Column::IsActive.eq(true))
            .order_by_desc(sweeps::Column::CreatedAt)
            .one(&self.pool)
            .await?;
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    fn sample_sweepstakes() -> sweeps::Model {
        sweeps::Model {
            id: Uuid::new_v4(),
            title: "Win Big Giveaway".to_string(),
            description: Some("Grand prize draw".to_string()),
            prize_info: Some("$500 gift card".to_string()),
            prize_value_cents: Some(50_000),
            draw_type: "automatic".to_string(),
            entries_to_draw: 1,
            beehiiv_tag: Some("giveaway".to_string()),
            is_active: true,
            start_date: Utc::now(),
            end_date: Utc::now(),
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        }
    }

    #[tokio::test]
    async fn test_get_active_returns_latest_active() {
        let model = sample_sweepstakes();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model.clone()]])
            .into_connection();

        let service = SweepstakesService::new(db);
        let resp = service.get_active().await.unwrap();
        assert_eq!(resp.id, model.id);
        assert_eq!(resp.title, "Win Big Giveaway");
        assert!(resp.is_active);
    }

    #[tokio::test]
    async fn test_get_active_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<sweeps::Model>::new()])
            .into_connection();

        let service = SweepstakesService::new(db);
        let err = service.get_active().await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
