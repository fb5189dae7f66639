use sea_orm_migration::prelude::*;

/// Referrals (推荐明细, 一次点击/转化一行)
#[derive(DeriveIden)]
enum Referrals {
    Table,
    Id,
    ReferrerId,
    ReferredEmail,
    TrackingId,
    Converted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SweepstakesEntries {
    Table,
    Id,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Referrals::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Referrals::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Referrals::ReferrerId).uuid().null())
                    .col(ColumnDef::new(Referrals::ReferredEmail).string().not_null())
                    .col(ColumnDef::new(Referrals::TrackingId).string().null())
                    .col(
                        ColumnDef::new(Referrals::Converted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Referrals::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Referrals::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 同一个追踪ID只计一次
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_referrals_tracking_id")
                    .table(Referrals::Table)
                    .col(Referrals::TrackingId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_referrals_referrer_id")
                    .table(Referrals::Table)
                    .col(Referrals::ReferrerId)
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Referrals::Table)
                    .add_foreign_key(
                        TableForeignKey::new()
                            .name("fk_referrals_referrer")
                            .from_tbl(Referrals::Table)
                            .from_col(Referrals::ReferrerId)
                            .to_tbl(SweepstakesEntries::Table)
                            .to_col(SweepstakesEntries::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Referrals::Table).to_owned())
            .await?;
        Ok(())
    }
}
