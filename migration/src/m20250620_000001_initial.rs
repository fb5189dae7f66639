use sea_orm_migration::prelude::*;

/// Sweepstakes (抽奖活动配置表)
#[derive(DeriveIden)]
enum Sweepstakes {
    Table,
    Id,
    Title,
    Description,
    PrizeInfo,
    PrizeValueCents,
    DrawType,
    EntriesToDraw,
    BeehiivTag,
    IsActive,
    StartDate,
    EndDate,
    CreatedAt,
    UpdatedAt,
}

/// Sweepstakes Entries (报名表, 每个活动每个邮箱一行)
#[derive(DeriveIden)]
enum SweepstakesEntries {
    Table,
    Id,
    SweepstakesId,
    Email,
    FirstName,
    LastName,
    TermsAccepted,
    EntryCount,
    ReferralCount,
    AffiliateId,
    ReferralUrl,
    BeehiivSubscriberId,
    BeehiivSynced,
    BeehiivSyncedAt,
    IsWinner,
    CreatedAt,
    UpdatedAt,
}

/// Form Submissions (原始表单提交审计表)
#[derive(DeriveIden)]
enum FormSubmissions {
    Table,
    Id,
    SubmissionData,
    BeehiivId,
    Processed,
    CreatedAt,
    UpdatedAt,
}

/// Webhook Configs (中继地址配置, 全局一行)
#[derive(DeriveIden)]
enum WebhookConfigs {
    Table,
    Id,
    RelayUrl,
    CreatedAt,
    UpdatedAt,
}

/// Legal Documents (法律文档)
#[derive(DeriveIden)]
enum LegalDocuments {
    Table,
    Id,
    DocType,
    Title,
    Content,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 活动表
        manager
            .create_table(
                Table::create()
                    .table(Sweepstakes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sweepstakes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sweepstakes::Title).string().not_null())
                    .col(ColumnDef::new(Sweepstakes::Description).text().null())
                    .col(ColumnDef::new(Sweepstakes::PrizeInfo).text().null())
                    .col(
                        ColumnDef::new(Sweepstakes::PrizeValueCents)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Sweepstakes::DrawType)
                            .string()
                            .not_null()
                            .default("automatic"),
                    )
                    .col(
                        ColumnDef::new(Sweepstakes::EntriesToDraw)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Sweepstakes::BeehiivTag).string().null())
                    .col(
                        ColumnDef::new(Sweepstakes::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Sweepstakes::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sweepstakes::EndDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sweepstakes::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Sweepstakes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 报名表
        manager
            .create_table(
                Table::create()
                    .table(SweepstakesEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SweepstakesEntries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SweepstakesEntries::SweepstakesId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SweepstakesEntries::Email).string().not_null())
                    .col(
                        ColumnDef::new(SweepstakesEntries::FirstName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SweepstakesEntries::LastName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SweepstakesEntries::TermsAccepted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(SweepstakesEntries::EntryCount)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(SweepstakesEntries::ReferralCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SweepstakesEntries::AffiliateId)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(SweepstakesEntries::ReferralUrl).text().null())
                    .col(
                        ColumnDef::new(SweepstakesEntries::BeehiivSubscriberId)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SweepstakesEntries::BeehiivSynced)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(SweepstakesEntries::BeehiivSyncedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SweepstakesEntries::IsWinner)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(SweepstakesEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SweepstakesEntries::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 同一活动同一邮箱只允许一行
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_sweepstakes_entries_sweeps_email")
                    .table(SweepstakesEntries::Table)
                    .col(SweepstakesEntries::SweepstakesId)
                    .col(SweepstakesEntries::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 回调按 affiliate_id 定位报名行
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sweepstakes_entries_affiliate_id")
                    .table(SweepstakesEntries::Table)
                    .col(SweepstakesEntries::AffiliateId)
                    .to_owned(),
            )
            .await?;

        // 分享链接生成按邮箱定位报名行
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sweepstakes_entries_email")
                    .table(SweepstakesEntries::Table)
                    .col(SweepstakesEntries::Email)
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(SweepstakesEntries::Table)
                    .add_foreign_key(
                        TableForeignKey::new()
                            .name("fk_sweepstakes_entries_sweepstakes")
                            .from_tbl(SweepstakesEntries::Table)
                            .from_col(SweepstakesEntries::SweepstakesId)
                            .to_tbl(Sweepstakes::Table)
                            .to_col(Sweepstakes::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 原始表单提交审计表
        manager
            .create_table(
                Table::create()
                    .table(FormSubmissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FormSubmissions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FormSubmissions::SubmissionData)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FormSubmissions::BeehiivId).string().null())
                    .col(
                        ColumnDef::new(FormSubmissions::Processed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(FormSubmissions::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(FormSubmissions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 管理后台按处理状态过滤
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_form_submissions_processed")
                    .table(FormSubmissions::Table)
                    .col(FormSubmissions::Processed)
                    .to_owned(),
            )
            .await?;

        // 中继配置表
        manager
            .create_table(
                Table::create()
                    .table(WebhookConfigs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WebhookConfigs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WebhookConfigs::RelayUrl).text().null())
                    .col(
                        ColumnDef::new(WebhookConfigs::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WebhookConfigs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 法律文档表
        manager
            .create_table(
                Table::create()
                    .table(LegalDocuments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LegalDocuments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LegalDocuments::DocType).string().not_null())
                    .col(ColumnDef::new(LegalDocuments::Title).string().not_null())
                    .col(ColumnDef::new(LegalDocuments::Content).text().not_null())
                    .col(
                        ColumnDef::new(LegalDocuments::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(LegalDocuments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 每种文档一行
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_legal_documents_doc_type")
                    .table(LegalDocuments::Table)
                    .col(LegalDocuments::DocType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LegalDocuments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WebhookConfigs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FormSubmissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SweepstakesEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sweepstakes::Table).to_owned())
            .await?;
        Ok(())
    }
}
