use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 抽奖报名实体
/// 说明:
/// - 每个活动每个邮箱只允许一行, 由 (sweepstakes_id, email) 唯一索引保证
/// - entry_count 初始为 1, referral_count 初始为 0, 只通过原子自增修改
/// - affiliate_id 是联盟网络侧的推荐人标识, 回调按它定位报名行
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "sweepstakes_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// 活动ID (指向 sweepstakes.id)
    pub sweepstakes_id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub terms_accepted: bool,
    /// 报名次数, 当前规则下恒为 1
    pub entry_count: i32,
    /// 成功推荐的次数
    pub referral_count: i32,
    /// 联盟网络分配的推荐人ID
    pub affiliate_id: Option<String>,
    /// 生成的分享链接
    pub referral_url: Option<String>,
    /// 邮件平台订阅者ID (订阅成功后回填)
    pub beehiiv_subscriber_id: Option<String>,
    pub beehiiv_synced: bool,
    pub beehiiv_synced_at: Option<DateTime<Utc>>,
    pub is_winner: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
