use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Write-once audit record of one NFT's computed payout period.
/// `owners` holds the per-window breakdown as JSON.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "nft_statistics")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub denom_id: String,
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub nft_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub period_end: ChronoDateTimeUtc,
    #[sea_orm(column_type = "Text")]
    pub farm_id: String,
    pub period_start: ChronoDateTimeUtc,
    #[sea_orm(column_type = "Decimal(Some((30, 16)))")]
    pub gross_reward: Decimal,
    #[sea_orm(column_type = "Decimal(Some((30, 16)))")]
    pub maintenance_fee: Decimal,
    #[sea_orm(column_type = "Decimal(Some((30, 16)))")]
    pub platform_fee: Decimal,
    pub owners: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
