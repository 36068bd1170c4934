use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per (address, farm) running sub-threshold balance not yet paid.
/// The scale exceeds BTC's 8 digits because floor remainders are sub-satoshi.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accumulated_amounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub address: String,
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub farm_id: String,
    #[sea_orm(column_type = "Decimal(Some((30, 16)))")]
    pub amount: Decimal,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
