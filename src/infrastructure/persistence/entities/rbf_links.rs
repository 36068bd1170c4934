use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only fee-bump replacement edge: old transaction -> replacement
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rbf_links")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub old_txid: String,
    #[sea_orm(column_type = "Text")]
    pub new_txid: String,
    #[sea_orm(column_type = "Text")]
    pub farm_wallet: String,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
