use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// UTXO ledger guarding against spending the same funding output twice.
/// A row is created when an output is first observed and its `processed`
/// flag flips to true once a payout spends it; it is never reused.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "farm_utxos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub txid: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub vout: i32,
    #[sea_orm(column_type = "Text")]
    pub farm_id: String,
    pub processed: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
