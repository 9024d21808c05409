use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Yearly budget ledger row
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "finance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub year: i32,
    pub budget_amount: f64,
    pub allocated_amount: f64,
    /// Always `max(0, budget_amount - allocated_amount)`
    pub balance_amount: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
