use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "scholarships")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    /// Free-form tag, e.g. "merit" or "financial"
    pub category: String,
    /// Informational text shown to students; not machine-checked
    #[sea_orm(column_type = "Text")]
    pub eligibility: String,
    pub amount: f64,
    pub start_date: Date,
    pub end_date: Date,
    pub min_cgpa: Option<f64>,
    pub income_limit: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::application::Entity")]
    Applications,
}

impl Related<super::application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Applications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// A scholarship is open while `start_date <= today <= end_date`
    pub fn is_open_on(&self, today: Date) -> bool {
        self.start_date <= today && today <= self.end_date
    }
}
