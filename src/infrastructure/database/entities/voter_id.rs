//! Voter id entity, at most one row per employee

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "voter_ids")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub voter_id: i32,

    #[sea_orm(unique)]
    pub employee_id: i32,

    #[sea_orm(nullable)]
    pub voter_number: Option<String>,

    #[sea_orm(nullable)]
    pub city: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::EmployeeId"
    )]
    Employee,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
