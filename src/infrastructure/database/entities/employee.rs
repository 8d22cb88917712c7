//! Employee entity (aggregate root row)

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    /// Supplied by the caller, never generated
    #[sea_orm(primary_key, auto_increment = false)]
    pub employee_id: i32,

    pub name: String,

    pub dob: Date,

    pub manager_id: i32,

    /// Stored as a double; rounded to 2 fraction digits on load
    pub salary: f64,

    pub email_id: String,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::phone_number::Entity")]
    PhoneNumbers,
    #[sea_orm(has_one = "super::voter_id::Entity")]
    VoterId,
}

impl Related<super::phone_number::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PhoneNumbers.def()
    }
}

impl Related<super::voter_id::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VoterId.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
