//! Users table (minimal entity).
//!
//! Statement entries reference users by `id`, a uuid string assigned at
//! creation. The `email` column is the login identifier and is unique.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::statements::Entity")]
    Statements,
}

impl Related<super::statements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Statements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
