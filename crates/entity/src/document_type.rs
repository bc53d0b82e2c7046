use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "document_type")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub kind: Kind,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Document,
    StageConfig,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Document => Entity::has_many(super::document::Entity).into(),
            Relation::StageConfig => Entity::has_many(super::stage_config::Entity).into(),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
pub enum Kind {
    #[sea_orm(string_value = "INSTALL")]
    Install,
    #[sea_orm(string_value = "REMOVE")]
    Remove,
    #[sea_orm(string_value = "WRITE_OFF")]
    WriteOff,
}

impl ActiveModelBehavior for ActiveModel {}
