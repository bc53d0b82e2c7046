use sea_orm::entity::prelude::*;

/// Per-type stage template. Authored by administrators, read-only to the
/// workflow engine. A role appears at most once per type's chain.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "stage_config")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub document_type_id: Uuid,
    pub ordering: i32,
    pub role: String,
    pub attached_head: bool,
    pub sms_confirm: bool,
    pub check_product: bool,
    pub check_main: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::document_type::Entity",
        from = "Column::DocumentTypeId",
        to = "super::document_type::Column::Id",
        on_delete = "Cascade"
    )]
    DocumentType,
}

impl Related<super::document_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DocumentType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
