use sea_orm::entity::prelude::*;

/// One row per (document, stage ordering), materialized from the type's
/// stage template at submission and on every draft edit.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "stage_chain")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub document_id: Uuid,
    pub ordering: i32,
    pub role: String,
    pub holder: Option<Uuid>,
    pub is_success: bool,
    /// Cleared in bulk on rejection; never set back. A rejected document
    /// gets a brand-new chain on the next submit/edit.
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::document::Entity",
        from = "Column::DocumentId",
        to = "super::document::Column::Id",
        on_delete = "Cascade"
    )]
    Document,
}

impl Related<super::document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Document.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
