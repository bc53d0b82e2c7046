use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "document")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Human-facing document number, e.g. an act number from the registry.
    pub number: String,
    #[sea_orm(indexed)]
    pub document_type_id: Uuid,
    pub note: Option<String>,
    /// Ordering of the stage the document is currently waiting on.
    pub status: i32,
    pub is_draft: bool,
    pub is_finished: bool,
    pub is_returned: bool,
    /// Who must act next; null means anyone bearing the stage's role.
    pub current_holder: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    DocumentType,
    StageChain,
    Return,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::DocumentType => Entity::belongs_to(super::document_type::Entity)
                .from(Column::DocumentTypeId)
                .to(super::document_type::Column::Id)
                .into(),
            Relation::StageChain => Entity::has_many(super::stage_chain::Entity).into(),
            Relation::Return => Entity::has_many(super::document_return::Entity).into(),
        }
    }
}

impl Related<super::document_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DocumentType.def()
    }
}

impl Related<super::stage_chain::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StageChain.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
