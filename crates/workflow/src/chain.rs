use entity::{document, stage_chain, stage_config};
use sea_orm::ActiveValue::Set;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::error::{WorkflowError, WorkflowResult};

/// Recreate the document's stage chain from its type's template: one row per
/// configured stage, none successful, all active, no holder.
///
/// Prior rows are discarded in full; partial reuse would leave stale
/// orderings behind after a type change. Runs on submission and on every
/// edit of a document still sitting at stage 1.
pub async fn materialize_chain<C>(conn: &C, document: &document::Model) -> WorkflowResult<()>
where
    C: ConnectionTrait,
{
    let configs = stage_config::Entity::find()
        .filter(stage_config::Column::DocumentTypeId.eq(document.document_type_id))
        .order_by_asc(stage_config::Column::Ordering)
        .all(conn)
        .await?;
    if configs.is_empty() {
        return Err(WorkflowError::ConfigurationMissing);
    }

    stage_chain::Entity::delete_many()
        .filter(stage_chain::Column::DocumentId.eq(document.id))
        .exec(conn)
        .await?;

    let rows = configs.iter().map(|config| stage_chain::ActiveModel {
        id: Set(Uuid::new_v4()),
        document_id: Set(document.id),
        ordering: Set(config.ordering),
        role: Set(config.role.clone()),
        holder: Set(None),
        is_success: Set(false),
        is_active: Set(true),
    });
    stage_chain::Entity::insert_many(rows)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}
