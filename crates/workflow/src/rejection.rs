use chrono::Utc;
use entity::{document, document_return, stage_chain};
use sea_orm::sea_query::Expr;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait,
};
use uuid::Uuid;

use crate::engine::{active_chain, load_document, Actor};
use crate::error::{WorkflowError, WorkflowResult};
use crate::role::Role;

/// Reject the document at its current stage: record an auditable return,
/// send the document back to stage 1 flagged as returned, and structurally
/// retire the chain. A later submit/edit materializes a fresh one.
pub async fn reject(
    db: &DatabaseConnection,
    document_id: Uuid,
    actor: &Actor,
    note: &str,
) -> WorkflowResult<document::Model> {
    let txn = db.begin().await?;
    let document = load_document(&txn, document_id).await?;
    if document.is_finished {
        return Err(WorkflowError::AlreadyFinished);
    }

    let rows = active_chain(&txn, document_id).await?;
    let current = rows
        .iter()
        .find(|row| row.ordering == document.status)
        .ok_or(WorkflowError::ConfigurationMissing)?;
    if Role::parse(&current.role) != actor.role {
        return Err(WorkflowError::NotAuthorized);
    }

    // Returns are routed to whoever completed stage 1, not to the
    // immediately preceding stage.
    let to_user = rows
        .iter()
        .find(|row| row.ordering == 1)
        .and_then(|row| row.holder);

    document_return::ActiveModel {
        id: Set(Uuid::new_v4()),
        document_id: Set(document.id),
        from_user: Set(actor.id),
        to_user: Set(to_user),
        note: Set(note.to_string()),
        stage_chain_id: Set(current.id),
        created_at: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;

    stage_chain::Entity::delete_many()
        .filter(stage_chain::Column::DocumentId.eq(document.id))
        .filter(stage_chain::Column::Ordering.gt(current.ordering))
        .exec(&txn)
        .await?;

    let reassigned = stage_chain::Entity::update_many()
        .col_expr(stage_chain::Column::Holder, Expr::value(actor.id))
        .filter(stage_chain::Column::Id.eq(current.id))
        .filter(stage_chain::Column::IsActive.eq(true))
        .exec(&txn)
        .await?;
    if reassigned.rows_affected == 0 {
        return Err(WorkflowError::Conflict);
    }

    stage_chain::Entity::update_many()
        .col_expr(stage_chain::Column::IsActive, Expr::value(false))
        .filter(stage_chain::Column::DocumentId.eq(document.id))
        .exec(&txn)
        .await?;

    let mut active: document::ActiveModel = document.into();
    active.is_returned = Set(true);
    active.status = Set(1);
    active.current_holder = Set(to_user);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
}
