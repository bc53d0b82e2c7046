use chrono::Utc;
use entity::{document, stage_chain, stage_config};
use sea_orm::sea_query::Expr;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use crate::chain::materialize_chain;
use crate::error::{WorkflowError, WorkflowResult};
use crate::options::{evaluate_gate, options_of, GateContext, StageOption};
use crate::role::Role;

/// Acting user as resolved by the identity provider.
#[derive(Clone, Debug)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
    /// Immediate superior; consumed by the `attached_head` option.
    pub chief_id: Option<Uuid>,
}

/// The stage a document is currently waiting on.
#[derive(Clone, Debug)]
pub struct StageView {
    pub ordering: i32,
    pub role: Role,
    pub holder: Option<Uuid>,
    pub options: Vec<StageOption>,
}

/// Route a draft into its approval chain. The chain is rebuilt from the
/// type's template; a type without one cannot be workflow-routed.
pub async fn submit(db: &DatabaseConnection, document_id: Uuid) -> WorkflowResult<document::Model> {
    let txn = db.begin().await?;
    let document = load_document(&txn, document_id).await?;
    if document.is_finished {
        return Err(WorkflowError::AlreadyFinished);
    }
    if document.status != 1 {
        return Err(WorkflowError::NotDraft);
    }
    materialize_chain(&txn, &document).await?;
    txn.commit().await?;
    Ok(document)
}

/// Approve the stage the document is waiting on and move it forward.
///
/// The whole transition happens in one transaction; on any failure nothing
/// is committed. The success flip on the chain row is a compare-and-swap so
/// two concurrent approvals of the same stage cannot both land.
pub async fn advance(
    db: &DatabaseConnection,
    document_id: Uuid,
    actor: &Actor,
    code_verified: bool,
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

    // Null holder means the stage is open to anyone bearing the role.
    if let Some(holder) = current.holder {
        if holder != actor.id {
            return Err(WorkflowError::NotAuthorized);
        }
    }

    // The first approver accepts a re-submission.
    let clear_returned = document.is_returned && document.status == 1;

    let config = stage_config::Entity::find()
        .filter(stage_config::Column::DocumentTypeId.eq(document.document_type_id))
        .filter(stage_config::Column::Role.eq(actor.role.as_str()))
        .filter(stage_config::Column::Ordering.eq(document.status))
        .one(&txn)
        .await?
        .ok_or(WorkflowError::StageNotConfigured)?;

    let outcome = evaluate_gate(&config, &GateContext { code_verified })?;

    let swapped = stage_chain::Entity::update_many()
        .col_expr(stage_chain::Column::IsSuccess, Expr::value(true))
        .col_expr(stage_chain::Column::Holder, Expr::value(actor.id))
        .filter(stage_chain::Column::Id.eq(current.id))
        .filter(stage_chain::Column::IsSuccess.eq(false))
        .exec(&txn)
        .await?;
    if swapped.rows_affected == 0 {
        return Err(WorkflowError::Conflict);
    }

    // Finished exactly when the completed ordering is the chain's maximum;
    // counting successes would misfire on gaps or reconfigured chains.
    let max_ordering = rows
        .last()
        .map(|row| row.ordering)
        .unwrap_or(current.ordering);
    let finished = current.ordering == max_ordering;

    let mut active: document::ActiveModel = document.clone().into();
    active.status = Set(current.ordering + 1);
    active.updated_at = Set(Utc::now().into());
    if finished {
        active.is_finished = Set(true);
    }
    if current.ordering == 1 {
        active.is_draft = Set(false);
    }
    if clear_returned {
        active.is_returned = Set(false);
    }

    if outcome.reassign_to_chief {
        if let Some(chief) = actor.chief_id {
            active.current_holder = Set(Some(chief));
            // Pin the next stage to the superior, not merely to a role.
            if let Some(next) = rows.iter().find(|row| row.ordering > current.ordering) {
                let pin = stage_chain::ActiveModel {
                    id: Set(next.id),
                    holder: Set(Some(chief)),
                    ..Default::default()
                };
                pin.update(&txn).await?;
            }
        }
    }

    let updated = active.update(&txn).await?;
    txn.commit().await?;
    Ok(updated)
}

/// The stage the document is waiting on, or `None` once it is finished or
/// has no active chain yet.
pub async fn current_stage(
    db: &DatabaseConnection,
    document_id: Uuid,
) -> WorkflowResult<Option<StageView>> {
    let document = load_document(db, document_id).await?;
    if document.is_finished {
        return Ok(None);
    }
    let row = stage_chain::Entity::find()
        .filter(stage_chain::Column::DocumentId.eq(document_id))
        .filter(stage_chain::Column::Ordering.eq(document.status))
        .filter(stage_chain::Column::IsActive.eq(true))
        .one(db)
        .await?;
    let Some(row) = row else {
        return Ok(None);
    };
    let config = stage_config::Entity::find()
        .filter(stage_config::Column::DocumentTypeId.eq(document.document_type_id))
        .filter(stage_config::Column::Role.eq(row.role.as_str()))
        .one(db)
        .await?;
    let options = config.as_ref().map(options_of).unwrap_or_default();
    Ok(Some(StageView {
        ordering: row.ordering,
        role: Role::parse(&row.role),
        holder: row.holder,
        options,
    }))
}

pub(crate) async fn load_document<C>(conn: &C, id: Uuid) -> WorkflowResult<document::Model>
where
    C: ConnectionTrait,
{
    document::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(WorkflowError::NotFound)
}

pub(crate) async fn active_chain<C>(
    conn: &C,
    document_id: Uuid,
) -> WorkflowResult<Vec<stage_chain::Model>>
where
    C: ConnectionTrait,
{
    Ok(stage_chain::Entity::find()
        .filter(stage_chain::Column::DocumentId.eq(document_id))
        .filter(stage_chain::Column::IsActive.eq(true))
        .order_by_asc(stage_chain::Column::Ordering)
        .all(conn)
        .await?)
}
