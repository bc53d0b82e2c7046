use std::sync::Arc;

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use async_graphql::{
    Context, EmptySubscription, Enum, Error, ErrorExtensions, InputObject, Object, Schema,
    SimpleObject, ID,
};
use chrono::{DateTime, Utc};
use entity::{
    confirmation_code, document, document_return, document_type, employee, stage_chain,
    stage_config,
};
use rand::Rng;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;
use workflow::{materialize_chain, Role, StageOption, WorkflowError};

use crate::auth::{issue_token, AuthConfig, CurrentUser};

pub struct AppSchema(pub Schema<QueryRoot, MutationRoot, EmptySubscription>);

pub fn build_schema(db: Arc<DatabaseConnection>, auth: Arc<AuthConfig>) -> AppSchema {
    let schema = Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(db)
        .data(auth)
        .finish();
    AppSchema(schema)
}

pub struct QueryRoot;
pub struct MutationRoot;

const MAX_DOCUMENTS_PAGE: i32 = 100;
const MAX_NOTE_LEN: usize = 2000;

#[Object]
impl QueryRoot {
    async fn assets(&self) -> AssetsQuery {
        AssetsQuery
    }
}

#[Object]
impl MutationRoot {
    async fn assets(&self) -> AssetsMutation {
        AssetsMutation
    }
}

#[derive(Default)]
pub struct AssetsQuery;

#[derive(Default)]
pub struct AssetsMutation;

#[Object]
impl AssetsQuery {
    async fn me(&self, ctx: &Context<'_>) -> async_graphql::Result<EmployeeNode> {
        let current = require_user(ctx)?;
        let db = database(ctx)?;
        let model = load_employee(db.as_ref(), current.user_id).await?;
        Ok(model.into())
    }

    async fn employees(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        offset: Option<i32>,
    ) -> async_graphql::Result<Vec<EmployeeNode>> {
        require_admin(ctx)?;
        let db = database(ctx)?;
        let limit = first.unwrap_or(50).clamp(1, 200) as u64;
        let skip = offset.unwrap_or(0).max(0) as u64;
        let records = employee::Entity::find()
            .order_by_asc(employee::Column::Email)
            .limit(limit)
            .offset(skip)
            .all(db.as_ref())
            .await
            .map_err(db_error)?;
        Ok(records.into_iter().map(EmployeeNode::from).collect())
    }

    #[graphql(name = "documentTypes")]
    async fn document_types(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Vec<DocumentTypeNode>> {
        require_user(ctx)?;
        let db = database(ctx)?;
        let records = document_type::Entity::find()
            .order_by_asc(document_type::Column::Name)
            .all(db.as_ref())
            .await
            .map_err(db_error)?;
        Ok(records.into_iter().map(DocumentTypeNode::from).collect())
    }

    /// Ordered stage template of a document type.
    #[graphql(name = "stageTemplate")]
    async fn stage_template(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "documentTypeId")] document_type_id: ID,
    ) -> async_graphql::Result<Vec<StageConfigNode>> {
        require_user(ctx)?;
        let db = database(ctx)?;
        let type_id = parse_uuid(&document_type_id)?;
        let records = stage_config::Entity::find()
            .filter(stage_config::Column::DocumentTypeId.eq(type_id))
            .order_by_asc(stage_config::Column::Ordering)
            .all(db.as_ref())
            .await
            .map_err(db_error)?;
        Ok(records.into_iter().map(StageConfigNode::from).collect())
    }

    async fn document(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<Option<DocumentNode>> {
        require_user(ctx)?;
        let db = database(ctx)?;
        let document_id = parse_uuid(&id)?;
        let record = document::Entity::find_by_id(document_id)
            .one(db.as_ref())
            .await
            .map_err(db_error)?;
        Ok(record.map(DocumentNode::from))
    }

    async fn documents(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        offset: Option<i32>,
        filter: Option<DocumentFilter>,
    ) -> async_graphql::Result<Vec<DocumentNode>> {
        require_user(ctx)?;
        let db = database(ctx)?;
        let requested = first.unwrap_or(50);
        if requested > MAX_DOCUMENTS_PAGE {
            return Err(error_with_code(
                "LIMIT_EXCEEDED",
                format!("first must not exceed {}", MAX_DOCUMENTS_PAGE),
            ));
        }
        let limit = requested.clamp(1, MAX_DOCUMENTS_PAGE) as u64;
        let skip = offset.unwrap_or(0).max(0) as u64;

        let mut query = document::Entity::find();
        if let Some(filter) = filter {
            if let Some(type_id) = filter.document_type_id {
                query = query.filter(document::Column::DocumentTypeId.eq(parse_uuid(&type_id)?));
            }
            if let Some(finished) = filter.is_finished {
                query = query.filter(document::Column::IsFinished.eq(finished));
            }
            if let Some(returned) = filter.is_returned {
                query = query.filter(document::Column::IsReturned.eq(returned));
            }
            if let Some(q) = sanitize_optional_filter(filter.q) {
                let pattern = format!("%{}%", q);
                query = query.filter(
                    Condition::any()
                        .add(document::Column::Number.like(pattern.clone()))
                        .add(document::Column::Note.like(pattern)),
                );
            }
        }
        let records = query
            .order_by_desc(document::Column::UpdatedAt)
            .limit(limit)
            .offset(skip)
            .all(db.as_ref())
            .await
            .map_err(db_error)?;
        Ok(records.into_iter().map(DocumentNode::from).collect())
    }

    /// The stage a document is waiting on; null for drafts without a chain
    /// and for finished documents.
    #[graphql(name = "currentStage")]
    async fn current_stage(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "documentId")] document_id: ID,
    ) -> async_graphql::Result<Option<StageViewNode>> {
        require_user(ctx)?;
        let db = database(ctx)?;
        let document_id = parse_uuid(&document_id)?;
        let view = workflow::current_stage(db.as_ref(), document_id)
            .await
            .map_err(workflow_error)?;
        Ok(view.map(StageViewNode::from))
    }

    #[graphql(name = "documentChain")]
    async fn document_chain(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "documentId")] document_id: ID,
    ) -> async_graphql::Result<Vec<StageChainNode>> {
        require_user(ctx)?;
        let db = database(ctx)?;
        let document_id = parse_uuid(&document_id)?;
        let records = stage_chain::Entity::find()
            .filter(stage_chain::Column::DocumentId.eq(document_id))
            .order_by_asc(stage_chain::Column::Ordering)
            .all(db.as_ref())
            .await
            .map_err(db_error)?;
        Ok(records.into_iter().map(StageChainNode::from).collect())
    }

    #[graphql(name = "documentReturns")]
    async fn document_returns(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "documentId")] document_id: ID,
    ) -> async_graphql::Result<Vec<DocumentReturnNode>> {
        require_user(ctx)?;
        let db = database(ctx)?;
        let document_id = parse_uuid(&document_id)?;
        let records = document_return::Entity::find()
            .filter(document_return::Column::DocumentId.eq(document_id))
            .order_by_desc(document_return::Column::CreatedAt)
            .all(db.as_ref())
            .await
            .map_err(db_error)?;
        Ok(records.into_iter().map(DocumentReturnNode::from).collect())
    }
}

#[Object]
impl AssetsMutation {
    async fn login(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
    ) -> async_graphql::Result<LoginPayload> {
        let auth = auth_config(ctx)?;
        let db = database(ctx)?;
        let normalized = email.trim().to_lowercase();
        let record = employee::Entity::find()
            .filter(employee::Column::Email.eq(normalized))
            .one(db.as_ref())
            .await
            .map_err(db_error)?;
        let Some(record) = record else {
            return Ok(LoginPayload::denied("Invalid credentials"));
        };
        if !record.is_active {
            return Ok(LoginPayload::denied("Account disabled"));
        }
        let Some(password_hash) = record.password_hash.clone() else {
            return Ok(LoginPayload::denied("Invalid credentials"));
        };
        let parsed_hash = PasswordHash::new(&password_hash)
            .map_err(|_| error_with_code("INTERNAL", "Invalid password hash"))?;
        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_err()
        {
            return Ok(LoginPayload::denied("Invalid credentials"));
        }
        let role = Role::parse(&record.role);
        let token = issue_token(record.id, &role, &auth)
            .map_err(|_| error_with_code("INTERNAL", "Failed to issue session token"))?;
        Ok(LoginPayload {
            ok: true,
            token: Some(token),
            user: Some(record.into()),
            error: None,
        })
    }

    #[graphql(name = "createDocument")]
    async fn create_document(
        &self,
        ctx: &Context<'_>,
        input: NewDocumentInput,
    ) -> async_graphql::Result<DocumentNode> {
        let current = require_user(ctx)?;
        let db = database(ctx)?;
        let number = validate_number(&input.number)?;
        let note = validate_note(input.note)?;
        let type_id = parse_uuid(&input.document_type_id)?;
        document_type::Entity::find_by_id(type_id)
            .one(db.as_ref())
            .await
            .map_err(db_error)?
            .ok_or_else(|| error_with_code("NOT_FOUND", "Document type not found"))?;

        let now: DateTimeWithTimeZone = Utc::now().into();
        let model = document::ActiveModel {
            id: Set(Uuid::new_v4()),
            number: Set(number),
            document_type_id: Set(type_id),
            note: Set(note),
            status: Set(1),
            is_draft: Set(true),
            is_finished: Set(false),
            is_returned: Set(false),
            current_holder: Set(None),
            created_by: Set(Some(current.user_id)),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        }
        .insert(db.as_ref())
        .await
        .map_err(db_error)?;
        Ok(model.into())
    }

    /// Edit a draft. Documents past stage 1 are immutable; if the draft was
    /// already routed its chain is rebuilt from the current template.
    #[graphql(name = "updateDocument")]
    async fn update_document(
        &self,
        ctx: &Context<'_>,
        input: UpdateDocumentInput,
    ) -> async_graphql::Result<DocumentNode> {
        require_user(ctx)?;
        let db = database(ctx)?;
        let document_id = parse_uuid(&input.id)?;

        let txn = db.begin().await.map_err(db_error)?;
        let record = document::Entity::find_by_id(document_id)
            .one(&txn)
            .await
            .map_err(db_error)?
            .ok_or_else(|| error_with_code("NOT_FOUND", "Document not found"))?;
        if record.is_finished {
            return Err(workflow_error(WorkflowError::AlreadyFinished));
        }
        if record.status != 1 {
            return Err(workflow_error(WorkflowError::NotDraft));
        }

        let mut active: document::ActiveModel = record.clone().into();
        if let Some(number) = input.number {
            active.number = Set(validate_number(&number)?);
        }
        if let Some(note) = input.note {
            active.note = Set(validate_note(Some(note))?);
        }
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await.map_err(db_error)?;

        let routed = stage_chain::Entity::find()
            .filter(stage_chain::Column::DocumentId.eq(document_id))
            .one(&txn)
            .await
            .map_err(db_error)?
            .is_some();
        if routed {
            materialize_chain(&txn, &updated)
                .await
                .map_err(workflow_error)?;
        }
        txn.commit().await.map_err(db_error)?;
        Ok(updated.into())
    }

    #[graphql(name = "submitDocument")]
    async fn submit_document(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<DocumentNode> {
        require_user(ctx)?;
        let db = database(ctx)?;
        let document_id = parse_uuid(&id)?;
        let model = workflow::submit(db.as_ref(), document_id)
            .await
            .map_err(workflow_error)?;
        info!(document = %document_id, "document submitted for approval");
        Ok(model.into())
    }

    #[graphql(name = "advanceDocument")]
    async fn advance_document(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<DocumentNode> {
        let current = require_user(ctx)?;
        let db = database(ctx)?;
        let document_id = parse_uuid(&id)?;
        let code_verified =
            code_was_verified(db.as_ref(), document_id, confirmation_code::Kind::Approve).await?;
        let model = workflow::advance(db.as_ref(), document_id, &current.actor(), code_verified)
            .await
            .map_err(workflow_error)?;
        info!(
            document = %document_id,
            status = model.status,
            finished = model.is_finished,
            "document advanced"
        );
        Ok(model.into())
    }

    #[graphql(name = "rejectDocument")]
    async fn reject_document(
        &self,
        ctx: &Context<'_>,
        id: ID,
        note: String,
    ) -> async_graphql::Result<DocumentNode> {
        let current = require_user(ctx)?;
        let db = database(ctx)?;
        let document_id = parse_uuid(&id)?;
        let trimmed = note.trim();
        if trimmed.is_empty() {
            return Err(error_with_code("VALIDATION", "A return note is required"));
        }
        if trimmed.len() > MAX_NOTE_LEN {
            return Err(error_with_code("VALIDATION", "Return note is too long"));
        }
        let model = workflow::reject(db.as_ref(), document_id, &current.actor(), trimmed)
            .await
            .map_err(workflow_error)?;
        info!(document = %document_id, "document returned to submitter");
        Ok(model.into())
    }

    /// Issue a one-time code for an approval or rejection. Delivery is the
    /// SMS/Telegram gateway's concern; this service only records the code.
    #[graphql(name = "requestCode")]
    async fn request_code(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "documentId")] document_id: ID,
        kind: CodeKind,
    ) -> async_graphql::Result<bool> {
        require_user(ctx)?;
        let db = database(ctx)?;
        let document_id = parse_uuid(&document_id)?;
        document::Entity::find_by_id(document_id)
            .one(db.as_ref())
            .await
            .map_err(db_error)?
            .ok_or_else(|| error_with_code("NOT_FOUND", "Document not found"))?;

        let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000));
        confirmation_code::ActiveModel {
            id: Set(Uuid::new_v4()),
            document_id: Set(document_id),
            kind: Set(kind.into()),
            code: Set(code),
            is_verified: Set(false),
            created_at: Set(Utc::now().into()),
        }
        .insert(db.as_ref())
        .await
        .map_err(db_error)?;
        info!(document = %document_id, kind = kind.as_str(), "confirmation code issued");
        Ok(true)
    }

    #[graphql(name = "confirmCode")]
    async fn confirm_code(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "documentId")] document_id: ID,
        kind: CodeKind,
        code: String,
    ) -> async_graphql::Result<bool> {
        require_user(ctx)?;
        let db = database(ctx)?;
        let document_id = parse_uuid(&document_id)?;
        let record = confirmation_code::Entity::find()
            .filter(confirmation_code::Column::DocumentId.eq(document_id))
            .filter(confirmation_code::Column::Kind.eq(confirmation_code::Kind::from(kind)))
            .order_by_desc(confirmation_code::Column::CreatedAt)
            .one(db.as_ref())
            .await
            .map_err(db_error)?;
        let Some(record) = record else {
            return Err(error_with_code("VALIDATION", "No code was requested"));
        };
        if record.code != code.trim() {
            return Err(error_with_code("VALIDATION", "Invalid confirmation code"));
        }
        let mut active: confirmation_code::ActiveModel = record.into();
        active.is_verified = Set(true);
        active.update(db.as_ref()).await.map_err(db_error)?;
        Ok(true)
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum DocumentTypeKind {
    #[graphql(name = "INSTALL")]
    Install,
    #[graphql(name = "REMOVE")]
    Remove,
    #[graphql(name = "WRITE_OFF")]
    WriteOff,
}

impl From<document_type::Kind> for DocumentTypeKind {
    fn from(kind: document_type::Kind) -> Self {
        match kind {
            document_type::Kind::Install => DocumentTypeKind::Install,
            document_type::Kind::Remove => DocumentTypeKind::Remove,
            document_type::Kind::WriteOff => DocumentTypeKind::WriteOff,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum CodeKind {
    #[graphql(name = "APPROVE")]
    Approve,
    #[graphql(name = "REJECT")]
    Reject,
}

impl CodeKind {
    fn as_str(self) -> &'static str {
        match self {
            CodeKind::Approve => "APPROVE",
            CodeKind::Reject => "REJECT",
        }
    }
}

impl From<CodeKind> for confirmation_code::Kind {
    fn from(kind: CodeKind) -> Self {
        match kind {
            CodeKind::Approve => confirmation_code::Kind::Approve,
            CodeKind::Reject => confirmation_code::Kind::Reject,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum StageOptionKind {
    #[graphql(name = "ATTACHED_HEAD")]
    AttachedHead,
    #[graphql(name = "SMS_CONFIRM")]
    SmsConfirm,
    #[graphql(name = "CHECK_PRODUCT")]
    CheckProduct,
    #[graphql(name = "CHECK_MAIN")]
    CheckMain,
}

impl From<StageOption> for StageOptionKind {
    fn from(option: StageOption) -> Self {
        match option {
            StageOption::AttachedHead => StageOptionKind::AttachedHead,
            StageOption::SmsConfirm => StageOptionKind::SmsConfirm,
            StageOption::CheckProduct => StageOptionKind::CheckProduct,
            StageOption::CheckMain => StageOptionKind::CheckMain,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Employee")]
pub struct EmployeeNode {
    pub id: ID,
    pub email: String,
    #[graphql(name = "displayName")]
    pub display_name: String,
    pub role: String,
    #[graphql(name = "chiefId")]
    pub chief_id: Option<ID>,
    #[graphql(name = "isActive")]
    pub is_active: bool,
}

impl From<employee::Model> for EmployeeNode {
    fn from(model: employee::Model) -> Self {
        Self {
            id: ID::from(model.id.to_string()),
            email: model.email,
            display_name: model.display_name,
            role: model.role,
            chief_id: model.chief_id.map(|id| ID::from(id.to_string())),
            is_active: model.is_active,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "DocumentType")]
pub struct DocumentTypeNode {
    pub id: ID,
    pub name: String,
    pub kind: DocumentTypeKind,
}

impl From<document_type::Model> for DocumentTypeNode {
    fn from(model: document_type::Model) -> Self {
        Self {
            id: ID::from(model.id.to_string()),
            name: model.name,
            kind: model.kind.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "StageConfig")]
pub struct StageConfigNode {
    pub id: ID,
    pub ordering: i32,
    pub role: String,
    #[graphql(name = "attachedHead")]
    pub attached_head: bool,
    #[graphql(name = "smsConfirm")]
    pub sms_confirm: bool,
    #[graphql(name = "checkProduct")]
    pub check_product: bool,
    #[graphql(name = "checkMain")]
    pub check_main: bool,
}

impl From<stage_config::Model> for StageConfigNode {
    fn from(model: stage_config::Model) -> Self {
        Self {
            id: ID::from(model.id.to_string()),
            ordering: model.ordering,
            role: model.role,
            attached_head: model.attached_head,
            sms_confirm: model.sms_confirm,
            check_product: model.check_product,
            check_main: model.check_main,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Document")]
pub struct DocumentNode {
    pub id: ID,
    pub number: String,
    #[graphql(name = "documentTypeId")]
    pub document_type_id: ID,
    pub note: Option<String>,
    pub status: i32,
    #[graphql(name = "isDraft")]
    pub is_draft: bool,
    #[graphql(name = "isFinished")]
    pub is_finished: bool,
    #[graphql(name = "isReturned")]
    pub is_returned: bool,
    #[graphql(name = "currentHolder")]
    pub current_holder: Option<ID>,
    #[graphql(name = "createdBy")]
    pub created_by: Option<ID>,
    #[graphql(name = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[graphql(name = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<document::Model> for DocumentNode {
    fn from(model: document::Model) -> Self {
        Self {
            id: ID::from(model.id.to_string()),
            number: model.number,
            document_type_id: ID::from(model.document_type_id.to_string()),
            note: model.note,
            status: model.status,
            is_draft: model.is_draft,
            is_finished: model.is_finished,
            is_returned: model.is_returned,
            current_holder: model.current_holder.map(|id| ID::from(id.to_string())),
            created_by: model.created_by.map(|id| ID::from(id.to_string())),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "StageChainEntry")]
pub struct StageChainNode {
    pub id: ID,
    pub ordering: i32,
    pub role: String,
    pub holder: Option<ID>,
    #[graphql(name = "isSuccess")]
    pub is_success: bool,
    #[graphql(name = "isActive")]
    pub is_active: bool,
}

impl From<stage_chain::Model> for StageChainNode {
    fn from(model: stage_chain::Model) -> Self {
        Self {
            id: ID::from(model.id.to_string()),
            ordering: model.ordering,
            role: model.role,
            holder: model.holder.map(|id| ID::from(id.to_string())),
            is_success: model.is_success,
            is_active: model.is_active,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "StageView")]
pub struct StageViewNode {
    pub ordering: i32,
    pub role: String,
    pub holder: Option<ID>,
    pub options: Vec<StageOptionKind>,
}

impl From<workflow::StageView> for StageViewNode {
    fn from(view: workflow::StageView) -> Self {
        Self {
            ordering: view.ordering,
            role: view.role.as_str().to_string(),
            holder: view.holder.map(|id| ID::from(id.to_string())),
            options: view.options.into_iter().map(StageOptionKind::from).collect(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "DocumentReturn")]
pub struct DocumentReturnNode {
    pub id: ID,
    #[graphql(name = "documentId")]
    pub document_id: ID,
    #[graphql(name = "fromUser")]
    pub from_user: ID,
    #[graphql(name = "toUser")]
    pub to_user: Option<ID>,
    pub note: String,
    #[graphql(name = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<document_return::Model> for DocumentReturnNode {
    fn from(model: document_return::Model) -> Self {
        Self {
            id: ID::from(model.id.to_string()),
            document_id: ID::from(model.document_id.to_string()),
            from_user: ID::from(model.from_user.to_string()),
            to_user: model.to_user.map(|id| ID::from(id.to_string())),
            note: model.note,
            created_at: model.created_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct LoginPayload {
    pub ok: bool,
    pub token: Option<String>,
    pub user: Option<EmployeeNode>,
    pub error: Option<String>,
}

impl LoginPayload {
    fn denied(message: &str) -> Self {
        Self {
            ok: false,
            token: None,
            user: None,
            error: Some(message.to_string()),
        }
    }
}

#[derive(Clone, Debug, InputObject)]
pub struct NewDocumentInput {
    pub number: String,
    #[graphql(name = "documentTypeId")]
    pub document_type_id: ID,
    pub note: Option<String>,
}

#[derive(Clone, Debug, InputObject)]
pub struct UpdateDocumentInput {
    pub id: ID,
    pub number: Option<String>,
    pub note: Option<String>,
}

#[derive(Clone, Debug, InputObject)]
pub struct DocumentFilter {
    #[graphql(name = "documentTypeId")]
    pub document_type_id: Option<ID>,
    #[graphql(name = "isFinished")]
    pub is_finished: Option<bool>,
    #[graphql(name = "isReturned")]
    pub is_returned: Option<bool>,
    pub q: Option<String>,
}

async fn code_was_verified(
    db: &DatabaseConnection,
    document_id: Uuid,
    kind: confirmation_code::Kind,
) -> async_graphql::Result<bool> {
    let record = confirmation_code::Entity::find()
        .filter(confirmation_code::Column::DocumentId.eq(document_id))
        .filter(confirmation_code::Column::Kind.eq(kind))
        .order_by_desc(confirmation_code::Column::CreatedAt)
        .one(db)
        .await
        .map_err(db_error)?;
    Ok(record.map(|r| r.is_verified).unwrap_or(false))
}

async fn load_employee(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> async_graphql::Result<employee::Model> {
    employee::Entity::find_by_id(user_id)
        .one(db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| error_with_code("NOT_FOUND", "Employee not found"))
}

fn database(ctx: &Context<'_>) -> async_graphql::Result<Arc<DatabaseConnection>> {
    ctx.data::<Arc<DatabaseConnection>>()
        .cloned()
        .map_err(|_| error_with_code("INTERNAL", "Missing database connection"))
}

fn auth_config(ctx: &Context<'_>) -> async_graphql::Result<Arc<AuthConfig>> {
    ctx.data::<Arc<AuthConfig>>()
        .cloned()
        .map_err(|_| error_with_code("INTERNAL", "Missing auth configuration"))
}

fn current_user(ctx: &Context<'_>) -> async_graphql::Result<CurrentUser> {
    ctx.data::<CurrentUser>()
        .cloned()
        .map_err(|_| error_with_code("UNAUTHENTICATED", "Login required"))
}

fn require_user(ctx: &Context<'_>) -> async_graphql::Result<CurrentUser> {
    current_user(ctx)
}

fn require_admin(ctx: &Context<'_>) -> async_graphql::Result<CurrentUser> {
    let user = current_user(ctx)?;
    if user.is_admin() {
        Ok(user)
    } else {
        Err(error_with_code("FORBIDDEN", "Insufficient permissions"))
    }
}

fn parse_uuid(id: &ID) -> async_graphql::Result<Uuid> {
    Uuid::parse_str(id.as_str()).map_err(|_| error_with_code("BAD_REQUEST", "Invalid ID"))
}

fn validate_number(value: &str) -> async_graphql::Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error_with_code("VALIDATION", "Document number is required"));
    }
    if trimmed.len() > 64 {
        return Err(error_with_code("VALIDATION", "Document number is too long"));
    }
    Ok(trimmed.to_string())
}

fn validate_note(value: Option<String>) -> async_graphql::Result<Option<String>> {
    match value {
        None => Ok(None),
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            if trimmed.len() > MAX_NOTE_LEN {
                return Err(error_with_code("VALIDATION", "Note is too long"));
            }
            Ok(Some(trimmed.to_string()))
        }
    }
}

fn sanitize_optional_filter(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim().to_string();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}

fn db_error(err: DbErr) -> Error {
    error_with_code("INTERNAL", format!("Database error: {}", err))
}

fn workflow_error(err: WorkflowError) -> Error {
    match err {
        WorkflowError::ConfigurationMissing => error_with_code(
            "CONFIGURATION_MISSING",
            "Document type has no configured stages",
        ),
        WorkflowError::NotAuthorized => {
            error_with_code("NOT_AUTHORIZED", "You cannot act on the current stage")
        }
        WorkflowError::AlreadyFinished => {
            error_with_code("ALREADY_FINISHED", "Document is already finished")
        }
        WorkflowError::StageNotConfigured => error_with_code(
            "STAGE_NOT_CONFIGURED",
            "Your role is not expected at the document's current stage",
        ),
        WorkflowError::CodeRequired => error_with_code(
            "CODE_REQUIRED",
            "A verified confirmation code is required for this stage",
        ),
        WorkflowError::NotDraft => error_with_code(
            "NOT_DRAFT",
            "Document is past stage 1 and can no longer be edited",
        ),
        WorkflowError::NotFound => error_with_code("NOT_FOUND", "Document not found"),
        WorkflowError::Conflict => error_with_code(
            "CONFLICT",
            "The document changed concurrently; retry the operation",
        ),
        WorkflowError::Db(err) => db_error(err),
    }
}

fn error_with_code(code: &'static str, message: impl Into<String>) -> Error {
    Error::new(message).extend_with(|_, e| e.set("code", code))
}

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| anyhow::anyhow!("failed to hash password: {}", err))?;
    Ok(hash.to_string())
}

#[derive(Debug, Clone)]
pub struct SeededAssetRecords {
    pub employees: Vec<employee::Model>,
    pub document_types: Vec<document_type::Model>,
    pub documents: Vec<document::Model>,
}

impl SeededAssetRecords {
    pub fn employee_email(&self, email: &str) -> Option<&employee::Model> {
        self.employees.iter().find(|e| e.email == email)
    }

    pub fn type_named(&self, name: &str) -> Option<&document_type::Model> {
        self.document_types.iter().find(|t| t.name == name)
    }

    pub fn document_numbered(&self, number: &str) -> Option<&document::Model> {
        self.documents.iter().find(|d| d.number == number)
    }
}

/// Demo data: an employee hierarchy, the three act types with their stage
/// templates, and one draft act. Shared by the `seed` CLI command and the
/// integration tests.
pub async fn seed_assets_demo(db: &DatabaseConnection) -> Result<SeededAssetRecords, DbErr> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let password_hash =
        hash_password("changeme").map_err(|err| DbErr::Custom(err.to_string()))?;

    let mut employees = Vec::new();
    let director_id = Uuid::new_v4();
    let header_frp_id = Uuid::new_v4();
    let seed_employees = [
        (director_id, "director@assetflow.test", "Dina Director", "director", None),
        (
            header_frp_id,
            "head.frp@assetflow.test",
            "Hugo Head",
            "header_frp",
            Some(director_id),
        ),
        (
            Uuid::new_v4(),
            "frp@assetflow.test",
            "Fiona Frp",
            "frp",
            Some(header_frp_id),
        ),
        (
            Uuid::new_v4(),
            "accountant@assetflow.test",
            "Astrid Accountant",
            "accountant",
            Some(director_id),
        ),
        (Uuid::new_v4(), "admin@assetflow.test", "Sam Admin", "admin", None),
    ];
    for (id, email, display_name, role, chief_id) in seed_employees {
        let model = employee::ActiveModel {
            id: Set(id),
            email: Set(email.to_string()),
            display_name: Set(display_name.to_string()),
            password_hash: Set(Some(password_hash.clone())),
            role: Set(role.to_string()),
            chief_id: Set(chief_id),
            is_active: Set(true),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
        }
        .insert(db)
        .await?;
        employees.push(model);
    }

    // (ordering, role, attached_head, sms_confirm, check_product)
    type StageRow = (i32, &'static str, bool, bool, bool);
    let install_stages: &[StageRow] = &[
        (1, "frp", false, false, false),
        (2, "header_frp", false, false, false),
        (3, "director", false, false, false),
    ];
    let removal_stages: &[StageRow] = &[
        (1, "frp", false, false, false),
        (2, "header_frp", false, true, false),
        (3, "director", false, false, false),
    ];
    let write_off_stages: &[StageRow] = &[
        (1, "frp", true, false, false),
        (2, "header_frp", false, false, false),
        (3, "accountant", false, false, true),
        (4, "director", false, false, false),
    ];
    let seed_types = [
        ("Equipment installation act", document_type::Kind::Install, install_stages),
        ("Equipment removal act", document_type::Kind::Remove, removal_stages),
        ("Equipment write-off act", document_type::Kind::WriteOff, write_off_stages),
    ];

    let mut document_types = Vec::new();
    for (name, kind, stages) in seed_types {
        let type_model = document_type::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            kind: Set(kind),
            created_at: Set(now.clone()),
        }
        .insert(db)
        .await?;
        for (ordering, role, attached_head, sms_confirm, check_product) in stages {
            stage_config::ActiveModel {
                id: Set(Uuid::new_v4()),
                document_type_id: Set(type_model.id),
                ordering: Set(*ordering),
                role: Set(role.to_string()),
                attached_head: Set(*attached_head),
                sms_confirm: Set(*sms_confirm),
                check_product: Set(*check_product),
                check_main: Set(false),
                created_at: Set(now.clone()),
            }
            .insert(db)
            .await?;
        }
        document_types.push(type_model);
    }

    let frp = employees
        .iter()
        .find(|e| e.role == "frp")
        .expect("seeded frp employee");
    let install_type = document_types
        .first()
        .expect("seeded installation type");
    let demo_document = document::ActiveModel {
        id: Set(Uuid::new_v4()),
        number: Set("ACT-2026-0001".to_string()),
        document_type_id: Set(install_type.id),
        note: Set(Some("Rack-mounted the new switch in room 214.".to_string())),
        status: Set(1),
        is_draft: Set(true),
        is_finished: Set(false),
        is_returned: Set(false),
        current_holder: Set(None),
        created_by: Set(Some(frp.id)),
        created_at: Set(now.clone()),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    Ok(SeededAssetRecords {
        employees,
        document_types,
        documents: vec![demo_document],
    })
}
