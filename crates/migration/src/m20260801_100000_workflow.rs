use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum DocumentType {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Document {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum StageConfig {
    Table,
    Id,
    DocumentTypeId,
    Ordering,
    Role,
    AttachedHead,
    SmsConfirm,
    CheckProduct,
    CheckMain,
    CreatedAt,
}

#[derive(DeriveIden)]
enum StageChain {
    Table,
    Id,
    DocumentId,
    Ordering,
    Role,
    Holder,
    IsSuccess,
    IsActive,
}

#[derive(DeriveIden)]
enum DocumentReturn {
    Table,
    Id,
    DocumentId,
    FromUser,
    ToUser,
    Note,
    StageChainId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ConfirmationCode {
    Table,
    Id,
    DocumentId,
    Kind,
    Code,
    IsVerified,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StageConfig::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StageConfig::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StageConfig::DocumentTypeId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StageConfig::Ordering).integer().not_null())
                    .col(ColumnDef::new(StageConfig::Role).string_len(32).not_null())
                    .col(
                        ColumnDef::new(StageConfig::AttachedHead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(StageConfig::SmsConfirm)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(StageConfig::CheckProduct)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(StageConfig::CheckMain)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(StageConfig::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stage_config_type")
                            .from(StageConfig::Table, StageConfig::DocumentTypeId)
                            .to(DocumentType::Table, DocumentType::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A role appears at most once per type's chain.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_stage_config_type_role")
                    .table(StageConfig::Table)
                    .col(StageConfig::DocumentTypeId)
                    .col(StageConfig::Role)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_stage_config_type_ordering")
                    .table(StageConfig::Table)
                    .col(StageConfig::DocumentTypeId)
                    .col(StageConfig::Ordering)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StageChain::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StageChain::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StageChain::DocumentId).uuid().not_null())
                    .col(ColumnDef::new(StageChain::Ordering).integer().not_null())
                    .col(ColumnDef::new(StageChain::Role).string_len(32).not_null())
                    .col(ColumnDef::new(StageChain::Holder).uuid())
                    .col(
                        ColumnDef::new(StageChain::IsSuccess)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(StageChain::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stage_chain_document")
                            .from(StageChain::Table, StageChain::DocumentId)
                            .to(Document::Table, Document::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_stage_chain_document_ordering")
                    .table(StageChain::Table)
                    .col(StageChain::DocumentId)
                    .col(StageChain::Ordering)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DocumentReturn::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DocumentReturn::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DocumentReturn::DocumentId).uuid().not_null())
                    .col(ColumnDef::new(DocumentReturn::FromUser).uuid().not_null())
                    .col(ColumnDef::new(DocumentReturn::ToUser).uuid())
                    .col(ColumnDef::new(DocumentReturn::Note).text().not_null())
                    .col(
                        ColumnDef::new(DocumentReturn::StageChainId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DocumentReturn::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_document_return_document")
                            .from(DocumentReturn::Table, DocumentReturn::DocumentId)
                            .to(Document::Table, Document::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_document_return_document")
                    .table(DocumentReturn::Table)
                    .col(DocumentReturn::DocumentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ConfirmationCode::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ConfirmationCode::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ConfirmationCode::DocumentId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ConfirmationCode::Kind)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ConfirmationCode::Code).string_len(16).not_null())
                    .col(
                        ColumnDef::new(ConfirmationCode::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ConfirmationCode::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_confirmation_code_document")
                            .from(ConfirmationCode::Table, ConfirmationCode::DocumentId)
                            .to(Document::Table, Document::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_confirmation_code_document_kind")
                    .table(ConfirmationCode::Table)
                    .col(ConfirmationCode::DocumentId)
                    .col(ConfirmationCode::Kind)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ConfirmationCode::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DocumentReturn::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StageChain::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StageConfig::Table).to_owned())
            .await
    }
}
