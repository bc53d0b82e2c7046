use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Employee {
    Table,
    Id,
    Email,
    DisplayName,
    PasswordHash,
    Role,
    ChiefId,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum DocumentType {
    Table,
    Id,
    Name,
    Kind,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Document {
    Table,
    Id,
    Number,
    DocumentTypeId,
    Note,
    Status,
    IsDraft,
    IsFinished,
    IsReturned,
    CurrentHolder,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employee::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Employee::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Employee::Email).string_len(256).not_null())
                    .col(
                        ColumnDef::new(Employee::DisplayName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Employee::PasswordHash).string_len(256))
                    .col(ColumnDef::new(Employee::Role).string_len(32).not_null())
                    .col(ColumnDef::new(Employee::ChiefId).uuid())
                    .col(
                        ColumnDef::new(Employee::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Employee::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .col(
                        ColumnDef::new(Employee::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employee_chief")
                            .from(Employee::Table, Employee::ChiefId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_employee_email")
                    .table(Employee::Table)
                    .col(Employee::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DocumentType::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DocumentType::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DocumentType::Name)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(ColumnDef::new(DocumentType::Kind).string_len(16).not_null())
                    .col(
                        ColumnDef::new(DocumentType::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Document::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Document::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Document::Number).string_len(64).not_null())
                    .col(ColumnDef::new(Document::DocumentTypeId).uuid().not_null())
                    .col(ColumnDef::new(Document::Note).text())
                    .col(
                        ColumnDef::new(Document::Status)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Document::IsDraft)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Document::IsFinished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Document::IsReturned)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Document::CurrentHolder).uuid())
                    .col(ColumnDef::new(Document::CreatedBy).uuid())
                    .col(
                        ColumnDef::new(Document::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .col(
                        ColumnDef::new(Document::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_document_type")
                            .from(Document::Table, Document::DocumentTypeId)
                            .to(DocumentType::Table, DocumentType::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_document_type_id")
                    .table(Document::Table)
                    .col(Document::DocumentTypeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Document::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DocumentType::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employee::Table).to_owned())
            .await
    }
}
