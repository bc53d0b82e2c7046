#![allow(dead_code)]

use chrono::Utc;
use entity::{document, document_type, stage_chain, stage_config};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, Statement,
};
use uuid::Uuid;
use workflow::{Actor, Role};

pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    bootstrap_sqlite(&db).await;
    db
}

async fn bootstrap_sqlite(db: &DatabaseConnection) {
    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        "PRAGMA foreign_keys = ON;",
    ))
    .await
    .unwrap();

    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"
        CREATE TABLE document_type (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            kind TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    ))
    .await
    .unwrap();

    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"
        CREATE TABLE document (
            id TEXT PRIMARY KEY,
            number TEXT NOT NULL,
            document_type_id TEXT NOT NULL,
            note TEXT,
            status INTEGER NOT NULL DEFAULT 1,
            is_draft INTEGER NOT NULL DEFAULT 1,
            is_finished INTEGER NOT NULL DEFAULT 0,
            is_returned INTEGER NOT NULL DEFAULT 0,
            current_holder TEXT,
            created_by TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY(document_type_id) REFERENCES document_type(id)
        );
        "#,
    ))
    .await
    .unwrap();

    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"
        CREATE TABLE stage_config (
            id TEXT PRIMARY KEY,
            document_type_id TEXT NOT NULL,
            ordering INTEGER NOT NULL,
            role TEXT NOT NULL,
            attached_head INTEGER NOT NULL DEFAULT 0,
            sms_confirm INTEGER NOT NULL DEFAULT 0,
            check_product INTEGER NOT NULL DEFAULT 0,
            check_main INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            UNIQUE(document_type_id, role),
            UNIQUE(document_type_id, ordering),
            FOREIGN KEY(document_type_id) REFERENCES document_type(id) ON DELETE CASCADE
        );
        "#,
    ))
    .await
    .unwrap();

    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"
        CREATE TABLE stage_chain (
            id TEXT PRIMARY KEY,
            document_id TEXT NOT NULL,
            ordering INTEGER NOT NULL,
            role TEXT NOT NULL,
            holder TEXT,
            is_success INTEGER NOT NULL DEFAULT 0,
            is_active INTEGER NOT NULL DEFAULT 1,
            UNIQUE(document_id, ordering),
            FOREIGN KEY(document_id) REFERENCES document(id) ON DELETE CASCADE
        );
        "#,
    ))
    .await
    .unwrap();

    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        r#"
        CREATE TABLE document_return (
            id TEXT PRIMARY KEY,
            document_id TEXT NOT NULL,
            from_user TEXT NOT NULL,
            to_user TEXT,
            note TEXT NOT NULL,
            stage_chain_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY(document_id) REFERENCES document(id) ON DELETE CASCADE
        );
        "#,
    ))
    .await
    .unwrap();
}

pub async fn create_type(db: &DatabaseConnection, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    document_type::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        kind: Set(document_type::Kind::Install),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await
    .unwrap();
    id
}

pub struct StageSpec {
    pub ordering: i32,
    pub role: &'static str,
    pub attached_head: bool,
    pub sms_confirm: bool,
}

impl StageSpec {
    pub fn plain(ordering: i32, role: &'static str) -> Self {
        Self {
            ordering,
            role,
            attached_head: false,
            sms_confirm: false,
        }
    }
}

pub async fn add_stage(db: &DatabaseConnection, type_id: Uuid, spec: StageSpec) {
    stage_config::ActiveModel {
        id: Set(Uuid::new_v4()),
        document_type_id: Set(type_id),
        ordering: Set(spec.ordering),
        role: Set(spec.role.to_string()),
        attached_head: Set(spec.attached_head),
        sms_confirm: Set(spec.sms_confirm),
        check_product: Set(false),
        check_main: Set(false),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await
    .unwrap();
}

pub async fn create_document(db: &DatabaseConnection, type_id: Uuid) -> Uuid {
    let id = Uuid::new_v4();
    let now = Utc::now();
    document::ActiveModel {
        id: Set(id),
        number: Set(format!("ACT-{}", &id.simple().to_string()[..8])),
        document_type_id: Set(type_id),
        note: Set(None),
        status: Set(1),
        is_draft: Set(true),
        is_finished: Set(false),
        is_returned: Set(false),
        current_holder: Set(None),
        created_by: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await
    .unwrap();
    id
}

pub fn actor(role: Role) -> Actor {
    Actor {
        id: Uuid::new_v4(),
        role,
        chief_id: None,
    }
}

pub fn actor_with_chief(role: Role, chief_id: Uuid) -> Actor {
    Actor {
        id: Uuid::new_v4(),
        role,
        chief_id: Some(chief_id),
    }
}

pub async fn get_document(db: &DatabaseConnection, id: Uuid) -> document::Model {
    document::Entity::find_by_id(id).one(db).await.unwrap().unwrap()
}

/// All chain rows for a document, active or not, ordered by ordering.
pub async fn chain_rows(db: &DatabaseConnection, document_id: Uuid) -> Vec<stage_chain::Model> {
    stage_chain::Entity::find()
        .filter(stage_chain::Column::DocumentId.eq(document_id))
        .order_by_asc(stage_chain::Column::Ordering)
        .all(db)
        .await
        .unwrap()
}

/// Standard three-stage template used by most scenarios.
pub async fn three_stage_type(db: &DatabaseConnection) -> Uuid {
    let type_id = create_type(db, "Equipment installation act").await;
    add_stage(db, type_id, StageSpec::plain(1, "frp")).await;
    add_stage(db, type_id, StageSpec::plain(2, "header_frp")).await;
    add_stage(db, type_id, StageSpec::plain(3, "director")).await;
    type_id
}
