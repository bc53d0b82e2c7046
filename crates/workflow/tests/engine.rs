mod common;

use common::{
    actor, actor_with_chief, add_stage, chain_rows, create_document, create_type, get_document,
    setup_db, three_stage_type, StageSpec,
};
use uuid::Uuid;
use workflow::{advance, current_stage, submit, Role, StageOption, WorkflowError};

#[tokio::test]
async fn three_stage_chain_advances_to_finished() {
    let db = setup_db().await;
    let type_id = three_stage_type(&db).await;
    let document_id = create_document(&db, type_id).await;
    submit(&db, document_id).await.unwrap();

    let frp = actor(Role::Frp);
    let updated = advance(&db, document_id, &frp, false).await.unwrap();
    assert_eq!(updated.status, 2);
    assert!(!updated.is_draft);
    assert!(!updated.is_finished);

    let rows = chain_rows(&db, document_id).await;
    assert!(rows[0].is_success);
    assert_eq!(rows[0].holder, Some(frp.id));
    assert!(!rows[1].is_success);

    let updated = advance(&db, document_id, &actor(Role::HeaderFrp), false)
        .await
        .unwrap();
    assert_eq!(updated.status, 3);

    let updated = advance(&db, document_id, &actor(Role::Director), false)
        .await
        .unwrap();
    assert!(updated.is_finished);
    assert_eq!(updated.status, 4);
}

#[tokio::test]
async fn status_tracks_smallest_open_active_ordering() {
    let db = setup_db().await;
    let type_id = three_stage_type(&db).await;
    let document_id = create_document(&db, type_id).await;
    submit(&db, document_id).await.unwrap();

    for role in [Role::Frp, Role::HeaderFrp, Role::Director] {
        let document = get_document(&db, document_id).await;
        let open: Vec<i32> = chain_rows(&db, document_id)
            .await
            .into_iter()
            .filter(|row| row.is_active && !row.is_success)
            .map(|row| row.ordering)
            .collect();
        assert_eq!(document.status, *open.iter().min().unwrap());
        advance(&db, document_id, &actor(role), false).await.unwrap();
    }

    let document = get_document(&db, document_id).await;
    let max = chain_rows(&db, document_id)
        .await
        .into_iter()
        .map(|row| row.ordering)
        .max()
        .unwrap();
    assert!(document.is_finished);
    assert!(document.status > max);
}

#[tokio::test]
async fn submit_fails_without_configured_stages() {
    let db = setup_db().await;
    let type_id = create_type(&db, "Unrouted act").await;
    let document_id = create_document(&db, type_id).await;
    let err = submit(&db, document_id).await.unwrap_err();
    assert!(matches!(err, WorkflowError::ConfigurationMissing));
    assert!(chain_rows(&db, document_id).await.is_empty());
}

#[tokio::test]
async fn resubmitting_a_draft_recreates_the_chain_exactly() {
    let db = setup_db().await;
    let type_id = three_stage_type(&db).await;
    let document_id = create_document(&db, type_id).await;

    for _ in 0..4 {
        submit(&db, document_id).await.unwrap();
        let rows = chain_rows(&db, document_id).await;
        let orderings: Vec<i32> = rows.iter().map(|row| row.ordering).collect();
        assert_eq!(orderings, vec![1, 2, 3]);
        assert!(rows.iter().all(|row| row.is_active && !row.is_success));
        assert!(rows.iter().all(|row| row.holder.is_none()));
    }
}

#[tokio::test]
async fn submit_is_rejected_past_stage_one() {
    let db = setup_db().await;
    let type_id = three_stage_type(&db).await;
    let document_id = create_document(&db, type_id).await;
    submit(&db, document_id).await.unwrap();
    advance(&db, document_id, &actor(Role::Frp), false)
        .await
        .unwrap();

    let err = submit(&db, document_id).await.unwrap_err();
    assert!(matches!(err, WorkflowError::NotDraft));
}

#[tokio::test]
async fn advancing_with_the_wrong_role_changes_nothing() {
    let db = setup_db().await;
    let type_id = three_stage_type(&db).await;
    let document_id = create_document(&db, type_id).await;
    submit(&db, document_id).await.unwrap();

    let err = advance(&db, document_id, &actor(Role::Director), false)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::StageNotConfigured));

    let err = advance(&db, document_id, &actor(Role::Unknown("janitor".into())), false)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::StageNotConfigured));

    let document = get_document(&db, document_id).await;
    assert_eq!(document.status, 1);
    assert!(chain_rows(&db, document_id)
        .await
        .iter()
        .all(|row| !row.is_success));
}

#[tokio::test]
async fn advancing_before_submission_fails() {
    let db = setup_db().await;
    let type_id = three_stage_type(&db).await;
    let document_id = create_document(&db, type_id).await;
    let err = advance(&db, document_id, &actor(Role::Frp), false)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::ConfigurationMissing));
}

#[tokio::test]
async fn missing_document_is_reported() {
    let db = setup_db().await;
    let err = advance(&db, Uuid::new_v4(), &actor(Role::Frp), false)
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::NotFound));
}

#[tokio::test]
async fn sms_stage_blocks_until_the_code_is_verified() {
    let db = setup_db().await;
    let type_id = create_type(&db, "Equipment removal act").await;
    add_stage(&db, type_id, StageSpec::plain(1, "frp")).await;
    add_stage(
        &db,
        type_id,
        StageSpec {
            ordering: 2,
            role: "header_frp",
            attached_head: false,
            sms_confirm: true,
        },
    )
    .await;
    add_stage(&db, type_id, StageSpec::plain(3, "director")).await;

    let document_id = create_document(&db, type_id).await;
    submit(&db, document_id).await.unwrap();
    advance(&db, document_id, &actor(Role::Frp), false)
        .await
        .unwrap();

    let approver = actor(Role::HeaderFrp);
    let err = advance(&db, document_id, &approver, false).await.unwrap_err();
    assert!(matches!(err, WorkflowError::CodeRequired));

    // Nothing committed: still waiting on stage 2.
    let document = get_document(&db, document_id).await;
    assert_eq!(document.status, 2);
    assert!(!chain_rows(&db, document_id).await[1].is_success);

    let updated = advance(&db, document_id, &approver, true).await.unwrap();
    assert_eq!(updated.status, 3);
}

#[tokio::test]
async fn attached_head_pins_the_next_stage_to_the_superior() {
    let db = setup_db().await;
    let type_id = create_type(&db, "Equipment write-off act").await;
    add_stage(
        &db,
        type_id,
        StageSpec {
            ordering: 1,
            role: "frp",
            attached_head: true,
            sms_confirm: false,
        },
    )
    .await;
    add_stage(&db, type_id, StageSpec::plain(2, "header_frp")).await;

    let chief_id = Uuid::new_v4();
    let document_id = create_document(&db, type_id).await;
    submit(&db, document_id).await.unwrap();

    let frp = actor_with_chief(Role::Frp, chief_id);
    let updated = advance(&db, document_id, &frp, false).await.unwrap();
    assert_eq!(updated.current_holder, Some(chief_id));
    let rows = chain_rows(&db, document_id).await;
    assert_eq!(rows[1].holder, Some(chief_id));

    // The stage is pinned to a person now, not merely to the role.
    let stranger = actor(Role::HeaderFrp);
    let err = advance(&db, document_id, &stranger, false).await.unwrap_err();
    assert!(matches!(err, WorkflowError::NotAuthorized));

    let chief = workflow::Actor {
        id: chief_id,
        role: Role::HeaderFrp,
        chief_id: None,
    };
    let updated = advance(&db, document_id, &chief, false).await.unwrap();
    assert!(updated.is_finished);
}

#[tokio::test]
async fn attached_head_without_a_superior_leaves_the_stage_open() {
    let db = setup_db().await;
    let type_id = create_type(&db, "Equipment write-off act").await;
    add_stage(
        &db,
        type_id,
        StageSpec {
            ordering: 1,
            role: "frp",
            attached_head: true,
            sms_confirm: false,
        },
    )
    .await;
    add_stage(&db, type_id, StageSpec::plain(2, "header_frp")).await;

    let document_id = create_document(&db, type_id).await;
    submit(&db, document_id).await.unwrap();
    let updated = advance(&db, document_id, &actor(Role::Frp), false)
        .await
        .unwrap();
    assert_eq!(updated.current_holder, None);
    assert_eq!(chain_rows(&db, document_id).await[1].holder, None);
}

#[tokio::test]
async fn finished_documents_refuse_further_advancing() {
    let db = setup_db().await;
    let type_id = create_type(&db, "Single stage act").await;
    add_stage(&db, type_id, StageSpec::plain(1, "frp")).await;
    let document_id = create_document(&db, type_id).await;
    submit(&db, document_id).await.unwrap();
    advance(&db, document_id, &actor(Role::Frp), false)
        .await
        .unwrap();

    for _ in 0..2 {
        let err = advance(&db, document_id, &actor(Role::Frp), false)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::AlreadyFinished));
    }
}

#[tokio::test]
async fn current_stage_reports_the_pending_row() {
    let db = setup_db().await;
    let type_id = create_type(&db, "Equipment removal act").await;
    add_stage(&db, type_id, StageSpec::plain(1, "frp")).await;
    add_stage(
        &db,
        type_id,
        StageSpec {
            ordering: 2,
            role: "header_frp",
            attached_head: false,
            sms_confirm: true,
        },
    )
    .await;

    let document_id = create_document(&db, type_id).await;
    assert!(current_stage(&db, document_id).await.unwrap().is_none());

    submit(&db, document_id).await.unwrap();
    let view = current_stage(&db, document_id).await.unwrap().unwrap();
    assert_eq!(view.ordering, 1);
    assert_eq!(view.role, Role::Frp);
    assert_eq!(view.holder, None);
    assert!(view.options.is_empty());

    advance(&db, document_id, &actor(Role::Frp), false)
        .await
        .unwrap();
    let view = current_stage(&db, document_id).await.unwrap().unwrap();
    assert_eq!(view.ordering, 2);
    assert_eq!(view.role, Role::HeaderFrp);
    assert_eq!(view.options, vec![StageOption::SmsConfirm]);

    advance(&db, document_id, &actor(Role::HeaderFrp), true)
        .await
        .unwrap();
    assert!(current_stage(&db, document_id).await.unwrap().is_none());
}
