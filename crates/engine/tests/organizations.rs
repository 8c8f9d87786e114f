use sea_orm::{Database, DatabaseConnection};

use engine::{Engine, EngineError, MemberRole, OrganizationNew, OrganizationPatch, UserNew};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db.clone()).build();
    (engine, db)
}

async fn new_user(engine: &Engine, name: &str) -> i32 {
    engine
        .create_user(UserNew {
            name: name.to_string(),
            email: format!("{name}@example.com"),
            password: "password".to_string(),
        })
        .await
        .unwrap()
        .id
}

fn org_new(unique_name: &str) -> OrganizationNew {
    OrganizationNew {
        name: "Acme".to_string(),
        unique_name: unique_name.to_string(),
    }
}

#[tokio::test]
async fn create_joins_creator_as_owner() {
    let (engine, _db) = engine_with_db().await;
    let alice = new_user(&engine, "alice").await;

    let (org, membership) = engine.create_organization(org_new("acme"), alice).await.unwrap();

    assert_eq!(membership.user_id, alice);
    assert_eq!(membership.organization_id, org.id);
    assert_eq!(membership.role, MemberRole::Owner.as_str());

    let members = engine.list_members(org.id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].0.id, alice);
    assert_eq!(members[0].1, MemberRole::Owner);
}

#[tokio::test]
async fn create_with_unknown_creator_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.create_organization(org_new("acme"), 42).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn duplicate_unique_name_conflicts() {
    let (engine, _db) = engine_with_db().await;
    let alice = new_user(&engine, "alice").await;
    let bob = new_user(&engine, "bob").await;

    engine.create_organization(org_new("acme"), alice).await.unwrap();
    let err = engine.create_organization(org_new("acme"), bob).await.unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
}

#[tokio::test]
async fn concurrent_creates_with_same_unique_name_yield_one_winner() {
    let (engine, _db) = engine_with_db().await;
    let alice = new_user(&engine, "alice").await;
    let bob = new_user(&engine, "bob").await;

    let (left, right) = tokio::join!(
        engine.create_organization(org_new("acme"), alice),
        engine.create_organization(org_new("acme"), bob),
    );

    // Exactly one side wins; the loser hits either the fast-path check or
    // the unique index, depending on interleaving.
    assert_eq!(left.is_ok() as u8 + right.is_ok() as u8, 1);
    for result in [left, right] {
        if let Err(err) = result {
            assert!(matches!(
                err,
                EngineError::ExistingKey(_) | EngineError::Database(_)
            ));
        }
    }
}

#[tokio::test]
async fn partial_update_preserves_untouched_fields() {
    let (engine, _db) = engine_with_db().await;
    let alice = new_user(&engine, "alice").await;
    let (org, _) = engine.create_organization(org_new("acme"), alice).await.unwrap();

    let updated = engine
        .update_organization(
            org.id,
            OrganizationPatch {
                name: Some("Acme Inc".to_string()),
                phone: Some("555-0100".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Acme Inc");
    assert_eq!(updated.phone, "555-0100");
    assert_eq!(updated.unique_name, "acme");
    assert_eq!(updated.address, org.address);
}

#[tokio::test]
async fn update_to_taken_unique_name_conflicts() {
    let (engine, _db) = engine_with_db().await;
    let alice = new_user(&engine, "alice").await;
    engine.create_organization(org_new("acme"), alice).await.unwrap();
    let (other, _) = engine.create_organization(org_new("globex"), alice).await.unwrap();

    let err = engine
        .update_organization(
            other.id,
            OrganizationPatch {
                unique_name: Some("acme".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
}

#[tokio::test]
async fn update_keeping_own_unique_name_is_allowed() {
    let (engine, _db) = engine_with_db().await;
    let alice = new_user(&engine, "alice").await;
    let (org, _) = engine.create_organization(org_new("acme"), alice).await.unwrap();

    let updated = engine
        .update_organization(
            org.id,
            OrganizationPatch {
                unique_name: Some("acme".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.unique_name, "acme");
}

#[tokio::test]
async fn add_and_remove_member() {
    let (engine, _db) = engine_with_db().await;
    let alice = new_user(&engine, "alice").await;
    let bob = new_user(&engine, "bob").await;
    let (org, _) = engine.create_organization(org_new("acme"), alice).await.unwrap();

    engine.add_member(org.id, bob, "member").await.unwrap();
    let members = engine.list_members(org.id).await.unwrap();
    assert_eq!(members.len(), 2);

    let err = engine.add_member(org.id, bob, "member").await.unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    engine.remove_member(org.id, bob).await.unwrap();
    let members = engine.list_members(org.id).await.unwrap();
    assert_eq!(members.len(), 1);
}

#[tokio::test]
async fn invalid_role_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let alice = new_user(&engine, "alice").await;
    let bob = new_user(&engine, "bob").await;
    let (org, _) = engine.create_organization(org_new("acme"), alice).await.unwrap();

    let err = engine.add_member(org.id, bob, "superuser").await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidRole(_)));
}

#[tokio::test]
async fn last_owner_cannot_be_removed() {
    let (engine, _db) = engine_with_db().await;
    let alice = new_user(&engine, "alice").await;
    let bob = new_user(&engine, "bob").await;
    let (org, _) = engine.create_organization(org_new("acme"), alice).await.unwrap();
    engine.add_member(org.id, bob, "member").await.unwrap();

    let err = engine.remove_member(org.id, alice).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidRole(_)));

    // A second owner frees the first to leave.
    engine.remove_member(org.id, bob).await.unwrap();
    engine.add_member(org.id, bob, "owner").await.unwrap();
    engine.remove_member(org.id, alice).await.unwrap();
}

#[tokio::test]
async fn delete_is_rejected_while_records_remain() {
    let (engine, _db) = engine_with_db().await;
    let alice = new_user(&engine, "alice").await;
    let (org, _) = engine.create_organization(org_new("acme"), alice).await.unwrap();

    engine
        .create_category(
            org.id,
            engine::CategoryNew {
                name: "Travel".to_string(),
                color: engine::CategoryColor::Primary,
                icon: engine::CategoryIcon::MdiAirplane,
                kind: engine::InvoiceKind::Expense,
            },
        )
        .await
        .unwrap();

    let err = engine.delete_organization(org.id).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidDelete(_)));
}

#[tokio::test]
async fn delete_removes_organization_and_memberships() {
    let (engine, _db) = engine_with_db().await;
    let alice = new_user(&engine, "alice").await;
    let (org, _) = engine.create_organization(org_new("acme"), alice).await.unwrap();

    engine.delete_organization(org.id).await.unwrap();

    let err = engine.find_organization(org.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    let err = engine.member_role(org.id, alice).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn find_by_unique_name() {
    let (engine, _db) = engine_with_db().await;
    let alice = new_user(&engine, "alice").await;
    let (org, _) = engine.create_organization(org_new("acme"), alice).await.unwrap();

    let found = engine.find_organization_by_unique_name("acme").await.unwrap();
    assert_eq!(found.id, org.id);

    let err = engine.find_organization_by_unique_name("nope").await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}
