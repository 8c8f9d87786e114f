use chrono::{TimeZone, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    Engine, EngineError, InvoiceKind, InvoiceListFilter, InvoiceNew, InvoicePatch, OrganizationNew,
    UserNew,
};
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

async fn new_org(engine: &Engine, unique_name: &str, creator: i32) -> i32 {
    engine
        .create_organization(
            OrganizationNew {
                name: unique_name.to_string(),
                unique_name: unique_name.to_string(),
            },
            creator,
        )
        .await
        .unwrap()
        .0
        .id
}

fn invoice_new(name: &str, amount_minor: i64, kind: InvoiceKind) -> InvoiceNew {
    InvoiceNew {
        name: name.to_string(),
        note: None,
        amount_minor,
        total_minor: None,
        date: Utc::now(),
        kind,
    }
}

async fn link_rows(db: &DatabaseConnection, invoice_id: i32) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_sql_and_values(
            backend,
            "SELECT COUNT(*) AS n FROM user_organization_invoices WHERE invoice_id = ?",
            vec![invoice_id.into()],
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get::<i64>("", "n").unwrap()
}

#[tokio::test]
async fn create_defaults_total_to_amount_and_links_creator() {
    let (engine, db) = engine_with_db().await;
    let alice = new_user(&engine, "alice").await;
    let org = new_org(&engine, "acme", alice).await;

    let invoice = engine
        .create_invoice(org, alice, invoice_new("Office chairs", 1500, InvoiceKind::Expense))
        .await
        .unwrap();

    assert_eq!(invoice.amount_minor, 1500);
    assert_eq!(invoice.total_minor, 1500);
    assert_eq!(link_rows(&db, invoice.id).await, 1);
}

#[tokio::test]
async fn create_with_explicit_total_keeps_it() {
    let (engine, _db) = engine_with_db().await;
    let alice = new_user(&engine, "alice").await;
    let org = new_org(&engine, "acme", alice).await;

    let invoice = engine
        .create_invoice(
            org,
            alice,
            InvoiceNew {
                total_minor: Some(1830),
                ..invoice_new("Office chairs", 1500, InvoiceKind::Expense)
            },
        )
        .await
        .unwrap();
    assert_eq!(invoice.total_minor, 1830);
}

#[tokio::test]
async fn create_rejects_non_positive_amounts() {
    let (engine, _db) = engine_with_db().await;
    let alice = new_user(&engine, "alice").await;
    let org = new_org(&engine, "acme", alice).await;

    let err = engine
        .create_invoice(org, alice, invoice_new("x", 0, InvoiceKind::Expense))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .create_invoice(org, alice, invoice_new("x", -5, InvoiceKind::Expense))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn non_member_cannot_create() {
    let (engine, _db) = engine_with_db().await;
    let alice = new_user(&engine, "alice").await;
    let mallory = new_user(&engine, "mallory").await;
    let org = new_org(&engine, "acme", alice).await;

    let err = engine
        .create_invoice(org, mallory, invoice_new("x", 100, InvoiceKind::Expense))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn cross_tenant_lookup_is_not_found() {
    let (engine, _db) = engine_with_db().await;
    let alice = new_user(&engine, "alice").await;
    let bob = new_user(&engine, "bob").await;
    let org_a = new_org(&engine, "acme", alice).await;
    let org_b = new_org(&engine, "globex", bob).await;

    let invoice = engine
        .create_invoice(org_a, alice, invoice_new("Chairs", 100, InvoiceKind::Expense))
        .await
        .unwrap();

    // The same id through the wrong organization looks nonexistent.
    let err = engine.find_invoice(org_b, invoice.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    let err = engine.delete_invoice(org_b, invoice.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    engine.find_invoice(org_a, invoice.id).await.unwrap();
}

#[tokio::test]
async fn falsy_patch_fields_are_ignored() {
    let (engine, _db) = engine_with_db().await;
    let alice = new_user(&engine, "alice").await;
    let org = new_org(&engine, "acme", alice).await;
    let invoice = engine
        .create_invoice(org, alice, invoice_new("Chairs", 1500, InvoiceKind::Expense))
        .await
        .unwrap();

    let updated = engine
        .update_invoice(
            org,
            invoice.id,
            InvoicePatch {
                name: Some(String::new()),
                amount_minor: Some(0),
                total_minor: Some(0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Chairs");
    assert_eq!(updated.amount_minor, 1500);
    assert_eq!(updated.total_minor, 1500);
}

#[tokio::test]
async fn patch_updates_provided_fields() {
    let (engine, _db) = engine_with_db().await;
    let alice = new_user(&engine, "alice").await;
    let org = new_org(&engine, "acme", alice).await;
    let invoice = engine
        .create_invoice(org, alice, invoice_new("Chairs", 1500, InvoiceKind::Expense))
        .await
        .unwrap();

    let updated = engine
        .update_invoice(
            org,
            invoice.id,
            InvoicePatch {
                name: Some("Desks".to_string()),
                note: Some("bulk order".to_string()),
                amount_minor: Some(2000),
                kind: Some(InvoiceKind::Income),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Desks");
    assert_eq!(updated.note.as_deref(), Some("bulk order"));
    assert_eq!(updated.amount_minor, 2000);
    assert_eq!(updated.kind, InvoiceKind::Income.as_str());
}

#[tokio::test]
async fn delete_removes_invoice_and_link_rows() {
    let (engine, db) = engine_with_db().await;
    let alice = new_user(&engine, "alice").await;
    let org = new_org(&engine, "acme", alice).await;
    let invoice = engine
        .create_invoice(org, alice, invoice_new("Chairs", 1500, InvoiceKind::Expense))
        .await
        .unwrap();
    assert_eq!(link_rows(&db, invoice.id).await, 1);

    engine.delete_invoice(org, invoice.id).await.unwrap();

    assert_eq!(link_rows(&db, invoice.id).await, 0);
    let err = engine.find_invoice(org, invoice.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn list_filters_by_kind_date_and_text() {
    let (engine, _db) = engine_with_db().await;
    let alice = new_user(&engine, "alice").await;
    let org = new_org(&engine, "acme", alice).await;

    let january = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
    let february = Utc.with_ymd_and_hms(2026, 2, 15, 12, 0, 0).unwrap();

    engine
        .create_invoice(
            org,
            alice,
            InvoiceNew {
                date: january,
                note: Some("office upgrade".to_string()),
                ..invoice_new("Chairs", 100, InvoiceKind::Expense)
            },
        )
        .await
        .unwrap();
    engine
        .create_invoice(
            org,
            alice,
            InvoiceNew {
                date: february,
                ..invoice_new("Consulting", 500, InvoiceKind::Income)
            },
        )
        .await
        .unwrap();

    let (expenses, total, filter) = engine
        .list_invoices(
            org,
            InvoiceListFilter {
                kind: Some(InvoiceKind::Expense),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(total, 1);
    assert_eq!(filter.kind, Some(InvoiceKind::Expense));
    assert_eq!(expenses[0].name, "Chairs");

    let (in_january, _, _) = engine
        .list_invoices(
            org,
            InvoiceListFilter {
                date_from: Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()),
                date_to: Some(Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(in_january.len(), 1);
    assert_eq!(in_january[0].name, "Chairs");

    let (by_note, _, _) = engine
        .list_invoices(
            org,
            InvoiceListFilter {
                text: Some("upgrade".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_note.len(), 1);

    let (all, total, _) = engine
        .list_invoices(org, InvoiceListFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(total, 2);
    // Newest first.
    assert_eq!(all[0].name, "Consulting");
}

#[tokio::test]
async fn list_rejects_reversed_date_range() {
    let (engine, _db) = engine_with_db().await;
    let alice = new_user(&engine, "alice").await;
    let org = new_org(&engine, "acme", alice).await;

    let err = engine
        .list_invoices(
            org,
            InvoiceListFilter {
                date_from: Some(Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap()),
                date_to: Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidFilter(_)));
}

#[tokio::test]
async fn list_is_scoped_to_the_organization() {
    let (engine, _db) = engine_with_db().await;
    let alice = new_user(&engine, "alice").await;
    let bob = new_user(&engine, "bob").await;
    let org_a = new_org(&engine, "acme", alice).await;
    let org_b = new_org(&engine, "globex", bob).await;

    engine
        .create_invoice(org_a, alice, invoice_new("Chairs", 100, InvoiceKind::Expense))
        .await
        .unwrap();

    let (other, total, _) = engine
        .list_invoices(org_b, InvoiceListFilter::default())
        .await
        .unwrap();
    assert!(other.is_empty());
    assert_eq!(total, 0);
}
