use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

use engine::{
    ActionOutcome, ActionState, Engine, FailureKind, FormData, INVOICES_PATH, InvoiceChanges,
    InvoiceStatus, InvoiceStore, NewInvoice, Revalidate, customers, invoices,
    schema::{AMOUNT, CUSTOMER_ID},
};
use migration::MigratorTrait;

fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
}

fn later_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
}

#[derive(Default)]
struct RecordingCache {
    paths: Mutex<Vec<String>>,
}

impl RecordingCache {
    fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

impl Revalidate for RecordingCache {
    fn revalidate_path(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Write {
    Insert(NewInvoice),
    Update(String, InvoiceChanges),
    Delete(String),
}

/// Records every write and optionally fails all of them.
#[derive(Default)]
struct RecordingStore {
    writes: Mutex<Vec<Write>>,
    fail: bool,
}

impl RecordingStore {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn writes(&self) -> Vec<Write> {
        self.writes.lock().unwrap().clone()
    }

    fn record(&self, write: Write) -> Result<(), DbErr> {
        self.writes.lock().unwrap().push(write);
        if self.fail {
            return Err(DbErr::Custom("connection reset".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl InvoiceStore for RecordingStore {
    async fn insert_invoice(&self, invoice: &NewInvoice) -> Result<(), DbErr> {
        self.record(Write::Insert(invoice.clone()))
    }

    async fn update_invoice(&self, id: &str, changes: &InvoiceChanges) -> Result<u64, DbErr> {
        self.record(Write::Update(id.to_string(), changes.clone()))
            .map(|_| 1)
    }

    async fn delete_invoice(&self, id: &str) -> Result<u64, DbErr> {
        self.record(Write::Delete(id.to_string())).map(|_| 1)
    }

    async fn find_invoice(&self, _id: &str) -> Result<Option<invoices::Model>, DbErr> {
        Ok(None)
    }

    async fn list_invoices(
        &self,
    ) -> Result<Vec<(invoices::Model, Option<customers::Model>)>, DbErr> {
        Ok(Vec::new())
    }

    async fn list_customers(&self) -> Result<Vec<customers::Model>, DbErr> {
        Ok(Vec::new())
    }
}

fn form(pairs: &[(&str, &str)]) -> FormData {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn recording_engine(store: Arc<RecordingStore>) -> (Engine, Arc<RecordingCache>) {
    let cache = Arc::new(RecordingCache::default());
    let engine = Engine::builder()
        .store(store)
        .revalidate(cache.clone())
        .clock(fixed_today)
        .build()
        .unwrap();
    (engine, cache)
}

async fn engine_with_db(today: engine::Clock) -> (Engine, Arc<RecordingCache>, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for (id, name) in [("c1", "Evil Rabbit"), ("c2", "Delba de Oliveira")] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO customers (id, name, email) VALUES (?, ?, ?)",
            vec![id.into(), name.into(), format!("{id}@example.com").into()],
        ))
        .await
        .unwrap();
    }

    let cache = Arc::new(RecordingCache::default());
    let engine = Engine::builder()
        .database(db.clone())
        .revalidate(cache.clone())
        .clock(today)
        .build()
        .unwrap();
    (engine, cache, db)
}

async fn only_invoice_id(engine: &Engine) -> String {
    let invoices = engine.invoices().await.unwrap();
    assert_eq!(invoices.len(), 1);
    invoices[0].id.clone()
}

#[tokio::test]
async fn create_issues_one_insert_in_cents_dated_today() {
    let store = Arc::new(RecordingStore::default());
    let (engine, cache) = recording_engine(store.clone());

    let outcome = engine
        .create_invoice(&form(&[
            ("customerId", "c1"),
            ("amount", "45.5"),
            ("status", "pending"),
        ]))
        .await
        .unwrap();

    assert_eq!(outcome, ActionOutcome::Redirect(INVOICES_PATH.to_string()));
    assert_eq!(
        store.writes(),
        vec![Write::Insert(NewInvoice {
            customer_id: "c1".to_string(),
            amount: engine::MoneyCents::new(4550),
            status: InvoiceStatus::Pending,
            date: fixed_today(),
        })]
    );
    assert_eq!(cache.paths(), vec![INVOICES_PATH.to_string()]);
}

#[tokio::test]
async fn create_with_empty_customer_never_writes() {
    let store = Arc::new(RecordingStore::default());
    let (engine, cache) = recording_engine(store.clone());

    let state = engine
        .create_invoice(&form(&[("customerId", ""), ("amount", "10"), ("status", "paid")]))
        .await
        .unwrap_err();

    assert_eq!(state.kind, FailureKind::Validation);
    assert_eq!(state.message, "Missing Fields. Failed to Create Invoice.");
    assert!(!state.errors.get(CUSTOMER_ID).unwrap().is_empty());
    assert!(store.writes().is_empty());
    assert!(cache.paths().is_empty());
}

#[tokio::test]
async fn non_positive_amount_never_writes() {
    let store = Arc::new(RecordingStore::default());
    let (engine, cache) = recording_engine(store.clone());

    for amount in ["0", "-12.50"] {
        let state = engine
            .create_invoice(&form(&[
                ("customerId", "c1"),
                ("amount", amount),
                ("status", "paid"),
            ]))
            .await
            .unwrap_err();
        assert!(state.errors.get(AMOUNT).is_some(), "amount {amount}");
    }

    assert!(store.writes().is_empty());
    assert!(cache.paths().is_empty());
}

#[tokio::test]
async fn failed_insert_reports_database_error_without_side_effects() {
    let store = Arc::new(RecordingStore::failing());
    let (engine, cache) = recording_engine(store.clone());

    let state = engine
        .create_invoice(&form(&[("customerId", "c1"), ("amount", "10"), ("status", "paid")]))
        .await
        .unwrap_err();

    assert_eq!(state, ActionState::database(engine::Operation::Create));
    assert!(state.message.starts_with("Database error"));
    assert_eq!(store.writes().len(), 1);
    assert!(cache.paths().is_empty());
}

#[tokio::test]
async fn update_validates_like_create() {
    let store = Arc::new(RecordingStore::default());
    let (engine, cache) = recording_engine(store.clone());

    let state = engine
        .update_invoice("inv-1", &form(&[("customerId", "c1"), ("status", "paid")]))
        .await
        .unwrap_err();

    assert_eq!(state.message, "Missing Fields. Failed to Update Invoice.");
    assert!(state.errors.get(AMOUNT).is_some());
    assert!(store.writes().is_empty());
    assert!(cache.paths().is_empty());
}

#[tokio::test]
async fn failed_update_and_delete_are_reported() {
    let store = Arc::new(RecordingStore::failing());
    let (engine, cache) = recording_engine(store.clone());

    let state = engine
        .update_invoice(
            "inv-1",
            &form(&[("customerId", "c1"), ("amount", "3"), ("status", "paid")]),
        )
        .await
        .unwrap_err();
    assert_eq!(state.message, "Database error: Failed to update invoice");

    let state = engine.delete_invoice("inv-1").await.unwrap_err();
    assert_eq!(state.message, "Database error: Failed to delete invoice");
    assert_eq!(state.kind, FailureKind::Database);

    assert!(cache.paths().is_empty());
}

#[tokio::test]
async fn delete_without_id_is_rejected() {
    let store = Arc::new(RecordingStore::default());
    let (engine, cache) = recording_engine(store.clone());

    let state = engine.delete_invoice("").await.unwrap_err();
    assert_eq!(state.kind, FailureKind::Validation);
    assert!(store.writes().is_empty());
    assert!(cache.paths().is_empty());
}

#[tokio::test]
async fn create_persists_cents_and_date() {
    let (engine, cache, _db) = engine_with_db(fixed_today).await;

    engine
        .create_invoice(&form(&[
            ("customerId", "c1"),
            ("amount", "45.5"),
            ("status", "pending"),
        ]))
        .await
        .unwrap();

    let id = only_invoice_id(&engine).await;
    assert_eq!(id.len(), 32);
    let invoice = engine.invoice(&id).await.unwrap();
    assert_eq!(invoice.amount.cents(), 4550);
    assert_eq!(invoice.status, InvoiceStatus::Pending);
    assert_eq!(invoice.customer_id, "c1");
    assert_eq!(invoice.date, fixed_today());
    assert_eq!(cache.paths(), vec![INVOICES_PATH.to_string()]);

    let listed = engine.invoices().await.unwrap();
    assert_eq!(listed[0].customer_name.as_deref(), Some("Evil Rabbit"));
}

#[tokio::test]
async fn create_for_unknown_customer_is_a_database_error() {
    let (engine, cache, _db) = engine_with_db(fixed_today).await;

    let state = engine
        .create_invoice(&form(&[
            ("customerId", "nobody"),
            ("amount", "5"),
            ("status", "paid"),
        ]))
        .await
        .unwrap_err();

    assert_eq!(state.message, "Database error: Failed to create invoice");
    assert!(engine.invoices().await.unwrap().is_empty());
    assert!(cache.paths().is_empty());
}

#[tokio::test]
async fn update_rewrites_fields_but_keeps_date() {
    let (engine, _cache, db) = engine_with_db(fixed_today).await;
    engine
        .create_invoice(&form(&[("customerId", "c1"), ("amount", "10"), ("status", "pending")]))
        .await
        .unwrap();
    let id = only_invoice_id(&engine).await;

    // A later clock must not leak into an update.
    let cache = Arc::new(RecordingCache::default());
    let later = Engine::builder()
        .database(db.clone())
        .revalidate(cache.clone())
        .clock(later_today)
        .build()
        .unwrap();

    let outcome = later
        .update_invoice(
            &id,
            &form(&[("customerId", "c2"), ("amount", "99.99"), ("status", "paid")]),
        )
        .await
        .unwrap();
    assert_eq!(outcome, ActionOutcome::Redirect(INVOICES_PATH.to_string()));
    assert_eq!(cache.paths(), vec![INVOICES_PATH.to_string()]);

    let invoice = later.invoice(&id).await.unwrap();
    assert_eq!(invoice.customer_id, "c2");
    assert_eq!(invoice.amount.cents(), 9999);
    assert_eq!(invoice.status, InvoiceStatus::Paid);
    assert_eq!(invoice.date, fixed_today());
}

#[tokio::test]
async fn delete_only_touches_its_row_and_is_repeatable() {
    let (engine, cache, _db) = engine_with_db(fixed_today).await;
    for customer in ["c1", "c2"] {
        engine
            .create_invoice(&form(&[
                ("customerId", customer),
                ("amount", "1"),
                ("status", "paid"),
            ]))
            .await
            .unwrap();
    }
    let before = engine.invoices().await.unwrap();
    assert_eq!(before.len(), 2);
    let target = before[0].id.clone();
    let survivor = before[1].id.clone();

    assert_eq!(
        engine.delete_invoice(&target).await.unwrap(),
        ActionOutcome::Revalidated
    );
    assert_eq!(
        engine.delete_invoice(&target).await.unwrap(),
        ActionOutcome::Revalidated
    );

    let after = engine.invoices().await.unwrap();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].id, survivor);
    // two creates and two deletes
    assert_eq!(cache.paths().len(), 4);
}

#[tokio::test]
async fn missing_invoice_is_not_found() {
    let (engine, _cache, _db) = engine_with_db(fixed_today).await;

    let err = engine.invoice("missing").await.unwrap_err();
    assert_eq!(
        err,
        engine::EngineError::KeyNotFound("invoice missing".to_string())
    );
}

#[tokio::test]
async fn customers_are_listed_by_name() {
    let (engine, _cache, _db) = engine_with_db(fixed_today).await;

    let names: Vec<String> = engine
        .customers()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Delba de Oliveira", "Evil Rabbit"]);
}

#[test]
fn builder_requires_store_and_cache() {
    let err = Engine::builder().build().unwrap_err();
    assert_eq!(err, engine::EngineError::MissingField("store".to_string()));

    let err = Engine::builder()
        .store(Arc::new(RecordingStore::default()))
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        engine::EngineError::MissingField("revalidate".to_string())
    );
}
