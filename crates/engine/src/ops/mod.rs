use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sea_orm::DatabaseConnection;

use crate::{EngineError, InvoiceStore, ResultEngine, Revalidate, SeaOrmStore};

mod invoices;
mod queries;

/// Returns the calendar date stamped on new invoices.
pub type Clock = fn() -> NaiveDate;

fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Runs the invoice commands against an [`InvoiceStore`], notifying a
/// [`Revalidate`] after every successful write.
pub struct Engine {
    store: Arc<dyn InvoiceStore>,
    cache: Arc<dyn Revalidate>,
    today: Clock,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").finish_non_exhaustive()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    store: Option<Arc<dyn InvoiceStore>>,
    cache: Option<Arc<dyn Revalidate>>,
    today: Option<Clock>,
}

impl EngineBuilder {
    /// Pass the required database. Shortcut for a [`SeaOrmStore`].
    pub fn database(self, db: DatabaseConnection) -> EngineBuilder {
        self.store(Arc::new(SeaOrmStore::new(db)))
    }

    /// Pass the persistence gateway.
    pub fn store(mut self, store: Arc<dyn InvoiceStore>) -> EngineBuilder {
        self.store = Some(store);
        self
    }

    /// Pass the cache notified after successful writes.
    pub fn revalidate(mut self, cache: Arc<dyn Revalidate>) -> EngineBuilder {
        self.cache = Some(cache);
        self
    }

    /// Override the clock used to date new invoices (defaults to UTC today).
    pub fn clock(mut self, today: Clock) -> EngineBuilder {
        self.today = Some(today);
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            store: self
                .store
                .ok_or_else(|| EngineError::MissingField("store".to_string()))?,
            cache: self
                .cache
                .ok_or_else(|| EngineError::MissingField("revalidate".to_string()))?,
            today: self.today.unwrap_or(utc_today),
        })
    }
}
