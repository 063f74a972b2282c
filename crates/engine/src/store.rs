//! Persistence gateway.
//!
//! [`InvoiceStore`] is the only thing the commands know about the datastore.
//! [`SeaOrmStore`] is the production implementation; every statement it
//! issues binds its values as parameters.

use async_trait::async_trait;
use sea_orm::{
    ActiveValue, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    prelude::*, sea_query::Expr,
};

use crate::{InvoiceChanges, NewInvoice, customers, invoices};

#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// `INSERT INTO invoices (customer_id, amount, status, date) VALUES (?, ?, ?, ?)`
    async fn insert_invoice(&self, invoice: &NewInvoice) -> Result<(), DbErr>;

    /// `UPDATE invoices SET customer_id = ?, amount = ?, status = ? WHERE id = ?`
    ///
    /// Returns the number of rows touched.
    async fn update_invoice(&self, id: &str, changes: &InvoiceChanges) -> Result<u64, DbErr>;

    /// `DELETE FROM invoices WHERE id = ?`
    ///
    /// Returns the number of rows removed.
    async fn delete_invoice(&self, id: &str) -> Result<u64, DbErr>;

    async fn find_invoice(&self, id: &str) -> Result<Option<invoices::Model>, DbErr>;

    /// All invoices with their customer, newest first.
    async fn list_invoices(
        &self,
    ) -> Result<Vec<(invoices::Model, Option<customers::Model>)>, DbErr>;

    async fn list_customers(&self) -> Result<Vec<customers::Model>, DbErr>;
}

#[derive(Clone, Debug)]
pub struct SeaOrmStore {
    database: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

#[async_trait]
impl InvoiceStore for SeaOrmStore {
    async fn insert_invoice(&self, invoice: &NewInvoice) -> Result<(), DbErr> {
        let model = invoices::ActiveModel {
            id: ActiveValue::NotSet,
            customer_id: ActiveValue::Set(invoice.customer_id.clone()),
            amount: ActiveValue::Set(invoice.amount.cents()),
            status: ActiveValue::Set(invoice.status.as_str().to_string()),
            date: ActiveValue::Set(invoice.date),
        };
        invoices::Entity::insert(model)
            .exec_without_returning(&self.database)
            .await?;
        Ok(())
    }

    async fn update_invoice(&self, id: &str, changes: &InvoiceChanges) -> Result<u64, DbErr> {
        let result = invoices::Entity::update_many()
            .col_expr(
                invoices::Column::CustomerId,
                Expr::value(changes.customer_id.clone()),
            )
            .col_expr(invoices::Column::Amount, Expr::value(changes.amount.cents()))
            .col_expr(invoices::Column::Status, Expr::value(changes.status.as_str()))
            .filter(invoices::Column::Id.eq(id))
            .exec(&self.database)
            .await?;
        Ok(result.rows_affected)
    }

    async fn delete_invoice(&self, id: &str) -> Result<u64, DbErr> {
        let result = invoices::Entity::delete_many()
            .filter(invoices::Column::Id.eq(id))
            .exec(&self.database)
            .await?;
        Ok(result.rows_affected)
    }

    async fn find_invoice(&self, id: &str) -> Result<Option<invoices::Model>, DbErr> {
        invoices::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await
    }

    async fn list_invoices(
        &self,
    ) -> Result<Vec<(invoices::Model, Option<customers::Model>)>, DbErr> {
        invoices::Entity::find()
            .find_also_related(customers::Entity)
            .order_by_desc(invoices::Column::Date)
            .order_by_asc(invoices::Column::Id)
            .all(&self.database)
            .await
    }

    async fn list_customers(&self) -> Result<Vec<customers::Model>, DbErr> {
        customers::Entity::find()
            .order_by_asc(customers::Column::Name)
            .all(&self.database)
            .await
    }
}
