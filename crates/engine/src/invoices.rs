//! Invoice primitives.
//!
//! An `Invoice` bills one customer for an amount in cents. Its `date` is
//! stamped when the invoice is created and never rewritten afterwards.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = EngineError;

    /// Matches the stored spelling exactly: no trimming, no case folding.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            other => Err(EngineError::InvalidInput(format!(
                "invalid invoice status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Invoice {
    pub id: String,
    pub customer_id: String,
    pub amount: MoneyCents,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// An invoice as listed on the dashboard, with the customer's display name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InvoiceSummary {
    pub id: String,
    pub customer_id: String,
    pub customer_name: Option<String>,
    pub amount: MoneyCents,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// Values written by the create command. The id is left to the datastore.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewInvoice {
    pub customer_id: String,
    pub amount: MoneyCents,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// Values written by the update command. `date` is deliberately absent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvoiceChanges {
    pub customer_id: String,
    pub amount: MoneyCents,
    pub status: InvoiceStatus,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub customer_id: String,
    pub amount: i64,
    pub status: String,
    pub date: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Customer,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Invoice {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            status: model.status.parse()?,
            amount: MoneyCents::new(model.amount),
            id: model.id,
            customer_id: model.customer_id,
            date: model.date,
        })
    }
}

impl TryFrom<(Model, Option<super::customers::Model>)> for InvoiceSummary {
    type Error = EngineError;

    fn try_from(
        (invoice, customer): (Model, Option<super::customers::Model>),
    ) -> Result<Self, Self::Error> {
        let invoice = Invoice::try_from(invoice)?;
        Ok(Self {
            id: invoice.id,
            customer_id: invoice.customer_id,
            customer_name: customer.map(|c| c.name),
            amount: invoice.amount,
            status: invoice.status,
            date: invoice.date,
        })
    }
}
