//! Invoice dashboard engine.
//!
//! Holds the invoice schema, the create/update/delete commands, the
//! persistence gateway they write through and the credential sign-in. The
//! web host plugs in through [`Revalidate`] and [`auth::IdentityProvider`].

pub use action::{ActionOutcome, ActionResult, ActionState, FailureKind, Operation};
pub use error::EngineError;
pub use invoices::{Invoice, InvoiceChanges, InvoiceStatus, InvoiceSummary, NewInvoice};
pub use money::MoneyCents;
pub use notify::{INVOICES_PATH, Revalidate};
pub use ops::{Clock, Engine, EngineBuilder};
pub use schema::{FieldErrors, FormData, InvoiceFields, InvoiceSchema};
pub use store::{InvoiceStore, SeaOrmStore};

pub mod auth;
pub mod customers;
pub mod invoices;
pub mod schema;
pub mod users;

mod action;
mod error;
mod money;
mod notify;
mod ops;
mod store;

pub type Customer = customers::Model;

pub type ResultEngine<T> = Result<T, EngineError>;
