//! Invoice commands: validate, transform, write once, invalidate, redirect.
//!
//! Nothing after the write runs when the write fails, and nothing runs at
//! all when validation fails.

use crate::{
    ActionOutcome, ActionResult, ActionState, FieldErrors, FormData, INVOICES_PATH,
    InvoiceChanges, InvoiceSchema, NewInvoice, Operation,
};

use super::Engine;

impl Engine {
    /// Creates an invoice from a raw form.
    ///
    /// The amount is stored in cents and the date is stamped now. On success
    /// the invoice list is revalidated and the caller redirected to it.
    pub async fn create_invoice(&self, form: &FormData) -> ActionResult {
        let fields = InvoiceSchema::CREATE
            .validate(None, form)
            .map_err(|errors| ActionState::invalid(Operation::Create, errors))?;

        let invoice = NewInvoice {
            customer_id: fields.customer_id,
            amount: fields.amount,
            status: fields.status,
            date: (self.today)(),
        };
        tracing::debug!(
            customer_id = %invoice.customer_id,
            amount = invoice.amount.cents(),
            status = %invoice.status,
            date = %invoice.date,
            "inserting invoice"
        );

        if let Err(err) = self.store.insert_invoice(&invoice).await {
            tracing::error!("failed to create invoice: {err}");
            return Err(ActionState::database(Operation::Create));
        }

        Ok(self.after_write(Some(INVOICES_PATH)))
    }

    /// Updates customer, amount and status of an existing invoice. The date
    /// is never touched.
    pub async fn update_invoice(&self, id: &str, form: &FormData) -> ActionResult {
        let fields = InvoiceSchema::UPDATE
            .validate(Some(id), form)
            .map_err(|errors| ActionState::invalid(Operation::Update, errors))?;

        let changes = InvoiceChanges {
            customer_id: fields.customer_id,
            amount: fields.amount,
            status: fields.status,
        };

        match self.store.update_invoice(id, &changes).await {
            Ok(0) => tracing::warn!(id, "update matched no invoice"),
            Ok(_) => tracing::info!(id, "invoice updated"),
            Err(err) => {
                tracing::error!("failed to update invoice {id}: {err}");
                return Err(ActionState::database(Operation::Update));
            }
        }

        Ok(self.after_write(Some(INVOICES_PATH)))
    }

    /// Deletes one invoice by id. The caller stays on the current view.
    ///
    /// Deleting an id that is already gone is not an error: the list is
    /// still revalidated.
    pub async fn delete_invoice(&self, id: &str) -> ActionResult {
        if id.is_empty() {
            return Err(ActionState::invalid(Operation::Delete, FieldErrors::default()));
        }

        match self.store.delete_invoice(id).await {
            Ok(0) => tracing::debug!(id, "invoice already deleted"),
            Ok(_) => tracing::info!(id, "invoice deleted"),
            Err(err) => {
                tracing::error!("failed to delete invoice {id}: {err}");
                return Err(ActionState::database(Operation::Delete));
            }
        }

        Ok(self.after_write(None))
    }

    fn after_write(&self, redirect: Option<&str>) -> ActionOutcome {
        self.cache.revalidate_path(INVOICES_PATH);
        match redirect {
            Some(path) => ActionOutcome::Redirect(path.to_string()),
            None => ActionOutcome::Revalidated,
        }
    }
}
