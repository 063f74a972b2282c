use crate::{Customer, EngineError, Invoice, InvoiceSummary, ResultEngine};

use super::Engine;

impl Engine {
    /// Invoices shown on the dashboard list, newest first.
    pub async fn invoices(&self) -> ResultEngine<Vec<InvoiceSummary>> {
        self.store
            .list_invoices()
            .await?
            .into_iter()
            .map(InvoiceSummary::try_from)
            .collect()
    }

    /// A single invoice, as loaded into the edit form.
    pub async fn invoice(&self, id: &str) -> ResultEngine<Invoice> {
        let model = self
            .store
            .find_invoice(id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("invoice {id}")))?;
        Invoice::try_from(model)
    }

    /// Customers selectable in the invoice form, by name.
    pub async fn customers(&self) -> ResultEngine<Vec<Customer>> {
        Ok(self.store.list_customers().await?)
    }
}
