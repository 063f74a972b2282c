//! Invoice endpoints: the cached list, a single invoice and the three
//! form-driven commands.

use axum::{
    Extension, Form, Json,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use engine::{FormData, INVOICES_PATH, Invoice, InvoiceSummary};
use serde::Serialize;

use crate::{
    ServerError, action_response,
    server::{ServerState, SessionUser},
};

#[derive(Debug, Serialize)]
pub struct InvoiceView {
    pub id: String,
    pub customer_id: String,
    pub customer_name: Option<String>,
    pub amount: i64,
    pub amount_display: String,
    pub status: String,
    pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct InvoiceListResponse {
    pub invoices: Vec<InvoiceView>,
}

fn map_summary(invoice: InvoiceSummary) -> InvoiceView {
    InvoiceView {
        id: invoice.id,
        customer_id: invoice.customer_id,
        customer_name: invoice.customer_name,
        amount: invoice.amount.cents(),
        amount_display: invoice.amount.to_string(),
        status: invoice.status.to_string(),
        date: invoice.date,
    }
}

fn map_invoice(invoice: Invoice) -> InvoiceView {
    InvoiceView {
        id: invoice.id,
        customer_id: invoice.customer_id,
        customer_name: None,
        amount: invoice.amount.cents(),
        amount_display: invoice.amount.to_string(),
        status: invoice.status.to_string(),
        date: invoice.date,
    }
}

fn json_body(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

/// Serves the invoice list from the page cache, rendering it on a miss.
pub async fn list(State(state): State<ServerState>) -> Result<Response, ServerError> {
    if let Some(body) = state.cache.get(INVOICES_PATH) {
        return Ok(json_body(body));
    }
    let generation = state.cache.generation(INVOICES_PATH);

    let invoices = state
        .engine
        .invoices()
        .await?
        .into_iter()
        .map(map_summary)
        .collect();
    let body = serde_json::to_string(&InvoiceListResponse { invoices })?;
    state.cache.put(INVOICES_PATH, generation, body.clone());

    Ok(json_body(body))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<InvoiceView>, ServerError> {
    let invoice = state.engine.invoice(&id).await?;
    Ok(Json(map_invoice(invoice)))
}

pub async fn create(
    Extension(user): Extension<SessionUser>,
    State(state): State<ServerState>,
    Form(form): Form<FormData>,
) -> Result<Response, ServerError> {
    tracing::info!(user = %user.email, "create invoice");
    action_response(state.engine.create_invoice(&form).await)
}

pub async fn update(
    Extension(user): Extension<SessionUser>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Form(form): Form<FormData>,
) -> Result<Response, ServerError> {
    tracing::info!(user = %user.email, id = %id, "update invoice");
    action_response(state.engine.update_invoice(&id, &form).await)
}

pub async fn delete(
    Extension(user): Extension<SessionUser>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Response, ServerError> {
    tracing::info!(user = %user.email, id = %id, "delete invoice");
    action_response(state.engine.delete_invoice(&id).await)
}
