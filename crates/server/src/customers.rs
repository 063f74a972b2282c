use axum::{Json, extract::State};
use serde::Serialize;

use crate::{ServerError, server::ServerState};

#[derive(Debug, Serialize)]
pub struct CustomerListResponse {
    pub customers: Vec<engine::Customer>,
}

/// Customers offered by the invoice form.
pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<CustomerListResponse>, ServerError> {
    let customers = state.engine.customers().await?;
    Ok(Json(CustomerListResponse { customers }))
}
