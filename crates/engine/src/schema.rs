//! Invoice form schema.
//!
//! Raw form input is a flat `field -> string` map. [`InvoiceSchema::validate`]
//! coerces it into [`InvoiceFields`] or reports every failing field at once
//! as [`FieldErrors`]; it never panics and never stops at the first failure.

use std::{borrow::Cow, collections::BTreeMap, collections::HashMap};

use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{InvoiceStatus, MoneyCents};

/// Raw form submission: field name to raw string value.
pub type FormData = HashMap<String, String>;

pub const CUSTOMER_ID: &str = "customerId";
pub const AMOUNT: &str = "amount";
pub const STATUS: &str = "status";
pub const ID: &str = "id";

const CUSTOMER_MESSAGE: &str = "Please select a customer.";
const AMOUNT_MESSAGE: &str = "Please enter an amount greater than $0.";
const AMOUNT_NAN_MESSAGE: &str = "Please enter a valid amount.";
const STATUS_MESSAGE: &str = "Please select an invoice status.";
const ID_MESSAGE: &str = "Missing invoice id.";

/// Per-field validation messages, keyed by form field name.
///
/// Serializes as `{"customerId": ["..."], ...}` with only failing fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Messages reported for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::default();
        for (field, errs) in errors.field_errors() {
            let key = form_key(field.as_ref());
            for err in errs {
                let message = err
                    .message
                    .clone()
                    .unwrap_or_else(|| err.code.clone());
                out.push(key, message);
            }
        }
        out
    }
}

/// Typed invoice data produced by a successful validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvoiceFields {
    pub id: Option<String>,
    pub customer_id: String,
    pub amount: MoneyCents,
    pub status: InvoiceStatus,
}

/// Which fields a form must carry.
///
/// `date` is never part of a form: it is stamped on create and immutable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvoiceSchema {
    requires_id: bool,
}

impl InvoiceSchema {
    /// `customerId`, `amount`, `status`.
    pub const CREATE: InvoiceSchema = InvoiceSchema { requires_id: false };
    /// `id`, `customerId`, `amount`, `status`.
    pub const UPDATE: InvoiceSchema = InvoiceSchema { requires_id: true };

    /// Validates `form`, taking the id from `id` when the schema requires one.
    ///
    /// Missing fields are treated as empty strings and therefore fail.
    pub fn validate(&self, id: Option<&str>, form: &FormData) -> Result<InvoiceFields, FieldErrors> {
        let field = |name: &str| form.get(name).cloned().unwrap_or_default();
        let input = InvoiceInput {
            id: self
                .requires_id
                .then(|| id.unwrap_or_default().to_string()),
            customer_id: field(CUSTOMER_ID),
            amount: field(AMOUNT),
            status: field(STATUS),
        };

        input.validate()?;
        input.into_fields()
    }
}

#[derive(Debug, Validate)]
struct InvoiceInput {
    #[validate(custom(function = "present_id"))]
    id: Option<String>,
    #[validate(custom(function = "selected_customer"))]
    customer_id: String,
    #[validate(custom(function = "positive_amount"))]
    amount: String,
    #[validate(custom(function = "known_status"))]
    status: String,
}

impl InvoiceInput {
    fn into_fields(self) -> Result<InvoiceFields, FieldErrors> {
        let mut errors = FieldErrors::default();
        let amount = self.amount.parse::<MoneyCents>().ok();
        let status = self.status.parse::<InvoiceStatus>().ok();
        if amount.is_none() {
            errors.push(AMOUNT, AMOUNT_NAN_MESSAGE);
        }
        if status.is_none() {
            errors.push(STATUS, STATUS_MESSAGE);
        }

        match (amount, status) {
            (Some(amount), Some(status)) => Ok(InvoiceFields {
                id: self.id,
                customer_id: self.customer_id,
                amount,
                status,
            }),
            _ => Err(errors),
        }
    }
}

fn form_key(field: &str) -> &str {
    match field {
        "customer_id" => CUSTOMER_ID,
        "amount" => AMOUNT,
        "status" => STATUS,
        "id" => ID,
        other => other,
    }
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn present_id(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(invalid("id", ID_MESSAGE));
    }
    Ok(())
}

fn selected_customer(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("customer_id", CUSTOMER_MESSAGE));
    }
    Ok(())
}

/// Empty input coerces to zero, which is not greater than zero.
fn positive_amount(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("amount", AMOUNT_MESSAGE));
    }
    match value.parse::<MoneyCents>() {
        Ok(amount) if amount.is_positive() => Ok(()),
        Ok(_) => Err(invalid("amount", AMOUNT_MESSAGE)),
        Err(_) => Err(invalid("amount", AMOUNT_NAN_MESSAGE)),
    }
}

fn known_status(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<InvoiceStatus>()
        .map(|_| ())
        .map_err(|_| invalid("status", STATUS_MESSAGE))
}
