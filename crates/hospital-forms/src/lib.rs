//! Clinical form logic for the hospital desk.
//!
//! This crate holds the paper-form pieces that carry computation: the
//! intake/output Totals Calculator and print-ready HTML rendering of the
//! intake/output chart and the discharge summary sheet.

pub mod intake_output;
pub mod print;

pub use intake_output::*;
pub use print::*;

use thiserror::Error;

/// Form errors.
#[derive(Error, Debug)]
pub enum FormError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid form payload: {0}")]
    InvalidFormat(String),

    #[error("Required field is empty: {0}")]
    MissingField(&'static str),
}

pub type FormResult<T> = Result<T, FormError>;

pub(crate) fn require_non_blank(field: &'static str, value: &str) -> FormResult<()> {
    if value.trim().is_empty() {
        return Err(FormError::MissingField(field));
    }
    Ok(())
}
