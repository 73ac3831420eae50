//! Domain-specific errors for the fee ledger.
//!
//! Contains error variants for business rule failures like:
//! - Student roster errors (duplicate admission number)
//! - Fee event validation errors (non-positive amount, missing fields)
//! - Currency display strings that cannot be parsed back into an amount
//!
//! Unknown ids on update/delete are not errors: those calls are no-ops.
//! CSV and I/O failures are technical errors and are reported by the runner.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("amount must be positive")]
    AmountMustBePositive,
    #[error("admission number already in use: {0}")]
    DuplicateAdmissionNumber(String),
    #[error("student id already in use: {0}")]
    DuplicateStudentId(u32),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("invalid fee event: {0}")]
    InvalidEvent(&'static str),
}
