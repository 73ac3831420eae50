//! Storage layer for the fee ledger. Provides storage for:
//! - The student roster and balances ([`StudentsStore`])
//! - Payment history ([`PaymentsStore`])
//! - Issued invoices ([`InvoicesStore`])
//!
//! Each store owns its collection outright and hands out read-only views.
//! Cross-collection rules (balance side effects) live in [`crate::FinanceStore`].

mod invoices;
mod payments;
mod students;

pub use invoices::InvoicesStore;
pub use payments::PaymentsStore;
pub use students::StudentsStore;
