pub mod csv_utils;
pub mod dto;
mod error;
pub mod model;
pub mod money;
pub mod nav;
mod runner;
mod seed;
mod stats;
mod store;
mod stores;

pub use dto::{FeeCommand, FeeEvent, FeeEventType, StudentRow};
pub use error::Error;
pub use model::{
    AdmissionNumber, Invoice, InvoiceId, InvoiceStatus, LineItem, NewInvoice, NewPayment,
    NewStudent, Payment, PaymentId, PaymentStatus, Student, StudentId, StudentPatch,
    StudentStatus,
};
pub use nav::{NavItem, Role};
pub use runner::{run, run_async};
pub use stats::DashboardStats;
pub use store::{FinanceStore, StoreEvent, SubscriptionId};
