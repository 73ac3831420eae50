//! The runner is responsible for loading the roster, replaying a fee event
//! file against the store, and writing the resulting balance report.
//!
//! This module provides both a synchronous and an asynchronous runner implementations.
//!
mod async_runner;
mod sync_runner;

pub use async_runner::run as run_async;
pub use sync_runner::run;

use std::io::Write;

use tracing::{info, warn};

use crate::csv_utils::write_csv;
use crate::dto::{FeeEvent, StudentRow};
use crate::stats::DashboardStats;
use crate::FinanceStore;

/// Applies one event, logging and dropping it when it fails validation.
/// Returns whether the event was applied.
fn apply_or_skip(store: &mut FinanceStore, line: u64, event: FeeEvent) -> bool {
    match store.apply_event(event) {
        Ok(()) => true,
        Err(err) => {
            warn!(line, error = %err, "skipping fee event");
            false
        }
    }
}

/// Writes the roster sorted by student id and returns the dashboard figures.
fn write_report<W: Write>(store: &FinanceStore, writer: W) -> csv::Result<DashboardStats> {
    let mut rows: Vec<_> = store.students().iter().map(StudentRow::from).collect();
    rows.sort_by_key(|row| row.id);
    write_csv(writer, rows.into_iter())?;

    let stats = store.stats();
    info!(
        students = stats.total_students,
        payments = store.payments().len(),
        invoices = store.invoices().len(),
        "ledger replay finished"
    );
    Ok(stats)
}
