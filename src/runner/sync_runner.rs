use std::error::Error;
use std::io::Write;
use std::path::Path;

use crate::{
    csv_utils::read_csv,
    dto::{FeeEvent, StudentRow},
    model::Student,
    stats::DashboardStats,
    FinanceStore,
};

use super::{apply_or_skip, write_report};

/// Replays the given fee event file against a roster and writes the resulting
/// student balances to the provided writer.
///
/// # Arguments
/// * `roster_path` - Student CSV to start from; the built-in roster when `None`
/// * `events_path` - Path to the CSV file containing fee events
/// * `writer` - Where to write the student balance report (e.g. stdout)
///
/// # Errors
/// Returns an error if:
/// * An input file cannot be read
/// * A CSV is malformed
/// * The roster repeats an id or admission number
/// * Writing to the output fails
pub fn run<P, W>(
    roster_path: Option<&Path>,
    events_path: P,
    writer: W,
) -> Result<DashboardStats, Box<dyn Error>>
where
    P: AsRef<Path>,
    W: Write,
{
    let mut store = match roster_path {
        Some(path) => load_roster(path)?,
        None => FinanceStore::seeded(),
    };

    let events_iter = read_csv::<FeeEvent, _>(events_path)?;
    for (index, event) in events_iter.enumerate() {
        // CSV parsing errors are critical - propagate them
        let event = event?;
        // Line 1 is the header
        apply_or_skip(&mut store, index as u64 + 2, event);
    }

    Ok(write_report(&store, writer)?)
}

/// Builds a store from a student CSV file.
pub fn load_roster<P: AsRef<Path>>(path: P) -> Result<FinanceStore, Box<dyn Error>> {
    let students = read_csv::<StudentRow, _>(path)?
        .map(|row| row.map(Student::from))
        .collect::<csv::Result<Vec<_>>>()?;
    Ok(FinanceStore::with_students(students)?)
}
