use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{
    dto::{FeeEvent, StudentRow},
    model::Student,
    stats::DashboardStats,
    FinanceStore,
};

use super::{apply_or_skip, write_report};

use csv_async::{AsyncReaderBuilder, Error as CsvError, Trim};
use tokio::fs::File;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;

const BUFFER_SIZE: usize = 1024;

type Result<T, E = Box<dyn Error + Send + Sync>> = std::result::Result<T, E>;

/// Replays fee events asynchronously and writes the resulting student
/// balances to the provided writer.
/// Spawns two tasks:
/// * CSV reader - streams events from the input file, deserializes them and sends them to the processor via channel.
/// * Processor - owns the store and applies events from the channel until it is closed.
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
pub async fn run<P, W>(
    roster_path: Option<&Path>,
    events_path: P,
    writer: W,
) -> Result<DashboardStats>
where
    P: AsRef<Path>,
    W: Write,
{
    let store = match roster_path {
        Some(path) => load_roster(path).await?,
        None => FinanceStore::seeded(),
    };

    // Create channel for passing events from reader to processor
    let (tx, rx) = mpsc::channel(BUFFER_SIZE);
    let events_path = events_path.as_ref().to_owned();

    let reader_handle = tokio::spawn(read_events(events_path, tx));
    let processor_handle = tokio::spawn(process_events(store, rx));

    // Wait for reader to finish and propagate any errors
    reader_handle.await??;

    // Get final store state
    let store = processor_handle.await?;

    Ok(write_report(&store, writer)?)
}

/// Builds a store from a student CSV file.
async fn load_roster(path: &Path) -> Result<FinanceStore> {
    let file = File::open(path).await?;
    let mut csv_reader = AsyncReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .create_deserializer(file);

    let mut students = Vec::new();
    let mut records = csv_reader.deserialize::<StudentRow>();
    while let Some(row) = records.next().await {
        students.push(Student::from(row?));
    }
    Ok(FinanceStore::with_students(students)?)
}

/// Reads and deserializes fee events from a CSV file.
/// Sends them, tagged with their line number, through the provided channel.
async fn read_events(
    events_path: PathBuf,
    tx: mpsc::Sender<(u64, FeeEvent)>,
) -> Result<(), CsvError> {
    let file = File::open(events_path).await?;
    let mut csv_reader = AsyncReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .create_deserializer(file);

    let mut records = csv_reader.deserialize::<FeeEvent>();
    // Line 1 is the header
    let mut line = 1;
    while let Some(result) = records.next().await {
        line += 1;
        match result {
            Ok(event) => {
                if tx.send((line, event)).await.is_err() {
                    // Receiver dropped, exit gracefully
                    break;
                }
            }
            // CSV parsing errors are critical - propagate them
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Applies events received through the channel.
/// Returns the final store once the channel is closed by the reader.
async fn process_events(
    mut store: FinanceStore,
    mut rx: mpsc::Receiver<(u64, FeeEvent)>,
) -> FinanceStore {
    while let Some((line, event)) = rx.recv().await {
        apply_or_skip(&mut store, line, event);
    }
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_example_input() -> Result<()> {
        let mut output = Vec::new();
        let stats = run(
            Some(Path::new("data/students.csv")),
            "data/example_events.csv",
            &mut output,
        )
        .await?;

        let expected = "id,name,class,admission_number,balance,status,guardian_name,guardian_phone,guardian_email
1,Amani Wanjiru,Grade 4,NA2024001,10000.00,active,Grace Wanjiru,+254712345678,grace.wanjiru@example.com
2,Baraka Otieno,Grade 6,NA2024002,18000.00,active,Peter Otieno,+254723456789,peter.otieno@example.com
3,Chebet Kiprono,Grade 2,NA2024003,20000.00,active,Ruth Kiprono,+254734567890,ruth.kiprono@example.com
";
        assert_eq!(String::from_utf8(output)?, expected);
        assert_eq!(stats.total_collected, dec!(6700));
        Ok(())
    }

    #[tokio::test]
    async fn test_matches_sync_runner() -> Result<()> {
        let mut async_output = Vec::new();
        let async_stats = run(None, "data/example_events.csv", &mut async_output).await?;

        let mut sync_output = Vec::new();
        let sync_stats = crate::run(None, "data/example_events.csv", &mut sync_output)
            .map_err(|e| e.to_string())?;

        assert_eq!(async_output, sync_output);
        assert_eq!(async_stats, sync_stats);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_roster_file() {
        let result = run(
            Some(Path::new("data/does_not_exist.csv")),
            "data/example_events.csv",
            Vec::new(),
        )
        .await;
        assert!(result.is_err());
    }
}
