use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use bursar::{run, run_async, DashboardStats};

#[derive(Parser, Debug)]
#[command(
    name = "bursar",
    about = "Replays school fee events against a student roster and reports balances"
)]
struct Cli {
    /// Fee event CSV to replay
    events: PathBuf,

    /// Student roster CSV (defaults to the built-in roster)
    #[arg(short, long)]
    students: Option<PathBuf>,

    /// Stream events through the async runner
    #[arg(long = "async")]
    use_async: bool,

    /// Print the dashboard summary to stderr after the report
    #[arg(long)]
    summary: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run_app(&cli) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn run_app(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let stats: DashboardStats = if cli.use_async {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime
            .block_on(run_async(cli.students.as_deref(), &cli.events, io::stdout()))
            .map_err(|e| e as Box<dyn Error>)?
    } else {
        run(cli.students.as_deref(), &cli.events, io::stdout())?
    };

    if cli.summary {
        eprintln!("{}", stats);
    }
    Ok(())
}
