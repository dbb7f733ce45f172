use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result, bail};
use receipt_processor::application::processor::ReceiptProcessor;
use receipt_processor::domain::ports::ReceiptStoreBox;
use receipt_processor::domain::receipt::ReceiptId;
use receipt_processor::infrastructure::in_memory::InMemoryReceiptStore;
use receipt_processor::infrastructure::sqlite::SqliteReceiptStore;
use receipt_processor::interfaces::http;
use receipt_processor::interfaces::json::receipt_reader::ReceiptReader;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Storage backend for receipts
    #[arg(long, value_enum, env = "RECEIPTS_BACKEND", default_value_t = Backend::Memory)]
    backend: Backend,

    /// Path to the database (required for sqlite and rocksdb)
    #[arg(long, env = "RECEIPTS_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Log level written to stderr
    #[arg(long, env = "RECEIPTS_LOG", default_value = "info")]
    log_level: Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Backend {
    Memory,
    Sqlite,
    Rocksdb,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve {
        #[arg(long, env = "RECEIPTS_BIND", default_value = "0.0.0.0:8080")]
        bind: SocketAddr,
    },
    /// Ingest receipt JSON files and print one id per line
    Process {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the points awarded to a receipt
    Points { id: String },
    /// Print a stored receipt as JSON
    Show { id: String },
}

fn open_store(backend: Backend, db_path: Option<PathBuf>) -> Result<ReceiptStoreBox> {
    let store: ReceiptStoreBox = match (backend, db_path) {
        (Backend::Memory, _) => Box::new(InMemoryReceiptStore::new()),
        (Backend::Sqlite, Some(path)) => Box::new(SqliteReceiptStore::open(path).into_diagnostic()?),
        #[cfg(feature = "storage-rocksdb")]
        (Backend::Rocksdb, Some(path)) => Box::new(
            receipt_processor::infrastructure::rocksdb::RocksDbReceiptStore::open(path)
                .into_diagnostic()?,
        ),
        #[cfg(not(feature = "storage-rocksdb"))]
        (Backend::Rocksdb, Some(_)) => {
            warn!(
                "RocksDB storage requested, but the 'storage-rocksdb' feature is not enabled. Falling back to in-memory storage."
            );
            Box::new(InMemoryReceiptStore::new())
        }
        (backend, None) => bail!("--db-path is required for the {backend:?} backend"),
    };
    Ok(store)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    let store = open_store(cli.backend, cli.db_path)?;
    let processor = ReceiptProcessor::new(store);

    match cli.command {
        Command::Serve { bind } => {
            http::serve(Arc::new(processor), bind)
                .await
                .into_diagnostic()?;
        }
        Command::Process { files } => {
            for path in files {
                let receipt = match ReceiptReader::open(&path).and_then(|reader| reader.receipt()) {
                    Ok(receipt) => receipt,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "skipping receipt");
                        continue;
                    }
                };
                let id = processor.process(receipt).await.into_diagnostic()?;
                println!("{id}");
            }
        }
        Command::Points { id } => {
            let points = processor
                .points(&ReceiptId::from(id))
                .await
                .into_diagnostic()?;
            println!("{points}");
        }
        Command::Show { id } => {
            let stored = processor
                .receipt(&ReceiptId::from(id))
                .await
                .into_diagnostic()?;
            let json = serde_json::to_string_pretty(&stored).into_diagnostic()?;
            println!("{json}");
        }
    }

    Ok(())
}
