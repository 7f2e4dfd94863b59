use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result, miette};
use paylane_ipn::application::form::RedirectFormBuilder;
use paylane_ipn::application::processor::NotificationProcessor;
use paylane_ipn::domain::config::GatewayConfig;
use paylane_ipn::domain::ports::{InvoiceStore, TransactionStoreBox};
use paylane_ipn::infrastructure::in_memory::InMemoryTransactionStore;
use paylane_ipn::interfaces::csv::callback_reader::CallbackReader;
use paylane_ipn::interfaces::csv::transaction_writer::TransactionWriter;
use paylane_ipn::interfaces::state::{BillingState, load_settings};
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Gateway settings JSON file
    #[arg(long, global = true, default_value = "settings.json")]
    settings: PathBuf,

    /// Billing state JSON file (invoices, transactions, client balances)
    #[arg(long, global = true, default_value = "state.json")]
    state: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the Paylane redirect form for an invoice as JSON
    Form {
        #[arg(long)]
        invoice: u32,
    },
    /// Replay captured notification callbacks and print the resulting transactions
    Process {
        /// Callbacks CSV file
        input: PathBuf,

        /// Path to persistent transaction database (optional). If provided, uses RocksDB.
        #[arg(long)]
        db_path: Option<PathBuf>,
    },
}

fn transaction_store(db_path: Option<PathBuf>) -> Result<TransactionStoreBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            let store = paylane_ipn::infrastructure::rocksdb::RocksDBStore::open(path)
                .into_diagnostic()?;
            Ok(Box::new(store))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(path) => {
            tracing::warn!(
                db_path = %path.display(),
                "persistent storage requested but the storage-rocksdb feature is not enabled, using in-memory storage"
            );
            Ok(Box::new(InMemoryTransactionStore::new()))
        }
        None => Ok(Box::new(InMemoryTransactionStore::new())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    let cli = Cli::parse();
    let config = GatewayConfig::from_settings(load_settings(&cli.settings).into_diagnostic()?)
        .into_diagnostic()?;
    let state = BillingState::from_path(&cli.state).into_diagnostic()?;

    match cli.command {
        Command::Form { invoice } => {
            let scratch = InMemoryTransactionStore::new();
            let (invoices, _ledger) = state.seed(&scratch).await.into_diagnostic()?;
            let invoice = invoices
                .get(invoice)
                .await
                .into_diagnostic()?
                .ok_or_else(|| miette!("Invoice #{} not found", invoice))?;

            let form = RedirectFormBuilder::new(&config).build(&invoice);
            serde_json::to_writer_pretty(io::stdout().lock(), &form).into_diagnostic()?;
            println!();
        }
        Command::Process { input, db_path } => {
            let transactions = transaction_store(db_path)?;
            let (invoices, ledger) = state.seed(&*transactions).await.into_diagnostic()?;
            let processor =
                NotificationProcessor::new(config, Box::new(invoices), transactions, Box::new(ledger));

            let file = File::open(input).into_diagnostic()?;
            let reader = CallbackReader::new(file);
            for callback in reader.callbacks() {
                match callback {
                    Ok(callback) => {
                        let transaction_id = callback.transaction_id;
                        if let Err(e) = processor.process_notification(callback).await {
                            error!(transaction_id, error = %e, "Error processing notification");
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "Error reading notification");
                    }
                }
            }

            let results = processor.transactions().get_all().await.into_diagnostic()?;
            let stdout = io::stdout();
            let mut writer = TransactionWriter::new(stdout.lock());
            writer.write_transactions(results).into_diagnostic()?;
        }
    }

    Ok(())
}
