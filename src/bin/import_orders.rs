use chrono::Local;
use clap::Parser;
use order_dashboard::import::{import_export, SavedExport, PAGE_SIZE};
use order_dashboard::storage::write_orders;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Turns saved consumer-order pages into the dashboard's orders document.
#[derive(Debug, Parser)]
#[command(name = "import_orders", version)]
struct Cli {
    /// JSON file holding saved GraphQL pages or a flat array of orders
    input: PathBuf,

    /// Where to write the orders document
    #[arg(short, long, default_value = "data/orders.json")]
    output: PathBuf,

    /// Page size the export was fetched with
    #[arg(long, default_value_t = PAGE_SIZE)]
    page_size: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    let bytes = tokio::fs::read(&cli.input).await?;
    let export: SavedExport = serde_json::from_slice(&bytes)?;
    let document = import_export(export, cli.page_size, Local::now().date_naive())?;
    write_orders(&cli.output, &document).await?;

    info!(
        written = document.orders.len(),
        "wrote orders to {}",
        cli.output.display()
    );
    Ok(())
}
