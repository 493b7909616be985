//! Compose and print a ticket for an order record
//!
//! Stand-in for the order-creation HTTP handler: reads an order JSON file,
//! runs the composition/dispatch flow and reports the outcome.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use receipts::{Order, TicketConfig, print_order_ticket};

#[derive(Debug, Parser)]
#[command(name = "print-ticket", about = "Compose and print an order receipt")]
struct Args {
    /// Path to an order record (JSON)
    order: PathBuf,

    /// Output device name (defaults to the system printer)
    #[arg(long, env = "TICKET_PRINTER_NAME")]
    printer: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logger();

    let args = Args::parse();
    let mut config = TicketConfig::from_env();
    if args.printer.is_some() {
        config.printer_name = args.printer;
    }

    let raw = std::fs::read_to_string(&args.order)
        .with_context(|| format!("reading {}", args.order.display()))?;
    let order: Order = serde_json::from_str(&raw).context("parsing order JSON")?;

    let outcome = print_order_ticket(&order, &config).await?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn init_logger() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();
}
