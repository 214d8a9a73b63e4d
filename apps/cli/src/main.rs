//! # storefront CLI
//!
//! Prices carts, past orders and government quotations.
//!
//! ## Commands
//! ```text
//! storefront price --item 500x2 --item 300x1 [--discount 10] [--json]
//! storefront quote 25000 [--inclusive] [--json]
//! storefront login --token <TOKEN> [--expires-in <SECS>]
//! storefront logout
//! storefront cart [--json]
//! storefront order <ID> [--json]
//! storefront quotation <ID> [--json]
//! ```
//!
//! `price` and `quote` run offline. The rest talk to the configured backend.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use storefront_client::{
    ClientConfig, PersistedSessionCredentials, PricingStatus, Storefront,
    StoredSession,
};
use storefront_core::{summary_rows, LineItem, PricingBreakdown, PricingEngine, SummaryRow, TaxMode};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

// =============================================================================
// Arguments
// =============================================================================

#[derive(Parser, Debug)]
#[command(name = "storefront", version, about = "GST pricing for the storefront", long_about = None)]
struct Options {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "STOREFRONT_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Price tax-inclusive cart lines offline
    Price {
        /// A line as PRICExQTY, e.g. 499.50x2 (repeatable)
        #[arg(long = "item", value_name = "PRICExQTY", value_parser = parse_item, required = true)]
        items: Vec<LineItem>,

        /// Coupon discount percent, applied to the pre-tax base
        #[arg(long)]
        discount: Option<Decimal>,

        #[arg(long)]
        json: bool,
    },

    /// Price a flat quotation amount offline
    Quote {
        price: Decimal,

        /// Treat the price as already including GST
        #[arg(long)]
        inclusive: bool,

        #[arg(long)]
        json: bool,
    },

    /// Store an access token in the session file
    Login {
        #[arg(long, env = "STOREFRONT_TOKEN", hide_env_values = true)]
        token: String,

        /// Seconds until the token expires
        #[arg(long, value_name = "SECS")]
        expires_in: Option<i64>,
    },

    /// Remove the stored session
    Logout,

    /// Show the current backend cart
    Cart {
        #[arg(long)]
        json: bool,
    },

    /// Reprice a past order
    Order {
        id: String,

        #[arg(long)]
        json: bool,
    },

    /// Price a government quotation
    Quotation {
        id: String,

        #[arg(long)]
        json: bool,
    },
}

/// Parses `PRICExQTY` (also `PRICE*QTY`, or a bare `PRICE` for quantity 1).
fn parse_item(raw: &str) -> Result<LineItem, String> {
    let (price, qty) = match raw.split_once(['x', 'X', '*']) {
        Some((price, qty)) => (price.trim(), qty.trim()),
        None => (raw.trim(), "1"),
    };

    let price: Decimal = price
        .parse()
        .map_err(|_| format!("invalid price '{}' in '{}'", price, raw))?;
    let quantity: i64 = qty
        .parse()
        .map_err(|_| format!("invalid quantity '{}' in '{}'", qty, raw))?;

    Ok(LineItem::new(price, quantity))
}

// =============================================================================
// Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let opts = Options::parse();
    let config = ClientConfig::load(opts.config.clone()).context("loading storefront config")?;
    debug!(?config, "Configuration loaded");

    match opts.command {
        Command::Price {
            items,
            discount,
            json,
        } => {
            let engine = PricingEngine::new(config.tax_rate())?;
            let breakdown = engine.compute_from_line_items(&items, discount)?;
            print_breakdown(&config, &engine, &breakdown, json)?;
        }

        Command::Quote {
            price,
            inclusive,
            json,
        } => {
            let mode = if inclusive {
                TaxMode::Inclusive
            } else {
                TaxMode::Exclusive
            };
            let engine = PricingEngine::new(config.tax_rate())?;
            let breakdown = storefront_core::price_quotation(&engine, price, mode)?;
            print_breakdown(&config, &engine, &breakdown, json)?;
        }

        Command::Login { token, expires_in } => {
            let expires_at = expires_in.map(expiry_after).transpose()?;
            let session = session_file(&config)?;
            session.save(&StoredSession::new(token, expires_at))?;
            info!(path = ?session.path(), "Signed in");
            println!("Signed in.");
        }

        Command::Logout => {
            Storefront::connect(config)?.sign_out();
            println!("Signed out.");
        }

        Command::Cart { json } => {
            let storefront = Storefront::connect(config)?;
            let snapshot = storefront.cart().refresh().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else if snapshot.status == PricingStatus::Unavailable {
                println!("Unable to compute total.");
            } else {
                println!(
                    "{} line(s), {} unit(s)",
                    snapshot.cart.item_count(),
                    snapshot.cart.total_quantity()
                );
                print_rows(storefront.config(), &storefront.cart().summary_rows().await);
            }
        }

        Command::Order { id, json } => {
            let storefront = Storefront::connect(config)?;
            let doc = storefront.order_summary(&id).await?;
            print_document(storefront.config(), &doc, json)?;
        }

        Command::Quotation { id, json } => {
            let storefront = Storefront::connect(config)?;
            let doc = storefront.quotation_summary(&id).await?;
            print_document(storefront.config(), &doc, json)?;
        }
    }

    Ok(())
}

/// Initializes the tracing subscriber.
///
/// ## Environment Variables
/// - `RUST_LOG=debug` - Show debug logs
/// - `RUST_LOG=storefront=trace` - Trace the storefront crates only
/// - Default: INFO, DEBUG for storefront crates
///
/// Logs go to stderr so `--json` output stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,storefront=debug,hyper=warn,reqwest=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// `now + secs`, rejecting offsets chrono cannot represent.
fn expiry_after(secs: i64) -> Result<DateTime<Utc>> {
    Duration::try_seconds(secs)
        .and_then(|offset| Utc::now().checked_add_signed(offset))
        .ok_or_else(|| anyhow!("--expires-in {} is out of range", secs))
}

fn session_file(config: &ClientConfig) -> Result<PersistedSessionCredentials> {
    let path = config
        .session_file_path()
        .ok_or_else(|| anyhow!("no location for the session file; set [session] session_file"))?;
    Ok(PersistedSessionCredentials::new(path))
}

// =============================================================================
// Output
// =============================================================================

fn print_breakdown(
    config: &ClientConfig,
    engine: &PricingEngine,
    breakdown: &PricingBreakdown,
    json: bool,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(breakdown)?);
    } else {
        print_rows(config, &summary_rows(breakdown, engine.rate()));
    }
    Ok(())
}

fn print_document(
    config: &ClientConfig,
    doc: &storefront_client::PricedDocument,
    json: bool,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(doc)?);
    } else {
        println!("{}", doc.id);
        print_rows(config, &doc.rows);
    }
    Ok(())
}

fn print_rows(config: &ClientConfig, rows: &[SummaryRow]) {
    for row in rows {
        println!(
            "{:<16}{:>16}",
            row.label,
            row.amount.format_with_symbol(&config.display.currency_symbol)
        );
    }
}
