//! # Backend Probe
//!
//! Exercises the full store stack against a running backend: wires the
//! stores, restores any persisted session, and walks the read endpoints
//! so a misconfigured URL or a dead backend shows up before the client
//! does.
//!
//! ## Usage
//! ```bash
//! # Probe the configured backend (MOSTRADOR_API_URL or localhost:3000)
//! cargo run -p mostrador-store --bin probe
//!
//! # Probe a specific backend
//! cargo run -p mostrador-store --bin probe -- --api http://192.168.0.10:3000
//!
//! # Bust caches on every fetch
//! cargo run -p mostrador-store --bin probe -- --force
//! ```

use std::env;

use mostrador_api::ProductQuery;
use mostrador_store::{ClientConfig, Stores};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut config = ClientConfig::from_env();
    let mut force = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--api" | "-a" => {
                if i + 1 < args.len() {
                    config.api_url = args[i + 1].clone();
                    i += 1;
                }
            }
            "--force" | "-f" => {
                force = true;
            }
            "--help" | "-h" => {
                println!("Mostrador Backend Probe");
                println!();
                println!("Usage: probe [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -a, --api <URL>    Backend base URL (default: MOSTRADOR_API_URL)");
                println!("  -f, --force        Bypass caches on every fetch");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Mostrador Backend Probe");
    println!("=======================");
    println!("Store:   {}", config.store_name);
    println!("Backend: {}", config.api_url);
    println!();

    let stores = Stores::new(&config)?;

    match stores.session.current() {
        Some(session) => println!("✓ Session restored for {}", session.user_name),
        None => println!("  No persisted session (unauthenticated probe)"),
    }
    println!(
        "✓ Supplier catalog loaded ({} local suppliers)",
        stores.suppliers.all().len()
    );
    println!();

    // Connectivity check first, with a readable failure.
    let categories = match stores.categories.fetch(force).await {
        Ok(categories) => categories,
        Err(e) => {
            println!("⚠ Backend unreachable: {}", e);
            println!("  Check the URL and that the backend is running.");
            return Ok(());
        }
    };
    println!("✓ Categories: {}", categories.len());

    let query = ProductQuery {
        active_only: true,
        ..ProductQuery::default()
    };

    let start = std::time::Instant::now();
    let products = stores.products.fetch(&query, force).await?;
    println!(
        "✓ Products: {} active ({:?})",
        products.len(),
        start.elapsed()
    );

    // The second fetch answers from cache unless --force was given.
    let start = std::time::Instant::now();
    stores.products.fetch(&query, force).await?;
    println!("  Refetch: {:?}", start.elapsed());

    for product in products.iter().take(5) {
        println!(
            "    {} - {} ({})",
            product.name,
            config.format_currency(product.price),
            product.format_stock()
        );
    }

    let low = stores.products.low_stock();
    if !low.is_empty() {
        println!("⚠ Low stock on {} products", low.len());
    }

    let top = stores.products.top_selling(5, force).await?;
    println!("✓ Top sellers: {}", top.len());
    for product in &top {
        println!(
            "    {} - {}",
            product.name,
            config.format_currency(product.price)
        );
    }

    println!();
    println!("✓ Probe complete");

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=mostrador=trace` - Trace the mostrador crates only
/// - Default: INFO level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mostrador=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
