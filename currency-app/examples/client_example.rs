//! Client example demonstrating conversion flows against a running server.
//!
//! Uses the built-in static rate table, so no provider credential is needed.
//!
//! Run with: cargo run -p currency-app --example client_example --no-default-features --features sqlite

use currency_client::{ClientError, CurrencyClient};
use currency_hex::{ConverterService, inbound::HttpServer};
use currency_repo::build_repo;
use exchange_rates::StaticRateProvider;
use rust_decimal_macros::dec;
use std::net::SocketAddr;
use tempfile::tempdir;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt().with_env_filter("info").init();

    // Find an available port
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;
    let port = addr.port();
    drop(listener);

    // Use a temp file-backed SQLite DB
    let tmp = tempdir()?;
    let db_path = tmp.path().join("currency.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    println!("🚀 Starting server on port {port}...");
    println!("   Database: {db_url}");

    // Build repository (handles connection and migration)
    let repo = build_repo(&db_url).await?;

    // Start server in background
    let service = ConverterService::new(StaticRateProvider::new(), repo);
    let server = HttpServer::new(service);
    let router = server.router();

    let server_addr = format!("127.0.0.1:{port}");
    tokio::spawn(async move {
        axum::serve(
            TcpListener::bind(&server_addr).await.unwrap(),
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    // Wait for server to start
    tokio::time::sleep(std::time::Duration::from_millis(500)).await;

    // Create client
    let base_url = format!("http://127.0.0.1:{port}");
    let client = CurrencyClient::new(&base_url);

    // ─────────────────────────────────────────────────────────────────────────
    // Demo: conversions and history
    // ─────────────────────────────────────────────────────────────────────────

    let health = client.health().await?;
    println!("✅ Server health: {health}");

    let currencies = client.currencies().await?;
    println!("✅ {} supported currencies:", currencies.len());
    for c in &currencies {
        println!("   - {} {} ({})", c.code, c.symbol, c.name);
    }

    let result = client.convert("USD", "EUR", dec!(100)).await?;
    println!(
        "✅ {} {} = {} {} (rate {})",
        result.original_amount,
        result.from_currency,
        result.converted_amount,
        result.to_currency,
        result.exchange_rate
    );

    let result = client.convert("GBP", "JPY", dec!(42.50)).await?;
    println!(
        "✅ {} {} = {} {} (cross rate {})",
        result.original_amount,
        result.from_currency,
        result.converted_amount,
        result.to_currency,
        result.exchange_rate
    );

    let same = client.convert("CHF", "CHF", dec!(9.999)).await?;
    println!(
        "✅ Same currency passes through: {} {}",
        same.converted_amount, same.to_currency
    );

    match client.convert("USD", "INR", dec!(1)).await {
        Err(ClientError::Api { status, message }) => {
            println!("✅ Rejected unsupported currency ({status}): {message}")
        }
        other => anyhow::bail!("expected a 400 for INR, got {:?}", other.map(|r| r.to_currency)),
    }

    let rates = client.rates("EUR").await?;
    println!("\n📈 Rates per 1 {}:", rates.base_currency);
    for (code, rate) in &rates.rates {
        println!("   {code}: {rate}");
    }

    let history = client.history(Some(10)).await?;
    println!("\n📋 Recent conversions:");
    for record in &history {
        println!(
            "   #{} {} {} -> {} {} at {}",
            record.id,
            record.amount,
            record.from_currency,
            record.converted_amount,
            record.to_currency,
            record.conversion_date
        );
    }

    if let Some(latest) = history.first() {
        let entry = client.history_entry(latest.id).await?;
        println!("\n🔎 Latest entry: {}", serde_json::to_string_pretty(&entry)?);
    }

    println!("\n🎉 Example completed successfully!");

    Ok(())
}
