//! # Currency Exchange Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the rate provider and repository adapters
//! - Create the converter service
//! - Start the HTTP server

mod config;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use currency_hex::{ConverterService, inbound::HttpServer};
use currency_repo::build_repo;
use exchange_rates::OpenExchangeRatesClient;

fn init_tracer() -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("currency-service"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::from_env()?;

    // Initialize OpenTelemetry tracing when a collector is configured
    let (telemetry, otel_provider) = match &config.otlp_endpoint {
        Some(_) => {
            let (otel_tracer, otel_provider) = init_tracer()?;
            (
                Some(tracing_opentelemetry::layer().with_tracer(otel_tracer)),
                Some(otel_provider),
            )
        }
        None => (None, None),
    };

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,currency_app=debug,currency_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    tracing::info!("Starting currency exchange server on port {}", config.port);
    tracing::info!("Rate provider: {}", config.rates_base_url);

    // Rate provider (the app id is never logged)
    let provider = OpenExchangeRatesClient::new(
        config.rates_app_id.clone(),
        config.rates_base_url.clone(),
        config.rates_timeout,
    )?;

    // Build repository (handles connection and migration)
    let repo = build_repo(&config.database_url).await?;

    // Create the converter service
    let service = ConverterService::new(provider, repo);

    // Create and run the HTTP server
    let server = HttpServer::new(service);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    if let Some(provider) = otel_provider {
        let _ = provider.shutdown();
    }
    Ok(())
}
