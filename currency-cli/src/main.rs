//! Currency CLI
//!
//! Command-line interface for the Currency Exchange API.

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use currency_client::CurrencyClient;
use currency_types::{ConversionId, CurrencyCode};

#[derive(Parser)]
#[command(name = "currency")]
#[command(author, version, about = "Currency Exchange API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the Currency Exchange API
    #[arg(
        long,
        env = "CURRENCY_API_URL",
        default_value = "http://localhost:3000"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API health
    Health,
    /// List supported currencies
    Currencies,
    /// Convert an amount between two currencies
    Convert {
        /// Source currency code
        #[arg(long)]
        from: String,
        /// Target currency code
        #[arg(long)]
        to: String,
        /// Amount to convert, e.g. 100 or 12.50
        #[arg(long)]
        amount: Decimal,
    },
    /// Show all rates relative to a currency
    Rates {
        /// Base currency code
        currency: String,
    },
    /// Show recent conversions
    History {
        /// Number of records (server default 10, at most 100)
        #[arg(long)]
        limit: Option<i64>,
    },
    /// Show one conversion
    Show {
        /// Conversion ID
        id: String,
    },
}

fn parse_currency(s: &str) -> Result<CurrencyCode> {
    s.parse().map_err(|_| {
        let supported: Vec<_> = CurrencyCode::all().iter().map(|c| c.code()).collect();
        anyhow::anyhow!(
            "Unknown currency: {}. Supported: {}",
            s,
            supported.join(", ")
        )
    })
}

fn parse_conversion_id(s: &str) -> Result<ConversionId> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("Invalid conversion ID: {}", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let client = CurrencyClient::new(&cli.api_url);

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Currencies => {
            let currencies = client.currencies().await?;
            println!("{}", serde_json::to_string_pretty(&currencies)?);
        }

        Commands::Convert { from, to, amount } => {
            let from = parse_currency(&from)?;
            let to = parse_currency(&to)?;
            let result = client.convert(from.code(), to.code(), amount).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Commands::Rates { currency } => {
            let currency = parse_currency(&currency)?;
            let rates = client.rates(currency.code()).await?;
            println!("{}", serde_json::to_string_pretty(&rates)?);
        }

        Commands::History { limit } => {
            let history = client.history(limit).await?;
            println!("{}", serde_json::to_string_pretty(&history)?);
        }

        Commands::Show { id } => {
            let id = parse_conversion_id(&id)?;
            let record = client.history_entry(id).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_convert_arguments() {
        let cli = Cli::parse_from([
            "currency", "convert", "--from", "usd", "--to", "EUR", "--amount", "12.50",
        ]);
        match cli.command {
            Commands::Convert { from, to, amount } => {
                assert_eq!(from, "usd");
                assert_eq!(to, "EUR");
                assert_eq!(amount, Decimal::new(1250, 2));
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency("gbp").unwrap(), CurrencyCode::GBP);
        let err = parse_currency("INR").unwrap_err();
        assert!(err.to_string().contains("USD, EUR"));
    }
}
