use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{error, info};

use freight_quote::api::{AppState, QuoteForm, create_router};
use freight_quote::config::ConfigLoader;
use freight_quote::error::EngineResult;
use freight_quote::logging::init_tracing;
use freight_quote::models::{QuoteMethod, QuoteOutcome, QuoteResult, format_money};

#[derive(Parser)]
#[command(name = "freight-quote")]
#[command(about = "Estimate freight costs from a carrier rate sheet", version)]
struct Args {
    /// Path to the rate source directory
    #[arg(
        long,
        global = true,
        env = "FREIGHT_QUOTE_CONFIG",
        default_value = "./config/dhl_us_import"
    )]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Quote a shipment
    Quote(QuoteArgs),
    /// List the origin countries that can be quoted
    Countries,
    /// Serve the HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:3000")]
        bind: String,
    },
}

#[derive(clap::Args)]
struct QuoteArgs {
    /// Origin country
    #[arg(long)]
    country: String,

    /// Gross weight of the entire shipment in kilograms
    #[arg(long, conflicts_with_all = ["piece_weight", "qty"])]
    gross_weight: Option<String>,

    /// Weight of one piece in grams
    #[arg(long)]
    piece_weight: Option<String>,

    /// Quantity to quote at the piece weight (repeat up to five times)
    #[arg(long)]
    qty: Vec<String>,

    /// Print the full quote as JSON
    #[arg(long)]
    json: bool,
}

impl QuoteArgs {
    fn into_form(self) -> QuoteForm {
        let text = |value: Option<String>| value.map_or(Value::Null, Value::String);

        match self.gross_weight {
            Some(gross_weight) => QuoteForm {
                country: self.country,
                method: QuoteMethod::GrossWeight.to_string(),
                gross_weight_kg: Value::String(gross_weight),
                ..QuoteForm::default()
            },
            None => QuoteForm {
                country: self.country,
                method: QuoteMethod::PerPiece.to_string(),
                piece_weight_grams: text(self.piece_weight),
                quantities: self.qty.into_iter().map(Value::String).collect(),
                ..QuoteForm::default()
            },
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let config = match ConfigLoader::load(&args.config) {
        Ok(config) => config,
        Err(err) => {
            error!(path = %args.config, error = %err, "Failed to load rate source");
            return ExitCode::FAILURE;
        }
    };

    match args.command {
        Command::Quote(quote_args) => {
            let as_json = quote_args.json;
            match run_quote(&config, quote_args.into_form()) {
                Ok(quote) => {
                    print_quote(&quote, as_json);
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    error!(error = %err, "Quote failed");
                    ExitCode::FAILURE
                }
            }
        }
        Command::Countries => {
            for entry in config.zones().countries() {
                println!(
                    "{:<12} {:<18} column {}",
                    entry.country,
                    entry.zone,
                    entry.zone.sheet_column()
                );
            }
            ExitCode::SUCCESS
        }
        Command::Serve { bind } => serve(config, &bind).await,
    }
}

fn run_quote(config: &ConfigLoader, form: QuoteForm) -> EngineResult<QuoteResult> {
    let request = form.into_request()?;
    config.engine().quote(&request)
}

fn print_quote(quote: &QuoteResult, as_json: bool) {
    if as_json {
        match serde_json::to_string_pretty(quote) {
            Ok(json) => println!("{}", json),
            Err(err) => error!(error = %err, "Failed to serialize quote"),
        }
        return;
    }

    println!(
        "{} (zone {}, column {})",
        quote.country,
        quote.zone,
        quote.zone.sheet_column()
    );

    match &quote.outcome {
        QuoteOutcome::PerPiece { slots } => {
            for (index, slot) in slots.iter().enumerate() {
                match slot {
                    Some(line) => println!(
                        "  Qty {}: {} kg billed as {} kg -> {}",
                        line.quantity.unwrap_or_default(),
                        line.raw_weight_kg,
                        line.buffered_weight_kg,
                        format_money(line.amount)
                    ),
                    None => println!("  Slot {}: -", index + 1),
                }
            }
        }
        QuoteOutcome::GrossWeight { line } => println!(
            "  Entire shipment: {} kg billed as {} kg -> {}",
            line.raw_weight_kg,
            line.buffered_weight_kg,
            format_money(line.amount)
        ),
    }
}

async fn serve(config: ConfigLoader, bind: &str) -> ExitCode {
    let state = AppState::new(config);
    let router = create_router(state);

    let listener = match tokio::net::TcpListener::bind(bind).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(bind = %bind, error = %err, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };

    info!(bind = %bind, "Freight quote API listening");
    match axum::serve(listener, router).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Server stopped");
            ExitCode::FAILURE
        }
    }
}
