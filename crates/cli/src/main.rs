//! Tillpoint CLI - a command-line till.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (prompts for the password when --password is omitted)
//! tp-cli login -u cashier1
//!
//! # Who is signed in
//! tp-cli whoami
//!
//! # Look up products
//! tp-cli products --search shea --page 2
//!
//! # Ring up a sale: two of one product, one of another, paid by card
//! tp-cli sell 6f1c...:2 0a9e...:1 --payment card --tax 1.50
//!
//! # Sign out
//! tp-cli logout
//! ```
//!
//! # Environment Variables
//!
//! See `tillpoint_client::config` for API settings. Logging is controlled by
//! `RUST_LOG`; set `TILLPOINT_LOG_JSON` for JSON log lines.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tillpoint_core::{CustomerId, Money, PaymentMethod};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

use commands::sell::{SaleLine, SellArgs};

#[derive(Parser)]
#[command(name = "tp-cli")]
#[command(author, version, about = "Tillpoint command-line till")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login {
        #[arg(short, long)]
        username: String,

        /// Read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Sign out and discard the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List or search products
    Products {
        #[arg(short, long)]
        search: Option<String>,

        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Ring up and submit a sale
    Sell {
        /// Lines as `PRODUCT_ID:QUANTITY`
        #[arg(required = true, value_parser = commands::sell::parse_line)]
        lines: Vec<SaleLine>,

        /// `cash`, `card`, `transfer` or `bank_transfer`
        #[arg(long, default_value = "cash")]
        payment: PaymentMethod,

        /// Tax amount, e.g. `1.50`
        #[arg(long)]
        tax: Option<Money>,

        /// Discount amount
        #[arg(long)]
        discount: Option<Money>,

        /// Existing customer id
        #[arg(long)]
        customer: Option<CustomerId>,

        /// Walk-in customer name
        #[arg(long, default_value = "")]
        customer_name: String,

        /// Operator name recorded on the order
        #[arg(long)]
        served_by: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tillpoint_client=info,tp_cli=info".into());

    let json = std::env::var("TILLPOINT_LOG_JSON").is_ok();
    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let client = commands::connect()?;
    match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(&client, &username, password).await?;
        }
        Commands::Logout => commands::auth::logout(&client).await,
        Commands::Whoami => commands::auth::whoami(&client).await?,
        Commands::Products { search, page } => {
            commands::products::list(&client, search, page).await?;
        }
        Commands::Sell {
            lines,
            payment,
            tax,
            discount,
            customer,
            customer_name,
            served_by,
        } => {
            let args = SellArgs {
                lines,
                payment,
                tax,
                discount,
                customer,
                customer_name,
                served_by,
            };
            commands::sell::sell(&client, args).await?;
        }
    }
    Ok(())
}
