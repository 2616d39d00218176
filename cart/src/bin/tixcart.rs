//! Command-line client for the cart service.
//!
//! Loads configuration from the environment (and `.env`), starts a cart
//! store, runs one command, and prints the resulting cart.
//!
//! ```text
//! tixcart show
//! tixcart add --event E1 --event-name "Night Show" --ticket T1 --ticket-type GA --price 49.90 --quantity 2
//! tixcart update line-1 -- -1
//! tixcart --mock add --event E1 --ticket T1 --price 10
//! ```

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::sync::Arc;
use tixcart::{
    CandidateItem, CartBackend, CartConfig, CartEnvironment, CartStore, HttpCartBackend,
    LineItemId, MockCartBackend,
};
use tixcart_runtime::metrics::install_prometheus_recorder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "tixcart", version, about = "Inspect and edit a ticket cart")]
struct Cli {
    /// Use an in-memory cart instead of the configured cart service
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the cart (default)
    Show,
    /// Add tickets to the cart
    Add {
        /// Event identifier
        #[arg(long)]
        event: String,
        /// Event name shown in the cart
        #[arg(long, default_value = "")]
        event_name: String,
        /// Event image URL
        #[arg(long)]
        event_image: Option<String>,
        /// Ticket tier identifier
        #[arg(long)]
        ticket: String,
        /// Ticket tier label
        #[arg(long, default_value = "General Admission")]
        ticket_type: String,
        /// Unit price
        #[arg(long)]
        price: Decimal,
        /// Number of tickets
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a line
    Remove {
        /// Line identifier
        item_id: String,
    },
    /// Set a line's quantity (zero or below removes it)
    Update {
        /// Line identifier
        item_id: String,
        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tixcart=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let config = CartConfig::from_env();
    config.validate()?;
    tracing::info!(
        api_url = %config.api_url,
        authenticated = config.api_token.is_some(),
        mock = cli.mock,
        "Configuration loaded"
    );

    let metrics = if config.metrics_enabled {
        Some(install_prometheus_recorder()?)
    } else {
        None
    };

    let backend: Arc<dyn CartBackend> = if cli.mock {
        Arc::new(MockCartBackend::new())
    } else {
        Arc::new(HttpCartBackend::from_config(&config)?)
    };

    let store = CartStore::with_capacity(
        tixcart::CartState::default(),
        CartEnvironment::production(backend),
        config.broadcast_capacity,
    )
    .start()
    .await?;

    match cli.command.unwrap_or(Command::Show) {
        Command::Show => {},
        Command::Add {
            event,
            event_name,
            event_image,
            ticket,
            ticket_type,
            price,
            quantity,
        } => {
            let mut candidate = CandidateItem::new(event, event_name, ticket, ticket_type, price);
            if let Some(url) = event_image {
                candidate = candidate.with_image(url);
            }
            if let Err(error) = store.add_to_cart(candidate, quantity).await {
                if error.is_auth_error() {
                    tracing::error!("Not signed in: set CART_API_TOKEN to a valid token");
                }
                return Err(error.into());
            }
        },
        Command::Remove { item_id } => store.remove_from_cart(LineItemId::new(item_id)).await?,
        Command::Update { item_id, quantity } => {
            store
                .update_quantity(LineItemId::new(item_id), quantity)
                .await?;
        },
        Command::Clear => store.clear_cart().await?,
    }

    print_cart(&store).await;

    if let Some(handle) = metrics {
        println!("\n{}", handle.render());
    }

    store.shutdown(config.shutdown_timeout()).await?;
    Ok(())
}

async fn print_cart(store: &CartStore) {
    let cart = store.snapshot().await;

    if let Some(failure) = cart.last_error() {
        eprintln!("{} failed: {}", failure.operation, failure.error);
    }

    if cart.is_empty() {
        println!("Cart is empty");
        return;
    }

    for item in cart.items() {
        println!(
            "{:<12} {:<24} {:<16} {:>4} x {:>10}",
            item.id, item.event_name, item.ticket_type, item.quantity, item.price
        );
    }
    println!(
        "{} tickets, total {}",
        cart.total_items(),
        cart.total_price()
    );
}
