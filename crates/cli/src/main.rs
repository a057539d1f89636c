//! EliteShop CLI - drive the storefront state from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! eliteshop products --category electronics
//! eliteshop product 3
//!
//! # Sign in and shop
//! eliteshop login -e john@example.com -p password123
//! eliteshop cart add 3 --quantity 2
//! eliteshop checkout --street "1 Main St" --city Springfield --state IL --zip 62701 \
//!     --card-number "4242 4242 4242 4242" --expiry 12/29 --cvv 123
//!
//! # Follow changes made by other processes
//! eliteshop watch
//! ```
//!
//! # Commands
//!
//! - `products`, `product`, `categories`, `featured` - Catalog queries
//! - `cart` - Show and change the cart
//! - `login`, `register`, `logout`, `whoami`, `users` - Session and directory
//! - `checkout` - Place a simulated order
//! - `watch` - Print state changes as they happen

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eliteshop_storefront::config::{Latency, StorefrontConfig};
use eliteshop_storefront::{Storefront, StorefrontError};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "eliteshop")]
#[command(author, version, about = "EliteShop storefront CLI")]
struct Cli {
    /// Storage file (overrides `ELITESHOP_DATA_FILE`)
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    /// Skip simulated network and processing delays
    #[arg(long, global = true)]
    no_delay: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        /// Category slug
        #[arg(short, long)]
        category: Option<String>,

        /// Text to look for in names and descriptions
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one product
    Product {
        /// Product ID
        id: String,
    },
    /// List categories
    Categories,
    /// List discounted products
    Featured,
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List registered accounts
    Users,
    /// Place an order for the cart
    Checkout(commands::checkout::CheckoutArgs),
    /// Print state changes made by other processes
    Watch {
        /// Polling interval in milliseconds
        #[arg(long, default_value_t = 500)]
        interval_ms: u64,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add a product
    Add {
        product_id: String,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product
    Remove { product_id: String },
    /// Set a product's quantity (zero or less removes it)
    Update {
        product_id: String,

        #[arg(allow_hyphen_values = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(2);
        }
    };
    if let Some(path) = cli.data_file.clone() {
        config.data_file = path;
    }
    if cli.no_delay {
        config.latency = Latency::none();
    }

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "eliteshop_storefront=info,eliteshop_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli.command, config).await {
        e.report();
        report_to_user(&e);
        std::process::exit(1);
    }
}

#[allow(clippy::print_stderr)]
fn report_to_user(error: &StorefrontError) {
    eprintln!("error: {}", error.user_message());
}

async fn run(command: Commands, config: StorefrontConfig) -> Result<(), StorefrontError> {
    let (storefront, file) = Storefront::open(config)?;
    storefront
        .events()
        .subscribe(|event| tracing::debug!(event = event.name(), "state changed"));

    match command {
        Commands::Products { category, search } => {
            commands::catalog::products(&storefront, category.as_deref(), search.as_deref())
                .await;
        }
        Commands::Product { id } => commands::catalog::product(&storefront, &id).await?,
        Commands::Categories => commands::catalog::categories(&storefront).await,
        Commands::Featured => commands::catalog::featured(&storefront).await,
        Commands::Cart { action } => match action.unwrap_or(CartAction::Show) {
            CartAction::Show => commands::cart::show(&storefront),
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(&storefront, &product_id, quantity).await?,
            CartAction::Remove { product_id } => {
                commands::cart::remove(&storefront, &product_id).await?;
            }
            CartAction::Update {
                product_id,
                quantity,
            } => commands::cart::update(&storefront, &product_id, quantity).await?,
            CartAction::Clear => commands::cart::clear(&storefront).await?,
        },
        Commands::Login { email, password } => {
            commands::account::login(&storefront, &email, password.into()).await?;
        }
        Commands::Register {
            name,
            email,
            password,
        } => commands::account::register(&storefront, &name, &email, password.into()).await?,
        Commands::Logout => commands::account::logout(&storefront)?,
        Commands::Whoami => commands::account::whoami(&storefront),
        Commands::Users => commands::account::users(&storefront)?,
        Commands::Checkout(args) => commands::checkout::run(&storefront, args).await?,
        Commands::Watch { interval_ms } => {
            commands::watch::run(&storefront, &file, interval_ms).await;
        }
    }
    Ok(())
}
