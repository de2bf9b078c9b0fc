//! Lockshop CLI - browse the catalogue, contact the shop, manage products.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalogue
//! lockshop products --category "Smart Locks" --search biometric
//! lockshop show 64f1c2...
//!
//! # Send an inquiry
//! lockshop contact --name "Aline" --email aline@example.rw --message "Do you install?"
//!
//! # Admin
//! lockshop admin login
//! lockshop admin create --name "Keypad Lock" --description "PIN entry" \
//!     --price 38000 --category "Digital Locks" --image ./keypad.jpeg
//! lockshop admin delete 64f1c2... --yes
//! lockshop admin analytics
//! lockshop admin import products.yaml --images ./photos
//! ```
//!
//! Configuration comes from the environment (see `lockshop_client::config`).
//! Logs go to stderr and are filtered with `RUST_LOG` (default
//! `lockshop=info`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use lockshop_core::{Category, CategoryFilter};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "lockshop")]
#[command(author, version, about = "Lockshop storefront and admin console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products in the catalogue
    Products {
        /// Category tab (`All` or a category label)
        #[arg(short, long, default_value = "All")]
        category: CategoryFilter,

        /// Case-insensitive search on the product name
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Show one product's details
    Show {
        /// Product ID
        id: String,
    },
    /// Send a message to the shop
    Contact {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        phone: String,

        #[arg(short, long)]
        message: String,
    },
    /// Manage the catalogue
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Store an admin token (read from stdin when not given)
    Login {
        #[arg(long)]
        token: Option<String>,
    },
    /// Forget the stored admin token
    Logout,
    /// List every product
    List,
    /// Create a product
    Create(ProductArgs),
    /// Update a product; omitted fields keep their current value
    Update {
        /// Product ID
        id: String,

        #[command(flatten)]
        fields: ProductArgs,
    },
    /// Delete a product
    Delete {
        /// Product ID
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show catalogue analytics
    Analytics {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Upload every product in a YAML or JSON manifest
    Import {
        /// Manifest file
        manifest: PathBuf,

        /// Directory holding the images named in the manifest
        #[arg(short, long)]
        images: PathBuf,

        /// Pause between uploads
        #[arg(long, default_value_t = 500)]
        delay_ms: u64,
    },
}

/// Product fields shared by `create` and `update`.
#[derive(Args, Debug, Default)]
struct ProductArgs {
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    description: Option<String>,

    /// Whole RWF
    #[arg(long)]
    price: Option<String>,

    #[arg(long)]
    category: Option<Category>,

    /// Key feature; repeat for several
    #[arg(long = "feature")]
    features: Vec<String>,

    #[arg(long)]
    material: Option<String>,

    #[arg(long)]
    compatibility: Option<String>,

    #[arg(long)]
    best_for: Option<String>,

    #[arg(long)]
    warranty: Option<String>,

    /// Image file
    #[arg(long)]
    image: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lockshop=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = lockshop_client::ClientConfig::from_env()?;

    match cli.command {
        Commands::Products { category, search } => {
            commands::catalog::list(&config, category, &search).await?;
        }
        Commands::Show { id } => commands::catalog::show(&config, &id).await?,
        Commands::Contact {
            name,
            email,
            phone,
            message,
        } => {
            commands::contact::send(&config, name, email, phone, message).await?;
        }
        Commands::Admin { action } => match action {
            AdminAction::Login { token } => commands::admin::login(&config, token)?,
            AdminAction::Logout => commands::admin::logout(&config)?,
            AdminAction::List => commands::admin::list(&config).await?,
            AdminAction::Create(fields) => commands::admin::create(&config, fields).await?,
            AdminAction::Update { id, fields } => {
                commands::admin::update(&config, &id, fields).await?;
            }
            AdminAction::Delete { id, yes } => commands::admin::delete(&config, &id, yes).await?,
            AdminAction::Analytics { json } => commands::admin::analytics(&config, json).await?,
            AdminAction::Import {
                manifest,
                images,
                delay_ms,
            } => {
                commands::admin::import(&config, &manifest, &images, delay_ms).await?;
            }
        },
    }
    Ok(())
}
