//! Otelier CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! otelier migrate
//!
//! # Create a hotel
//! otelier hotel create -n "Harbour View" -a "1 Quay St"
//!
//! # Assign a user to a hotel
//! otelier assign -u auth0|alice -H 7c9e6679-7425-40de-944b-e07fc1f099d3 -r reception
//!
//! # Bind a user to one hotel (employee access policy)
//! otelier employee add -u auth0|bob -H 7c9e6679-7425-40de-944b-e07fc1f099d3
//!
//! # Mint a development access token
//! otelier token -s auth0|admin -r admin
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `hotel create` - Create hotels
//! - `assign` - Create hotel assignments
//! - `employee add` - Create employee records
//! - `token` - Issue a signed access token for local testing

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "otelier")]
#[command(author, version, about = "Otelier CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage hotels
    Hotel {
        #[command(subcommand)]
        action: HotelAction,
    },
    /// Assign a user to a hotel
    Assign {
        /// User ID (token `sub`)
        #[arg(short, long)]
        user: String,

        /// Hotel ID
        #[arg(short = 'H', long)]
        hotel: String,

        /// Role at the hotel (`staff`, `reception`, `admin`)
        #[arg(short, long, default_value = "staff")]
        role: String,

        /// Recorded as the assigning user
        #[arg(short, long, default_value = "otelier-cli")]
        by: String,
    },
    /// Manage employee records
    Employee {
        #[command(subcommand)]
        action: EmployeeAction,
    },
    /// Issue a signed access token
    Token {
        /// Subject claim (user ID)
        #[arg(short, long)]
        sub: String,

        /// Flat `role` claim; omitted if not given
        #[arg(short, long)]
        role: Option<String>,

        /// Lifetime in seconds
        #[arg(short, long, default_value_t = 3600)]
        ttl_secs: i64,
    },
}

#[derive(Subcommand)]
enum HotelAction {
    /// Create a new hotel
    Create {
        /// Hotel name
        #[arg(short, long)]
        name: String,

        /// Street address
        #[arg(short, long, default_value = "")]
        address: String,
    },
}

#[derive(Subcommand)]
enum EmployeeAction {
    /// Bind a user to one hotel
    Add {
        /// User ID (token `sub`)
        #[arg(short, long)]
        user: String,

        /// Hotel ID
        #[arg(short = 'H', long)]
        hotel: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Hotel { action } => match action {
            HotelAction::Create { name, address } => {
                commands::hotels::create_hotel(&name, &address).await?;
            }
        },
        Commands::Assign {
            user,
            hotel,
            role,
            by,
        } => {
            commands::hotels::assign_user(&user, &hotel, &role, &by).await?;
        }
        Commands::Employee { action } => match action {
            EmployeeAction::Add { user, hotel } => {
                commands::hotels::add_employee(&user, &hotel).await?;
            }
        },
        Commands::Token {
            sub,
            role,
            ttl_secs,
        } => commands::token::issue(&sub, role.as_deref(), ttl_secs)?,
    }
    Ok(())
}
