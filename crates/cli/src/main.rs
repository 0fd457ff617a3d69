//! Corebank CLI - back-office banking operations from the command line
//!
//! Usage:
//! ```bash
//! corebank init
//! corebank signup --email alice@example.com --name "Alice" --password s3cret
//! corebank account create --holder 1 --type checking
//! corebank deposit --holder 1 --account 1 1000
//! corebank withdraw --holder 1 --account 1 200
//! corebank transfer --holder 1 --from 1 --to 2 300
//! corebank statement --holder 1 --account 1 --start 2026-08-01
//! ```
//!
//! This binary plays the role of the service's collaborator layer: it
//! resolves ownership for the acting holder, then calls into the ledger
//! core. Set `RUST_LOG` to control log verbosity.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod db;

use commands::{account, card, holder, money, statement};

/// Corebank - a banking back office on SQLite
#[derive(Parser)]
#[command(name = "corebank")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Database file path
    #[arg(long, default_value = "data/corebank.db", env = "COREBANK_DB", global = true)]
    pub db: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database schema
    Init {
        /// Drop any existing database first
        #[arg(long)]
        force: bool,
    },

    /// Show database status
    Status,

    /// Register a new account holder
    Signup {
        #[arg(long)]
        email: String,
        /// Display name
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
    },

    /// Authenticate and receive an access token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Holder management
    Holder {
        #[command(subcommand)]
        action: HolderAction,
    },

    /// Account management
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },

    /// Deposit funds into an account
    Deposit {
        /// Acting holder id
        #[arg(long)]
        holder: i64,
        /// Account id
        #[arg(long)]
        account: i64,
        /// Amount to deposit
        amount: Decimal,
        /// Free-text description
        #[arg(long)]
        description: Option<String>,
    },

    /// Withdraw funds from an account
    Withdraw {
        #[arg(long)]
        holder: i64,
        #[arg(long)]
        account: i64,
        /// Amount to withdraw
        amount: Decimal,
        #[arg(long)]
        description: Option<String>,
    },

    /// Transfer funds between two accounts of the same holder
    Transfer {
        #[arg(long)]
        holder: i64,
        /// Source account id
        #[arg(long)]
        from: i64,
        /// Destination account id
        #[arg(long)]
        to: i64,
        /// Amount to transfer
        amount: Decimal,
        #[arg(long)]
        description: Option<String>,
    },

    /// List an account's transactions, newest first
    Transactions {
        #[arg(long)]
        holder: i64,
        #[arg(long)]
        account: i64,
    },

    /// Account statement for a time window
    Statement {
        #[arg(long)]
        holder: i64,
        #[arg(long)]
        account: i64,
        /// Window start (YYYY-MM-DD), defaults to 30 days before the end
        #[arg(long)]
        start: Option<String>,
        /// Window end (YYYY-MM-DD), defaults to today
        #[arg(long)]
        end: Option<String>,
        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Quick account summary
    Summary {
        #[arg(long)]
        holder: i64,
        #[arg(long)]
        account: i64,
    },

    /// Card management
    Card {
        #[command(subcommand)]
        action: CardAction,
    },
}

#[derive(Subcommand)]
pub enum HolderAction {
    /// Show a holder's profile
    Show {
        #[arg(long)]
        holder: i64,
    },
    /// Change the display name
    Rename {
        #[arg(long)]
        holder: i64,
        #[arg(long)]
        name: String,
    },
    /// Activate or deactivate a holder (holders are never deleted)
    SetActive {
        #[arg(long)]
        holder: i64,
        /// true to activate, false to deactivate
        #[arg(long, action = clap::ArgAction::Set)]
        active: bool,
    },
}

#[derive(Subcommand)]
pub enum AccountAction {
    /// Open a new account with a zero balance
    Create {
        #[arg(long)]
        holder: i64,
        /// Account type
        #[arg(long, short = 't')]
        r#type: AccountTypeArg,
    },
    /// List the holder's accounts
    List {
        #[arg(long)]
        holder: i64,
    },
    /// Show one account
    Show {
        #[arg(long)]
        holder: i64,
        #[arg(long)]
        account: i64,
    },
}

#[derive(Subcommand)]
pub enum CardAction {
    /// Issue a card against an account
    Issue {
        #[arg(long)]
        holder: i64,
        #[arg(long)]
        account: i64,
    },
    /// List the holder's cards, optionally for one account
    List {
        #[arg(long)]
        holder: i64,
        #[arg(long)]
        account: Option<i64>,
    },
    /// Activate or deactivate a card
    SetActive {
        #[arg(long)]
        holder: i64,
        #[arg(long)]
        card: i64,
        /// true to activate, false to deactivate
        #[arg(long, action = clap::ArgAction::Set)]
        active: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum AccountTypeArg {
    Checking,
    Savings,
}

impl AccountTypeArg {
    pub fn to_core_type(self) -> corebank_core::AccountType {
        match self {
            AccountTypeArg::Checking => corebank_core::AccountType::Checking,
            AccountTypeArg::Savings => corebank_core::AccountType::Savings,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let db = cli.db.as_path();

    match cli.command {
        Commands::Init { force } => db::init(db, force).await,
        Commands::Status => db::show_status(db).await,
        Commands::Signup {
            email,
            name,
            password,
        } => holder::signup(db, &email, &name, &password).await,
        Commands::Login { email, password } => holder::login(db, &email, &password).await,
        Commands::Holder { action } => match action {
            HolderAction::Show { holder } => holder::show(db, holder).await,
            HolderAction::Rename { holder, name } => holder::rename(db, holder, &name).await,
            HolderAction::SetActive { holder, active } => {
                holder::set_active(db, holder, active).await
            }
        },
        Commands::Account { action } => match action {
            AccountAction::Create { holder, r#type } => {
                account::create(db, holder, r#type.to_core_type()).await
            }
            AccountAction::List { holder } => account::list(db, holder).await,
            AccountAction::Show { holder, account: id } => account::show(db, holder, id).await,
        },
        Commands::Deposit {
            holder,
            account,
            amount,
            description,
        } => money::deposit(db, holder, account, amount, description.as_deref()).await,
        Commands::Withdraw {
            holder,
            account,
            amount,
            description,
        } => money::withdraw(db, holder, account, amount, description.as_deref()).await,
        Commands::Transfer {
            holder,
            from,
            to,
            amount,
            description,
        } => money::transfer(db, holder, from, to, amount, description.as_deref()).await,
        Commands::Transactions { holder, account } => {
            money::transactions(db, holder, account).await
        }
        Commands::Statement {
            holder,
            account,
            start,
            end,
            format,
        } => {
            statement::statement(db, holder, account, start.as_deref(), end.as_deref(), format)
                .await
        }
        Commands::Summary { holder, account } => statement::summary(db, holder, account).await,
        Commands::Card { action } => match action {
            CardAction::Issue { holder, account } => card::issue(db, holder, account).await,
            CardAction::List { holder, account } => card::list(db, holder, account).await,
            CardAction::SetActive {
                holder,
                card: id,
                active,
            } => card::set_active(db, holder, id, active).await,
        },
    }
}
