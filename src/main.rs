use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use cash_envelope::cli::{
    handle_account_command, handle_deposit, handle_expense_command, handle_export,
    handle_history, handle_owner_command, handle_settle, handle_transfer, handle_withdraw,
    AccountCommands, DepositArgs, ExpenseCommands, ExportArgs, HistoryArgs, OwnerCommands,
    TransferArgs, WithdrawArgs,
};
use cash_envelope::config::{paths::LedgerPaths, settings::Settings};
use cash_envelope::logging::init_tracing;
use cash_envelope::models::OwnerId;
use cash_envelope::services::OwnerService;
use cash_envelope::storage::init::needs_initialization;
use cash_envelope::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "cash-envelope",
    author = "Kaylee Beyene",
    version,
    about = "Envelope budgeting backed by an inventory of notes and coins",
    long_about = "cash-envelope splits every cash deposit across your accounts by \
                  percentage, reserves recurring expenses first, and tracks exactly \
                  which notes and coins back each account."
)]
struct Cli {
    /// Owner to operate on (defaults to the configured default owner)
    #[arg(long, global = true, env = "CASH_ENVELOPE_OWNER")]
    owner: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize storage and the default owner
    Init,

    /// Show current configuration and paths
    Config,

    /// Owner management commands
    #[command(subcommand)]
    Owner(OwnerCommands),

    /// Account management commands
    #[command(subcommand)]
    Account(AccountCommands),

    /// Recurring expense commands
    #[command(subcommand)]
    Expense(ExpenseCommands),

    /// Deposit cash and distribute it across accounts
    Deposit(DepositArgs),

    /// Withdraw cash from an account
    Withdraw(WithdrawArgs),

    /// Move cash between two accounts
    Transfer(TransferArgs),

    /// Place pending cash into sub-accounts still waiting for it
    Settle,

    /// Show recent transactions
    History(HistoryArgs),

    /// Export the owner's ledger
    Export(ExportArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = LedgerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_tracing(&settings.log_level);

    let command = match cli.command {
        Some(command) => command,
        None => {
            println!("cash-envelope - envelope budgeting with physical cash");
            println!();
            println!("Run 'cash-envelope --help' for usage information.");
            return Ok(());
        }
    };

    match command {
        Commands::Init => {
            println!("Initializing cash-envelope at: {}", paths.base_dir().display());
            initialize_storage(&paths, &settings)?;
            println!("Initialization complete!");
            println!("Default owner: {}", settings.default_owner);
            println!();
            println!("Next, create accounts, for example:");
            println!("  cash-envelope account create Principal --percent 50");
            println!("  cash-envelope account create Gastos --remainder");
            return Ok(());
        }
        Commands::Config => {
            println!("cash-envelope Configuration");
            println!("===========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Ledger file:    {}", paths.ledger_file().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Default owner:        {}", settings.default_owner);
            println!("  Currency symbol:      {}", settings.currency_symbol);
            println!(
                "  Sub-account capacity: {}",
                settings
                    .default_sub_account_capacity
                    .format_with_symbol(&settings.currency_symbol)
            );
            println!("  Log level:            {}", settings.log_level);
            return Ok(());
        }
        _ => {}
    }

    if needs_initialization(&paths) {
        bail!("cash-envelope is not initialized. Run 'cash-envelope init' first.");
    }

    let storage = Storage::open(paths.clone())?;
    let selected_owner = cli
        .owner
        .clone()
        .unwrap_or_else(|| settings.default_owner.clone());

    match command {
        Commands::Owner(cmd) => handle_owner_command(&storage, &settings, &selected_owner, cmd)?,
        Commands::Account(cmd) => {
            let owner_id = resolve_owner(&storage, &selected_owner)?;
            handle_account_command(&storage, &settings, owner_id, cmd)?
        }
        Commands::Expense(cmd) => {
            let owner_id = resolve_owner(&storage, &selected_owner)?;
            handle_expense_command(&storage, &settings, owner_id, cmd)?
        }
        Commands::Deposit(args) => {
            let owner_id = resolve_owner(&storage, &selected_owner)?;
            handle_deposit(&storage, &settings, owner_id, args)?
        }
        Commands::Withdraw(args) => {
            let owner_id = resolve_owner(&storage, &selected_owner)?;
            handle_withdraw(&storage, &settings, owner_id, args)?
        }
        Commands::Transfer(args) => {
            let owner_id = resolve_owner(&storage, &selected_owner)?;
            handle_transfer(&storage, &settings, owner_id, args)?
        }
        Commands::Settle => {
            let owner_id = resolve_owner(&storage, &selected_owner)?;
            handle_settle(&storage, &settings, owner_id)?
        }
        Commands::History(args) => {
            let owner_id = resolve_owner(&storage, &selected_owner)?;
            handle_history(&storage, &settings, owner_id, args)?
        }
        Commands::Export(args) => {
            let owner_id = resolve_owner(&storage, &selected_owner)?;
            handle_export(&storage, owner_id, args)?
        }
        Commands::Init | Commands::Config => {}
    }

    Ok(())
}

fn resolve_owner(storage: &Storage, name: &str) -> Result<OwnerId> {
    let owner = OwnerService::new(storage)
        .resolve(name)
        .with_context(|| format!("Cannot select owner '{}'", name))?;
    Ok(owner.id)
}
