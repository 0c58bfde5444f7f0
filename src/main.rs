use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use expense_tracker::cli::{
    handle_expense_command, handle_import_command, handle_report_command, ExpenseCommands,
    ImportArgs, ReportArgs,
};
use expense_tracker::config::{ExpensePaths, Settings};
use expense_tracker::notify::ConsoleNotifier;
use expense_tracker::services::ExpenseStore;
use expense_tracker::storage::open_repository;

#[derive(Parser)]
#[command(
    name = "expenses",
    version,
    about = "Track personal expenses from the terminal",
    long_about = "Record expenses by hand or import them from a Monobank card, \
                  then filter, summarize and export them from the command line."
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Expense(ExpenseCommands),

    /// Import recent card spending from Monobank
    Import(ImportArgs),

    /// Write an HTML or CSV report of the filtered expenses
    Report(ReportArgs),

    /// Show current configuration and paths
    Config,
}

fn init_tracing(settings: &Settings, verbose: bool) {
    let fallback = if verbose {
        "expense_tracker=debug".to_string()
    } else {
        format!("expense_tracker={}", settings.log_level)
    };
    let filter = if verbose {
        EnvFilter::new(fallback)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = ExpensePaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_tracing(&settings, cli.verbose);

    let Some(command) = cli.command else {
        println!("expenses - personal expense tracker");
        println!();
        println!("Run 'expenses --help' for usage information.");
        return Ok(());
    };

    if let Commands::Config = command {
        println!("Expense Tracker Configuration");
        println!("=============================");
        println!("Base directory:    {}", paths.base_dir().display());
        println!("Expenses file:     {}", paths.expenses_file().display());
        println!("Reports directory: {}", paths.reports_dir().display());
        println!("Settings file:     {}", paths.settings_file().display());
        println!();
        println!("Settings:");
        println!("  Currency symbol:  {}", settings.currency_symbol);
        println!("  Spending alerts:  {}", settings.spending_alerts);
        println!("  Log level:        {}", settings.log_level);
        println!("  Monobank API:     {}", settings.monobank.api_url);
        println!("  Lookback days:    {}", settings.monobank.lookback_days);
        println!(
            "  Excluded types:   {}",
            settings.monobank.excluded_account_types.join(", ")
        );
        return Ok(());
    }

    let repository = open_repository(&paths)?;
    let mut store = ExpenseStore::open(repository, ConsoleNotifier::new(settings.spending_alerts))
        .with_currency_symbol(settings.currency_symbol.clone());

    match command {
        Commands::Expense(cmd) => handle_expense_command(&mut store, &settings, cmd)?,
        Commands::Import(args) => handle_import_command(&mut store, &settings, args).await?,
        Commands::Report(args) => handle_report_command(&mut store, &settings, &paths, args)?,
        Commands::Config => {}
    }

    Ok(())
}
