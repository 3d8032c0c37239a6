use anyhow::Result;
use clap::{Parser, Subcommand};

use cashflow::cli::{
    handle_bars_command, handle_categorize_command, handle_report_command, handle_sankey_command,
    BarsArgs, CategorizeArgs, ReportArgs, SankeyArgs,
};
use cashflow::config::{paths::CashflowPaths, settings::Settings};
use cashflow::logging::{parse_log_level, setup_logging};
use cashflow::services::SAMPLE_RULES;

#[derive(Parser)]
#[command(
    name = "cashflow",
    version,
    about = "Categorize bank statements and build Sankey cashflow graphs",
    long_about = "cashflow reads bank statement exports, labels every transaction \
                  with a category from keyword rules and shows where the money \
                  comes from and where it goes."
)]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "error", env = "CASHFLOW_LOG")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Label every transaction of a statement with a category
    Categorize(CategorizeArgs),

    /// Per-category turnover over a date window
    Report(ReportArgs),

    /// Sankey flow graph over a date window
    Sankey(SankeyArgs),

    /// Income and expense bars over a date window
    Bars(BarsArgs),

    /// Write default settings and a starter rule file
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(parse_log_level(&cli.log_level));

    let paths = CashflowPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Categorize(args)) => handle_categorize_command(&paths, &settings, args)?,
        Some(Commands::Report(args)) => handle_report_command(&paths, &settings, args)?,
        Some(Commands::Sankey(args)) => handle_sankey_command(&paths, &settings, args)?,
        Some(Commands::Bars(args)) => handle_bars_command(&paths, &settings, args)?,
        Some(Commands::Init) => {
            println!("Initializing cashflow at: {}", paths.base_dir().display());
            settings.save(&paths)?;

            let rules = settings.rules_path(&paths);
            if rules.exists() {
                println!("Keeping existing rule file: {}", rules.display());
            } else {
                std::fs::write(&rules, SAMPLE_RULES)?;
                println!("Starter rule file written to: {}", rules.display());
            }
            println!();
            println!("Edit the rule file to map keywords to your categories, then run");
            println!("'cashflow report <statement.csv>'.");
        }
        Some(Commands::Config) => {
            println!("cashflow Configuration");
            println!("======================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Rule file:        {}", settings.rules_path(&paths).display());
            println!();
            println!("Settings:");
            println!("  Default bank:      {}", settings.default_bank);
            println!("  Monthly averages:  {}", settings.normalize_monthly);
            println!("  Lookback days:     {}", settings.lookback_days);
            println!("  Currency symbol:   {}", settings.currency_symbol);
            println!("  Date format:       {}", settings.date_format);
        }
        None => {
            println!("cashflow - bank statement categorization and Sankey graphs");
            println!();
            println!("Run 'cashflow --help' for usage information.");
        }
    }

    Ok(())
}
