use anyhow::{Context, bail};
use api_client::{GeminiClient, MarketAnalyst};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use configuration::{Config, LoggingSettings};
use core_types::{AccountType, INSTRUMENT_GROUPS, NewAccount, Side, TradeDraft, TradeOutcome};
use database::JournalRepository;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use web_server::error::{ANALYSIS_FAILED, CALENDAR_FAILED, PRICE_FAILED};

mod render;

/// The main entry point for the FX journal.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the API key may come from the environment or journal.toml.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();
    let config = configuration::load_config(cli.config.as_deref())
        .context("Failed to load configuration")?;
    // Keep the guard alive so buffered log lines are flushed on exit.
    let _log_guard = init_tracing(&config.logging);

    // Execute the appropriate command
    match cli.command {
        Commands::Serve => web_server::run_server(config).await,
        Commands::Account(command) => handle_account(command, &config),
        Commands::Trade(command) => handle_trade(command, &config),
        Commands::Stats { json } => handle_stats(json, &config),
        Commands::Analyze { trade_id } => handle_analyze(&trade_id, &config).await,
        Commands::Calendar => handle_calendar(&config).await,
        Commands::Price { instrument } => handle_price(&instrument, &config).await,
        Commands::Instruments => {
            println!("{}", render::instruments_table(INSTRUMENT_GROUPS));
            Ok(())
        }
    }
}

/// Logs go to stderr so `--json` output stays clean. With `logging.directory`
/// set, a daily rolling file receives the same events.
fn init_tracing(settings: &LoggingSettings) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    match &settings.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "fx-journal.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(filter).with(stderr_layer).init();
            None
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A trading journal for forex, metals and index traders.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file (defaults to ./journal.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server.
    Serve,
    /// Manage trading accounts.
    #[command(subcommand)]
    Account(AccountCommand),
    /// Log, edit and review trades of the active account.
    #[command(subcommand)]
    Trade(TradeCommand),
    /// Summary statistics and equity curve of the active account.
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Ask the market analyst to review a saved trade.
    Analyze { trade_id: String },
    /// Today's high and medium impact economic events.
    Calendar,
    /// Look up the current market price of an instrument.
    Price { instrument: String },
    /// List the suggested instruments.
    Instruments,
}

#[derive(Subcommand, Debug)]
enum AccountCommand {
    /// Create an account. The first account becomes active.
    Add {
        #[arg(long)]
        name: String,
        /// Starting balance in USD.
        #[arg(long)]
        balance: f64,
        #[arg(long = "type", value_enum, default_value_t = AccountTypeArg::Live)]
        account_type: AccountTypeArg,
    },
    /// List all accounts; the active one is marked with `*`.
    List,
    /// Switch the active account.
    Use { account_id: String },
}

#[derive(Subcommand, Debug)]
enum TradeCommand {
    /// Log a trade on the active account.
    Add(TicketArgs),
    /// Change fields of a saved trade; the P/L is recomputed.
    Edit {
        trade_id: String,
        #[command(flatten)]
        ticket: TicketArgs,
    },
    Delete { trade_id: String },
    /// Trades of the active account, newest first.
    List {
        #[arg(long)]
        json: bool,
    },
    Show { trade_id: String },
    /// Show the potential profit and loss of a ticket without saving it.
    Preview(TicketArgs),
}

/// Trade ticket fields. Omitted fields keep their current (or default) value.
#[derive(Args, Debug, Default)]
struct TicketArgs {
    #[arg(long)]
    instrument: Option<String>,
    #[arg(long, value_enum)]
    position: Option<PositionArg>,
    #[arg(long)]
    lot_size: Option<f64>,
    #[arg(long)]
    entry: Option<f64>,
    #[arg(long)]
    stop_loss: Option<f64>,
    #[arg(long)]
    take_profit: Option<f64>,
    #[arg(long, value_enum)]
    outcome: Option<OutcomeArg>,
    /// Trade date, YYYY-MM-DD. New trades default to today.
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    strategy: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    /// Screenshot as a data URL.
    #[arg(long)]
    screenshot: Option<String>,
}

impl TicketArgs {
    fn apply(self, draft: &mut TradeDraft) {
        if let Some(instrument) = self.instrument {
            draft.instrument = instrument;
        }
        if let Some(position) = self.position {
            draft.position = position.into();
        }
        if let Some(lot_size) = self.lot_size {
            draft.lot_size = lot_size;
        }
        if let Some(entry) = self.entry {
            draft.entry_price = entry;
        }
        if let Some(stop_loss) = self.stop_loss {
            draft.stop_loss = stop_loss;
        }
        if let Some(take_profit) = self.take_profit {
            draft.take_profit = take_profit;
        }
        if let Some(outcome) = self.outcome {
            draft.outcome = Some(outcome.into());
        }
        if let Some(date) = self.date {
            draft.trade_date = date;
        }
        if let Some(strategy) = self.strategy {
            draft.strategy = strategy;
        }
        if let Some(notes) = self.notes {
            draft.notes = notes;
        }
        if let Some(screenshot) = self.screenshot {
            draft.screenshot = Some(screenshot);
        }
    }

    /// A fresh ticket dated today unless a date was given.
    fn into_new_draft(self) -> TradeDraft {
        let mut draft = TradeDraft {
            trade_date: Utc::now().date_naive().format("%Y-%m-%d").to_string(),
            ..TradeDraft::default()
        };
        self.apply(&mut draft);
        draft
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PositionArg {
    Long,
    Short,
}

impl From<PositionArg> for Side {
    fn from(arg: PositionArg) -> Self {
        match arg {
            PositionArg::Long => Side::Long,
            PositionArg::Short => Side::Short,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutcomeArg {
    Win,
    Loss,
}

impl From<OutcomeArg> for TradeOutcome {
    fn from(arg: OutcomeArg) -> Self {
        match arg {
            OutcomeArg::Win => TradeOutcome::Win,
            OutcomeArg::Loss => TradeOutcome::Loss,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum AccountTypeArg {
    Live,
    Funded,
}

impl From<AccountTypeArg> for AccountType {
    fn from(arg: AccountTypeArg) -> Self {
        match arg {
            AccountTypeArg::Live => AccountType::Live,
            AccountTypeArg::Funded => AccountType::Funded,
        }
    }
}

// ==============================================================================
// Journal Commands
// ==============================================================================

fn open_journal(config: &Config) -> anyhow::Result<JournalRepository> {
    database::connect(&config.storage.data_dir).with_context(|| {
        format!(
            "Failed to open the journal in {}",
            config.storage.data_dir.display()
        )
    })
}

fn handle_account(command: AccountCommand, config: &Config) -> anyhow::Result<()> {
    let mut repo = open_journal(config)?;
    match command {
        AccountCommand::Add {
            name,
            balance,
            account_type,
        } => {
            let account = repo.add_account(NewAccount {
                name,
                initial_balance: balance,
                account_type: account_type.into(),
            })?;
            println!("Created account '{}' ({}).", account.name, account.id);
            if repo.active_account_id() == Some(account.id.as_str()) {
                println!("It is now the active account.");
            }
        }
        AccountCommand::List => {
            if repo.accounts().is_empty() {
                println!("No accounts yet. Create one with `fx-journal account add`.");
                return Ok(());
            }
            let mut rows = Vec::with_capacity(repo.accounts().len());
            for account in repo.accounts() {
                let balance = repo.report_for(&account.id)?.current_balance;
                rows.push((account.clone(), balance));
            }
            println!("{}", render::accounts_table(&rows, repo.active_account_id()));
        }
        AccountCommand::Use { account_id } => {
            let account = repo.set_active_account(&account_id)?;
            println!("Switched to account '{}'.", account.name);
        }
    }
    Ok(())
}

fn handle_trade(command: TradeCommand, config: &Config) -> anyhow::Result<()> {
    match command {
        // Previews never touch the journal.
        TradeCommand::Preview(ticket) => {
            let preview = analytics::preview(&ticket.into_new_draft());
            println!("{}", render::preview_table(&preview));
        }
        TradeCommand::Add(ticket) => {
            let trade = open_journal(config)?.add_trade(ticket.into_new_draft())?;
            println!("{}", render::trade_detail(&trade));
        }
        TradeCommand::Edit { trade_id, ticket } => {
            let mut repo = open_journal(config)?;
            let existing = repo
                .trade(&trade_id)
                .with_context(|| format!("Trade '{trade_id}' does not exist."))?;
            let mut draft = TradeDraft::from_trade(existing);
            ticket.apply(&mut draft);
            let trade = repo.update_trade(&trade_id, draft)?;
            println!("{}", render::trade_detail(&trade));
        }
        TradeCommand::Delete { trade_id } => {
            let removed = open_journal(config)?.delete_trade(&trade_id)?;
            println!("Deleted {} trade from {}.", removed.instrument, removed.trade_date);
        }
        TradeCommand::List { json } => {
            let trades = open_journal(config)?.active_trades();
            let ordered = analytics::newest_first(&trades);
            if json {
                println!("{}", serde_json::to_string_pretty(&ordered)?);
            } else if ordered.is_empty() {
                println!("No trades logged for this account yet.");
            } else {
                println!("{}", render::trades_table(&ordered));
            }
        }
        TradeCommand::Show { trade_id } => {
            let repo = open_journal(config)?;
            let trade = repo
                .trade(&trade_id)
                .with_context(|| format!("Trade '{trade_id}' does not exist."))?;
            println!("{}", render::trade_detail(trade));
        }
    }
    Ok(())
}

fn handle_stats(json: bool, config: &Config) -> anyhow::Result<()> {
    let repo = open_journal(config)?;
    let report = repo.active_report()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render::stats_table(&report));
        println!("{}", render::equity_table(&report));
    }
    Ok(())
}

// ==============================================================================
// Market Analyst Commands
// ==============================================================================

fn analyst(config: &Config) -> anyhow::Result<GeminiClient> {
    match GeminiClient::new(&config.ai)? {
        Some(client) => Ok(client),
        None => bail!("AI features are disabled: set GEMINI_API_KEY or ai.api_key in the configuration."),
    }
}

fn spinner(message: &str) -> anyhow::Result<ProgressBar> {
    let progress_bar = ProgressBar::new_spinner();
    progress_bar.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    progress_bar.set_message(message.to_string());
    progress_bar.enable_steady_tick(Duration::from_millis(100));
    Ok(progress_bar)
}

async fn handle_analyze(trade_id: &str, config: &Config) -> anyhow::Result<()> {
    let trade = open_journal(config)?
        .trade(trade_id)
        .cloned()
        .with_context(|| format!("Trade '{trade_id}' does not exist."))?;
    let client = analyst(config)?;

    let progress_bar = spinner("Analyzing trade...")?;
    let result = client.analyze_trade(&trade).await;
    progress_bar.finish_and_clear();

    let analysis = result.map_err(|e| {
        tracing::error!(error = %e, trade_id, "Trade analysis failed.");
        anyhow::anyhow!(ANALYSIS_FAILED)
    })?;
    println!("{}", render::analysis_text(&analysis));
    Ok(())
}

async fn handle_calendar(config: &Config) -> anyhow::Result<()> {
    let client = analyst(config)?;

    let progress_bar = spinner("Loading economic calendar...")?;
    let result = client.fetch_economic_calendar().await;
    progress_bar.finish_and_clear();

    let events = result.map_err(|e| {
        tracing::error!(error = %e, "Economic calendar failed.");
        anyhow::anyhow!(CALENDAR_FAILED)
    })?;
    if events.is_empty() {
        println!("No high or medium impact events today.");
    } else {
        println!("{}", render::calendar_table(&events));
    }
    Ok(())
}

async fn handle_price(instrument: &str, config: &Config) -> anyhow::Result<()> {
    let instrument = instrument.trim();
    if instrument.is_empty() {
        bail!("Please select an instrument first.");
    }
    let client = analyst(config)?;

    let progress_bar = spinner(&format!("Fetching price of {instrument}..."))?;
    let result = client.fetch_current_price(instrument).await;
    progress_bar.finish_and_clear();

    let price = result.map_err(|e| {
        tracing::error!(error = %e, instrument, "Price lookup failed.");
        anyhow::anyhow!(PRICE_FAILED)
    })?;
    println!("{instrument}: {price}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trade_add() {
        let cli = Cli::try_parse_from([
            "fx-journal",
            "trade",
            "add",
            "--instrument",
            "GBP/JPY",
            "--position",
            "short",
            "--lot-size",
            "0.5",
            "--entry",
            "190.5",
            "--stop-loss",
            "191.0",
            "--take-profit",
            "189.5",
            "--outcome",
            "win",
            "--date",
            "2024-03-14",
        ])
        .unwrap();
        let Commands::Trade(TradeCommand::Add(ticket)) = cli.command else {
            panic!("expected trade add");
        };
        let draft = ticket.into_new_draft();
        assert_eq!(draft.instrument, "GBP/JPY");
        assert_eq!(draft.position, Side::Short);
        assert_eq!(draft.outcome, Some(TradeOutcome::Win));
        assert_eq!(draft.trade_date, "2024-03-14");
        assert_eq!(draft.lot_size, 0.5);
    }

    #[test]
    fn new_ticket_defaults_to_today() {
        let draft = TicketArgs::default().into_new_draft();
        assert_eq!(draft.trade_date, Utc::now().date_naive().format("%Y-%m-%d").to_string());
        assert_eq!(draft.lot_size, 0.01);
        assert_eq!(draft.outcome, None);
    }

    #[test]
    fn edit_only_overrides_given_fields() {
        let mut draft = TradeDraft {
            instrument: "EUR/USD".to_string(),
            strategy: "Breakout".to_string(),
            outcome: Some(TradeOutcome::Win),
            ..TradeDraft::default()
        };
        TicketArgs {
            outcome: Some(OutcomeArg::Loss),
            ..TicketArgs::default()
        }
        .apply(&mut draft);
        assert_eq!(draft.instrument, "EUR/USD");
        assert_eq!(draft.strategy, "Breakout");
        assert_eq!(draft.outcome, Some(TradeOutcome::Loss));
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["fx-journal", "stats", "--json", "--config", "alt.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
        assert!(matches!(cli.command, Commands::Stats { json: true }));
    }

    #[test]
    fn account_type_defaults_to_live() {
        let cli = Cli::try_parse_from(["fx-journal", "account", "add", "--name", "Main", "--balance", "5000"]).unwrap();
        match cli.command {
            Commands::Account(AccountCommand::Add { account_type, balance, .. }) => {
                assert_eq!(account_type, AccountTypeArg::Live);
                assert_eq!(balance, 5000.0);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
