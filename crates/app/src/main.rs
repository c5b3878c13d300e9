use std::{fs, io, path::PathBuf};

use clap::{Parser, Subcommand};
use engine::{Record, Store};
use migration::{Migrator, MigratorTrait};
use settings::{Database, Settings};

mod settings;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser, Debug)]
#[command(name = "tradeledger")]
#[command(about = "Store exchange records and render them as a ledger journal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Store every record of a JSON array, all or nothing.
    Import { file: PathBuf },
    /// Write the journal of stored trades, credits and debits.
    Export {
        #[arg(long, env = "TRADELEDGER_OUTPUT")]
        output: Option<PathBuf>,
    },
    /// Print the latest balance snapshot of a user.
    Balance {
        #[arg(long, env = "TRADELEDGER_USER")]
        user: i64,
        #[arg(long, env = "TRADELEDGER_CURRENCY")]
        currency: String,
    },
    /// Print the latest hot wallet snapshot of a currency on a network.
    HotWallet {
        #[arg(long, env = "TRADELEDGER_CURRENCY")]
        currency: String,
        #[arg(long)]
        network: String,
    },
    /// Chain two stored tickers, given as `exchange:MARKET`, into a cross rate.
    Compose {
        #[arg(long)]
        first: String,
        #[arg(long)]
        second: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    let settings = Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "tradeledger={level},engine={level}",
            level = settings.app.level
        ))
        .with_writer(io::stderr)
        .init();

    let db = parse_database(&settings.database).await?;
    let store = Store::builder().database(db).build();

    if let Err(err) = run(&store, &settings, cli.command).await {
        tracing::error!("{err}");
        return Err(err);
    }

    Ok(())
}

async fn run(store: &Store, settings: &Settings, command: Command) -> Result<(), BoxError> {
    match command {
        Command::Import { file } => {
            let data = fs::read_to_string(&file)?;
            let records: Vec<Record> = serde_json::from_str(&data)?;
            let imported = store.import(&records).await?;
            tracing::info!("imported {imported} records from {}", file.display());
        }
        Command::Export { output } => {
            let journal = store.journal().await?;
            let output = output.or_else(|| settings.ledger.output.as_ref().map(PathBuf::from));
            match output {
                Some(path) => {
                    journal.write_to(io::BufWriter::new(fs::File::create(&path)?))?;
                    tracing::info!("wrote {} entries to {}", journal.len(), path.display());
                }
                None => journal.write_to(io::stdout().lock())?,
            }
        }
        Command::Balance { user, currency } => {
            let balance = store.latest_balance(user, &currency).await?;
            println!(
                "{} total {} available {} at {}",
                balance.currency,
                balance.total,
                balance.available,
                balance.time.format(engine::DATE_FORMAT)
            );
        }
        Command::HotWallet { currency, network } => {
            let balance = store.latest_hot_wallet_balance(&currency, &network).await?;
            println!("{balance}");
        }
        Command::Compose { first, second } => {
            let (exchange, market) = ticker_key(&first)?;
            let first = store.latest_ticker(exchange, market).await?;
            let (exchange, market) = ticker_key(&second)?;
            let second = store.latest_ticker(exchange, market).await?;

            let composed = first.compose(&second)?;
            store.insert_ticker(&composed).await?;
            println!("{composed}");
        }
    }

    Ok(())
}

/// Split `exchange:MARKET`.
fn ticker_key(value: &str) -> Result<(&str, &str), BoxError> {
    value
        .split_once(':')
        .ok_or_else(|| format!("expected <exchange>:<market>, got {value}").into())
}

async fn parse_database(config: &Database) -> Result<sea_orm::DatabaseConnection, BoxError> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
