use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;
use tracing_subscriber::EnvFilter;

use cliniq_cli::commands::{self, ConfigUpdate};
use cliniq_cli::config;
use cliniq_core::models::condition::ConditionType;
use cliniq_core::models::record::RecordId;

#[derive(Parser, Debug)]
#[command(name = "cliniq")]
#[command(about = "Clinical risk assessment client")]
#[command(version)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the input fields of a condition
    Fields { condition: ConditionType },
    /// Check an input file without contacting the service
    Validate {
        condition: ConditionType,
        input: PathBuf,
    },
    /// Score an input file
    Score {
        condition: ConditionType,
        input: PathBuf,
    },
    /// Start from an input file and apply `field=value` edits read from stdin
    Simulate {
        condition: ConditionType,
        input: PathBuf,
    },
    /// List patient records
    Records {
        /// Print per-condition totals and the most recent records instead
        #[arg(long)]
        summary: bool,
    },
    /// Compare the latest predictions of two records
    Compare { record_a: RecordId, record_b: RecordId },
    /// Show how a record's risk has changed over time
    Trajectory { record: RecordId },
    /// Show metadata about a condition's model
    ModelInfo { condition: ConditionType },
    /// Show or change the saved configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    Show,
    Set {
        #[arg(long)]
        base_url: Option<String>,
        #[arg(long, conflicts_with = "clear_token")]
        api_token: Option<String>,
        #[arg(long)]
        clear_token: bool,
        #[arg(long)]
        timeout_secs: Option<u64>,
        #[arg(long)]
        debounce_ms: Option<u64>,
    },
    /// Delete the saved configuration
    Reset,
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let settings = config::load_config()?.with_env_overrides();

    match cli.command {
        Command::Fields { condition } => commands::fields(condition),
        Command::Validate { condition, input } => commands::validate(condition, &input),
        Command::Score { condition, input } => {
            let client = commands::client(&settings)?;
            commands::score(client.as_ref(), condition, &input).await
        }
        Command::Simulate { condition, input } => {
            let client = commands::client(&settings)?;
            commands::simulate(client, condition, &input, settings.debounce()).await
        }
        Command::Records { summary } => {
            let client = commands::client(&settings)?;
            commands::records(client.as_ref(), summary).await
        }
        Command::Compare { record_a, record_b } => {
            let client = commands::client(&settings)?;
            commands::compare(client, record_a, record_b).await
        }
        Command::Trajectory { record } => {
            let client = commands::client(&settings)?;
            commands::trajectory(client.as_ref(), record).await
        }
        Command::ModelInfo { condition } => {
            let client = commands::client(&settings)?;
            commands::model_info(client.as_ref(), condition).await
        }
        Command::Config { action } => match action {
            ConfigAction::Show => commands::config_show(&settings),
            ConfigAction::Set {
                base_url,
                api_token,
                clear_token,
                timeout_secs,
                debounce_ms,
            } => commands::config_set(ConfigUpdate {
                base_url,
                api_token,
                clear_token,
                timeout_secs,
                debounce_ms,
            }),
            ConfigAction::Reset => commands::config_reset(),
        },
    }
}
