//! Command implementations. Results go to stdout as JSON; logs go to stderr.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use cliniq_core::models::condition::ConditionType;
use cliniq_core::models::input::{AssessmentInput, RawValue};
use cliniq_core::models::record::RecordId;
use cliniq_engine::compare::ComparisonCoordinator;
use cliniq_engine::present::{present, present_comparison, present_state};
use cliniq_engine::simulation::{Phase, SimulationController, SimulationState};
use cliniq_engine::summary::{RECENT_LIMIT, summarize};
use cliniq_engine::trajectory;
use cliniq_oracle::client::PredictionClient;
use cliniq_oracle::http::HttpPredictionClient;
use cliniq_schema::error::SchemaError;
use cliniq_schema::field::FieldError;

use crate::config::{self, ClientConfig};

pub fn client(config: &ClientConfig) -> eyre::Result<Arc<dyn PredictionClient>> {
    let client = HttpPredictionClient::new(&config.oracle_config())?;
    Ok(Arc::new(client))
}

fn print_json<T: Serialize>(value: &T) -> eyre::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn read_input(path: &Path) -> eyre::Result<AssessmentInput> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read input at {}: {e}", path.display()))?;
    serde_json::from_str(&contents)
        .map_err(|e| eyre::eyre!("input at {} is not a JSON object of fields: {e}", path.display()))
}

/// Parse one `field=value` edit line. Blank lines and `#` comments yield `None`.
pub fn parse_edit(line: &str) -> eyre::Result<Option<(String, RawValue)>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (field, value) = line
        .split_once('=')
        .ok_or_else(|| eyre::eyre!("expected field=value, got '{line}'"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(eyre::eyre!("missing field name in '{line}'"));
    }
    Ok(Some((field.to_string(), RawValue::from(value.trim()))))
}

#[derive(Debug, Serialize)]
struct ValidationReport<'a> {
    condition: ConditionType,
    valid: bool,
    errors: &'a [FieldError],
    messages: Vec<String>,
}

pub fn fields(condition: ConditionType) -> eyre::Result<()> {
    print_json(&cliniq_schema::fields_for(condition))
}

pub fn validate(condition: ConditionType, input_path: &Path) -> eyre::Result<()> {
    let input = read_input(input_path)?;
    let errors = cliniq_schema::validate(condition, &input);

    print_json(&ValidationReport {
        condition,
        valid: errors.is_empty(),
        errors: &errors,
        messages: errors.iter().map(ToString::to_string).collect(),
    })?;

    if !errors.is_empty() {
        return Err(SchemaError::from(errors).into());
    }
    Ok(())
}

pub async fn score(
    client: &dyn PredictionClient,
    condition: ConditionType,
    input_path: &Path,
) -> eyre::Result<()> {
    let input = read_input(input_path)?;
    let errors = cliniq_schema::validate(condition, &input);
    if !errors.is_empty() {
        for e in &errors {
            warn!(field = e.field(), "{e}");
        }
        return Err(SchemaError::from(errors).into());
    }

    let payload = cliniq_schema::normalize(condition, &input)?;
    let prediction = client.score(condition, &payload).await?;
    print_json(&present(&prediction))
}

/// Interactive what-if session: reads `field=value` edits from stdin and
/// prints the view each time the session settles.
pub async fn simulate(
    client: Arc<dyn PredictionClient>,
    condition: ConditionType,
    input_path: &Path,
    debounce: Duration,
) -> eyre::Result<()> {
    let input = read_input(input_path)?;
    let handle = SimulationController::spawn(
        client,
        SimulationState::new(condition, input, None),
        debounce,
    );

    let mut updates = handle.subscribe();
    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            if !matches!(snapshot.phase, Phase::Settled | Phase::Error(_)) {
                continue;
            }
            if let Err(e) = print_json(&present_state(&snapshot)) {
                warn!(error = %e, "failed to print simulation view");
            }
        }
    });

    // Score the starting input before any edit arrives.
    handle.retry()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_edit(&line) {
            Ok(Some((field, value))) => handle.edit(field, value)?,
            Ok(None) => {}
            Err(e) => warn!(error = %e, "ignoring edit"),
        }
    }

    // Send the last edit now and let it settle before ending the session.
    handle.flush().await?;
    let mut settled = handle.subscribe();
    settled
        .wait_for(|s| !matches!(s.phase, Phase::Debouncing | Phase::AwaitingResponse))
        .await
        .map_err(|e| eyre::eyre!("simulation ended unexpectedly: {e}"))?;

    let stale = handle.snapshot().stale_discarded;
    handle.shutdown().await;
    printer.await?;
    info!(stale_discarded = stale, "simulation finished");
    Ok(())
}

/// List records, or print totals and the newest few when `summary` is set.
pub async fn records(client: &dyn PredictionClient, summary: bool) -> eyre::Result<()> {
    let records = client.fetch_records().await?;
    if summary {
        return print_json(&summarize(records, RECENT_LIMIT));
    }
    for r in &records {
        println!(
            "{:>6}  {:<24}  {:<14}  {}",
            r.id,
            r.patient_name,
            r.condition_type.as_str(),
            r.created_at
        );
    }
    Ok(())
}

pub async fn compare(
    client: Arc<dyn PredictionClient>,
    record_a: RecordId,
    record_b: RecordId,
) -> eyre::Result<()> {
    let mut coordinator = ComparisonCoordinator::new(client);
    let comparison = coordinator.compare(record_a, record_b).await?;
    print_json(&present_comparison(&comparison))
}

pub async fn trajectory(client: &dyn PredictionClient, record: RecordId) -> eyre::Result<()> {
    let trajectory = trajectory::load(client, record).await?;
    print_json(&trajectory)
}

pub async fn model_info(client: &dyn PredictionClient, condition: ConditionType) -> eyre::Result<()> {
    let info = client.model_info(condition).await?;
    print_json(&info)
}

pub fn config_show(config: &ClientConfig) -> eyre::Result<()> {
    print_json(&config::config_info(config))
}

/// Changes requested by `config set`. `None` leaves a value untouched.
#[derive(Debug, Default)]
pub struct ConfigUpdate {
    pub base_url: Option<String>,
    pub api_token: Option<String>,
    pub clear_token: bool,
    pub timeout_secs: Option<u64>,
    pub debounce_ms: Option<u64>,
}

impl ConfigUpdate {
    pub fn apply(self, mut config: ClientConfig) -> ClientConfig {
        if let Some(url) = self.base_url {
            config.base_url = url;
        }
        if self.clear_token {
            config.api_token = None;
        } else if let Some(token) = self.api_token {
            config.api_token = Some(token);
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = secs;
        }
        if let Some(ms) = self.debounce_ms {
            config.debounce_ms = ms;
        }
        config
    }
}

/// Update the saved config. Environment overrides are not persisted.
pub fn config_set(update: ConfigUpdate) -> eyre::Result<()> {
    let saved = config::load_config()?;
    let path = config::save_config(&update.apply(saved))?;
    println!("saved {}", path.display());
    Ok(())
}

pub fn config_reset() -> eyre::Result<()> {
    config::delete_config()
}
