//! Live what-if simulation.
//!
//! Each edit re-arms a debounce timer; when the timer fires the current input
//! is validated, normalized and sent to the scoring service tagged with a
//! fresh sequence number. Responses may arrive in any order. Only a response
//! newer than the last applied one changes what is displayed, so an earlier
//! request that finishes late can never overwrite a later result.
//!
//! [`SimulationState`] holds the rules and is fully synchronous.
//! [`SimulationController`] drives it from a single tokio task that owns the
//! timer and publishes a [`SimulationSnapshot`] after every step.

use std::future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Sleep;
use tracing::{debug, info, warn};

use cliniq_core::models::condition::ConditionType;
use cliniq_core::models::input::{AssessmentInput, RawValue};
use cliniq_core::models::payload::NormalizedPayload;
use cliniq_core::models::prediction::PredictionResult;
use cliniq_oracle::client::PredictionClient;
use cliniq_oracle::error::OracleError;

use crate::error::SimulationError;

/// Quiet period after the last edit before a rescoring request is sent.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// No edit since the session started.
    Idle,
    /// An edit arrived and the timer is running.
    Debouncing,
    /// The latest request has been sent and not answered yet.
    AwaitingResponse,
    /// The displayed result matches the latest answered request.
    Settled,
    Error(SimulationError),
}

/// Everything an observer needs to render the simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSnapshot {
    pub condition: ConditionType,
    pub phase: Phase,
    pub input: AssessmentInput,
    /// Sequence number of the most recent request sent. Starts at 0.
    pub issued_sequence: u64,
    /// Sequence number of the most recent response applied. Starts at 0.
    pub applied_sequence: u64,
    pub displayed: Option<PredictionResult>,
    /// Responses dropped because a newer one had already been applied.
    pub stale_discarded: u64,
}

impl SimulationSnapshot {
    pub fn has_outstanding_requests(&self) -> bool {
        self.issued_sequence > self.applied_sequence
    }
}

/// Result of [`SimulationState::fire`].
#[derive(Debug, Clone, PartialEq)]
pub enum FireOutcome {
    /// The input cannot be scored. No request is issued.
    Blocked(SimulationError),
    /// Send `payload` to the scoring service tagged with `sequence`.
    Issue {
        sequence: u64,
        payload: NormalizedPayload,
    },
}

/// Result of [`SimulationState::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Displayed,
    Failed,
    /// A newer response was already applied; nothing changed except the counter.
    Stale,
}

/// The simulation rules without any timing or I/O.
#[derive(Debug, Clone)]
pub struct SimulationState {
    snapshot: SimulationSnapshot,
}

impl SimulationState {
    /// Start a session from an existing input, optionally showing the
    /// result it was last scored with.
    pub fn new(
        condition: ConditionType,
        input: AssessmentInput,
        initial: Option<PredictionResult>,
    ) -> Self {
        Self {
            snapshot: SimulationSnapshot {
                condition,
                phase: Phase::Idle,
                input,
                issued_sequence: 0,
                applied_sequence: 0,
                displayed: initial,
                stale_discarded: 0,
            },
        }
    }

    pub fn snapshot(&self) -> &SimulationSnapshot {
        &self.snapshot
    }

    pub fn condition(&self) -> ConditionType {
        self.snapshot.condition
    }

    /// Record an edit. The caller is responsible for re-arming the timer.
    pub fn edit(&mut self, field: impl Into<String>, value: impl Into<RawValue>) {
        self.snapshot.input.set(field, value);
        self.snapshot.phase = Phase::Debouncing;
    }

    /// The debounce timer elapsed (or a retry was requested).
    pub fn fire(&mut self) -> FireOutcome {
        let schema = cliniq_schema::schema(self.snapshot.condition);

        let errors = schema.validate(&self.snapshot.input);
        if !errors.is_empty() {
            let err = SimulationError::Validation(errors);
            self.snapshot.phase = Phase::Error(err.clone());
            return FireOutcome::Blocked(err);
        }

        let payload = match schema.normalize(&self.snapshot.input) {
            Ok(payload) => payload,
            Err(e) => {
                let err = SimulationError::Normalization(e.to_string());
                self.snapshot.phase = Phase::Error(err.clone());
                return FireOutcome::Blocked(err);
            }
        };

        self.snapshot.issued_sequence += 1;
        self.snapshot.phase = Phase::AwaitingResponse;
        FireOutcome::Issue {
            sequence: self.snapshot.issued_sequence,
            payload,
        }
    }

    /// Apply the response to request `sequence`.
    ///
    /// A failure keeps the previously displayed result so the view can show
    /// it alongside the error.
    pub fn apply(
        &mut self,
        sequence: u64,
        result: Result<PredictionResult, OracleError>,
    ) -> ApplyOutcome {
        if sequence <= self.snapshot.applied_sequence {
            self.snapshot.stale_discarded += 1;
            return ApplyOutcome::Stale;
        }

        self.snapshot.applied_sequence = sequence;
        // Only the answer to the newest request, with no edit since, moves the phase.
        let settles = sequence == self.snapshot.issued_sequence
            && self.snapshot.phase == Phase::AwaitingResponse;
        match result {
            Ok(prediction) => {
                self.snapshot.displayed = Some(prediction);
                if settles {
                    self.snapshot.phase = Phase::Settled;
                }
                ApplyOutcome::Displayed
            }
            Err(e) => {
                if settles {
                    self.snapshot.phase = Phase::Error(SimulationError::Oracle(e));
                }
                ApplyOutcome::Failed
            }
        }
    }
}

enum Command {
    Edit { field: String, value: RawValue },
    Retry,
    Flush(oneshot::Sender<()>),
    Response {
        sequence: u64,
        result: Result<PredictionResult, OracleError>,
    },
    Shutdown,
}

/// Caller side of a running simulation session.
pub struct SimulationHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<SimulationSnapshot>,
    task: JoinHandle<()>,
}

impl SimulationHandle {
    pub fn edit(
        &self,
        field: impl Into<String>,
        value: impl Into<RawValue>,
    ) -> Result<(), SimulationError> {
        self.send(Command::Edit {
            field: field.into(),
            value: value.into(),
        })
    }

    /// Score the current input now, skipping the debounce.
    pub fn retry(&self) -> Result<(), SimulationError> {
        self.send(Command::Retry)
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> SimulationSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Send a pending debounced edit now instead of waiting for the timer.
    /// Resolves once the resulting snapshot has been published. Does nothing
    /// when no edit is pending.
    pub async fn flush(&self) -> Result<(), SimulationError> {
        let (done, flushed) = oneshot::channel();
        self.send(Command::Flush(done))?;
        flushed.await.map_err(|_| SimulationError::Closed)
    }

    /// A receiver notified after every state change.
    pub fn subscribe(&self) -> watch::Receiver<SimulationSnapshot> {
        self.snapshots.clone()
    }

    /// Stop the session and wait for its task to finish. Requests still in
    /// flight are abandoned.
    pub async fn shutdown(self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Err(e) = self.task.await {
            warn!(error = %e, "simulation task ended abnormally");
        }
    }

    fn send(&self, command: Command) -> Result<(), SimulationError> {
        self.commands.send(command).map_err(|_| SimulationError::Closed)
    }
}

/// The task that owns one simulation session.
pub struct SimulationController {
    client: Arc<dyn PredictionClient>,
    state: SimulationState,
    debounce: Duration,
    timer: Option<Pin<Box<Sleep>>>,
    commands: mpsc::UnboundedReceiver<Command>,
    responses: mpsc::WeakUnboundedSender<Command>,
    snapshots: watch::Sender<SimulationSnapshot>,
}

impl SimulationController {
    /// Start a session on the current tokio runtime.
    pub fn spawn(
        client: Arc<dyn PredictionClient>,
        state: SimulationState,
        debounce: Duration,
    ) -> SimulationHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let (snapshots, snapshot_rx) = watch::channel(state.snapshot().clone());

        let controller = Self {
            client,
            state,
            debounce,
            timer: None,
            commands: rx,
            responses: tx.downgrade(),
            snapshots,
        };

        info!(
            condition = %controller.state.condition(),
            debounce_ms = debounce.as_millis() as u64,
            "starting simulation session"
        );
        let task = tokio::spawn(controller.run());

        SimulationHandle {
            commands: tx,
            snapshots: snapshot_rx,
            task,
        }
    }

    async fn run(mut self) {
        loop {
            let mut ack = None;
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Edit { field, value }) => self.on_edit(field, value),
                    Some(Command::Retry) => {
                        self.timer = None;
                        self.on_fire();
                    }
                    Some(Command::Flush(done)) => {
                        if self.timer.take().is_some() {
                            self.on_fire();
                        }
                        ack = Some(done);
                    }
                    Some(Command::Response { sequence, result }) => self.on_response(sequence, result),
                    Some(Command::Shutdown) | None => break,
                },
                () = debounce_elapsed(&mut self.timer) => {
                    self.timer = None;
                    self.on_fire();
                }
            }
            self.snapshots.send_replace(self.state.snapshot().clone());
            if let Some(done) = ack {
                let _ = done.send(());
            }
        }

        debug!(
            issued = self.state.snapshot().issued_sequence,
            stale_discarded = self.state.snapshot().stale_discarded,
            "simulation session ended"
        );
    }

    fn on_edit(&mut self, field: String, value: RawValue) {
        debug!(field = %field, "input edited");
        self.state.edit(field, value);
        self.timer = Some(Box::pin(tokio::time::sleep(self.debounce)));
    }

    fn on_fire(&mut self) {
        match self.state.fire() {
            FireOutcome::Blocked(err) => {
                debug!(error = %err, "input not scoreable, no request sent");
            }
            FireOutcome::Issue { sequence, payload } => self.issue(sequence, payload),
        }
    }

    fn issue(&self, sequence: u64, payload: NormalizedPayload) {
        // Every handle is gone; nobody is left to see the answer.
        let Some(responses) = self.responses.upgrade() else {
            return;
        };

        let client = Arc::clone(&self.client);
        let condition = self.state.condition();
        debug!(sequence, condition = %condition, "issuing what-if request");

        tokio::spawn(async move {
            let result = client.rescore_what_if(condition, &payload).await;
            let _ = responses.send(Command::Response { sequence, result });
        });
    }

    fn on_response(&mut self, sequence: u64, result: Result<PredictionResult, OracleError>) {
        let failure = result.as_ref().err().map(ToString::to_string);
        match self.state.apply(sequence, result) {
            ApplyOutcome::Displayed => debug!(sequence, "what-if result displayed"),
            ApplyOutcome::Failed => warn!(
                sequence,
                error = failure.as_deref().unwrap_or_default(),
                "what-if request failed"
            ),
            ApplyOutcome::Stale => debug!(
                sequence,
                applied = self.state.snapshot().applied_sequence,
                "discarding stale what-if response"
            ),
        }
    }
}

/// Completes when the armed timer elapses; never completes when disarmed.
async fn debounce_elapsed(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(sleep) => sleep.as_mut().await,
        None => future::pending().await,
    }
}
