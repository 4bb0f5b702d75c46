//! cliniq-engine
//!
//! The assessment workflow: the live what-if simulation loop, record
//! comparison and summaries, risk trajectories, and the pure mapping from
//! results to view models. Talks to the scoring service only through
//! [`PredictionClient`](cliniq_oracle::client::PredictionClient).

pub mod compare;
pub mod error;
pub mod present;
pub mod simulation;
pub mod summary;
pub mod trajectory;
