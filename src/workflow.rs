//! Iteration control for one objective's inverse search.
//!
//! The remote algorithm, not this client, decides when a search terminates,
//! so [`InverseSearch`] never caches or locally advances optimization state:
//! every transition is a round trip, and the controller's whole job is to
//! refuse malformed iteration state (an empty output vector, a
//! `load_output` with nothing pending) and to interpret the terminal
//! milestone timestamps consistently via [`Inverse::stop_reason`].
//!
//! The loop a caller drives:
//!
//! ```text
//! Initialized ──suggest──▶ Running ──┬─▶ Satisfied
//!        ▲                    │      ├─▶ Stopped      (terminal, absorbing)
//!        └── every iteration ─┘      └─▶ Exhausted
//! ```
//!
//! Evaluating a candidate against the caller's own function is entirely
//! external; this crate never executes user code except through the
//! [`Evaluator`] seam.
//!
//! # Examples
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use inverseml::error::BoxError;
//! use inverseml::workflow::{Evaluator, InverseSearch};
//!
//! struct Paraboloid;
//!
//! #[async_trait]
//! impl Evaluator for Paraboloid {
//!     async fn evaluate(&mut self, input: &[f64]) -> Result<Vec<f64>, BoxError> {
//!         Ok(vec![input.iter().map(|x| x * x).sum()])
//!     }
//! }
//!
//! # async fn example(client: inverseml::client::Client) -> inverseml::error::Result<()> {
//! let mut search = InverseSearch::new(client, 42)?;
//! let outcome = search.run(&mut Paraboloid, 100).await?;
//! println!("finished: {} after {} iterations", outcome.reason, outcome.iterations);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use tracing::{debug, info};

use crate::client::Client;
use crate::entities::{Inverse, StopReason};
use crate::error::{BoxError, Error, Result};
use crate::validate;

/// Where a search currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// Objective exists; no inverse suggested yet.
    Initialized,
    /// At least one round trip completed without a terminal milestone.
    Running,
    /// Terminal: objective met within bounds.
    Satisfied,
    /// Terminal: the remote algorithm chose to stop.
    Stopped,
    /// Terminal: search space or budget exhausted server-side.
    Exhausted,
}

impl SearchState {
    /// Terminal states absorb; no further suggestions are allowed.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SearchState::Satisfied | SearchState::Stopped | SearchState::Exhausted
        )
    }

    fn from_reason(reason: StopReason) -> Self {
        match reason {
            StopReason::Running => SearchState::Running,
            StopReason::Satisfied => SearchState::Satisfied,
            StopReason::Stopped => SearchState::Stopped,
            StopReason::Exhausted => SearchState::Exhausted,
        }
    }
}

/// The caller's objective function.
///
/// Implementations receive the candidate input proposed by the remote
/// algorithm and return the observed output vector. Failures surface from
/// [`InverseSearch::run`] as [`Error::Evaluation`].
#[async_trait]
pub trait Evaluator: Send {
    async fn evaluate(&mut self, input: &[f64]) -> std::result::Result<Vec<f64>, BoxError>;
}

/// Summary returned by [`InverseSearch::run`].
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Reason derived from the last inverse; [`StopReason::Running`] means
    /// the iteration budget ran out before the server signalled a stop.
    pub reason: StopReason,
    /// Completed suggest/load-output round-trip pairs.
    pub iterations: u32,
    /// The last inverse returned by the service.
    pub last: Inverse,
}

/// Drives the suggest → evaluate → load-output → stop-check loop for one
/// objective.
#[derive(Debug)]
pub struct InverseSearch {
    client: Client,
    objective_id: i64,
    state: SearchState,
    /// Candidate awaiting an output, between `suggest` and `load_output`.
    pending: Option<Inverse>,
    last: Option<Inverse>,
    iterations: u32,
}

impl InverseSearch {
    /// Begin a search over an existing objective.
    pub fn new(client: Client, objective_id: i64) -> Result<Self> {
        validate::positive_id("objectiveId", objective_id)?;
        Ok(InverseSearch {
            client,
            objective_id,
            state: SearchState::Initialized,
            pending: None,
            last: None,
            iterations: 0,
        })
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Completed round-trip pairs so far.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// The most recent inverse returned by the service, if any.
    pub fn last(&self) -> Option<&Inverse> {
        self.last.as_ref()
    }

    /// True once the server has signalled a terminal milestone.
    pub fn should_stop(&self) -> bool {
        self.state.is_terminal()
    }

    /// Ask the remote algorithm for the next candidate input.
    ///
    /// Refused once the search is terminal, and while a previous candidate
    /// still awaits its output.
    pub async fn suggest(&mut self) -> Result<&Inverse> {
        if self.state.is_terminal() {
            return Err(Error::InvalidState(format!(
                "search for objective {} is already terminal ({:?})",
                self.objective_id, self.state
            )));
        }
        if self.pending.is_some() {
            return Err(Error::InvalidState(
                "previous candidate still awaits an output; call load_output first".into(),
            ));
        }

        let inverse = self.client.suggest_inverse(self.objective_id).await?;
        debug!(
            objective_id = self.objective_id,
            inverse_id = inverse.id,
            iteration = inverse.iteration,
            "received candidate input"
        );

        // The server may terminate at suggestion time (e.g. the space is
        // already exhausted); such an inverse never awaits an output.
        if inverse.should_stop() {
            self.state = SearchState::from_reason(inverse.stop_reason());
            Ok(self.last.insert(inverse))
        } else {
            self.state = SearchState::Running;
            Ok(self.pending.insert(inverse))
        }
    }

    /// Submit the observed output for the pending candidate and re-derive
    /// the search state from the returned milestones.
    ///
    /// The candidate stays pending until the submission succeeds, so a
    /// failed exchange (retries exhausted, cancellation) can be retried
    /// with the same output vector.
    pub async fn load_output(&mut self, output: &[f64]) -> Result<&Inverse> {
        validate::non_empty("output", output)?;
        let inverse_id = self.pending.as_ref().map(|pending| pending.id).ok_or_else(|| {
            Error::InvalidState("no candidate awaiting an output; call suggest first".into())
        })?;

        let updated = self.client.load_inverse_output(inverse_id, output).await?;
        self.pending = None;
        self.iterations += 1;
        self.state = SearchState::from_reason(updated.stop_reason());
        debug!(
            objective_id = self.objective_id,
            inverse_id = updated.id,
            iterations = self.iterations,
            state = ?self.state,
            l1_norm = updated.l1_norm,
            "loaded output"
        );
        Ok(self.last.insert(updated))
    }

    /// Drive the full loop against `evaluator` until the server signals a
    /// stop or `max_iterations` round trips complete.
    pub async fn run<E: Evaluator>(
        &mut self,
        evaluator: &mut E,
        max_iterations: u32,
    ) -> Result<SearchOutcome> {
        while !self.should_stop() && self.iterations < max_iterations {
            let input = self.suggest().await?.input.clone();
            if self.should_stop() {
                break;
            }
            let output = evaluator
                .evaluate(&input)
                .await
                .map_err(|source| Error::Evaluation { source })?;
            self.load_output(&output).await?;
        }

        let last = self.last.clone().ok_or_else(|| {
            Error::InvalidState("search finished without any inverse from the service".into())
        })?;
        let outcome = SearchOutcome {
            reason: last.stop_reason(),
            iterations: self.iterations,
            last,
        };
        info!(
            objective_id = self.objective_id,
            reason = %outcome.reason,
            iterations = outcome.iterations,
            "search finished"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::StopReason;

    #[test]
    fn terminal_states_are_absorbing() {
        assert!(!SearchState::Initialized.is_terminal());
        assert!(!SearchState::Running.is_terminal());
        assert!(SearchState::Satisfied.is_terminal());
        assert!(SearchState::Stopped.is_terminal());
        assert!(SearchState::Exhausted.is_terminal());
    }

    #[test]
    fn state_follows_stop_reason() {
        assert_eq!(
            SearchState::from_reason(StopReason::Satisfied),
            SearchState::Satisfied
        );
        assert_eq!(
            SearchState::from_reason(StopReason::Running),
            SearchState::Running
        );
    }

    #[test]
    fn new_rejects_non_positive_objective_id() {
        let client = Client::builder()
            .endpoint("https://optim.internal.example.com")
            .api_key("k")
            .build()
            .unwrap();
        assert!(InverseSearch::new(client, 0).is_err());
    }
}
