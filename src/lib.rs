//! # InverseML client
//!
//! Async Rust client for the InverseML inverse-optimization service. The
//! optimization algorithm runs remotely; this crate shepherds the
//! multi-step, stateful conversation with it reliably and enforces the
//! structural invariants of the domain before any network call is made.
//!
//! ## Core concepts
//!
//! - **Entities**: typed records for `Model`, `Project`, `Trial`,
//!   `Objective` and `Inverse`, owned by id reference and never mutated
//!   locally
//! - **Transport pipeline**: every operation is an authenticated, serialized
//!   exchange with classified failures and bounded, cancellable retry
//! - **Workflow controller**: the suggest → evaluate → load-output →
//!   stop-check loop, with stop reasons derived purely from server-returned
//!   milestone timestamps
//! - **Webhook decoder**: shape-checked decoding of out-of-band
//!   notifications
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use inverseml::client::{Client, NewObjective, NewProject};
//! use inverseml::entities::ObjectiveType;
//! use inverseml::error::BoxError;
//! use inverseml::workflow::{Evaluator, InverseSearch};
//!
//! struct MySimulation;
//!
//! #[async_trait]
//! impl Evaluator for MySimulation {
//!     async fn evaluate(&mut self, input: &[f64]) -> Result<Vec<f64>, BoxError> {
//!         // Run the caller-side function under optimization.
//!         Ok(vec![input[0] * 3.0 + input[1]])
//!     }
//! }
//!
//! # async fn example() -> inverseml::error::Result<()> {
//! let client = Client::from_env()?;
//!
//! let model = client.create_model("reactor", "yield tuning").await?;
//! let project = client
//!     .create_project(model.id, &NewProject {
//!         name: "batch-47".into(),
//!         input_count: 2,
//!         minimums: vec![0.0, 0.0],
//!         maximums: vec![10.0, 10.0],
//!         input_types: vec!["float".into(), "float".into()],
//!         categories: vec![],
//!     })
//!     .await?;
//! let trial = client
//!     .load_output_cases(project.id, 1, &[vec![12.0], vec![31.5]])
//!     .await?;
//! let objective = client
//!     .create_objective(trial.id, &NewObjective {
//!         desired_l1_norm: 0.01,
//!         objectives: vec![20.0],
//!         objective_types: vec![ObjectiveType::Exact],
//!         initial_input: vec![5.0, 5.0],
//!         initial_output: vec![20.0],
//!         minimum_bounds: None,
//!         maximum_bounds: None,
//!     })
//!     .await?;
//!
//! let mut search = InverseSearch::new(client, objective.id)?;
//! let outcome = search.run(&mut MySimulation, 200).await?;
//! println!("{} after {} iterations", outcome.reason, outcome.iterations);
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure handling
//!
//! All failures are typed ([`error::Error`]) and carry enough context to
//! branch programmatically: the offending parameter name for local
//! validation failures, the HTTP status for permanent rejections, and the
//! last transient cause when the retry budget runs out. Retries are
//! invisible to callers except as latency; cancellation (via a
//! `tokio_util` [`CancellationToken`](tokio_util::sync::CancellationToken)
//! handed to the builder) surfaces as [`error::Error::Cancelled`], distinct
//! from failure.
//!
//! ## Module guide
//!
//! - [`entities`] - Domain records, enumerations, stop-reason derivation
//! - [`validate`] - Pre-flight argument checks
//! - [`transport`] - Retry pipeline and outcome classification
//! - [`client`] - Configuration and the logical API operations
//! - [`workflow`] - Iteration controller and the evaluator seam
//! - [`webhook`] - Out-of-band event decoding
//! - [`error`] - The failure taxonomy

pub mod client;
pub mod entities;
pub mod error;
pub mod transport;
pub mod validate;
pub mod webhook;
pub mod workflow;
