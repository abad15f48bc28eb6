#![allow(dead_code)]

use std::sync::Once;
use std::time::Duration;

use httpmock::MockServer;
use inverseml::client::Client;
use inverseml::transport::RetryPolicy;
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

pub const TEST_KEY: &str = "iml_test_key";
pub const TS: &str = "2026-03-01T10:00:00Z";

static TRACING: Once = Once::new();

/// Route client tracing through the test writer; `RUST_LOG` controls
/// verbosity when debugging a failing test.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Millisecond-scale backoff so retry tests finish quickly; same shape as
/// the default policy (3 attempts, doubling, capped).
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(25),
    }
}

pub fn client_for(server: &MockServer) -> Client {
    client_with_policy(server, fast_policy())
}

pub fn client_with_policy(server: &MockServer, policy: RetryPolicy) -> Client {
    init_tracing();
    Client::builder()
        .endpoint(server.base_url())
        .api_key(TEST_KEY)
        .retry_policy(policy)
        .build()
        .expect("test client should build")
}

pub fn model_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": "test model",
        "createdAt": TS,
        "updatedAt": TS,
    })
}

pub fn project_json(id: i64, model_id: i64) -> Value {
    json!({
        "id": id,
        "modelId": model_id,
        "name": "plate-spacing",
        "inputCount": 2,
        "minimums": [0.0, 0.0],
        "maximums": [10.0, 10.0],
        "inputTypes": ["float", "float"],
        "createdAt": TS,
        "updatedAt": TS,
    })
}

pub fn trial_json(id: i64, project_id: i64, output_count: usize) -> Value {
    json!({
        "id": id,
        "projectId": project_id,
        "outputCount": output_count,
        "outputCases": [],
        "createdAt": TS,
        "updatedAt": TS,
    })
}

pub fn objective_json(id: i64, trial_id: i64) -> Value {
    json!({
        "id": id,
        "trialId": trial_id,
        "desiredL1Norm": 0.01,
        "objectives": [20.0],
        "objectiveTypes": ["exact"],
        "minimumBounds": [0.0],
        "maximumBounds": [0.0],
        "createdAt": TS,
        "updatedAt": TS,
    })
}

/// An inverse with no milestones set (still running). Tests splice in
/// milestone timestamps as needed.
pub fn inverse_json(id: i64, objective_id: i64, iteration: u32) -> Value {
    json!({
        "id": id,
        "objectiveId": objective_id,
        "iteration": iteration,
        "input": [2.5, 7.5],
        "createdAt": TS,
        "updatedAt": TS,
    })
}
