//! Logical operations end to end against a mock server, plus the pre-flight
//! validation that must fail before anything reaches the wire.

use httpmock::prelude::*;
use inverseml::client::{NewAccount, NewObjective, NewProject};
use inverseml::entities::{InputType, ObjectiveType};
use inverseml::error::Error;
use serde_json::json;

mod common;
use common::*;

fn sample_project() -> NewProject {
    NewProject {
        name: "plate-spacing".into(),
        input_count: 2,
        minimums: vec![0.0, 0.0],
        maximums: vec![10.0, 10.0],
        input_types: vec!["float".into(), "float".into()],
        categories: vec![],
    }
}

#[tokio::test]
async fn create_project_round_trips() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/models/3/projects")
                .json_body_partial(
                    r#"{"inputCount": 2, "inputTypes": ["float", "float"]}"#,
                );
            then.status(200).json_body(project_json(11, 3));
        })
        .await;

    let client = client_for(&server);
    let project = client.create_project(3, &sample_project()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(project.id, 11);
    assert_eq!(project.input_types, vec![InputType::Float, InputType::Float]);
}

#[tokio::test]
async fn create_project_length_mismatch_never_reaches_the_wire() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/models/3/projects");
            then.status(200).json_body(project_json(11, 3));
        })
        .await;

    let client = client_for(&server);
    let mut project = sample_project();
    project.minimums = vec![0.0];
    let err = client.create_project(3, &project).await.unwrap_err();

    assert!(matches!(err, Error::InvalidArgument { param: "minimums", .. }));
    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn create_project_rejects_unknown_input_type_and_short_name() {
    let server = MockServer::start_async().await;
    let client = client_for(&server);

    let mut project = sample_project();
    project.input_types = vec!["float".into(), "decimal".into()];
    let err = client.create_project(3, &project).await.unwrap_err();
    match err {
        Error::InvalidArgument { param, reason } => {
            assert_eq!(param, "inputTypes");
            assert!(reason.contains("decimal"));
        }
        other => panic!("expected InvalidArgument, got {other:?}"),
    }

    let mut project = sample_project();
    project.name = "ab".into();
    let err = client.create_project(3, &project).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { param: "name", .. }));

    let err = client.create_project(0, &sample_project()).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { param: "modelId", .. }));
}

#[tokio::test]
async fn load_output_cases_checks_row_width() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/projects/11/output-cases");
            then.status(200).json_body(trial_json(21, 11, 3));
        })
        .await;

    let client = client_for(&server);

    let short_row = vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0]];
    let err = client.load_output_cases(11, 3, &short_row).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { param: "outputCases", .. }));
    assert_eq!(mock.hits_async().await, 0);

    let cases = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
    let trial = client.load_output_cases(11, 3, &cases).await.unwrap();
    mock.assert_async().await;
    assert_eq!(trial.output_count, 3);
}

#[tokio::test]
async fn load_output_cases_rejects_empty_case_list() {
    let server = MockServer::start_async().await;
    let client = client_for(&server);
    let err = client.load_output_cases(11, 3, &[]).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { param: "outputCases", .. }));
}

#[tokio::test]
async fn create_objective_defaults_exact_bounds_to_zero_vectors() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/trials/21/objectives")
                .json_body_partial(
                    r#"{"objectiveTypes": ["exact"], "minimumBounds": [0.0], "maximumBounds": [0.0]}"#,
                );
            then.status(200).json_body(objective_json(31, 21));
        })
        .await;

    let client = client_for(&server);
    let objective = client
        .create_objective(
            21,
            &NewObjective {
                desired_l1_norm: 0.01,
                objectives: vec![20.0],
                objective_types: vec![ObjectiveType::Exact],
                initial_input: vec![5.0, 5.0],
                initial_output: vec![20.0],
                minimum_bounds: None,
                maximum_bounds: None,
            },
        )
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(objective.objective_types, vec![ObjectiveType::Exact]);
}

#[tokio::test]
async fn create_objective_requires_parallel_type_array() {
    let server = MockServer::start_async().await;
    let client = client_for(&server);
    let err = client
        .create_objective(
            21,
            &NewObjective {
                desired_l1_norm: 0.01,
                objectives: vec![20.0, 30.0],
                objective_types: vec![ObjectiveType::Minimize],
                initial_input: vec![5.0],
                initial_output: vec![20.0, 30.0],
                minimum_bounds: None,
                maximum_bounds: None,
            },
        )
        .await
        .unwrap_err();
    match err {
        Error::InvalidArgument { param, reason } => {
            assert_eq!(param, "objectiveTypes");
            assert!(reason.contains("expected length 2"));
            assert!(reason.contains("got 1"));
        }
        other => panic!("expected InvalidArgument, got {other:?}"),
    }
}

#[tokio::test]
async fn suggest_inverse_posts_to_the_objective() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/objectives/31/suggest-inverse");
            then.status(200).json_body(inverse_json(41, 31, 0));
        })
        .await;

    let client = client_for(&server);
    let inverse = client.suggest_inverse(31).await.unwrap();
    mock.assert_async().await;
    assert_eq!(inverse.objective_id, 31);
    assert!(!inverse.should_stop());
}

#[tokio::test]
async fn load_inverse_output_rejects_empty_vector() {
    let server = MockServer::start_async().await;
    let client = client_for(&server);
    let err = client.load_inverse_output(41, &[]).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { param: "output", .. }));
}

#[tokio::test]
async fn register_account_validates_credentials_locally() {
    let server = MockServer::start_async().await;
    let client = client_for(&server);
    let err = client
        .register_account(&NewAccount {
            company: "Acme".into(),
            name: "Jo Doe".into(),
            email: "  ".into(),
            password: "hunter22".into(),
            time_zone: "UTC".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { param: "email", .. }));
}

#[tokio::test]
async fn register_account_round_trips() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/accounts/register")
                .json_body_partial(r#"{"company": "Acme", "timeZone": "UTC"}"#);
            then.status(200).json_body(json!({
                "id": 5,
                "company": "Acme",
                "name": "Jo Doe",
                "email": "jo@acme.test",
                "timeZone": "UTC",
                "apiToken": "iml_live_abc",
                "createdAt": TS,
                "updatedAt": TS,
            }));
        })
        .await;

    let client = client_for(&server);
    let account = client
        .register_account(&NewAccount {
            company: "Acme".into(),
            name: "Jo Doe".into(),
            email: "jo@acme.test".into(),
            password: "hunter22".into(),
            time_zone: "UTC".into(),
        })
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(account.api_token.as_deref(), Some("iml_live_abc"));
}
