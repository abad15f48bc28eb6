//! Client configuration and the logical operations of the InverseML API.
//!
//! A [`Client`] owns one long-lived authenticated channel (endpoint, bearer
//! credential, connection pool) shared by every operation. Cloning a
//! `Client` is cheap and clones share the channel, so it can be handed to
//! concurrently running tasks freely; operations hold no cross-call mutable
//! state and complete independently. Callers needing ordering (create a
//! project before loading its outputs) sequence the awaits themselves.
//!
//! # Examples
//!
//! ```rust,no_run
//! use inverseml::client::{Client, NewProject};
//!
//! # async fn example() -> inverseml::error::Result<()> {
//! let client = Client::builder()
//!     .endpoint("https://api.inverseml.com")
//!     .api_key("iml_live_...")
//!     .build()?;
//!
//! let model = client.create_model("thermal-sim", "heat exchanger tuning").await?;
//! let project = client
//!     .create_project(model.id, &NewProject {
//!         name: "plate-spacing".into(),
//!         input_count: 2,
//!         minimums: vec![0.0, 0.0],
//!         maximums: vec![10.0, 10.0],
//!         input_types: vec!["float".into(), "float".into()],
//!         categories: vec![],
//!     })
//!     .await?;
//! # let _ = project;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, Url};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::entities::{
    Account, InputType, Inverse, Model, Objective, ObjectiveType, Project, Trial,
};
use crate::error::{Error, Result};
use crate::transport::{RetryPolicy, Transport};
use crate::validate;

/// Base endpoint of the hosted service.
pub const OFFICIAL_ENDPOINT: &str = "https://api.inverseml.com";

/// Hosts under this domain always verify TLS; the insecure toggle is refused.
const OFFICIAL_DOMAIN: &str = "inverseml.com";

/// Environment fallback for the endpoint.
pub const ENV_ENDPOINT: &str = "INVERSEML_ENDPOINT";

/// Environment fallback for the bearer credential.
pub const ENV_API_KEY: &str = "INVERSEML_API_KEY";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

// ============================================================================
// Request parameter types
// ============================================================================

/// Arguments for [`Client::create_project`].
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub input_count: usize,
    pub minimums: Vec<f64>,
    pub maximums: Vec<f64>,
    /// Input-type tokens, matched case-insensitively against
    /// {boolean, category, float, integer}.
    pub input_types: Vec<String>,
    pub categories: Vec<String>,
}

/// Arguments for [`Client::create_objective`].
#[derive(Debug, Clone)]
pub struct NewObjective {
    pub desired_l1_norm: f64,
    /// Target value per objective component.
    pub objectives: Vec<f64>,
    /// Parallel to `objectives`.
    pub objective_types: Vec<ObjectiveType>,
    pub initial_input: Vec<f64>,
    pub initial_output: Vec<f64>,
    /// When unset and the first objective type is `exact`, defaults to an
    /// all-zero vector of matching length before the request is sent.
    pub minimum_bounds: Option<Vec<f64>>,
    pub maximum_bounds: Option<Vec<f64>>,
}

/// Arguments for [`Client::register_account`].
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub company: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub time_zone: String,
}

// Wire bodies. Kept private so validation cannot be skipped.

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateModelBody<'a> {
    name: &'a str,
    description: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateProjectBody<'a> {
    name: &'a str,
    input_count: usize,
    minimums: &'a [f64],
    maximums: &'a [f64],
    input_types: Vec<InputType>,
    categories: &'a [String],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoadOutputCasesBody<'a> {
    output_count: usize,
    output_cases: &'a [Vec<f64>],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateObjectiveBody<'a> {
    desired_l1_norm: f64,
    objectives: &'a [f64],
    objective_types: &'a [ObjectiveType],
    initial_input: &'a [f64],
    initial_output: &'a [f64],
    #[serde(skip_serializing_if = "Option::is_none")]
    minimum_bounds: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    maximum_bounds: Option<Vec<f64>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoadOutputBody<'a> {
    output: &'a [f64],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterAccountBody<'a> {
    company: &'a str,
    name: &'a str,
    email: &'a str,
    password: &'a str,
    time_zone: &'a str,
}

#[derive(Serialize)]
struct EmptyBody {}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`Client`].
///
/// Endpoint and credential may be given explicitly or picked up from the
/// environment (`INVERSEML_ENDPOINT`, `INVERSEML_API_KEY`, with `.env`
/// loading via dotenvy) by [`Client::from_env`].
// No Debug derive: the builder holds the raw credential.
#[derive(Default)]
pub struct ClientBuilder {
    endpoint: Option<String>,
    api_key: Option<String>,
    http: Option<reqwest::Client>,
    policy: RetryPolicy,
    cancel: Option<CancellationToken>,
    danger_accept_invalid_certs: bool,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Base endpoint; defaults to [`OFFICIAL_ENDPOINT`].
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Bearer credential attached to every request. Required.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Use a caller-supplied HTTP client instead of building one.
    ///
    /// The supplied client is used as-is and its lifecycle (including
    /// teardown) remains the caller's responsibility.
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Override the retry policy. The default is 3 attempts with 4s/8s
    /// backoff capped at 10s.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Cancellation signal observed during in-flight I/O and backoff waits.
    pub fn cancellation_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Request timeout for the internally built HTTP client.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Skip TLS certificate verification.
    ///
    /// Intended for private deployments with self-signed certificates.
    /// Refused at build time when the endpoint targets the official domain.
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.danger_accept_invalid_certs = accept;
        self
    }

    /// Validate the configuration and construct the client.
    pub fn build(self) -> Result<Client> {
        let endpoint = self
            .endpoint
            .unwrap_or_else(|| OFFICIAL_ENDPOINT.to_string());
        let api_key = self.api_key.unwrap_or_default();
        validate::required_text("apiKey", &api_key)?;

        let url = Url::parse(&endpoint).map_err(|err| {
            Error::invalid_argument("endpoint", format!("not a valid URL: {err}"))
        })?;
        let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
        let official = host == OFFICIAL_DOMAIN || host.ends_with(&format!(".{OFFICIAL_DOMAIN}"));
        if self.danger_accept_invalid_certs && official {
            return Err(Error::invalid_argument(
                "dangerAcceptInvalidCerts",
                format!("refusing to disable TLS verification for {host}; official-domain traffic must always verify certificates"),
            ));
        }

        let http = match self.http {
            Some(http) => {
                if self.danger_accept_invalid_certs {
                    return Err(Error::invalid_argument(
                        "dangerAcceptInvalidCerts",
                        "cannot alter a caller-supplied HTTP client; configure it before passing it in",
                    ));
                }
                http
            }
            None => reqwest::Client::builder()
                .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
                .danger_accept_invalid_certs(self.danger_accept_invalid_certs)
                .build()
                .map_err(|err| Error::Configuration(format!("failed to build HTTP client: {err}")))?,
        };

        let cancel = self.cancel.unwrap_or_default();
        Ok(Client {
            transport: Arc::new(Transport::new(http, endpoint, api_key, self.policy, cancel)),
        })
    }
}

// ============================================================================
// Client
// ============================================================================

/// Async client for the InverseML service.
///
/// Cheap to clone; clones share the authenticated channel. All operations go
/// through the transport pipeline in [`crate::transport`], so retry,
/// classification and cancellation behave identically everywhere.
#[derive(Debug, Clone)]
pub struct Client {
    transport: Arc<Transport>,
}

impl Client {
    /// Start building a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Build a client from the environment.
    ///
    /// Loads `.env` if present, then reads `INVERSEML_API_KEY` (required)
    /// and `INVERSEML_ENDPOINT` (defaults to the official endpoint).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let mut builder = Client::builder();
        if let Ok(endpoint) = std::env::var(ENV_ENDPOINT) {
            builder = builder.endpoint(endpoint);
        }
        let api_key = std::env::var(ENV_API_KEY).map_err(|_| {
            Error::invalid_argument("apiKey", format!("{ENV_API_KEY} is not set"))
        })?;
        builder.api_key(api_key).build()
    }

    /// List all models visible to the credential.
    #[instrument(skip(self), err)]
    pub async fn list_models(&self) -> Result<Vec<Model>> {
        self.transport
            .execute::<(), _>(Method::GET, "models", None)
            .await
    }

    /// Create a model, the top-level optimization namespace.
    #[instrument(skip(self, description), err)]
    pub async fn create_model(&self, name: &str, description: &str) -> Result<Model> {
        validate::required_text("name", name)?;
        self.transport
            .execute(
                Method::POST,
                "models",
                Some(&CreateModelBody { name, description }),
            )
            .await
    }

    /// Define a project's input space under a model.
    #[instrument(skip(self, project), err)]
    pub async fn create_project(&self, model_id: i64, project: &NewProject) -> Result<Project> {
        validate::positive_id("modelId", model_id)?;
        validate::min_len_text("name", &project.name, validate::MIN_PROJECT_NAME_LEN)?;
        validate::matching_len("minimums", project.input_count, project.minimums.len())?;
        validate::matching_len("maximums", project.input_count, project.maximums.len())?;
        validate::matching_len("inputTypes", project.input_count, project.input_types.len())?;
        let input_types = validate::input_types("inputTypes", &project.input_types)?;
        validate::categories("categories", &project.categories)?;

        self.transport
            .execute(
                Method::POST,
                &format!("models/{model_id}/projects"),
                Some(&CreateProjectBody {
                    name: &project.name,
                    input_count: project.input_count,
                    minimums: &project.minimums,
                    maximums: &project.maximums,
                    input_types,
                    categories: &project.categories,
                }),
            )
            .await
    }

    /// Submit observed output cases for a project, producing a trial.
    #[instrument(skip(self, output_cases), err)]
    pub async fn load_output_cases(
        &self,
        project_id: i64,
        output_count: usize,
        output_cases: &[Vec<f64>],
    ) -> Result<Trial> {
        validate::positive_id("projectId", project_id)?;
        validate::non_empty("outputCases", output_cases)?;
        validate::uniform_rows("outputCases", output_cases, output_count)?;

        self.transport
            .execute(
                Method::POST,
                &format!("projects/{project_id}/output-cases"),
                Some(&LoadOutputCasesBody {
                    output_count,
                    output_cases,
                }),
            )
            .await
    }

    /// Fetch a trial by id.
    #[instrument(skip(self), err)]
    pub async fn get_trial(&self, trial_id: i64) -> Result<Trial> {
        validate::positive_id("trialId", trial_id)?;
        self.transport
            .execute::<(), _>(Method::GET, &format!("trials/{trial_id}"), None)
            .await
    }

    /// Declare an objective for a trial.
    ///
    /// When the first objective type is [`ObjectiveType::Exact`] and bounds
    /// were not given, both bound vectors default to all-zero vectors of the
    /// same length as `objectives`.
    #[instrument(skip(self, objective), err)]
    pub async fn create_objective(
        &self,
        trial_id: i64,
        objective: &NewObjective,
    ) -> Result<Objective> {
        validate::positive_id("trialId", trial_id)?;
        validate::non_empty("objectives", &objective.objectives)?;
        validate::matching_len(
            "objectiveTypes",
            objective.objectives.len(),
            objective.objective_types.len(),
        )?;
        if let Some(minimums) = &objective.minimum_bounds {
            validate::matching_len("minimumBounds", objective.objectives.len(), minimums.len())?;
        }
        if let Some(maximums) = &objective.maximum_bounds {
            validate::matching_len("maximumBounds", objective.objectives.len(), maximums.len())?;
        }

        // Exact objectives default to zero bounds when the caller leaves them unset.
        let exact_first = objective.objective_types.first() == Some(&ObjectiveType::Exact);
        let zero_bounds = exact_first.then(|| vec![0.0; objective.objectives.len()]);
        let minimum_bounds = objective.minimum_bounds.clone().or_else(|| zero_bounds.clone());
        let maximum_bounds = objective.maximum_bounds.clone().or(zero_bounds);

        self.transport
            .execute(
                Method::POST,
                &format!("trials/{trial_id}/objectives"),
                Some(&CreateObjectiveBody {
                    desired_l1_norm: objective.desired_l1_norm,
                    objectives: &objective.objectives,
                    objective_types: &objective.objective_types,
                    initial_input: &objective.initial_input,
                    initial_output: &objective.initial_output,
                    minimum_bounds,
                    maximum_bounds,
                }),
            )
            .await
    }

    /// Ask the remote algorithm for the next candidate input.
    #[instrument(skip(self), err)]
    pub async fn suggest_inverse(&self, objective_id: i64) -> Result<Inverse> {
        validate::positive_id("objectiveId", objective_id)?;
        self.transport
            .execute(
                Method::POST,
                &format!("objectives/{objective_id}/suggest-inverse"),
                Some(&EmptyBody {}),
            )
            .await
    }

    /// Submit the observed output for a suggested inverse.
    ///
    /// The returned [`Inverse`] carries updated error metrics and possibly a
    /// terminal milestone timestamp; see [`Inverse::stop_reason`].
    #[instrument(skip(self, output), err)]
    pub async fn load_inverse_output(&self, inverse_id: i64, output: &[f64]) -> Result<Inverse> {
        validate::positive_id("inverseId", inverse_id)?;
        validate::non_empty("output", output)?;
        self.transport
            .execute(
                Method::POST,
                &format!("inverses/{inverse_id}/load-output"),
                Some(&LoadOutputBody { output }),
            )
            .await
    }

    /// Register a new account.
    #[instrument(skip(self, account), err)]
    pub async fn register_account(&self, account: &NewAccount) -> Result<Account> {
        validate::required_text("company", &account.company)?;
        validate::required_text("name", &account.name)?;
        validate::required_text("email", &account.email)?;
        validate::required_text("password", &account.password)?;
        validate::required_text("timeZone", &account.time_zone)?;
        self.transport
            .execute(
                Method::POST,
                "accounts/register",
                Some(&RegisterAccountBody {
                    company: &account.company,
                    name: &account.name,
                    email: &account.email,
                    password: &account.password,
                    time_zone: &account.time_zone,
                }),
            )
            .await
    }
}
