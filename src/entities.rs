//! Domain entities returned by the InverseML service.
//!
//! Every server-owned record shares the same base shape: an integer `id`,
//! creation/update timestamps, and an optional `disabledAt` marking
//! server-side disablement. Ownership between entities is by id reference
//! (`Model` → `Project` → `Trial` → `Objective` → `Inverse`), never by
//! embedding; child collections returned inline (e.g. an inverse's
//! `results`) are read-only snapshots of server state.
//!
//! Nothing here is mutated locally. Field changes are learned by re-fetching
//! or from the return value of the write call that caused them.
//!
//! # Wire format
//!
//! Bodies are JSON with camelCase member names. The service historically
//! emitted PascalCase, so decoding also accepts that spelling via serde
//! aliases:
//!
//! ```json
//! {
//!   "id": 42,
//!   "objectiveId": 7,
//!   "iteration": 3,
//!   "input": [0.2, 1.4],
//!   "output": [9.8],
//!   "errors": [0.02],
//!   "l1Norm": 0.02,
//!   "loadedAt": "2026-03-01T10:30:00Z",
//!   "satisfiedAt": "2026-03-01T10:30:05Z",
//!   "createdAt": "2026-03-01T10:29:58Z",
//!   "updatedAt": "2026-03-01T10:30:05Z"
//! }
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

// ============================================================================
// Enumerations
// ============================================================================

/// Type of a single project input dimension.
///
/// Parsed case-insensitively from the wire (`"Float"`, `"FLOAT"`, and
/// `"float"` all decode to [`InputType::Float`]); always serialized as the
/// lowercase token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputType {
    Boolean,
    Category,
    Float,
    Integer,
}

impl InputType {
    /// The closed set of accepted input types.
    pub const ALL: [InputType; 4] = [
        InputType::Boolean,
        InputType::Category,
        InputType::Float,
        InputType::Integer,
    ];

    /// Lowercase wire token for this input type.
    pub fn as_str(self) -> &'static str {
        match self {
            InputType::Boolean => "boolean",
            InputType::Category => "category",
            InputType::Float => "float",
            InputType::Integer => "integer",
        }
    }

    /// Case-insensitive parse against the closed set.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "boolean" => Some(InputType::Boolean),
            "category" => Some(InputType::Category),
            "float" => Some(InputType::Float),
            "integer" => Some(InputType::Integer),
            _ => None,
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for InputType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for InputType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        InputType::parse(&raw).ok_or_else(|| {
            de::Error::custom(format!(
                "unknown input type `{raw}`; expected one of boolean, category, float, integer"
            ))
        })
    }
}

/// How one objective component is interpreted by the remote solver.
///
/// The wire tokens are an explicit total mapping ([`ObjectiveType::wire_token`]
/// is an exhaustive `match`, so adding a variant without a token fails to
/// compile rather than miscoding on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectiveType {
    Exact,
    Percent,
    Value,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    Minimize,
    Maximize,
}

impl ObjectiveType {
    /// All nine objective types, in wire-token order.
    pub const ALL: [ObjectiveType; 9] = [
        ObjectiveType::Exact,
        ObjectiveType::Percent,
        ObjectiveType::Value,
        ObjectiveType::LessThan,
        ObjectiveType::LessThanEqual,
        ObjectiveType::GreaterThan,
        ObjectiveType::GreaterThanEqual,
        ObjectiveType::Minimize,
        ObjectiveType::Maximize,
    ];

    /// Fixed lowercase token sent on the wire.
    pub fn wire_token(self) -> &'static str {
        match self {
            ObjectiveType::Exact => "exact",
            ObjectiveType::Percent => "percent",
            ObjectiveType::Value => "value",
            ObjectiveType::LessThan => "lessthan",
            ObjectiveType::LessThanEqual => "lessthan_equal",
            ObjectiveType::GreaterThan => "greaterthan",
            ObjectiveType::GreaterThanEqual => "greaterthan_equal",
            ObjectiveType::Minimize => "minimize",
            ObjectiveType::Maximize => "maximize",
        }
    }

    /// Case-insensitive parse of a wire token.
    pub fn from_wire(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "exact" => Some(ObjectiveType::Exact),
            "percent" => Some(ObjectiveType::Percent),
            "value" => Some(ObjectiveType::Value),
            "lessthan" => Some(ObjectiveType::LessThan),
            "lessthan_equal" => Some(ObjectiveType::LessThanEqual),
            "greaterthan" => Some(ObjectiveType::GreaterThan),
            "greaterthan_equal" => Some(ObjectiveType::GreaterThanEqual),
            "minimize" => Some(ObjectiveType::Minimize),
            "maximize" => Some(ObjectiveType::Maximize),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_token())
    }
}

impl Serialize for ObjectiveType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.wire_token())
    }
}

impl<'de> Deserialize<'de> for ObjectiveType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ObjectiveType::from_wire(&raw)
            .ok_or_else(|| de::Error::custom(format!("unknown objective type `{raw}`")))
    }
}

/// Why an inverse search is, or is not, finished.
///
/// Derived purely from an [`Inverse`]'s milestone timestamps; see
/// [`Inverse::stop_reason`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StopReason {
    /// No terminal milestone set; the loop should continue.
    Running,
    /// The objective was met within its bounds.
    Satisfied,
    /// The remote algorithm chose to stop (e.g. no further progress).
    Stopped,
    /// The search space or iteration budget was exhausted server-side.
    Exhausted,
}

impl StopReason {
    /// True for every reason except [`StopReason::Running`].
    pub fn is_terminal(self) -> bool {
        self != StopReason::Running
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StopReason::Running => "running",
            StopReason::Satisfied => "satisfied",
            StopReason::Stopped => "stopped",
            StopReason::Exhausted => "exhausted",
        };
        f.write_str(label)
    }
}

// ============================================================================
// Entities
// ============================================================================

/// Top-level optimization namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[serde(alias = "Id")]
    pub id: i64,
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(default, alias = "Description")]
    pub description: Option<String>,
    #[serde(alias = "CreatedAt")]
    pub created_at: DateTime<Utc>,
    #[serde(alias = "UpdatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, alias = "DisabledAt")]
    pub disabled_at: Option<DateTime<Utc>>,
}

/// One optimization problem's input space, owned by a [`Model`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(alias = "Id")]
    pub id: i64,
    #[serde(alias = "ModelId")]
    pub model_id: i64,
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "InputCount")]
    pub input_count: usize,
    #[serde(alias = "Minimums")]
    pub minimums: Vec<f64>,
    #[serde(alias = "Maximums")]
    pub maximums: Vec<f64>,
    #[serde(alias = "InputTypes")]
    pub input_types: Vec<InputType>,
    #[serde(default, alias = "Categories")]
    pub categories: Vec<String>,
    /// Read-only snapshot of the input cases known to the server.
    #[serde(default, alias = "InputCases")]
    pub input_cases: Vec<Vec<f64>>,
    #[serde(alias = "CreatedAt")]
    pub created_at: DateTime<Utc>,
    #[serde(alias = "UpdatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, alias = "DisabledAt")]
    pub disabled_at: Option<DateTime<Utc>>,
}

/// One set of observed outputs for a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trial {
    #[serde(alias = "Id")]
    pub id: i64,
    #[serde(alias = "ProjectId")]
    pub project_id: i64,
    #[serde(alias = "OutputCount")]
    pub output_count: usize,
    #[serde(default, alias = "OutputCases")]
    pub output_cases: Vec<Vec<f64>>,
    #[serde(alias = "CreatedAt")]
    pub created_at: DateTime<Utc>,
    #[serde(alias = "UpdatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, alias = "DisabledAt")]
    pub disabled_at: Option<DateTime<Utc>>,
}

/// A target specification for inverse search, owned by a [`Trial`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Objective {
    #[serde(alias = "Id")]
    pub id: i64,
    #[serde(alias = "TrialId")]
    pub trial_id: i64,
    #[serde(alias = "DesiredL1Norm")]
    pub desired_l1_norm: f64,
    #[serde(alias = "Objectives")]
    pub objectives: Vec<f64>,
    /// Parallel to `objectives`; same length.
    #[serde(alias = "ObjectiveTypes")]
    pub objective_types: Vec<ObjectiveType>,
    #[serde(default, alias = "MinimumBounds")]
    pub minimum_bounds: Option<Vec<f64>>,
    #[serde(default, alias = "MaximumBounds")]
    pub maximum_bounds: Option<Vec<f64>>,
    #[serde(alias = "CreatedAt")]
    pub created_at: DateTime<Utc>,
    #[serde(alias = "UpdatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, alias = "DisabledAt")]
    pub disabled_at: Option<DateTime<Utc>>,
}

/// Per-objective-component evaluation detail attached to an [`Inverse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InverseResult {
    #[serde(alias = "Objective")]
    pub objective: f64,
    #[serde(alias = "MinimumBound")]
    pub minimum_bound: f64,
    #[serde(alias = "MaximumBound")]
    pub maximum_bound: f64,
    #[serde(alias = "Output")]
    pub output: f64,
    #[serde(alias = "Error")]
    pub error: f64,
    #[serde(alias = "Satisfied")]
    pub satisfied: bool,
    #[serde(default, alias = "Detail")]
    pub detail: Option<String>,
}

/// One proposed-input / observed-output iteration of an objective's search.
///
/// The four milestone timestamps encode lifecycle, not data: `loaded_at`
/// records that an output was submitted, while at most one of the remaining
/// three marks the search terminal. Which one is set determines the derived
/// [`StopReason`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inverse {
    #[serde(alias = "Id")]
    pub id: i64,
    #[serde(alias = "ObjectiveId")]
    pub objective_id: i64,
    #[serde(alias = "Iteration")]
    pub iteration: u32,
    /// Candidate input proposed by the remote algorithm.
    #[serde(alias = "Input")]
    pub input: Vec<f64>,
    /// Observed output, present once loaded.
    #[serde(default, alias = "Output")]
    pub output: Vec<f64>,
    /// Per-component error metrics, present once loaded.
    #[serde(default, alias = "Errors")]
    pub errors: Vec<f64>,
    #[serde(default, alias = "L1Norm")]
    pub l1_norm: Option<f64>,
    #[serde(default, alias = "LoadedAt")]
    pub loaded_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "SatisfiedAt")]
    pub satisfied_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "StoppedAt")]
    pub stopped_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "ExhaustedAt")]
    pub exhausted_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "Results")]
    pub results: Vec<InverseResult>,
    #[serde(alias = "CreatedAt")]
    pub created_at: DateTime<Utc>,
    #[serde(alias = "UpdatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, alias = "DisabledAt")]
    pub disabled_at: Option<DateTime<Utc>>,
}

impl Inverse {
    /// Derive the stop reason from the milestone timestamps.
    ///
    /// Pure and deterministic: the first set milestone in precedence order
    /// Satisfied > Stopped > Exhausted wins, so an unexpected combination
    /// from the server still resolves to exactly one reason and the caller's
    /// iteration loop can never spin on an ambiguous state.
    pub fn stop_reason(&self) -> StopReason {
        if self.satisfied_at.is_some() {
            StopReason::Satisfied
        } else if self.stopped_at.is_some() {
            StopReason::Stopped
        } else if self.exhausted_at.is_some() {
            StopReason::Exhausted
        } else {
            StopReason::Running
        }
    }

    /// True iff the derived reason is terminal.
    pub fn should_stop(&self) -> bool {
        self.stop_reason().is_terminal()
    }
}

/// Account returned by registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(alias = "Id")]
    pub id: i64,
    #[serde(alias = "Company")]
    pub company: String,
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Email")]
    pub email: String,
    #[serde(default, alias = "TimeZone")]
    pub time_zone: Option<String>,
    /// Bearer credential issued for this account, when the service returns one.
    #[serde(default, alias = "ApiToken")]
    pub api_token: Option<String>,
    #[serde(alias = "CreatedAt")]
    pub created_at: DateTime<Utc>,
    #[serde(alias = "UpdatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, alias = "DisabledAt")]
    pub disabled_at: Option<DateTime<Utc>>,
}

/// Out-of-band webhook notification.
///
/// Decoded via [`crate::webhook::decode_event`], which enforces the shape
/// requirements (`id` present, `name` a non-empty string) before this type
/// is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(alias = "Id")]
    pub id: i64,
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(default, alias = "Subject")]
    pub subject: Option<serde_json::Value>,
    /// Opaque event payload; shape varies by event name.
    #[serde(default, alias = "Data")]
    pub data: serde_json::Value,
}
