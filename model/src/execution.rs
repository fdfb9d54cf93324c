#[cfg(feature = "testing")]
use proptest_derive::Arbitrary;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumIter, EnumString};

/// Opaque handle returned by the query service for an in-flight query.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionId(String);

impl ExecutionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remote execution states, owned and mutated exclusively by the query
/// service. The operator only ever observes them via status checks.
#[cfg_attr(feature = "testing", derive(Arbitrary))]
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionState {
    #[default]
    Queued,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl ExecutionState {
    /// Terminal states admit no further transition; polling stops here.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExecutionState::Succeeded | ExecutionState::Failed | ExecutionState::Cancelled
        )
    }
}

/// An execution as last observed by the operator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryExecution {
    pub id: ExecutionId,
    pub state: ExecutionState,
}

/// Submission payload for the query service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitQuery {
    pub query: String,
    pub output_location: String,
    pub database: Option<String>,
}

impl SubmitQuery {
    pub fn new(query: impl Into<String>, output_location: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            output_location: output_location.into(),
            database: None,
        }
    }

    pub fn database(mut self, database: Option<String>) -> Self {
        self.database = database;
        self
    }
}
