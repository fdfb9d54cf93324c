//! Scripted stand-in for the query service, for operator tests.

use crate::client::{QueryService, QueryServiceError};
use async_trait::async_trait;
use model::endpoint::ServiceAddr;
use model::execution::{ExecutionId, ExecutionState, SubmitQuery};
use model::table::{DdlSource, TableDefinition};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

pub(crate) fn test_addr() -> ServiceAddr {
    ServiceAddr::new("localhost", 9700)
}

/// A validated inline definition, the shape most operator tests need.
pub(crate) fn inline_definition(table_name: &str) -> TableDefinition {
    TableDefinition {
        name: table_name.to_owned(),
        table_name: table_name.to_owned(),
        database: None,
        output_location: "s3://bucket/results/".to_owned(),
        ddl: DdlSource::Inline(format!("CREATE EXTERNAL TABLE `{table_name}` (id string);")),
        substitutions: Default::default(),
        replace_all_occurrences: false,
    }
}

#[derive(Default)]
struct Inner {
    submissions: Vec<SubmitQuery>,
    scripts: VecDeque<Vec<ExecutionState>>,
    executions: HashMap<ExecutionId, VecDeque<ExecutionState>>,
    checks: u32,
    reject_containing: Option<String>,
}

/// Query service double that records submissions and replays scripted state
/// sequences across successive status checks.
#[derive(Default)]
pub(crate) struct ScriptedService {
    inner: Mutex<Inner>,
}

impl ScriptedService {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The next submission's execution walks these states across status
    /// checks; the last state repeats once the script is exhausted.
    /// Unscripted submissions succeed on the first check.
    pub(crate) fn script(self, states: impl IntoIterator<Item = ExecutionState>) -> Self {
        let states: Vec<ExecutionState> = states.into_iter().collect();
        assert!(!states.is_empty(), "A script needs at least one state");
        self.inner.lock().unwrap().scripts.push_back(states);
        self
    }

    /// Reject any submission whose query text contains `needle`.
    pub(crate) fn reject_containing(self, needle: impl Into<String>) -> Self {
        self.inner.lock().unwrap().reject_containing = Some(needle.into());
        self
    }

    pub(crate) fn submissions(&self) -> Vec<SubmitQuery> {
        self.inner.lock().unwrap().submissions.clone()
    }

    pub(crate) fn submitted_queries(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .submissions
            .iter()
            .map(|s| s.query.clone())
            .collect()
    }

    pub(crate) fn status_checks(&self) -> u32 {
        self.inner.lock().unwrap().checks
    }
}

#[async_trait]
impl QueryService for ScriptedService {
    async fn submit_query(&self, query: SubmitQuery) -> Result<ExecutionId, QueryServiceError> {
        let mut inner = self.inner.lock().unwrap();

        if let Some(needle) = &inner.reject_containing
            && query.query.contains(needle.as_str())
        {
            return Err(QueryServiceError::Rejected(
                test_addr(),
                format!("scripted rejection of '{needle}'"),
            ));
        }

        let id = ExecutionId::new(format!("exec-{}", inner.executions.len()));
        let states = inner
            .scripts
            .pop_front()
            .unwrap_or_else(|| vec![ExecutionState::Succeeded]);
        inner.executions.insert(id.clone(), states.into());
        inner.submissions.push(query);
        Ok(id)
    }

    async fn execution_status(
        &self,
        id: &ExecutionId,
    ) -> Result<ExecutionState, QueryServiceError> {
        let mut inner = self.inner.lock().unwrap();
        inner.checks += 1;

        let states = inner
            .executions
            .get_mut(id)
            .ok_or_else(|| QueryServiceError::UnknownExecution(test_addr(), id.clone()))?;
        let state = if states.len() > 1 {
            states.pop_front().expect("Script cannot be empty")
        } else {
            *states.front().expect("Script cannot be empty")
        };
        Ok(state)
    }
}
