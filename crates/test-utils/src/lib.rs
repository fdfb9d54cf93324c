//! Shared mock of the remote query service.
//!
//! The mock interprets submitted DDL just enough to track which tables
//! exist, so tests can observe create/drop effects the way a listing call
//! against the real service would. Status checks replay scripted state
//! sequences; unscripted executions succeed on the first check.

use async_trait::async_trait;
use model::endpoint::ServiceAddr;
use model::execution::{ExecutionId, ExecutionState, SubmitQuery};
use operator::{QueryService, QueryServiceError};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use uuid::Uuid;

pub fn test_addr() -> ServiceAddr {
    ServiceAddr::new("localhost", 9700)
}

#[derive(Default)]
struct Inner {
    tables: Vec<String>,
    submissions: Vec<SubmitQuery>,
    executions: HashMap<ExecutionId, VecDeque<ExecutionState>>,
    scripts: VecDeque<Vec<ExecutionState>>,
    checks: u32,
    reject_containing: Option<String>,
}

#[derive(Default)]
pub struct MockQueryService {
    inner: Mutex<Inner>,
}

impl MockQueryService {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next submission's execution walks these states across successive
    /// status checks; the last state repeats once the script is exhausted.
    pub fn script(self, states: impl IntoIterator<Item = ExecutionState>) -> Self {
        let states: Vec<ExecutionState> = states.into_iter().collect();
        assert!(!states.is_empty(), "A script needs at least one state");
        self.inner.lock().unwrap().scripts.push_back(states);
        self
    }

    /// Reject any submission whose query text contains `needle`.
    pub fn reject_containing(self, needle: impl Into<String>) -> Self {
        self.inner.lock().unwrap().reject_containing = Some(needle.into());
        self
    }

    /// The tables that currently exist, in creation order. This is the
    /// mock's stand-in for the service's table listing.
    pub fn tables(&self) -> Vec<String> {
        self.inner.lock().unwrap().tables.clone()
    }

    pub fn submissions(&self) -> Vec<SubmitQuery> {
        self.inner.lock().unwrap().submissions.clone()
    }

    pub fn submitted_queries(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .submissions
            .iter()
            .map(|s| s.query.clone())
            .collect()
    }

    pub fn status_checks(&self) -> u32 {
        self.inner.lock().unwrap().checks
    }
}

/// The table name between the first pair of backticks, the way the plugin
/// quotes names in generated statements.
fn backticked_name(statement: &str) -> Option<String> {
    let start = statement.find('`')? + 1;
    let end = start + statement[start..].find('`')?;
    Some(statement[start..end].to_owned())
}

#[async_trait]
impl QueryService for MockQueryService {
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

        let mut states = inner
            .scripts
            .pop_front()
            .unwrap_or_else(|| vec![ExecutionState::Succeeded]);
        let succeeds = *states.last().expect("Script cannot be empty")
            == ExecutionState::Succeeded;

        // Interpret the DDL against the mock's table set.
        let statement = query.query.trim_start();
        if let Some(table) = backticked_name(statement) {
            if statement.starts_with("DROP TABLE") {
                let tolerant = statement.starts_with("DROP TABLE IF EXISTS");
                let at = inner.tables.iter().position(|t| *t == table);
                match at {
                    Some(at) if succeeds => {
                        inner.tables.remove(at);
                    }
                    None if !tolerant => {
                        // A strict drop of an absent table fails remotely.
                        states = vec![ExecutionState::Failed];
                    }
                    _ => {}
                }
            } else if statement.starts_with("CREATE") && succeeds {
                if !inner.tables.contains(&table) {
                    inner.tables.push(table);
                }
            }
        }

        let id = ExecutionId::new(Uuid::new_v4().to_string());
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
