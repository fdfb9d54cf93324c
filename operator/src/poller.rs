//! Polling state machine driving a submitted execution to a terminal state.

use crate::client::{QueryService, QueryServiceError};
use model::execution::{ExecutionId, ExecutionState, QueryExecution};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum PollError {
    #[error(transparent)]
    Service(#[from] QueryServiceError),

    #[error("Execution '{id}' terminated with state {state}")]
    Terminated {
        id: ExecutionId,
        state: ExecutionState,
    },
}

pub(crate) struct PollContext<'a> {
    pub service: &'a dyn QueryService,
    pub poll_interval: Duration,
}

pub(crate) enum State {
    Submitted(Submitted),
    Polling(Polling),
    Succeeded(QueryExecution),
    Failed(QueryExecution),
}

pub(crate) trait Transition {
    async fn transition(self, ctx: &PollContext<'_>) -> Result<State, QueryServiceError>;
}

pub(crate) struct Submitted {
    execution: ExecutionId,
}

impl Submitted {
    pub(crate) fn new(execution: ExecutionId) -> Self {
        Submitted { execution }
    }
}

impl Transition for Submitted {
    async fn transition(self, _ctx: &PollContext<'_>) -> Result<State, QueryServiceError> {
        Ok(State::Polling(Polling {
            execution: self.execution,
            checks: 0,
        }))
    }
}

pub(crate) struct Polling {
    execution: ExecutionId,
    checks: u32,
}

impl Transition for Polling {
    async fn transition(mut self, ctx: &PollContext<'_>) -> Result<State, QueryServiceError> {
        let state = ctx.service.execution_status(&self.execution).await?;
        self.checks += 1;

        match state {
            ExecutionState::Succeeded => Ok(State::Succeeded(QueryExecution {
                id: self.execution,
                state,
            })),
            ExecutionState::Failed | ExecutionState::Cancelled => {
                Ok(State::Failed(QueryExecution {
                    id: self.execution,
                    state,
                }))
            }
            ExecutionState::Queued | ExecutionState::Running => {
                debug!(
                    "Execution '{}' still {state} after {} checks",
                    self.execution, self.checks
                );
                tokio::time::sleep(ctx.poll_interval).await;
                Ok(State::Polling(self))
            }
        }
    }
}

/// Drive an execution handle until the remote service reports a terminal
/// state. Polls indefinitely; there is no deadline and no cancellation, the
/// enclosing process owns both.
pub(crate) async fn poll_to_terminal(
    ctx: &PollContext<'_>,
    execution: ExecutionId,
) -> Result<QueryExecution, PollError> {
    let mut state = State::Submitted(Submitted::new(execution));

    loop {
        state = match state {
            State::Submitted(submitted) => submitted.transition(ctx).await?,
            State::Polling(polling) => polling.transition(ctx).await?,
            State::Succeeded(execution) => {
                info!("Execution '{}' succeeded", execution.id);
                return Ok(execution);
            }
            State::Failed(execution) => {
                return Err(PollError::Terminated {
                    id: execution.id,
                    state: execution.state,
                });
            }
        };
    }
}
