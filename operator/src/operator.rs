//! Realizes one table definition against the query service.

use crate::client::{QueryService, QueryServiceError};
use crate::ddl::{self, DdlError};
use crate::poller::{self, PollContext, PollError};
use model::execution::SubmitQuery;
use model::table::TableDefinition;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument};

const EXECUTION_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Error, Debug)]
pub enum OperatorError {
    #[error(transparent)]
    Ddl(#[from] DdlError),

    #[error("Submission failed: {0}")]
    Submit(#[from] QueryServiceError),

    #[error(transparent)]
    Execution(#[from] PollError),
}

/// Whether a drop statement tolerates an absent table. The pre-clean drop in
/// front of create always tolerates absence; an explicit remove does not.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DropBehavior {
    #[default]
    MustExist,
    IfExists,
}

pub struct TableOperator {
    service: Arc<dyn QueryService>,
    poll_interval: Duration,
}

impl TableOperator {
    pub fn new(service: Arc<dyn QueryService>) -> Self {
        Self {
            service,
            poll_interval: EXECUTION_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Create the table: a tolerant drop first, so re-running a deploy is
    /// safe, then the resolved DDL.
    #[instrument(skip(self, def), fields(table = %def.name))]
    pub async fn create_table(&self, def: &TableDefinition) -> Result<(), OperatorError> {
        self.delete_table(def, DropBehavior::IfExists).await?;

        let ddl = ddl::resolve(def).await?;
        info!("Creating table '{}'", def.table_name);
        self.run_to_terminal(def, ddl).await
    }

    #[instrument(skip(self, def), fields(table = %def.name))]
    pub async fn delete_table(
        &self,
        def: &TableDefinition,
        behavior: DropBehavior,
    ) -> Result<(), OperatorError> {
        let statement = match behavior {
            DropBehavior::MustExist => format!("DROP TABLE `{}`;", def.table_name),
            DropBehavior::IfExists => format!("DROP TABLE IF EXISTS `{}`;", def.table_name),
        };
        info!("Dropping table '{}'", def.table_name);
        self.run_to_terminal(def, statement).await
    }

    async fn run_to_terminal(
        &self,
        def: &TableDefinition,
        statement: String,
    ) -> Result<(), OperatorError> {
        let query =
            SubmitQuery::new(statement, &def.output_location).database(def.database.clone());
        let execution = self.service.submit_query(query).await?;

        let ctx = PollContext {
            service: self.service.as_ref(),
            poll_interval: self.poll_interval,
        };
        poller::poll_to_terminal(&ctx, execution).await?;
        Ok(())
    }
}
