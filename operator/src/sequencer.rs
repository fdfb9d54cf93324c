//! Sequential batch execution over validated definitions.

use crate::operator::{DropBehavior, OperatorError, TableOperator};
use model::table::{TableDefinition, TableName};
use thiserror::Error;
use tracing::info;

/// A per-table failure, annotated with the table that caused it. The batch
/// stops here; earlier tables keep whatever state they reached.
#[derive(Error, Debug)]
#[error("Table '{table}': {source}")]
pub struct BatchError {
    pub table: TableName,
    #[source]
    pub source: OperatorError,
}

impl BatchError {
    pub fn new(table: impl Into<TableName>, source: OperatorError) -> Self {
        Self {
            table: table.into(),
            source,
        }
    }
}

impl TableOperator {
    /// Create every table, strictly one at a time, in definition order. The
    /// shared query service never sees more than one in-flight DDL execution
    /// from this plugin.
    pub async fn create_all(&self, defs: &[TableDefinition]) -> Result<(), BatchError> {
        for def in defs {
            self.create_table(def)
                .await
                .map_err(|e| BatchError::new(&def.name, e))?;
        }
        info!("Created {} tables", defs.len());
        Ok(())
    }

    /// Drop every table, strictly one at a time, with explicit-remove
    /// semantics (no `IF EXISTS`).
    pub async fn delete_all(&self, defs: &[TableDefinition]) -> Result<(), BatchError> {
        for def in defs {
            self.delete_table(def, DropBehavior::MustExist)
                .await
                .map_err(|e| BatchError::new(&def.name, e))?;
        }
        info!("Dropped {} tables", defs.len());
        Ok(())
    }
}
