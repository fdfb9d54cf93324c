//! Lifecycle hook implementations, independent of the transport that
//! invokes them.

use model::table::{TableName, TablesConfig};
use operator::{BatchError, DropBehavior, TableOperator};
use registry::{RegistryError, TableRegistry};
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Error, Debug)]
pub enum HookError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Operation(#[from] BatchError),
}

/// Payload of the explicit create command. No table name means all tables.
#[derive(Clone, Debug, Default)]
pub struct CreateTables {
    pub table: Option<TableName>,
}

impl CreateTables {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn named(table: impl Into<TableName>) -> Self {
        Self {
            table: Some(table.into()),
        }
    }
}

/// Payload of the explicit remove command, symmetric to [`CreateTables`].
#[derive(Clone, Debug, Default)]
pub struct RemoveTables {
    pub table: Option<TableName>,
}

impl RemoveTables {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn named(table: impl Into<TableName>) -> Self {
        Self {
            table: Some(table.into()),
        }
    }
}

/// The plugin's lifecycle surface. The host framework fires these around its
/// deploy/remove lifecycle; definitions are re-read from the configured
/// registry on every call.
pub struct DeployHooks {
    registry: TableRegistry,
    operator: TableOperator,
}

impl DeployHooks {
    pub fn new(config: TablesConfig, operator: TableOperator) -> Self {
        Self {
            registry: TableRegistry::from(config),
            operator,
        }
    }

    /// Pre-deploy: reject the deploy before anything touches the service.
    #[instrument(skip(self))]
    pub async fn before_deploy(&self) -> Result<(), HookError> {
        let defs = self.registry.validate_all()?;
        info!("Validated {} table definitions", defs.len());
        Ok(())
    }

    /// Post-deploy: create every configured table.
    #[instrument(skip(self))]
    pub async fn after_deploy(&self) -> Result<(), HookError> {
        let defs = self.registry.validate_all()?;
        self.operator.create_all(&defs).await?;
        Ok(())
    }

    /// Post-remove: drop every configured table.
    #[instrument(skip(self))]
    pub async fn after_remove(&self) -> Result<(), HookError> {
        let defs = self.registry.validate_all()?;
        self.operator.delete_all(&defs).await?;
        Ok(())
    }

    /// Explicit create command: one table by name, or all tables when no
    /// name is given.
    #[instrument(skip(self, req))]
    pub async fn create_tables(&self, req: CreateTables) -> Result<(), HookError> {
        let Some(name) = req.table else {
            return self.after_deploy().await;
        };

        let def = self.registry.validate(&name)?;
        self.operator
            .create_table(&def)
            .await
            .map_err(|e| BatchError::new(def.name, e))?;
        Ok(())
    }

    /// Explicit remove command, symmetric to [`Self::create_tables`]. The
    /// drop is strict: removing a table that does not exist fails.
    #[instrument(skip(self, req))]
    pub async fn remove_tables(&self, req: RemoveTables) -> Result<(), HookError> {
        let Some(name) = req.table else {
            return self.after_remove().await;
        };

        let def = self.registry.validate(&name)?;
        self.operator
            .delete_table(&def, DropBehavior::MustExist)
            .await
            .map_err(|e| BatchError::new(def.name, e))?;
        Ok(())
    }
}
