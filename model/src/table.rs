use indexmap::IndexMap;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

pub type TableName = String;

/// Root of the plugin's configuration section, as handed over by the host
/// framework once it has parsed the raw deployment configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TablesConfig {
    #[serde(default)]
    pub tables: IndexMap<TableName, TableConfig>,
}

/// One table entry exactly as it appears in configuration.
///
/// Every field validation has to check is optional here, so a half-filled
/// entry still deserializes and gets rejected with a named
/// [`ValidationError`] instead of an opaque parse error.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableConfig {
    pub ddl: Option<String>,
    pub ddl_file: Option<PathBuf>,
    pub output_location: Option<String>,
    pub table_name: Option<String>,
    pub database: Option<String>,
    pub substitutions: IndexMap<String, String>,
    pub replace_all_occurrences: bool,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("table '{0}': 'ddl' and 'ddlFile' are mutually exclusive")]
    ConflictingDdlSources(TableName),

    #[error("table '{0}': one of 'ddl' or 'ddlFile' is required")]
    MissingDdlSource(TableName),

    #[error("table '{0}': 'outputLocation' is required")]
    MissingOutputLocation(TableName),

    #[error("table '{0}': 'tableName' is required")]
    MissingTableName(TableName),
}

/// Where the DDL text comes from. A validated definition carries exactly one
/// source; the both/neither configurations are rejected before this exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DdlSource {
    Inline(String),
    File(PathBuf),
}

/// A table definition that passed validation. Immutable for the duration of
/// one create/delete operation; rebuilt from configuration on the next.
#[derive(Clone, Debug, PartialEq)]
pub struct TableDefinition {
    /// Registry key, used for lookup and logging only.
    pub name: TableName,
    /// The name used inside `DROP TABLE`/`CREATE TABLE` statements.
    pub table_name: String,
    pub database: Option<String>,
    pub output_location: String,
    pub ddl: DdlSource,
    pub substitutions: IndexMap<String, String>,
    pub replace_all_occurrences: bool,
}

impl TableConfig {
    /// Field checks, in the order callers report them. Missing `database` is
    /// not an error: the query service falls back to its default database.
    pub fn validate(&self, name: &str) -> Result<TableDefinition, ValidationError> {
        let ddl = match (&self.ddl, &self.ddl_file) {
            (Some(_), Some(_)) => {
                return Err(ValidationError::ConflictingDdlSources(name.to_owned()));
            }
            (None, None) => return Err(ValidationError::MissingDdlSource(name.to_owned())),
            (Some(text), None) => DdlSource::Inline(text.clone()),
            (None, Some(path)) => DdlSource::File(path.clone()),
        };

        let output_location = self
            .output_location
            .clone()
            .ok_or_else(|| ValidationError::MissingOutputLocation(name.to_owned()))?;

        let table_name = self
            .table_name
            .clone()
            .ok_or_else(|| ValidationError::MissingTableName(name.to_owned()))?;

        if self.database.is_none() {
            warn!("Table '{name}' has no database configured, using the query service default");
        }

        Ok(TableDefinition {
            name: name.to_owned(),
            table_name,
            database: self.database.clone(),
            output_location,
            ddl,
            substitutions: self.substitutions.clone(),
            replace_all_occurrences: self.replace_all_occurrences,
        })
    }
}
