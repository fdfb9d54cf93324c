//! Table registry: resolves the configured table definitions and validates
//! them before anything talks to the query service.

use indexmap::IndexMap;
use model::table::{TableConfig, TableDefinition, TableName, TablesConfig, ValidationError};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("table '{0}' is not configured")]
    UnknownTable(TableName),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// In-memory view of the configured tables, in configuration order.
///
/// Rebuilt from configuration on every plugin invocation; never persisted.
/// An empty registry is valid and means there is nothing to do.
pub struct TableRegistry {
    tables: IndexMap<TableName, TableConfig>,
}

impl From<TablesConfig> for TableRegistry {
    fn from(config: TablesConfig) -> Self {
        Self {
            tables: config.tables,
        }
    }
}

impl TableRegistry {
    pub fn list_tables(&self) -> &IndexMap<TableName, TableConfig> {
        &self.tables
    }

    pub fn get(&self, name: &str) -> Result<&TableConfig, RegistryError> {
        self.tables
            .get(name)
            .ok_or_else(|| RegistryError::UnknownTable(name.to_owned()))
    }

    /// Validate a single table by name. Side-effect-free.
    pub fn validate(&self, name: &str) -> Result<TableDefinition, RegistryError> {
        Ok(self.get(name)?.validate(name)?)
    }

    /// Validate every configured table, in configuration order. The first
    /// invalid definition fails the whole batch; callers run this before any
    /// remote call is attempted.
    pub fn validate_all(&self) -> Result<Vec<TableDefinition>, RegistryError> {
        let definitions = self
            .tables
            .iter()
            .map(|(name, config)| Ok(config.validate(name)?))
            .collect::<Result<Vec<_>, RegistryError>>()?;

        debug!("Validated {} table definitions", definitions.len());
        Ok(definitions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::table::DdlSource;
    use model::testing::{arb_tables_config, arb_valid_config};
    use proptest::prelude::*;

    fn registry_of(entries: Vec<(&str, TableConfig)>) -> TableRegistry {
        TableRegistry::from(TablesConfig {
            tables: entries
                .into_iter()
                .map(|(name, config)| (name.to_owned(), config))
                .collect(),
        })
    }

    fn inline_config(table_name: &str) -> TableConfig {
        TableConfig {
            ddl: Some(format!("CREATE EXTERNAL TABLE `{table_name}` (id string);")),
            output_location: Some("s3://bucket/results/".to_owned()),
            table_name: Some(table_name.to_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn empty_registry_is_valid() {
        let registry = TableRegistry::from(TablesConfig::default());

        assert!(registry.list_tables().is_empty());
        assert_eq!(registry.validate_all().unwrap(), vec![]);
    }

    #[test]
    fn unknown_table_is_reported_by_name() {
        let registry = registry_of(vec![("events", inline_config("events"))]);

        assert_eq!(
            registry.get("sessions").unwrap_err(),
            RegistryError::UnknownTable("sessions".to_owned())
        );
    }

    #[test]
    fn validate_all_preserves_configuration_order() {
        let registry = registry_of(vec![
            ("zulu", inline_config("zulu")),
            ("alpha", inline_config("alpha")),
            ("mike", inline_config("mike")),
        ]);

        let names: Vec<_> = registry
            .validate_all()
            .unwrap()
            .into_iter()
            .map(|def| def.name)
            .collect();
        assert_eq!(names, vec!["zulu", "alpha", "mike"]);
    }

    #[test]
    fn one_invalid_definition_fails_the_whole_batch() {
        let mut broken = inline_config("broken");
        broken.output_location = None;

        let registry = registry_of(vec![
            ("events", inline_config("events")),
            ("broken", broken),
            ("sessions", inline_config("sessions")),
        ]);

        assert_eq!(
            registry.validate_all().unwrap_err(),
            RegistryError::Validation(ValidationError::MissingOutputLocation(
                "broken".to_owned()
            ))
        );
    }

    proptest! {
        #[test]
        fn generated_valid_configs_validate(config in arb_valid_config()) {
            let registry = registry_of(vec![("table", config.clone())]);
            let def = registry.validate("table").unwrap();

            prop_assert_eq!(def.name, "table");
            prop_assert_eq!(Some(def.table_name), config.table_name);
            prop_assert_eq!(Some(def.output_location), config.output_location);
            match def.ddl {
                DdlSource::Inline(text) => prop_assert_eq!(Some(text), config.ddl),
                DdlSource::File(path) => prop_assert_eq!(Some(path), config.ddl_file),
            }
        }

        #[test]
        fn clearing_output_location_rejects(config in arb_valid_config()) {
            let mut config = config;
            config.output_location = None;
            let registry = registry_of(vec![("table", config)]);

            prop_assert_eq!(
                registry.validate("table").unwrap_err(),
                RegistryError::Validation(ValidationError::MissingOutputLocation(
                    "table".to_owned()
                ))
            );
        }

        #[test]
        fn clearing_table_name_rejects(config in arb_valid_config()) {
            let mut config = config;
            config.table_name = None;
            let registry = registry_of(vec![("table", config)]);

            prop_assert_eq!(
                registry.validate("table").unwrap_err(),
                RegistryError::Validation(ValidationError::MissingTableName("table".to_owned()))
            );
        }

        #[test]
        fn setting_both_ddl_sources_rejects(config in arb_valid_config()) {
            let mut config = config;
            config.ddl = Some("CREATE EXTERNAL TABLE `t` (id string);".to_owned());
            config.ddl_file = Some("ddl/t.sql".into());
            let registry = registry_of(vec![("table", config)]);

            prop_assert_eq!(
                registry.validate("table").unwrap_err(),
                RegistryError::Validation(ValidationError::ConflictingDdlSources(
                    "table".to_owned()
                ))
            );
        }

        #[test]
        fn clearing_both_ddl_sources_rejects(config in arb_valid_config()) {
            let mut config = config;
            config.ddl = None;
            config.ddl_file = None;
            let registry = registry_of(vec![("table", config)]);

            prop_assert_eq!(
                registry.validate("table").unwrap_err(),
                RegistryError::Validation(ValidationError::MissingDdlSource("table".to_owned()))
            );
        }

        #[test]
        fn whole_generated_sections_validate(config in arb_tables_config(8)) {
            let expected: Vec<_> = config.tables.keys().cloned().collect();
            let registry = TableRegistry::from(config);

            let names: Vec<_> = registry
                .validate_all()
                .unwrap()
                .into_iter()
                .map(|def| def.name)
                .collect();
            prop_assert_eq!(names, expected);
        }
    }
}
