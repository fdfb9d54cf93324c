//! Proptest strategies for model types.
//!
//! Only available with the `testing` feature enabled.

use crate::table::{TableConfig, TableName, TablesConfig};
use indexmap::IndexMap;
use proptest::prelude::*;
use std::path::PathBuf;

/// Strategy for registry keys and table names.
pub fn arb_table_name() -> impl Strategy<Value = TableName> {
    proptest::string::string_regex("[a-z][a-z0-9_]{2,29}").unwrap()
}

fn arb_output_location() -> impl Strategy<Value = String> {
    (
        proptest::string::string_regex("[a-z][a-z0-9-]{2,20}").unwrap(),
        proptest::string::string_regex("[a-z0-9/]{0,20}").unwrap(),
    )
        .prop_map(|(bucket, prefix)| format!("s3://{bucket}/{prefix}"))
}

fn arb_substitutions() -> impl Strategy<Value = IndexMap<String, String>> {
    proptest::collection::vec(
        (
            proptest::string::string_regex("[A-Za-z][A-Za-z0-9]{0,14}").unwrap(),
            proptest::string::string_regex("[a-z0-9:/._-]{1,30}").unwrap(),
        ),
        0..4,
    )
    .prop_map(IndexMap::from_iter)
}

prop_compose! {
    /// Strategy for table configurations that pass validation.
    pub fn arb_valid_config()(
        table_name in arb_table_name(),
        output_location in arb_output_location(),
        inline in any::<bool>(),
        database in proptest::option::of(arb_table_name()),
        substitutions in arb_substitutions(),
        replace_all_occurrences in any::<bool>(),
    ) -> TableConfig {
        let mut config = TableConfig {
            output_location: Some(output_location),
            table_name: Some(table_name.clone()),
            database,
            substitutions,
            replace_all_occurrences,
            ..Default::default()
        };
        if inline {
            config.ddl = Some(format!("CREATE EXTERNAL TABLE `{table_name}` (id string);"));
        } else {
            config.ddl_file = Some(PathBuf::from(format!("ddl/{table_name}.sql")));
        }
        config
    }
}

/// Strategy for a whole configuration section with unique table names.
pub fn arb_tables_config(max_tables: usize) -> impl Strategy<Value = TablesConfig> {
    proptest::collection::vec((arb_table_name(), arb_valid_config()), 0..=max_tables).prop_map(
        |entries| TablesConfig {
            tables: IndexMap::from_iter(entries),
        },
    )
}
