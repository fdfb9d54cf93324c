//! DDL text resolution: inline or file-sourced, plus placeholder
//! substitution.

use model::table::{DdlSource, TableDefinition};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DdlError {
    #[error("Failed to read DDL file '{}': {source}", path.display())]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Resolve the DDL text for a definition: read file-sourced DDL as UTF-8,
/// then apply substitutions in configuration order.
pub async fn resolve(def: &TableDefinition) -> Result<String, DdlError> {
    let text = match &def.ddl {
        DdlSource::Inline(text) => text.clone(),
        DdlSource::File(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| DdlError::UnreadableFile {
                    path: path.clone(),
                    source,
                })?
        }
    };

    Ok(substitute(text, def))
}

/// Each `(token, value)` pair replaces the literal `{token}`. Only the first
/// occurrence is replaced unless `replace_all_occurrences` is set; the
/// narrow default is all that single-placeholder templates need, and
/// widening it is an explicit per-table configuration choice.
fn substitute(mut text: String, def: &TableDefinition) -> String {
    for (token, value) in &def.substitutions {
        let placeholder = format!("{{{token}}}");
        if def.replace_all_occurrences {
            text = text.replace(&placeholder, value);
        } else if let Some(at) = text.find(&placeholder) {
            text.replace_range(at..at + placeholder.len(), value);
        }
    }
    text
}
