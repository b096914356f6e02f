//! Key definitions read from TOML files, for `--config` and the `propfile.`
//! directive. Tables flatten into dotted keys; every value becomes a
//! string.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::language::TranslationError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum Setting {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<Setting>),
    Table(BTreeMap<String, Setting>),
}

impl Setting {
    fn flatten(&self, key: &str, result: &mut Vec<(String, String)>) {
        match self {
            Setting::Table(table) => {
                for (name, setting) in table {
                    setting.flatten(&format!("{}.{}", key, name), result);
                }
            }
            _ => result.push((key.to_string(), self.to_text())),
        }
    }

    fn to_text(&self) -> String {
        match self {
            Setting::Boolean(value) => value.to_string(),
            Setting::Integer(value) => value.to_string(),
            Setting::Float(value) => value.to_string(),
            Setting::Text(value) => value.clone(),
            Setting::List(values) => values
                .iter()
                .map(Setting::to_text)
                .collect::<Vec<_>>()
                .join("\n"),
            Setting::Table(_) => String::new(),
        }
    }
}

/// Parse TOML text into key definitions, in key order.
pub fn parse(content: &str) -> Result<Vec<(String, String)>, String> {
    let table: BTreeMap<String, Setting> = toml::from_str(content).map_err(|e| e.to_string())?;

    let mut result = Vec::new();
    for (key, setting) in &table {
        setting.flatten(key, &mut result);
    }
    Ok(result)
}

/// Read a TOML file of key definitions.
pub fn load(path: &Path) -> Result<Vec<(String, String)>, TranslationError> {
    debug!("Loading definitions from {}", path.display());
    let content = std::fs::read_to_string(path)
        .map_err(|error| TranslationError::Io(path.to_path_buf(), error))?;
    parse(&content).map_err(|details| TranslationError::Config(path.to_path_buf(), details))
}
