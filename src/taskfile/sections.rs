//! Leading `env` and `vars` sections of a taskfile.
//!
//! Only the first two entries of the document may be sections. A key named
//! `env` or `vars` further down is an ordinary task name.

use serde_yaml::Value;

use super::template::Variables;
use crate::core::Environment;
use crate::error::{Error, Result};

/// Key of the environment section.
pub const ENV_SECTION: &str = "env";
/// Key of the variables section.
pub const VARS_SECTION: &str = "vars";
/// How many leading entries are checked for sections.
pub const LEADING_ENTRIES: usize = 2;

/// Values collected from the leading sections.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Sections {
    /// Overrides for the host environment.
    pub env: Environment,
    /// Placeholder values for command templates.
    pub vars: Variables,
}

/// Split the leading sections off `entries`, returning them and the
/// remaining task entries in their original order.
pub fn extract(entries: Vec<(Value, Value)>) -> Result<(Sections, Vec<(Value, Value)>)> {
    let mut sections = Sections::default();
    let mut rest = Vec::with_capacity(entries.len());

    for (index, (key, value)) in entries.into_iter().enumerate() {
        match key.as_str() {
            Some(ENV_SECTION) if index < LEADING_ENTRIES => {
                sections.env.extend(string_map(ENV_SECTION, value)?);
            }
            Some(VARS_SECTION) if index < LEADING_ENTRIES => {
                sections.vars.extend(string_map(VARS_SECTION, value)?);
            }
            _ => rest.push((key, value)),
        }
    }

    Ok((sections, rest))
}

/// Read a section body as a flat mapping of strings.
///
/// Numbers and booleans are accepted and written out as YAML shows them.
fn string_map(section: &str, value: Value) -> Result<Vec<(String, String)>> {
    let mapping = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Mapping(mapping) => mapping,
        other => {
            return Err(Error::Malformed(format!(
                "'{}' section must be a mapping, found {}",
                section,
                kind(&other)
            )))
        }
    };

    mapping
        .into_iter()
        .map(|(k, v)| {
            let key = scalar(&k).ok_or_else(|| {
                Error::Malformed(format!("'{}' section has a non-scalar key", section))
            })?;
            let value = scalar(&v).ok_or_else(|| {
                Error::Malformed(format!(
                    "'{}' section value for '{}' must be a string, found {}",
                    section,
                    key,
                    kind(&v)
                ))
            })?;
            Ok((key, value))
        })
        .collect()
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Short human-readable name of a YAML value's type.
pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
