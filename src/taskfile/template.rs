//! `{name}` placeholder substitution for command templates.
//!
//! `{{` and `}}` stand for literal braces. Every other brace must be part of
//! a `{name}` placeholder whose name is defined in the variables table.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Template variables from the `vars` section.
pub type Variables = HashMap<String, String>;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{|\}\}|\{([^{}]*)\}|[{}]").unwrap());

/// Replace every placeholder in `template` with its value from `vars`.
pub fn substitute(template: &str, vars: &Variables) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER_RE.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&template[last..whole.start()]);
        last = whole.end();

        match whole.as_str() {
            "{{" => out.push('{'),
            "}}" => out.push('}'),
            brace @ ("{" | "}") => {
                return Err(Error::BadTemplate {
                    template: template.to_string(),
                    reason: format!("single '{}' encountered", brace),
                })
            }
            _ => {
                let name = caps.get(1).map_or("", |m| m.as_str());
                let value = vars.get(name).ok_or_else(|| Error::UndefinedVariable {
                    name: name.to_string(),
                    template: template.to_string(),
                })?;
                out.push_str(value);
            }
        }
    }

    out.push_str(&template[last..]);
    Ok(out)
}
