//! `{variable}` substitution in story lines
//!
//! Only identifier-shaped tokens are variables, so JSON objects such as
//! `{"city": "berlin"}` pass through untouched.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;

static TEMPLATE_VARIABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

/// Replace every `{name}` in `line` with its value from `variables`
///
/// An unknown variable is an error naming it.
pub fn substitute(line: &str, variables: &HashMap<String, String>) -> Result<String, String> {
    let mut unknown: Option<String> = None;
    let replaced = TEMPLATE_VARIABLE.replace_all(line, |caps: &Captures<'_>| {
        let name = &caps[1];
        match variables.get(name) {
            Some(value) => value.clone(),
            None => {
                unknown.get_or_insert_with(|| name.to_string());
                caps[0].to_string()
            }
        }
    });

    match unknown {
        Some(name) => Err(format!("Unknown variable '{}' in template line '{}'", name, line)),
        None => Ok(replaced.into_owned()),
    }
}
