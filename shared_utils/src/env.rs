use std::str::FromStr;

use thiserror::Error;

/// An environment variable is set but its value cannot be parsed.
#[derive(Debug, Error)]
#[error("Invalid value for environment variable {name}: {value:?} ({message})")]
pub struct InvalidEnvVarError {
    pub name: String,
    pub value: String,
    pub message: String,
}

/// Reads an optional environment variable.
///
/// Unset variables and values that are empty after trimming both yield `None`,
/// so `FOO=` in a shell behaves like an unset override.
pub fn get_env_var_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Reads and parses an optional environment variable.
///
/// Returns `Ok(None)` when the variable is unset or blank, and an
/// [`InvalidEnvVarError`] when it is set to something `T` cannot parse.
pub fn parse_env_var<T>(name: &str) -> Result<Option<T>, InvalidEnvVarError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = get_env_var_opt(name) else {
        return Ok(None);
    };
    raw.parse::<T>().map(Some).map_err(|e| InvalidEnvVarError {
        name: name.to_string(),
        value: raw,
        message: e.to_string(),
    })
}
