use std::env;

/// Read an environment variable, treating blank values as unset.
pub fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// CLI value, else the environment variable `env_name` looked up through `lookup`.
pub fn resolve_setting<F>(cli_value: Option<&str>, env_name: &str, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    cli_value
        .map(str::to_string)
        .or_else(|| lookup(env_name).filter(|v| !v.trim().is_empty()))
}
