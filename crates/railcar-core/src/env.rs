//! Application environment accessor.

/// Variables consulted in order.
pub const ENVIRONMENT_VARIABLES: [&str; 2] = ["RAILS_ENV", "RACK_ENV"];

/// Environment used when no variable is set.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Current environment: `RAILS_ENV`, then `RACK_ENV`, then `development`.
pub fn environment() -> String {
    environment_from(|key| std::env::var(key).ok())
}

/// Resolves the environment through a custom variable lookup.
///
/// The first variable that is set wins, even when its value is empty.
pub fn environment_from<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ENVIRONMENT_VARIABLES
        .iter()
        .find_map(|&key| lookup(key))
        .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
}
