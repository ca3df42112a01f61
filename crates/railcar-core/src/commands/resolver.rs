//! Namespace resolution.
//!
//! Only the last segment of the requested namespace is matched. It is tried
//! bare first and then under the reserved namespace, so a custom `test` wins
//! over the built-in `rails:test` while the built-in stays reachable when no
//! custom command exists.

use super::descriptor::CommandDescriptor;
use super::loader::{Loader, NAMESPACE_DELIMITER};
use super::registry::Registry;

/// Candidate namespaces for a raw identifier, in precedence order.
pub fn candidates(raw: &str, reserved: &str) -> Vec<String> {
    let name = raw.rsplit(NAMESPACE_DELIMITER).next().unwrap_or(raw);
    vec![name.to_string(), format!("{}{}{}", reserved, NAMESPACE_DELIMITER, name)]
}

/// Resolves a raw identifier to a registered command, loading modules on demand.
pub fn resolve(
    loader: &mut Loader,
    registry: &mut Registry,
    raw: &str,
    reserved: &str,
) -> Option<CommandDescriptor> {
    let prefix = raw.rsplit_once(NAMESPACE_DELIMITER).map_or("", |(prefix, _)| prefix);
    let lookups = candidates(raw, reserved);
    tracing::debug!(raw = %raw, prefix = %prefix, candidates = ?lookups, "resolving command");

    loader.lookup(registry, &lookups);

    let index = registry.index_by_namespace();
    lookups.iter().find_map(|candidate| index.get(candidate.as_str()).map(|entry| (*entry).clone()))
}
