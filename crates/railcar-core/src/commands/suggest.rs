//! "Did you mean" ranking and grouped command listings.

use super::descriptor::camelize;
use super::loader::NAMESPACE_DELIMITER;
use super::registry::Registry;
use std::collections::BTreeMap;

/// Levenshtein distance over Unicode scalar values with unit costs.
pub fn edit_distance(a: &str, b: &str) -> usize {
    if a.is_empty() {
        return b.chars().count();
    }
    if b.is_empty() {
        return a.chars().count();
    }
    strsim::levenshtein(a, b)
}

/// Returns the `count` candidates closest to `query`.
///
/// The sort is stable, so candidates at equal distance keep their input order.
pub fn suggest<S: AsRef<str>>(query: &str, candidates: &[S], count: usize) -> Vec<String> {
    let mut ranked: Vec<(usize, &str)> = candidates
        .iter()
        .map(|candidate| (edit_distance(query, candidate.as_ref()), candidate.as_ref()))
        .collect();
    ranked.sort_by_key(|(distance, _)| *distance);
    ranked.into_iter().take(count).map(|(_, candidate)| candidate.to_string()).collect()
}

/// Rules for building the grouped listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRules {
    /// Reserved group, always emitted first with its prefix stripped.
    pub reserved: String,

    /// Entries always dropped from the reserved group.
    pub exclusions: Vec<String>,
}

impl Default for ListingRules {
    fn default() -> Self {
        Self {
            reserved: "rails".to_string(),
            exclusions: vec!["app".to_string(), "plugin".to_string(), "help".to_string()],
        }
    }
}

/// Group name paired with its namespaces.
pub type Group = (String, Vec<String>);

/// Groups visible namespaces by their first segment.
///
/// The reserved group comes first even when empty; its entries lose the
/// `<reserved>:` prefix and never include the configured exclusions. Groups
/// named by a hidden namespace are dropped. The remaining groups follow in
/// alphabetical order.
pub fn grouped_listing(registry: &Registry, rules: &ListingRules) -> Vec<Group> {
    let mut namespaces: Vec<String> = registry
        .public_namespaces()
        .into_iter()
        .filter(|namespace| !registry.is_hidden(namespace))
        .collect();
    namespaces.sort();
    namespaces.dedup();

    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for namespace in namespaces {
        let base = namespace.split(NAMESPACE_DELIMITER).next().unwrap_or_default().to_string();
        groups.entry(base).or_default().push(namespace);
    }

    let prefix = format!("{}{}", rules.reserved, NAMESPACE_DELIMITER);
    let reserved: Vec<String> = groups
        .remove(&rules.reserved)
        .unwrap_or_default()
        .into_iter()
        .map(|namespace| match namespace.strip_prefix(&prefix) {
            Some(stripped) => stripped.to_string(),
            None => namespace,
        })
        .filter(|name| !rules.exclusions.contains(name))
        .collect();

    for hidden in registry.hidden_namespaces() {
        groups.remove(hidden);
    }

    let mut listing = Vec::with_capacity(groups.len() + 1);
    listing.push((rules.reserved.clone(), reserved));
    listing.extend(groups);
    listing
}

/// Flattens a listing into the suggestion pool.
pub fn flatten(listing: &[Group]) -> Vec<String> {
    listing.iter().flat_map(|(_, namespaces)| namespaces.iter().cloned()).collect()
}

/// Renders a listing: a camelized header per non-empty group followed by
/// indented entries and a blank line.
pub fn render_listing(listing: &[Group]) -> String {
    let mut out = String::new();
    for (base, namespaces) in listing {
        if namespaces.is_empty() {
            continue;
        }
        out.push_str(&camelize(base));
        out.push_str(":\n");
        for namespace in namespaces {
            out.push_str("  ");
            out.push_str(namespace);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

/// Joins quoted items as a sentence: `'a', 'b' or 'c'`.
pub fn to_sentence(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| format!("'{}'", item)).collect();
    match quoted.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}
