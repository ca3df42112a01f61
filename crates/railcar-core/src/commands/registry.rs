//! Registry of known command descriptors.
//!
//! Entries keep insertion order. Namespaces are not unique: a later
//! registration shadows an earlier one with the same namespace when looked up
//! by exact match.

use super::descriptor::CommandDescriptor;
use std::collections::{BTreeSet, HashMap};

/// Command registry.
#[derive(Debug, Default)]
pub struct Registry {
    /// Registered commands in insertion order.
    entries: Vec<CommandDescriptor>,

    /// Namespaces excluded from listings and suggestions.
    hidden: BTreeSet<String>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry with an initial hidden set.
    pub fn with_hidden<I, S>(namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        registry.hide(namespaces);
        registry
    }

    /// Appends a descriptor. Hidden descriptors also hide their namespace.
    pub fn register(&mut self, descriptor: CommandDescriptor) {
        tracing::debug!(namespace = descriptor.namespace(), "registering command");
        if descriptor.is_hidden() {
            self.hidden.insert(descriptor.namespace().to_string());
        }
        self.entries.push(descriptor);
    }

    /// Finds the most recently registered descriptor for a namespace.
    pub fn find_exact(&self, namespace: &str) -> Option<&CommandDescriptor> {
        self.entries.iter().rev().find(|entry| entry.namespace() == namespace)
    }

    /// Maps each namespace to its most recent registration.
    pub fn index_by_namespace(&self) -> HashMap<&str, &CommandDescriptor> {
        let mut index = HashMap::with_capacity(self.entries.len());
        for entry in &self.entries {
            index.insert(entry.namespace(), entry);
        }
        index
    }

    /// Every registered namespace in insertion order. Hiding is not applied.
    pub fn public_namespaces(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.namespace().to_string()).collect()
    }

    /// Hides namespaces from listings and suggestions.
    pub fn hide<I, S>(&mut self, namespaces: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hidden.extend(namespaces.into_iter().map(Into::into));
    }

    /// Whether a namespace is hidden.
    pub fn is_hidden(&self, namespace: &str) -> bool {
        self.hidden.contains(namespace)
    }

    /// The hidden namespace set.
    pub fn hidden_namespaces(&self) -> &BTreeSet<String> {
        &self.hidden
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.entries.iter()
    }

    /// Returns the number of registrations, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry and hidden namespace.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.hidden.clear();
    }
}
