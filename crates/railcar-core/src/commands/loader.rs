//! On-demand module loading.
//!
//! A namespace maps to candidate module paths by convention. The loader asks
//! each [`ModuleSource`] for those paths in priority order and stops at the
//! first one that loads. A missing module is the normal case; a module that
//! exists but fails to load is logged and skipped so one broken command never
//! hides the rest.

use super::descriptor::CommandType;
use super::error::{LoadError, Result};
use super::registry::Registry;
use std::collections::{BTreeMap, HashSet};

/// Namespace delimiter.
pub const NAMESPACE_DELIMITER: char = ':';

/// Lookup bases and discovery pattern for one command type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupPathSpec {
    command_type: CommandType,
    lookup_paths: Vec<String>,
}

impl LookupPathSpec {
    /// Creates a spec with explicit lookup bases.
    pub fn new(command_type: CommandType, lookup_paths: Vec<String>) -> Self {
        Self { command_type, lookup_paths }
    }

    /// Creates a spec with the default bases for `command_type`.
    pub fn for_type(command_type: CommandType) -> Self {
        Self::new(command_type, command_type.default_lookup_paths())
    }

    /// Command type this spec loads.
    pub fn command_type(&self) -> CommandType {
        self.command_type
    }

    /// Lookup bases in priority order.
    pub fn lookup_paths(&self) -> &[String] {
        &self.lookup_paths
    }

    /// Builds `{base}/{path}_{suffix}`.
    pub fn module_path(&self, base: &str, path: &str) -> String {
        format!("{}/{}_{}", base, path, self.command_type.suffix())
    }

    /// Pattern matched by module files of this type, e.g. `**/*_command`.
    pub fn file_pattern(&self) -> String {
        format!("**/*_{}", self.command_type.suffix())
    }

    /// One discovery pattern per lookup base.
    pub fn discovery_patterns(&self) -> Vec<String> {
        self.lookup_paths
            .iter()
            .map(|base| format!("{}/{}", base, self.file_pattern()))
            .collect()
    }
}

/// A place command modules can be loaded from.
pub trait ModuleSource {
    /// Loads the module at `path`, registering its commands.
    ///
    /// # Errors
    /// [`LoadError::NotFound`] when this source has no such module,
    /// [`LoadError::Failed`] when it exists but cannot be loaded.
    fn require(&self, path: &str, registry: &mut Registry) -> std::result::Result<(), LoadError>;

    /// Lists every module path this source holds that matches the spec's
    /// discovery patterns.
    fn discover(&self, spec: &LookupPathSpec) -> Vec<String>;
}

type ModuleInit = Box<dyn Fn(&mut Registry) -> Result<()>>;

/// Compile-time registration table: module path to init function.
#[derive(Default)]
pub struct StaticModules {
    modules: BTreeMap<String, ModuleInit>,
}

impl StaticModules {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a module.
    #[must_use]
    pub fn with_module<F>(mut self, path: impl Into<String>, init: F) -> Self
    where
        F: Fn(&mut Registry) -> Result<()> + 'static,
    {
        self.insert(path, init);
        self
    }

    /// Adds a module, replacing any previous init for the same path.
    pub fn insert<F>(&mut self, path: impl Into<String>, init: F)
    where
        F: Fn(&mut Registry) -> Result<()> + 'static,
    {
        self.modules.insert(path.into(), Box::new(init));
    }

    /// Known module paths, sorted.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    /// Returns the number of modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns true if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl ModuleSource for StaticModules {
    fn require(&self, path: &str, registry: &mut Registry) -> std::result::Result<(), LoadError> {
        let init = self.modules.get(path).ok_or_else(|| LoadError::NotFound(path.to_string()))?;
        init(registry).map_err(|e| LoadError::failed(path, &e))
    }

    fn discover(&self, spec: &LookupPathSpec) -> Vec<String> {
        let patterns: Vec<glob::Pattern> = spec
            .discovery_patterns()
            .iter()
            .filter_map(|pattern| glob::Pattern::new(pattern).ok())
            .collect();

        self.modules
            .keys()
            .filter(|path| patterns.iter().any(|pattern| pattern.matches(path)))
            .cloned()
            .collect()
    }
}

/// Result of a [`Loader::lookup`] call.
#[derive(Debug, Default)]
pub struct LookupReport {
    /// Module paths tried, in order.
    pub attempted: Vec<String>,

    /// The module that loaded, if any.
    pub loaded: Option<String>,

    /// Modules that exist but failed to load.
    pub failures: Vec<LoadError>,
}

/// Loads command modules on demand.
pub struct Loader {
    spec: LookupPathSpec,
    sources: Vec<Box<dyn ModuleSource>>,
    loaded: HashSet<String>,
}

impl Loader {
    /// Creates a loader with no sources.
    pub fn new(spec: LookupPathSpec) -> Self {
        Self { spec, sources: Vec::new(), loaded: HashSet::new() }
    }

    /// Appends a module source. Earlier sources take precedence.
    #[must_use]
    pub fn with_source(mut self, source: impl ModuleSource + 'static) -> Self {
        self.add_source(Box::new(source));
        self
    }

    /// Appends a boxed module source.
    pub fn add_source(&mut self, source: Box<dyn ModuleSource>) {
        self.sources.push(source);
    }

    /// Lookup spec in use.
    pub fn spec(&self) -> &LookupPathSpec {
        &self.spec
    }

    /// Whether `path` has already been loaded.
    pub fn is_loaded(&self, path: &str) -> bool {
        self.loaded.contains(path)
    }

    /// Loads a single module path once.
    ///
    /// The first source that does not report [`LoadError::NotFound`] decides
    /// the outcome. Requiring an already loaded path succeeds without
    /// registering anything again.
    ///
    /// # Errors
    /// Returns the deciding source's error, or `NotFound` if no source has it.
    pub fn require(
        &mut self,
        path: &str,
        registry: &mut Registry,
    ) -> std::result::Result<(), LoadError> {
        if self.loaded.contains(path) {
            return Ok(());
        }

        for source in &self.sources {
            match source.require(path, registry) {
                Ok(()) => {
                    self.loaded.insert(path.to_string());
                    return Ok(());
                }
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }
        }

        Err(LoadError::NotFound(path.to_string()))
    }

    /// Loads the first module matching any of `namespaces`.
    pub fn lookup<S: AsRef<str>>(&mut self, registry: &mut Registry, namespaces: &[S]) -> LookupReport {
        let mut report = LookupReport::default();
        let bases = self.spec.lookup_paths.clone();

        for raw_path in namespaces_to_paths(namespaces) {
            for base in &bases {
                let path = self.spec.module_path(base, &raw_path);
                report.attempted.push(path.clone());

                match self.require(&path, registry) {
                    Ok(()) => {
                        tracing::debug!(path = %path, "loaded command module");
                        report.loaded = Some(path);
                        return report;
                    }
                    Err(e) if e.is_not_found() => {}
                    Err(e) => {
                        tracing::warn!(
                            command_type = %self.spec.command_type,
                            path = %path,
                            error = %e,
                            "could not load {}, continuing",
                            self.spec.command_type
                        );
                        report.failures.push(e);
                    }
                }
            }
        }

        report
    }

    /// Loads every discoverable module. Failures are ignored.
    ///
    /// Returns the number of modules loaded by this call.
    pub fn lookup_all(&mut self, registry: &mut Registry) -> usize {
        let mut discovered = Vec::new();
        for source in &self.sources {
            discovered.extend(source.discover(&self.spec));
        }

        let mut count = 0;
        for path in discovered {
            if self.loaded.contains(&path) {
                continue;
            }
            match self.require(&path, registry) {
                Ok(()) => count += 1,
                Err(e) => tracing::debug!(path = %path, error = %e, "skipping module"),
            }
        }

        count
    }

    /// Forgets which modules were loaded.
    pub fn reset(&mut self) {
        self.loaded.clear();
    }
}

/// Converts namespaces to candidate module paths.
///
/// `rails:model` yields `rails/model/model` then `rails/model`. Duplicates are
/// removed, keeping the first occurrence.
pub fn namespaces_to_paths<S: AsRef<str>>(namespaces: &[S]) -> Vec<String> {
    let mut paths: Vec<String> = Vec::with_capacity(namespaces.len() * 2);

    for namespace in namespaces {
        let mut pieces: Vec<&str> = namespace.as_ref().split(NAMESPACE_DELIMITER).collect();
        let joined = pieces.join("/");
        if let Some(last) = pieces.last().copied() {
            pieces.push(last);
        }

        for candidate in [pieces.join("/"), joined] {
            if !paths.contains(&candidate) {
                paths.push(candidate);
            }
        }
    }

    paths
}
