//! Command dispatch.
//!
//! The dispatcher owns the registry and loader for one command type. It
//! resolves a namespace, turns a bare call to a command with required
//! arguments into a help request, and otherwise forwards the call with the
//! runnable action name. Misses become a "did you mean" message, not an
//! error.

use super::builtin;
use super::descriptor::{CommandDescriptor, Invocation, InvokeConfig};
use super::error::Result;
use super::loader::{Loader, ModuleSource};
use super::modules::FileModules;
use super::registry::Registry;
use super::resolver;
use super::suggest::{self, Group, ListingRules};
use crate::config::DispatchConfig;
use std::sync::Arc;

/// Help flag appended when a command needing arguments is called bare.
pub const HELP_FLAG: &str = "--help";

/// Whether an invocation runs the command body or renders help.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpState {
    /// Run the command.
    Normal,
    /// The first argument asked for help.
    HelpRequested,
}

impl HelpState {
    /// Decides the state from the first argument.
    pub fn from_args<S: AsRef<str>>(args: &[String], help_tokens: &[S]) -> Self {
        match args.first() {
            Some(first) if help_tokens.iter().any(|token| token.as_ref() == first) => {
                Self::HelpRequested
            }
            _ => Self::Normal,
        }
    }
}

/// Result of [`Dispatcher::invoke`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The command ran and produced output.
    Completed(String),
    /// Nothing matched the namespace.
    NotFound {
        /// User-facing message with suggestions and guidance.
        message: String,
        /// Ranked suggestions included in the message.
        suggestions: Vec<String>,
    },
}

/// Resolves and invokes commands.
pub struct Dispatcher {
    config: DispatchConfig,
    registry: Registry,
    loader: Loader,
}

impl Dispatcher {
    /// Creates a dispatcher with no module sources.
    pub fn new(config: DispatchConfig) -> Self {
        let registry = Registry::with_hidden(config.hidden_namespaces.iter().cloned());
        let loader = Loader::new(config.lookup_spec());
        Self { config, registry, loader }
    }

    /// Creates a dispatcher loading module files from the configured load
    /// path, falling back to the built-in commands.
    pub fn from_config(config: DispatchConfig) -> Self {
        let files = FileModules::new(config.load_path.clone()).with_executable(&config.executable);
        let builtins = builtin::modules(&config);
        Self::new(config).with_source(files).with_source(builtins)
    }

    /// Appends a module source. Earlier sources take precedence.
    #[must_use]
    pub fn with_source(mut self, source: impl ModuleSource + 'static) -> Self {
        self.loader.add_source(Box::new(source));
        self
    }

    /// Dispatch configuration.
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Registry contents.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Registers a command directly.
    pub fn register(&mut self, descriptor: CommandDescriptor) {
        self.registry.register(descriptor);
    }

    /// Hides namespaces from listings and suggestions.
    pub fn hide<I, S>(&mut self, namespaces: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registry.hide(namespaces);
    }

    /// Clears registrations and loaded modules, restoring configured hidden
    /// namespaces.
    pub fn reset(&mut self) {
        self.registry.reset();
        self.registry.hide(self.config.hidden_namespaces.iter().cloned());
        self.loader.reset();
    }

    fn listing_rules(&self) -> ListingRules {
        ListingRules {
            reserved: self.config.reserved_namespace.clone(),
            exclusions: self.config.reserved_exclusions.clone(),
        }
    }

    /// Resolves a namespace, loading modules on demand.
    pub fn resolve(&mut self, namespace: &str) -> Option<CommandDescriptor> {
        resolver::resolve(
            &mut self.loader,
            &mut self.registry,
            namespace,
            &self.config.reserved_namespace,
        )
    }

    /// Resolves `namespace` and runs it with `args` and `config`.
    ///
    /// # Errors
    /// Errors raised by the command are returned unchanged. A missing
    /// command is reported as [`Outcome::NotFound`].
    pub fn invoke(
        &mut self,
        namespace: &str,
        mut args: Vec<String>,
        config: &InvokeConfig,
    ) -> Result<Outcome> {
        let Some(descriptor) = self.resolve(namespace) else {
            let suggestions = self.suggestions(namespace);
            let message = self.not_found_message(namespace, &suggestions);
            tracing::debug!(namespace = %namespace, ?suggestions, "command not found");
            return Ok(Outcome::NotFound { message, suggestions });
        };

        if args.is_empty() && descriptor.requires_arguments() {
            args.push(HELP_FLAG.to_string());
        }

        self.perform(&descriptor, &args, config).map(Outcome::Completed)
    }

    /// Runs a resolved command.
    ///
    /// The runnable action is the command name unless the first argument is a
    /// help token, in which case it is left unset and the command renders help.
    ///
    /// # Errors
    /// Returns the command's own error unchanged.
    pub fn perform(
        &mut self,
        descriptor: &CommandDescriptor,
        args: &[String],
        config: &InvokeConfig,
    ) -> Result<String> {
        let runnable = match HelpState::from_args(args, self.config.help_tokens.as_slice()) {
            HelpState::Normal => Some(descriptor.command_name().to_string()),
            HelpState::HelpRequested => None,
        };
        tracing::debug!(
            namespace = descriptor.namespace(),
            runnable = ?runnable,
            "dispatching command"
        );

        let handler = Arc::clone(descriptor.handler());
        handler.dispatch(Invocation {
            descriptor,
            runnable,
            args: args.to_vec(),
            config,
            dispatcher: self,
        })
    }

    /// Loads every discoverable command and groups the visible namespaces.
    pub fn sorted_groups(&mut self) -> Vec<Group> {
        self.loader.lookup_all(&mut self.registry);
        suggest::grouped_listing(&self.registry, &self.listing_rules())
    }

    /// Visible namespaces closest to `query`.
    pub fn suggestions(&mut self, query: &str) -> Vec<String> {
        let pool = suggest::flatten(&self.sorted_groups());
        suggest::suggest(query, &pool, self.config.suggestions)
    }

    /// Renders the grouped listing of every visible command.
    pub fn print_commands(&mut self) -> String {
        suggest::render_listing(&self.sorted_groups())
    }

    /// Message shown when `namespace` does not resolve.
    pub fn not_found_message(&self, namespace: &str, suggestions: &[String]) -> String {
        let mut message = format!("Could not find {} '{}'. ", self.config.command_type, namespace);
        if !suggestions.is_empty() {
            message.push_str("Maybe you meant ");
            message.push_str(&suggest::to_sentence(suggestions));
        }
        message.push('\n');
        message.push_str(&format!("Run `{} --help` for more options.", self.config.executable));
        message
    }
}
