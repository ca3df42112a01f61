//! Command discovery and dispatch.
//!
//! Provides lazily loaded, namespaced commands with:
//! - On-demand module loading from candidate paths: `rails:model` tries
//!   `rails/command/rails/model/model_command` and friends
//! - Reserved-namespace fallback: `console` resolves to `rails:console`
//! - Help routing for `-h`, `--help` and bare calls to commands with required
//!   arguments
//! - "Did you mean" suggestions and grouped command listings
//!
//! # Example
//!
//! ```rust,no_run
//! use railcar_core::commands::{Dispatcher, InvokeConfig, Outcome};
//! use railcar_core::config::DispatchConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut dispatcher = Dispatcher::from_config(DispatchConfig::discover_and_load());
//!
//! match dispatcher.invoke("console", Vec::new(), &InvokeConfig::new())? {
//!     Outcome::Completed(output) => println!("{}", output),
//!     Outcome::NotFound { message, .. } => eprintln!("{}", message),
//! }
//! # Ok(())
//! # }
//! ```

pub mod builtin;
mod descriptor;
mod dispatcher;
mod error;
mod loader;
mod modules;
mod registry;
mod resolver;
mod suggest;

pub use descriptor::{
    ArgumentSpec, Command, CommandDescriptor, CommandType, Invocation, InvokeConfig, camelize,
    command_name_from_type_name, namespace_from_type_name, underscore,
};
pub use dispatcher::{Dispatcher, HELP_FLAG, HelpState, Outcome};
pub use error::{CommandError, LoadError, Result};
pub use loader::{
    Loader, LookupPathSpec, LookupReport, ModuleSource, NAMESPACE_DELIMITER, StaticModules,
    namespaces_to_paths,
};
pub use modules::{CommandDefinition, FileModules, ModuleFile, TemplateCommand};
pub use registry::Registry;
pub use resolver::{candidates, resolve};
pub use suggest::{
    Group, ListingRules, edit_distance, flatten, grouped_listing, render_listing, suggest,
    to_sentence,
};
