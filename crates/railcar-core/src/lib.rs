//! Railcar Core - lazily loaded command discovery and dispatch.
//!
//! This crate provides:
//! - Namespaced command registration and on-demand module loading
//! - Dispatch with help routing and "did you mean" suggestions
//! - Layered configuration
//!
//! # Example
//!
//! ```rust,no_run
//! use railcar_core::{DispatchConfig, Dispatcher};
//!
//! let mut dispatcher = Dispatcher::from_config(DispatchConfig::discover_and_load());
//! print!("{}", dispatcher.print_commands());
//! ```

pub mod commands;
pub mod config;
pub mod env;

pub use commands::{
    Command, CommandDescriptor, CommandError, CommandType, Dispatcher, FileModules, Invocation,
    InvokeConfig, LoadError, Outcome, Registry, Result, StaticModules,
};
pub use config::{ConfigError, ConfigFile, DispatchConfig};
