//! Railcar CLI - command-line front end for the railcar dispatcher.
//!
//! Resolves a namespaced command from the configured load path and runs it,
//! suggesting close matches when nothing resolves.

mod commands;
mod config;

use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Railcar - lazily loaded namespaced commands
///
/// Looks up `NAMESPACE` (for example `console` or `db:migrate`) in the
/// command modules found under the load path and forwards `ARGS` to it.
#[derive(Parser, Debug)]
#[command(
    name = "railcar",
    author,
    version,
    about = "Railcar - namespaced command dispatch",
    long_about = "Railcar resolves namespaced commands from module files on the load path.\nRun without a namespace, or with -h, to list every available command.",
    disable_help_flag = true
)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Configuration file merged over the discovered ones
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Load-path root searched for command modules (repeatable)
    #[arg(short = 'I', long = "load-path", value_name = "DIR")]
    load_path: Vec<PathBuf>,

    /// Dispatch generators instead of commands
    #[arg(long)]
    generator: bool,

    /// Print every available command and exit
    #[arg(long)]
    list: bool,

    /// Value passed to the command's configuration (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// Command namespace
    #[arg(allow_hyphen_values = true)]
    namespace: Option<String>,

    /// Arguments forwarded to the command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load configuration
    let mut dispatch_config = config::load_config(args.config.as_deref())?;
    config::apply_args(&mut dispatch_config, &args.load_path, args.generator);
    tracing::debug!(?dispatch_config, "configuration loaded");

    let mut dispatcher = railcar_core::Dispatcher::from_config(dispatch_config);

    if args.list {
        commands::list::execute(&mut dispatcher);
        return Ok(());
    }

    let invoke_config = commands::invoke::parse_settings(&args.set)?;
    commands::invoke::execute(&mut dispatcher, args.namespace, args.args, &invoke_config)
}
