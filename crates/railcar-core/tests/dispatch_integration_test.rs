//! Integration tests for dispatching commands loaded from module files.

use railcar_core::commands::{CommandType, InvokeConfig, Outcome};
use railcar_core::{DispatchConfig, Dispatcher};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn module(name: &str, template: &str) -> String {
    format!("[[command]]\nname = \"{}\"\ntemplate = \"{}\"\n", name, template)
}

/// Load path holding `rails:test`, `rails:console` and `db:migrate`.
fn standard_tree() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    write(
        root,
        "rails/command/rails/console/console_command.toml",
        &module("Rails::Command::ConsoleCommand", "console[{{args}}]"),
    );
    write(
        root,
        "rails/command/rails/test/test_command.toml",
        &module("Rails::Command::TestCommand", "test[{{args}}]"),
    );
    write(
        root,
        "rails/command/db/migrate/migrate_command.toml",
        "[[command]]\nnamespace = \"db:migrate\"\ntemplate = \"migrate\"\n",
    );

    temp_dir
}

fn dispatcher_for(root: &Path) -> Dispatcher {
    Dispatcher::from_config(DispatchConfig {
        load_path: vec![root.to_path_buf()],
        ..DispatchConfig::default()
    })
}

fn completed(outcome: Outcome) -> String {
    match outcome {
        Outcome::Completed(output) => output,
        Outcome::NotFound { message, .. } => panic!("unexpected miss: {}", message),
    }
}

#[test]
fn test_console_resolves_through_reserved_namespace() {
    let temp_dir = standard_tree();
    let mut dispatcher = dispatcher_for(temp_dir.path());

    let output = completed(dispatcher.invoke("console", Vec::new(), &InvokeConfig::new()).unwrap());
    assert_eq!(output, "console[]");

    let output = completed(
        dispatcher
            .invoke("console", vec!["--sandbox".to_string()], &InvokeConfig::new())
            .unwrap(),
    );
    assert_eq!(output, "console[--sandbox]");
}

#[test]
fn test_typo_suggests_closest_command() {
    let temp_dir = standard_tree();
    let mut dispatcher = dispatcher_for(temp_dir.path());

    let outcome = dispatcher.invoke("consol", Vec::new(), &InvokeConfig::new()).unwrap();
    let Outcome::NotFound { message, suggestions } = outcome else {
        panic!("consol should not resolve");
    };

    assert_eq!(suggestions, vec!["console", "test", "db:migrate"]);
    assert_eq!(
        message,
        "Could not find command 'consol'. Maybe you meant 'console', 'test' or 'db:migrate'\n\
         Run `rails --help` for more options."
    );
}

#[test]
fn test_unknown_namespace_gets_three_suggestions() {
    let temp_dir = standard_tree();
    let mut dispatcher = dispatcher_for(temp_dir.path());

    assert!(dispatcher.resolve("totally:unknown:thing").is_none());
    assert_eq!(dispatcher.suggestions("totally:unknown:thing").len(), 3);
}

#[test]
fn test_listing_groups_commands() {
    let temp_dir = standard_tree();
    let mut dispatcher = dispatcher_for(temp_dir.path());

    assert_eq!(
        dispatcher.print_commands(),
        "Rails:\n  console\n  test\n\nDb:\n  db:migrate\n\n"
    );
}

#[test]
fn test_help_without_namespace_lists_commands() {
    let temp_dir = standard_tree();
    let mut dispatcher = dispatcher_for(temp_dir.path());

    let output = completed(dispatcher.invoke("help", Vec::new(), &InvokeConfig::new()).unwrap());
    assert!(output.contains("Rails:\n  console\n  test\n\nDb:\n  db:migrate\n"));
}

#[test]
fn test_broken_module_does_not_block_lookup() {
    let temp_dir = standard_tree();
    let root = temp_dir.path();
    write(root, "rails/command/runner/runner_command.toml", "[[command]\nthis is not toml");
    write(
        root,
        "rails/command/rails/runner/runner_command.toml",
        &module("Rails::Command::RunnerCommand", "runner"),
    );
    let mut dispatcher = dispatcher_for(root);

    let output = completed(dispatcher.invoke("runner", Vec::new(), &InvokeConfig::new()).unwrap());
    assert_eq!(output, "runner");
    assert!(dispatcher.print_commands().contains("  runner\n"));
}

#[test]
fn test_custom_command_shadows_reserved_one() {
    let temp_dir = standard_tree();
    let root = temp_dir.path();
    write(
        root,
        "rails/command/test/test_command.toml",
        "[[command]]\nnamespace = \"test\"\ntemplate = \"custom test\"\n",
    );
    let mut dispatcher = dispatcher_for(root);

    let output = completed(dispatcher.invoke("test", Vec::new(), &InvokeConfig::new()).unwrap());
    assert_eq!(output, "custom test");
}

#[test]
fn test_hidden_command_runs_but_is_not_listed() {
    let temp_dir = standard_tree();
    let root = temp_dir.path();
    write(
        root,
        "rails/command/rails/secret/secret_command.toml",
        "[[command]]\nnamespace = \"rails:secret\"\ntemplate = \"shh\"\nhidden = true\n",
    );
    let mut dispatcher = dispatcher_for(root);

    assert!(!dispatcher.print_commands().contains("secret"));
    assert!(!dispatcher.suggestions("secret").contains(&"secret".to_string()));

    let output = completed(dispatcher.invoke("secret", Vec::new(), &InvokeConfig::new()).unwrap());
    assert_eq!(output, "shh");
}

#[test]
fn test_help_flag_renders_usage_file() {
    let temp_dir = standard_tree();
    let root = temp_dir.path();
    write(
        root,
        "rails/command/rails/console/console/USAGE",
        "Starts {{executable}} {{command_name}} for {{namespace}}.\n",
    );
    let mut dispatcher = dispatcher_for(root);

    let output =
        completed(dispatcher.invoke("console", vec!["-h".to_string()], &InvokeConfig::new()).unwrap());
    assert_eq!(output, "Usage:\n  rails console [options]\n\nStarts rails console for rails:console.\n");
}

#[test]
fn test_required_argument_routes_bare_call_to_help() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(
        root,
        "rails/command/rails/new/new_command.toml",
        "[[command]]\nname = \"Rails::Command::NewCommand\"\ndescription = \"Create an app\"\n\
         template = \"new {{arg1}}\"\narguments = [{ name = \"path\", required = true }]\n",
    );
    let mut dispatcher = dispatcher_for(root);

    let output = completed(dispatcher.invoke("new", Vec::new(), &InvokeConfig::new()).unwrap());
    assert_eq!(output, "Usage:\n  rails new PATH [options]\n\nCreate an app\n");

    let output =
        completed(dispatcher.invoke("new", vec!["blog".to_string()], &InvokeConfig::new()).unwrap());
    assert_eq!(output, "new blog");
}

#[test]
fn test_template_injects_files() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(
        root,
        "rails/command/rails/about/about_command.toml",
        &module("Rails::Command::AboutCommand", "About: @{about.txt}"),
    );
    write(root, "rails/command/rails/about/about.txt", "railcar");
    let mut dispatcher = dispatcher_for(root);

    let output = completed(dispatcher.invoke("about", Vec::new(), &InvokeConfig::new()).unwrap());
    assert_eq!(output, "About: railcar");
}

#[test]
fn test_generators_dispatch_separately() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(
        root,
        "rails/generators/rails/model/model_generator.toml",
        &module("Rails::Generators::ModelGenerator", "model {{arg1}}"),
    );
    write(
        root,
        "rails/command/rails/console/console_command.toml",
        &module("Rails::Command::ConsoleCommand", "console"),
    );
    let mut dispatcher = Dispatcher::from_config(DispatchConfig {
        command_type: CommandType::Generator,
        load_path: vec![root.to_path_buf()],
        ..DispatchConfig::default()
    });

    let output =
        completed(dispatcher.invoke("model", vec!["User".to_string()], &InvokeConfig::new()).unwrap());
    assert_eq!(output, "model User");

    let outcome = dispatcher.invoke("console", Vec::new(), &InvokeConfig::new()).unwrap();
    let Outcome::NotFound { message, .. } = outcome else {
        panic!("commands are not generators");
    };
    assert!(message.starts_with("Could not find generator 'console'. Maybe you meant 'model'"));
}

#[test]
fn test_reset_reloads_modules() {
    let temp_dir = standard_tree();
    let mut dispatcher = dispatcher_for(temp_dir.path());

    assert!(dispatcher.resolve("console").is_some());
    dispatcher.reset();
    assert!(dispatcher.registry().is_empty());
    assert!(dispatcher.resolve("console").is_some());
}
