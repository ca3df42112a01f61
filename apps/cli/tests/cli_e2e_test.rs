//! End-to-end tests for the `railcar` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Workspace with a load path holding `rails:console`, `rails:test`,
/// `db:migrate` and a command whose template cannot render.
fn workspace() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let lib = temp_dir.path().join("lib");

    write(
        &lib,
        "rails/command/rails/console/console_command.toml",
        "[[command]]\nname = \"Rails::Command::ConsoleCommand\"\n\
         description = \"Start the console\"\ntemplate = \"console[{{args}}]\"\n",
    );
    write(
        &lib,
        "rails/command/rails/test/test_command.toml",
        "[[command]]\nnamespace = \"rails:test\"\ntemplate = \"test\"\n",
    );
    write(
        &lib,
        "rails/command/db/migrate/migrate_command.toml",
        "[[command]]\nnamespace = \"db:migrate\"\ntemplate = \"migrate\"\n",
    );
    write(
        &lib,
        "rails/command/rails/broken/broken_command.toml",
        "[[command]]\nnamespace = \"rails:broken\"\ntemplate = \"@{missing.txt}\"\n",
    );
    write(
        &lib,
        "rails/generators/rails/model/model_generator.toml",
        "[[command]]\nname = \"Rails::Generators::ModelGenerator\"\ntemplate = \"model {{arg1}}\"\n",
    );

    temp_dir
}

/// Binary isolated from the caller's home, config files and environment.
fn railcar(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("railcar").unwrap();
    cmd.current_dir(temp_dir.path())
        .env("HOME", temp_dir.path())
        .env("NO_COLOR", "1")
        .env_remove("RAILCAR_LOAD_PATH")
        .env_remove("RAILCAR_EXECUTABLE")
        .env_remove("RAILS_ENV")
        .env_remove("RACK_ENV");
    cmd
}

#[test]
fn test_version() {
    let temp_dir = TempDir::new().unwrap();
    railcar(&temp_dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("railcar 0.1.0"));
}

#[test]
fn test_no_namespace_lists_commands() {
    let temp_dir = workspace();
    railcar(&temp_dir)
        .args(["--load-path", "lib"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:\n  rails COMMAND [options]"))
        .stdout(predicate::str::contains("Rails:\n  broken\n  console\n  test\n"))
        .stdout(predicate::str::contains("Db:\n  db:migrate\n"));
}

#[test]
fn test_help_flag_lists_commands() {
    let temp_dir = workspace();
    railcar(&temp_dir)
        .args(["-I", "lib", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rails:\n  broken\n  console\n  test\n"));
}

#[test]
fn test_runs_command_with_arguments() {
    let temp_dir = workspace();
    railcar(&temp_dir)
        .args(["-I", "lib", "console", "sandbox"])
        .assert()
        .success()
        .stdout("console[sandbox]\n");
}

#[test]
fn test_command_help() {
    let temp_dir = workspace();
    railcar(&temp_dir)
        .args(["-I", "lib", "console", "-h"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Usage:\n  rails console [options]\n\nStart the console"));
}

#[test]
fn test_typo_suggests_and_succeeds() {
    let temp_dir = workspace();
    railcar(&temp_dir)
        .args(["-I", "lib", "consol"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Could not find command 'consol'. Maybe you meant 'console'"))
        .stdout(predicate::str::contains("Run `rails --help` for more options."));
}

#[test]
fn test_executable_from_environment() {
    let temp_dir = workspace();
    railcar(&temp_dir)
        .env("RAILCAR_EXECUTABLE", "bin/rails")
        .args(["-I", "lib", "consol"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Run `bin/rails --help` for more options."));
}

#[test]
fn test_load_path_from_environment() {
    let temp_dir = workspace();
    railcar(&temp_dir)
        .env("RAILCAR_LOAD_PATH", temp_dir.path().join("lib"))
        .arg("console")
        .assert()
        .success()
        .stdout("console[]\n");
}

#[test]
fn test_load_path_from_local_config() {
    let temp_dir = workspace();
    fs::write(temp_dir.path().join(".railcarrc"), "load_path = [\"lib\"]\nexecutable = \"bin/rails\"\n")
        .unwrap();

    railcar(&temp_dir)
        .arg("nope")
        .assert()
        .success()
        .stdout(predicate::str::contains("Run `bin/rails --help` for more options."));
}

#[test]
fn test_command_error_fails() {
    let temp_dir = workspace();
    railcar(&temp_dir)
        .args(["-I", "lib", "broken"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Command 'broken' failed"));
}

#[test]
fn test_list_flag() {
    let temp_dir = workspace();
    railcar(&temp_dir)
        .args(["-I", "lib", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rails:\n  broken\n  console\n  test\n\nDb:\n  db:migrate\n"));
}

#[test]
fn test_list_without_load_path() {
    let temp_dir = TempDir::new().unwrap();
    railcar(&temp_dir)
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No commands found."));
}

#[test]
fn test_generator_mode() {
    let temp_dir = workspace();
    railcar(&temp_dir)
        .args(["-I", "lib", "--generator", "model", "User"])
        .assert()
        .success()
        .stdout("model User\n");
}

#[test]
fn test_invalid_setting_fails() {
    let temp_dir = workspace();
    railcar(&temp_dir)
        .args(["-I", "lib", "--set", "oops", "console"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected KEY=VALUE"));
}

#[test]
fn test_missing_config_file_fails() {
    let temp_dir = workspace();
    railcar(&temp_dir)
        .args(["--config", "absent.toml", "console"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}
