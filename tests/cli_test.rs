//! CLI contract tests driving the compiled binary: help output, the
//! non-zero exit with a message on failure, and a full generate run
//! writing a server to disk.

use std::process::Command;

use mcpforge::model::config::{ServerConfig, TargetLanguage};
use mcpforge::model::endpoint::{Endpoint, HttpMethod};
use tempfile::TempDir;

fn mcpforge() -> Command {
    Command::new(env!("CARGO_BIN_EXE_mcpforge"))
}

#[test]
fn test_help_lists_commands() {
    let result = mcpforge().arg("--help").output().expect("failed to run mcpforge");

    assert!(result.status.success());
    let output = String::from_utf8_lossy(&result.stdout);
    for command in ["inspect", "import", "generate", "deploy"] {
        assert!(output.contains(command), "help must list `{command}`");
    }
    assert!(output.contains("--store"));
}

#[test]
fn test_generate_fails_nonzero_on_missing_config() {
    let dir = TempDir::new().expect("tempdir");
    let store = dir.path().join("store.db");
    let missing = dir.path().join("absent.json");
    let out = dir.path().join("out");

    let result = mcpforge()
        .arg("--store")
        .arg(&store)
        .arg("generate")
        .arg("--config")
        .arg(&missing)
        .arg("--output-dir")
        .arg(&out)
        .output()
        .expect("failed to run mcpforge");

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(
        stderr.contains("failed to read configuration file"),
        "stderr was: {stderr}"
    );
}

#[test]
fn test_generate_writes_server_to_output_dir() {
    let dir = TempDir::new().expect("tempdir");
    let store = dir.path().join("store.db");
    let config_path = dir.path().join("config.json");
    let out = dir.path().join("out");

    let mut config = ServerConfig::new("Widget API", TargetLanguage::TypeScript);
    config.endpoints = vec![
        Endpoint::new(HttpMethod::Get, "/widgets"),
        Endpoint::new(HttpMethod::Post, "/widgets"),
    ];
    let json = serde_json::to_string_pretty(&config).expect("config serializes");
    std::fs::write(&config_path, json).expect("config written");

    let result = mcpforge()
        .arg("--store")
        .arg(&store)
        .arg("generate")
        .arg("--config")
        .arg(&config_path)
        .arg("--output-dir")
        .arg(&out)
        .output()
        .expect("failed to run mcpforge");

    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(result.status.success(), "stderr was: {stderr}");
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("Generated"), "stdout was: {stdout}");

    assert!(out.join("package.json").is_file());
    assert!(out.join("src").join("index.ts").is_file());
    assert!(out.join("README.md").is_file());
}
