//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use crate::schema::LlmProvider;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_fplchat_config.toml"));
    assert!(matches!(
        result,
        Err(fplchat_common::ConfigError::FileNotFound(_))
    ));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[league]
league_id = 555

[llm]
provider = "openai"
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.league.league_id, 555);
    assert_eq!(config.llm.provider, LlmProvider::OpenAi);
    // Defaults preserved
    assert_eq!(config.agent.max_steps, 6);
    assert_eq!(config.tools.url, "http://localhost:8080/mcp");
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, fplchat_common::ConfigError::ParseError(_)));
}

#[test]
fn unknown_provider_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[llm]\nprovider = \"clippy\"\n").unwrap();

    assert!(load_from_path(&path).is_err());
}

#[test]
fn out_of_range_values_still_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[agent]\nmax_steps = 99\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.agent.max_steps, 99);
}

#[test]
fn load_or_create_writes_template() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fplchat").join("config.toml");

    let config = load_or_create(&path).unwrap();
    assert!(path.exists());
    assert_eq!(config.league.league_id, 14204);

    let reloaded = load_from_path(&path).unwrap();
    assert_eq!(reloaded.agent.history_limit, 6);
}

#[test]
fn template_is_fully_commented_out() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    create_default_config(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    for line in content.lines() {
        let line = line.trim();
        assert!(
            line.is_empty() || line.starts_with('#') || line.starts_with('['),
            "unexpected active line: {line}"
        );
    }
}

#[test]
fn default_path_ends_with_fplchat_config() {
    if let Ok(path) = default_config_path() {
        assert!(path.ends_with("fplchat/config.toml"));
    }
}
