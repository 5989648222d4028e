//! Integration tests for configuration loading
//!
//! Covers YAML files on disk, environment overrides and validation of loaded
//! values.

use ragloom::domain::models::EmbeddingProviderKind;
use ragloom::ConfigLoader;
use std::io::Write;
use tempfile::NamedTempFile;

fn yaml_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write config");
    file
}

#[test]
fn test_load_from_file_merges_with_defaults() {
    let file = yaml_file(
        r"
server:
  port: 9090
ollama:
  chat_model: mistral
embedding:
  provider: ollama
rag:
  max_chunk_size: 500
  chunk_overlap: 100
",
    );

    let config = temp_env::with_vars_unset(["RAGLOOM_SERVER__PORT"], || {
        ConfigLoader::load_from_file(file.path())
    })
    .expect("Config should load");

    assert_eq!(config.server.port, 9090);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.ollama.chat_model, "mistral");
    assert_eq!(config.ollama.embedding_model, "all-minilm");
    assert_eq!(config.embedding.provider, EmbeddingProviderKind::Ollama);
    assert_eq!(config.rag.max_chunk_size, 500);
    assert_eq!(config.rag.chunk_overlap, 100);
    assert_eq!(config.rag.default_max_results, 3);
    assert_eq!(config.memory.max_messages, 10);
}

#[test]
fn test_env_overrides_file() {
    let file = yaml_file("server:\n  port: 9090\n");

    let config = temp_env::with_vars(
        [
            ("RAGLOOM_SERVER__PORT", Some("7070")),
            ("RAGLOOM_TOOLS__MAX_TOOL_ROUNDS", Some("3")),
            ("RAGLOOM_OLLAMA__BASE_URL", Some("http://ollama:11434")),
        ],
        || ConfigLoader::load_from_file(file.path()),
    )
    .expect("Config should load");

    assert_eq!(config.server.port, 7070);
    assert_eq!(config.tools.max_tool_rounds, 3);
    assert_eq!(config.ollama.base_url, "http://ollama:11434");
}

#[test]
fn test_load_without_files_uses_defaults_and_env() {
    let config = temp_env::with_vars([("RAGLOOM_LOGGING__FORMAT", Some("json"))], || {
        ConfigLoader::load()
    })
    .expect("Config should load");

    assert_eq!(config.logging.format, "json");
    assert_eq!(config.server.port, 8080);
}

#[test]
fn test_invalid_values_are_rejected() {
    let file = yaml_file("rag:\n  max_chunk_size: 100\n  chunk_overlap: 100\n");
    let err = ConfigLoader::load_from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("chunk_overlap"));

    let file = yaml_file("ollama:\n  temperature: 3.5\n");
    assert!(ConfigLoader::load_from_file(file.path()).is_err());
}

#[test]
fn test_malformed_yaml_fails_with_path() {
    let file = yaml_file("server: [not, a, map\n");
    let err = ConfigLoader::load_from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to load config from"));
}

#[test]
fn test_missing_file_fails() {
    let err = ConfigLoader::load_from_file("/nonexistent/ragloom.yaml").unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
}
