use doc_chat::chat::{FailurePolicy, ReplyOrdering};
use doc_chat::config::AppConfig;
use serial_test::serial;
use std::env;
use std::io::Write;

const VARS: &[&str] = &[
    "CONFIG_FILE",
    "HOST",
    "PORT",
    "BACKEND_URL",
    "LOG_JSON",
    "DOCCHAT_SERVER__PORT",
    "DOCCHAT_BACKEND__BASE_URL",
    "DOCCHAT_BACKEND__TIMEOUT_SECS",
    "DOCCHAT_CHAT__FAILURE_POLICY",
    "DOCCHAT_SIDEBAR__INGESTION_ENABLED",
];

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    for var in VARS {
        unsafe {
            env::remove_var(var);
        }
    }
}

fn load(args: &[&str]) -> AppConfig {
    let mut argv = vec!["doc-chat"];
    argv.extend_from_slice(args);
    AppConfig::load_from_args(argv).expect("Failed to load config")
}

fn yaml_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("Failed to create temp config");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp config");
    file
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = load(&[]);
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.backend.base_url, "http://localhost:8000");
    assert!(config.backend.timeout_secs.is_none());
    assert_eq!(config.chat.failure_policy, FailurePolicy::Surface);
    assert_eq!(config.chat.reply_ordering, ReplyOrdering::Submission);
    assert!(config.sidebar.ingestion_enabled);
    assert!(!config.logging.json);
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("DOCCHAT_SERVER__PORT", "9090");
        env::set_var("DOCCHAT_BACKEND__TIMEOUT_SECS", "45");
        env::set_var("DOCCHAT_CHAT__FAILURE_POLICY", "silent");
        env::set_var("DOCCHAT_SIDEBAR__INGESTION_ENABLED", "false");
    }

    let config = load(&[]);
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.backend.timeout_secs, Some(45));
    assert_eq!(config.chat.failure_policy, FailurePolicy::Silent);
    assert!(!config.sidebar.ingestion_enabled);

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let file = yaml_file(
        r#"
server:
  port: 7070
chat:
  greeting: "Willkommen"
  reply_ordering: arrival
ui:
  title: "Handbuch-Chat"
"#,
    );

    unsafe {
        env::set_var("CONFIG_FILE", file.path());
    }

    let config = load(&[]);
    assert_eq!(config.server.port, 7070);
    assert_eq!(config.chat.greeting, "Willkommen");
    assert_eq!(config.chat.reply_ordering, ReplyOrdering::Arrival);
    assert_eq!(config.ui.title, "Handbuch-Chat");
    // Untouched keys keep their defaults.
    assert_eq!(config.backend.base_url, "http://localhost:8000");

    clear_env_vars();
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    clear_env_vars();

    let result = AppConfig::load_from_args(["doc-chat", "--config", "/nonexistent/doc-chat.yaml"]);
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_precedence() {
    clear_env_vars();

    let file = yaml_file(
        r#"
server:
  port: 7070
backend:
  base_url: "http://file:8000"
"#,
    );
    unsafe {
        env::set_var("DOCCHAT_SERVER__PORT", "9090");
    }

    let path = file.path().to_string_lossy().to_string();

    // Env beats file.
    let config = load(&["--config", &path]);
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.backend.base_url, "http://file:8000");

    // CLI beats env and file.
    let config = load(&[
        "--config",
        &path,
        "--port",
        "4040",
        "--backend-url",
        "http://cli:9000",
    ]);
    assert_eq!(config.server.port, 4040);
    assert_eq!(config.backend.base_url, "http://cli:9000");

    clear_env_vars();
}
