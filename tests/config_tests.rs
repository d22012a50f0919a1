// Configuration layering tests
// Author: kelexine (https://github.com/kelexine)

use provider_proxy::config::AppConfig;
use std::io::Write;

#[test]
fn test_file_values_and_flat_override() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[server]
port = 4000

[providers]
hf_model = "gpt2"
openrouter_key = "sk-or-from-file"

[upstream]
timeout_seconds = 30
max_attempts = 2
"#
    )
    .unwrap();

    let config = AppConfig::load_from(Some(file.path()), |name| match name {
        "OPENROUTER_KEY" => Some("sk-or-from-env".to_string()),
        _ => None,
    })
    .unwrap();

    assert_eq!(config.server.port, 4000);
    assert_eq!(config.providers.hf_model.as_deref(), Some("gpt2"));
    assert_eq!(config.providers.openrouter_key.as_deref(), Some("sk-or-from-env"));
    assert_eq!(config.upstream.timeout_seconds, Some(30));
    assert_eq!(config.upstream.max_attempts, 2);
    // Untouched sections keep their defaults
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_missing_file_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let config = AppConfig::load_from(Some(&path), |_| None).unwrap();
    assert_eq!(config.server.port, 3000);
}

#[test]
fn test_port_override() {
    let config = AppConfig::load_from(None, |name| (name == "PORT").then(|| "8080".to_string())).unwrap();
    assert_eq!(config.server.port, 8080);
}
