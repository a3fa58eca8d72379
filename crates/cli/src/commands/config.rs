use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use clientes_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

use crate::commands::CommandResult;

pub fn run() -> CommandResult {
    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => CommandResult { exit_code: 0, output: render(&config) },
        Err(error) => CommandResult::failure(
            "config",
            "config_validation",
            format!("config validation failed: {error}"),
            2,
        ),
    }
}

pub fn render(config: &AppConfig) -> String {
    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let fields: [(&str, String, &[&str]); 12] = [
        ("database.url", config.database.url.clone(), &["CLIENTES_DATABASE_URL"]),
        (
            "database.max_connections",
            config.database.max_connections.to_string(),
            &["CLIENTES_DATABASE_MAX_CONNECTIONS"],
        ),
        (
            "database.timeout_secs",
            config.database.timeout_secs.to_string(),
            &["CLIENTES_DATABASE_TIMEOUT_SECS"],
        ),
        (
            "server.bind_address",
            config.server.bind_address.clone(),
            &["CLIENTES_SERVER_BIND_ADDRESS"],
        ),
        ("server.port", config.server.port.to_string(), &["CLIENTES_SERVER_PORT"]),
        (
            "server.health_check_port",
            config.server.health_check_port.to_string(),
            &["CLIENTES_SERVER_HEALTH_CHECK_PORT"],
        ),
        (
            "security.username",
            config.security.username.clone(),
            &["CLIENTES_SECURITY_USERNAME"],
        ),
        (
            "security.password",
            redact_password(config.security.password.expose_secret()),
            &["CLIENTES_SECURITY_PASSWORD"],
        ),
        ("security.roles", config.security.roles.join(","), &["CLIENTES_SECURITY_ROLES"]),
        (
            "security.customers_role",
            config.security.customers_role.clone(),
            &["CLIENTES_SECURITY_CUSTOMERS_ROLE"],
        ),
        (
            "logging.level",
            config.logging.level.clone(),
            &["CLIENTES_LOGGING_LEVEL", "CLIENTES_LOG_LEVEL"],
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format),
            &["CLIENTES_LOGGING_FORMAT", "CLIENTES_LOG_FORMAT"],
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key, value, env_keys) in fields {
        let source =
            field_source(key, env_keys, config_file_doc.as_ref(), config_file_path.as_deref());
        lines.push(render_line(key, &value, source));
    }

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("clientes.toml"), PathBuf::from("config/clientes.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

fn redact_password(password: &str) -> String {
    if password.trim().is_empty() {
        "<empty>".to_string()
    } else {
        "<redacted>".to_string()
    }
}
