#![forbid(unsafe_code)]

use std::env;
use std::io::IsTerminal;
use std::net::SocketAddr;
use std::path::PathBuf;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_HTTP_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_GRPC_BIND: &str = "127.0.0.1:50051";
pub const DEFAULT_PRINCIPAL_HEADER: &str = "x-atelier-principal";

const STORE_RELATIVE_PATH: &str = ".atelier/adapter/journal.jsonl";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Text,
    Json,
    #[default]
    Auto,
}

impl LogFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" => Some(LogFormat::Text),
            "json" => Some(LogFormat::Json),
            "auto" => Some(LogFormat::Auto),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    pub http_bind: SocketAddr,
    pub grpc_bind: SocketAddr,
    pub store_path: PathBuf,
    pub principal_header: String,
    pub seed_gallery: bool,
    pub log_format: LogFormat,
}

impl AdapterConfig {
    pub fn from_env() -> Self {
        Self::from_env_var_map(|key| env::var(key).ok())
    }

    /// Unset, blank, or unparsable values fall back to defaults.
    pub fn from_env_var_map<F>(mut env_getter: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut get = |key: &str| {
            env_getter(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let http_bind = parse_bind(get("ATELIER_HTTP_BIND"), DEFAULT_HTTP_BIND);
        let grpc_bind = parse_bind(get("ATELIER_GRPC_BIND"), DEFAULT_GRPC_BIND);
        let store_path = get("ATELIER_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| default_store_path(get("HOME")));
        let principal_header = get("ATELIER_PRINCIPAL_HEADER")
            .map(|v| v.to_ascii_lowercase())
            .filter(|v| axum::http::HeaderName::from_bytes(v.as_bytes()).is_ok())
            .unwrap_or_else(|| DEFAULT_PRINCIPAL_HEADER.to_string());
        let seed_gallery = match get("ATELIER_SEED_GALLERY") {
            Some(v) => !matches!(
                v.to_ascii_lowercase().as_str(),
                "0" | "false" | "off" | "no"
            ),
            None => true,
        };
        let log_format = get("ATELIER_LOG_FORMAT")
            .and_then(|v| LogFormat::parse(&v))
            .unwrap_or_default();

        Self {
            http_bind,
            grpc_bind,
            store_path,
            principal_header,
            seed_gallery,
            log_format,
        }
    }
}

fn parse_bind(raw: Option<String>, default: &str) -> SocketAddr {
    raw.and_then(|v| v.parse::<SocketAddr>().ok())
        .unwrap_or_else(|| default_socket_addr(default))
}

fn default_socket_addr(default: &str) -> SocketAddr {
    default
        .parse()
        .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 0)))
}

pub fn default_store_path(home: Option<String>) -> PathBuf {
    match home {
        Some(home) if !home.trim().is_empty() => {
            PathBuf::from(home.trim()).join(STORE_RELATIVE_PATH)
        }
        _ => PathBuf::from(STORE_RELATIVE_PATH),
    }
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` overrides the default `info` filter. `Auto` picks JSON when
/// stdout is not a terminal.
pub fn init_logging(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = match format {
        LogFormat::Json => true,
        LogFormat::Text => false,
        LogFormat::Auto => !std::io::stdout().is_terminal(),
    };

    if use_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().flatten_event(true).with_current_span(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer())
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn config_from(pairs: &[(&str, &str)]) -> AdapterConfig {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AdapterConfig::from_env_var_map(|key| map.get(key).cloned())
    }

    #[test]
    fn at_config_01_defaults_when_env_empty() {
        let cfg = config_from(&[("HOME", "/home/artist")]);
        assert_eq!(cfg.http_bind.to_string(), DEFAULT_HTTP_BIND);
        assert_eq!(cfg.grpc_bind.to_string(), DEFAULT_GRPC_BIND);
        assert_eq!(
            cfg.store_path,
            PathBuf::from("/home/artist/.atelier/adapter/journal.jsonl")
        );
        assert_eq!(cfg.principal_header, DEFAULT_PRINCIPAL_HEADER);
        assert!(cfg.seed_gallery);
        assert_eq!(cfg.log_format, LogFormat::Auto);
    }

    #[test]
    fn at_config_02_overrides_are_applied() {
        let cfg = config_from(&[
            ("ATELIER_HTTP_BIND", "0.0.0.0:9000"),
            ("ATELIER_STORE_PATH", "/var/lib/atelier/j.jsonl"),
            ("ATELIER_PRINCIPAL_HEADER", "X-Caller"),
            ("ATELIER_SEED_GALLERY", "off"),
            ("ATELIER_LOG_FORMAT", "JSON"),
        ]);
        assert_eq!(cfg.http_bind.to_string(), "0.0.0.0:9000");
        assert_eq!(cfg.store_path, PathBuf::from("/var/lib/atelier/j.jsonl"));
        assert_eq!(cfg.principal_header, "x-caller");
        assert!(!cfg.seed_gallery);
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn at_config_03_invalid_values_fall_back() {
        let cfg = config_from(&[
            ("ATELIER_GRPC_BIND", "not-an-addr"),
            ("ATELIER_PRINCIPAL_HEADER", "bad header"),
            ("ATELIER_LOG_FORMAT", "yaml"),
            ("ATELIER_STORE_PATH", "   "),
        ]);
        assert_eq!(cfg.grpc_bind.to_string(), DEFAULT_GRPC_BIND);
        assert_eq!(cfg.principal_header, DEFAULT_PRINCIPAL_HEADER);
        assert_eq!(cfg.log_format, LogFormat::Auto);
        assert_eq!(cfg.store_path, PathBuf::from(STORE_RELATIVE_PATH));
    }
}
