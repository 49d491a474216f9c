//! Usage: Environment-sourced client settings (API origin, home URL, callback port).

use std::sync::OnceLock;

pub const DEFAULT_API_ORIGIN: &str = "http://127.0.0.1:8000";
pub const DEFAULT_HOME_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_CALLBACK_PORT: u16 = 38123;

const ENV_API_ORIGIN: &str = "SCHOLARPATH_API_ORIGIN";
const ENV_HOME_URL: &str = "SCHOLARPATH_HOME_URL";
const ENV_CALLBACK_PORT: &str = "SCHOLARPATH_CALLBACK_PORT";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Base origin every API function targets. No function may resolve its own.
    pub api_origin: String,
    /// Where the browser lands after the callback route completes.
    pub home_url: String,
    /// Preferred loopback port for the callback listener.
    pub callback_port: u16,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_origin: DEFAULT_API_ORIGIN.to_string(),
            home_url: DEFAULT_HOME_URL.to_string(),
            callback_port: DEFAULT_CALLBACK_PORT,
        }
    }
}

impl ClientSettings {
    pub fn from_env() -> Self {
        Self {
            api_origin: normalize_origin(std::env::var(ENV_API_ORIGIN).ok()),
            home_url: normalize_url(std::env::var(ENV_HOME_URL).ok(), DEFAULT_HOME_URL),
            callback_port: parse_port_fail_open(std::env::var(ENV_CALLBACK_PORT).ok()),
        }
    }
}

static SETTINGS: OnceLock<ClientSettings> = OnceLock::new();

/// Resolve settings once per process. Every caller observes the same origin.
pub fn get() -> &'static ClientSettings {
    SETTINGS.get_or_init(ClientSettings::from_env)
}

fn normalize_origin(raw: Option<String>) -> String {
    normalize_url(raw, DEFAULT_API_ORIGIN)
}

fn normalize_url(raw: Option<String>, default: &str) -> String {
    let value = raw
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty());
    value.unwrap_or_else(|| default.to_string())
}

fn parse_port_fail_open(raw: Option<String>) -> u16 {
    let Some(raw) = raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) else {
        return DEFAULT_CALLBACK_PORT;
    };
    match raw.parse::<u16>() {
        Ok(port) => port,
        Err(err) => {
            tracing::warn!(
                default = DEFAULT_CALLBACK_PORT,
                "invalid {ENV_CALLBACK_PORT} value, using default: {err}"
            );
            DEFAULT_CALLBACK_PORT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_url_strips_trailing_slash() {
        assert_eq!(
            normalize_url(Some("https://api.scholarpath.io/".to_string()), DEFAULT_API_ORIGIN),
            "https://api.scholarpath.io"
        );
    }

    #[test]
    fn normalize_url_defaults_when_unset_or_blank() {
        assert_eq!(normalize_url(None, DEFAULT_API_ORIGIN), DEFAULT_API_ORIGIN);
        assert_eq!(
            normalize_url(Some("   ".to_string()), DEFAULT_API_ORIGIN),
            DEFAULT_API_ORIGIN
        );
    }

    #[test]
    fn parse_port_accepts_valid_values() {
        assert_eq!(parse_port_fail_open(Some("39000".to_string())), 39000);
    }

    #[test]
    fn parse_port_falls_back_on_garbage() {
        assert_eq!(parse_port_fail_open(Some("not-a-port".to_string())), DEFAULT_CALLBACK_PORT);
        assert_eq!(parse_port_fail_open(None), DEFAULT_CALLBACK_PORT);
    }
}
