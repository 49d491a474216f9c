//! Usage: External redirect-based login flow (authorize URL + one-shot loopback callback).

pub mod callback_server;

use crate::infra::settings::ClientSettings;
use crate::shared::error::AppResult;

/// Route the backend redirects to once the external provider finishes.
pub const CALLBACK_PATH: &str = "/auth/callback";

/// Builds the URL the user opens to start the external login. The backend
/// drives the provider handshake and redirects to `redirect_uri` with either
/// a `token` or an `error` query parameter.
pub fn authorize_url(settings: &ClientSettings, callback_port: u16) -> AppResult<String> {
    let mut url = reqwest::Url::parse(&settings.api_origin)
        .map_err(|e| format!("SEC_INVALID_INPUT: invalid api origin: {e}"))?;
    url.set_path("/api/v1/auth/google/login");

    let redirect_uri = format!("http://127.0.0.1:{callback_port}{CALLBACK_PATH}");
    url.query_pairs_mut().append_pair("redirect_uri", &redirect_uri);
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorize_url_carries_loopback_redirect() {
        let settings = ClientSettings::default();
        let url = authorize_url(&settings, 38123).expect("authorize url");
        assert!(url.starts_with("http://127.0.0.1:8000/api/v1/auth/google/login?"));
        assert!(url.contains("redirect_uri=http%3A%2F%2F127.0.0.1%3A38123%2Fauth%2Fcallback"));
    }

    #[test]
    fn authorize_url_rejects_garbage_origin() {
        let settings = ClientSettings {
            api_origin: "not an origin".to_string(),
            ..ClientSettings::default()
        };
        let err = authorize_url(&settings, 38123).expect_err("should fail");
        assert_eq!(err.code(), "SEC_INVALID_INPUT");
    }
}
