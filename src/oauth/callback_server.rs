//! Usage: One-shot localhost listener completing the redirect-based login.
//!
//! The state machine is a single pass with two terminal states: "stored and
//! redirected" or "error and redirected". There is no pending state and no
//! network call of its own.

use crate::infra::credentials::TokenStore;
use crate::shared::error::AppResult;
use crate::shared::security::mask_token;
use reqwest::Url;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use super::CALLBACK_PATH;

/// Error indicator appended to the home URL on any failed callback.
pub const OAUTH_FAILED: &str = "oauth_failed";

/// Query parameters carried by the callback redirect. Either may be absent;
/// both absent is itself a failure condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CallbackQuery {
    pub(crate) token: Option<String>,
    pub(crate) error: Option<String>,
}

/// Terminal state of one callback pass, carrying the navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// Token stored; the browser is sent to the home URL untouched.
    Authenticated { redirect: String },
    /// Nothing stored; the browser is sent home with `error=oauth_failed`.
    Failed { redirect: String },
}

impl CallbackOutcome {
    pub fn redirect(&self) -> &str {
        match self {
            Self::Authenticated { redirect } | Self::Failed { redirect } => redirect,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

#[derive(Debug)]
pub struct BoundCallbackListener {
    port: u16,
    listener_v4: Option<TcpListener>,
    listener_v6: Option<TcpListener>,
}

impl BoundCallbackListener {
    pub fn port(&self) -> u16 {
        self.port
    }
}

pub async fn bind_callback_listener(preferred_port: u16) -> AppResult<BoundCallbackListener> {
    match try_bind_on_port(preferred_port).await {
        Ok(bound) => Ok(bound),
        Err(preferred_err) if preferred_port == 0 => Err(format!(
            "SYSTEM_ERROR: callback bind failed: {preferred_err}"
        )
        .into()),
        Err(preferred_err) => match try_bind_on_port(0).await {
            Ok(bound) => Ok(bound),
            Err(fallback_err) => Err(format!(
                "SYSTEM_ERROR: callback bind failed: {preferred_err}; fallback_dynamic_port: {fallback_err}"
            )
            .into()),
        },
    }
}

async fn try_bind_on_port(port: u16) -> Result<BoundCallbackListener, String> {
    if port == 0 {
        return try_bind_dynamic_port().await;
    }

    let mut bind_errors: Vec<String> = Vec::new();
    let listener_v4 = match TcpListener::bind(("127.0.0.1", port)).await {
        Ok(listener) => Some(listener),
        Err(err) => {
            bind_errors.push(format!("127.0.0.1:{port} ({err})"));
            None
        }
    };
    let listener_v6 = match TcpListener::bind(("::1", port)).await {
        Ok(listener) => Some(listener),
        Err(err) => {
            bind_errors.push(format!("::1:{port} ({err})"));
            None
        }
    };
    if listener_v4.is_none() && listener_v6.is_none() {
        return Err(bind_errors.join("; "));
    }

    Ok(BoundCallbackListener {
        port,
        listener_v4,
        listener_v6,
    })
}

async fn try_bind_dynamic_port() -> Result<BoundCallbackListener, String> {
    let listener_v4 = TcpListener::bind(("127.0.0.1", 0))
        .await
        .map_err(|e| format!("127.0.0.1:0 ({e})"))?;
    let port = listener_v4
        .local_addr()
        .map_err(|e| format!("127.0.0.1:0 (local_addr failed: {e})"))?
        .port();
    // Same port on v6 is best-effort; browsers resolve 127.0.0.1 over v4.
    let listener_v6 = TcpListener::bind(("::1", port)).await.ok();

    Ok(BoundCallbackListener {
        port,
        listener_v4: Some(listener_v4),
        listener_v6,
    })
}

/// Accepts exactly one request on the callback route, applies the state
/// machine against the credential store, and answers with a redirect to the
/// home URL. Runs once per login attempt; re-binding starts a fresh pass.
pub async fn wait_for_callback(
    mut listener: BoundCallbackListener,
    store: &dyn TokenStore,
    home_url: &str,
    timeout: Duration,
) -> AppResult<CallbackOutcome> {
    let accept_future = async {
        match (listener.listener_v4.as_mut(), listener.listener_v6.as_mut()) {
            (Some(v4), Some(v6)) => {
                tokio::select! {
                    result = v4.accept() => result,
                    result = v6.accept() => result,
                }
            }
            (Some(v4), None) => v4.accept().await,
            (None, Some(v6)) => v6.accept().await,
            (None, None) => unreachable!("listeners checked at bind time"),
        }
    };

    let (mut socket, _) = tokio::time::timeout(timeout, accept_future)
        .await
        .map_err(|_| "SYSTEM_ERROR: login callback timed out".to_string())?
        .map_err(|e| format!("SYSTEM_ERROR: login callback accept failed: {e}"))?;

    let mut buffer = vec![0u8; 8192];
    let size = socket
        .read(&mut buffer)
        .await
        .map_err(|e| format!("SYSTEM_ERROR: login callback read failed: {e}"))?;
    if size == 0 {
        return Err("SYSTEM_ERROR: login callback request is empty"
            .to_string()
            .into());
    }

    let request = String::from_utf8_lossy(&buffer[..size]);
    let target = extract_request_target(request.as_ref())?;
    let query = parse_callback_target(target)?;
    let outcome = complete_login(store, &query, home_url);

    let response = format!(
        "HTTP/1.1 302 Found\r\nLocation: {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        outcome.redirect()
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;

    Ok(outcome)
}

fn extract_request_target(request: &str) -> AppResult<&str> {
    let first = request
        .lines()
        .next()
        .ok_or_else(|| "SYSTEM_ERROR: login callback malformed request".to_string())?;
    let mut parts = first.split_whitespace();
    let method = parts.next().unwrap_or_default();
    let target = parts.next().unwrap_or_default();
    if method != "GET" || target.is_empty() {
        return Err("SYSTEM_ERROR: login callback must be GET"
            .to_string()
            .into());
    }
    Ok(target)
}

pub(crate) fn parse_callback_target(target: &str) -> AppResult<CallbackQuery> {
    let url = Url::parse(&format!("http://127.0.0.1{target}"))
        .map_err(|e| format!("SYSTEM_ERROR: invalid login callback target: {e}"))?;

    if url.path() != CALLBACK_PATH {
        return Err("SYSTEM_ERROR: invalid login callback path"
            .to_string()
            .into());
    }

    let mut token: Option<String> = None;
    let mut error: Option<String> = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "token" => token = Some(value.to_string()),
            "error" => error = Some(value.to_string()),
            _ => {}
        }
    }

    Ok(CallbackQuery { token, error })
}

/// The single-pass state machine. `error` wins over `token`; neither present
/// is a failure. Only the success arm touches the store.
pub(crate) fn complete_login(
    store: &dyn TokenStore,
    query: &CallbackQuery,
    home_url: &str,
) -> CallbackOutcome {
    if let Some(error) = &query.error {
        tracing::warn!(error = %error, "login callback returned an error");
        return CallbackOutcome::Failed {
            redirect: home_with_error(home_url),
        };
    }

    if let Some(token) = &query.token {
        store.set_token(token);
        tracing::debug!(token = %mask_token(token), "login callback stored credential");
        return CallbackOutcome::Authenticated {
            redirect: home_url.to_string(),
        };
    }

    tracing::warn!("login callback carried neither token nor error");
    CallbackOutcome::Failed {
        redirect: home_with_error(home_url),
    }
}

fn home_with_error(home_url: &str) -> String {
    match Url::parse(home_url) {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair("error", OAUTH_FAILED);
            url.to_string()
        }
        Err(_) => format!("{home_url}?error={OAUTH_FAILED}"),
    }
}
