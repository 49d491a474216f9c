//! Usage: Account operations (register, login, current user, logout).

use super::types::{LoginSession, RegisterRequest, User};
use super::ApiClient;
use crate::shared::error::AppResult;

const REGISTER_FAILED: &str = "Registration failed";
const LOGIN_FAILED: &str = "Login failed";
const GET_USER_FAILED: &str = "Failed to get user";
const LOGOUT_FAILED: &str = "Logout failed";

impl ApiClient {
    pub async fn register(&self, request: &RegisterRequest) -> AppResult<User> {
        let body = serde_json::to_string(request)
            .map_err(|e| format!("SYSTEM_ERROR: failed to serialize register payload: {e}"))?;
        let builder = self
            .http
            .post(self.url("/api/v1/auth/register"))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);
        self.execute(builder, REGISTER_FAILED).await
    }

    /// The credential exchange is form-encoded: the backend expects
    /// `username` and `password` form fields, not JSON. The returned token is
    /// not stored here; storing it is the caller's separate step.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginSession> {
        let form = [("username", username), ("password", password)];
        let builder = self.http.post(self.url("/api/v1/auth/login")).form(&form);
        self.execute(builder, LOGIN_FAILED).await
    }

    pub async fn current_user(&self) -> AppResult<User> {
        let builder = self.authorized(self.http.get(self.url("/api/v1/auth/me")));
        self.execute(builder, GET_USER_FAILED).await
    }

    /// Server-side session invalidation. Callers clear the local credential
    /// unconditionally; awaiting this result is optional.
    pub async fn logout(&self) -> AppResult<()> {
        let builder = self.authorized(self.http.post(self.url("/api/v1/auth/logout")));
        self.execute_no_body(builder, LOGOUT_FAILED).await
    }
}
