//! Usage: Unified error model (maps failures to `CODE: message` values).

pub type AppResult<T> = Result<T, AppError>;

/// Error codes in use:
/// - `SYSTEM_ERROR` — transport and local I/O failures.
/// - `API_ERROR` — the backend answered outside the success range.
/// - `API_DECODE` — a success body did not match the declared shape.
/// - `SEC_INVALID_INPUT` — a locally rejected input.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{code}: {message}")]
pub struct AppError {
    code: String,
    message: String,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Protocol failure: the backend's `detail` text or an operation-specific
    /// fallback message.
    pub fn api(message: impl Into<String>) -> Self {
        Self::new("API_ERROR", message)
    }

    /// A success response whose body failed shape validation.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new("API_DECODE", message)
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn split_code_message(raw: &str) -> Option<(&str, &str)> {
    let msg = raw.trim();
    if msg.is_empty() {
        return None;
    }

    let (maybe_code, rest) = msg.split_once(':')?;
    let code = maybe_code.trim();
    let mut chars = code.chars();
    let first = chars.next()?;
    if !first.is_ascii_uppercase() {
        return None;
    }
    if !chars.all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit() || ch == '_') {
        return None;
    }
    Some((code, rest.trim()))
}

impl From<String> for AppError {
    fn from(value: String) -> Self {
        if let Some((code, rest)) = split_code_message(&value) {
            let message = if rest.is_empty() { value.trim() } else { rest };
            return AppError::new(code.to_string(), message.to_string());
        }
        AppError::new("INTERNAL_ERROR", value)
    }
}

impl From<&'static str> for AppError {
    fn from(value: &'static str) -> Self {
        AppError::from(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_splits_code_prefix() {
        let err = AppError::from("SYSTEM_ERROR: request failed".to_string());
        assert_eq!(err.code(), "SYSTEM_ERROR");
        assert_eq!(err.message(), "request failed");
        assert_eq!(err.to_string(), "SYSTEM_ERROR: request failed");
    }

    #[test]
    fn from_string_without_code_is_internal() {
        let err = AppError::from("something broke".to_string());
        assert_eq!(err.code(), "INTERNAL_ERROR");
        assert_eq!(err.message(), "something broke");
    }

    #[test]
    fn lowercase_prefix_is_not_a_code() {
        let err = AppError::from("detail: nope".to_string());
        assert_eq!(err.code(), "INTERNAL_ERROR");
        assert_eq!(err.message(), "detail: nope");
    }

    #[test]
    fn api_constructor_keeps_message_verbatim() {
        let err = AppError::api("Login failed");
        assert_eq!(err.code(), "API_ERROR");
        assert_eq!(err.message(), "Login failed");
    }
}
