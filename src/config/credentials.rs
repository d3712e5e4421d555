//! Access token handling.
//!
//! The bearer token handed out by the session endpoint is wrapped so it
//! never ends up in logs or debug output.

/// Header name and value for authentication.
pub type AuthHeader = (String, String);

/// Wrapper for sensitive strings that prevents accidental logging.
///
/// The inner value is never exposed via Debug or Display traits.
/// Use `expose()` to access the actual value when needed for API calls.
#[derive(Clone, PartialEq, Eq)]
pub struct SecureString(String);

impl SecureString {
    /// Create a new secure string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Expose the inner value.
    ///
    /// Use sparingly and only when actually sending to APIs.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecureString(••••••••)")
    }
}

impl std::fmt::Display for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "••••••••")
    }
}

/// Build the `Authorization` header for an access token.
///
/// Returns `None` when no token is held or the token is empty, so the
/// request goes out anonymously and the server decides.
pub fn bearer_header(token: Option<&SecureString>) -> Option<AuthHeader> {
    match token {
        Some(token) if !token.is_empty() => Some((
            "Authorization".to_string(),
            format!("Bearer {}", token.expose()),
        )),
        _ => None,
    }
}
