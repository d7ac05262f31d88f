//! Git error handling
//!
//! This module handles:
//! - Interpreting transport failures into user-friendly messages
//! - Classifying failures as authentication failures for the fallback chain
//! - Choosing the remedy shown to the user

/// Coarse category of a transport failure message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    RepositoryNotFound,
    AuthenticationFailed,
    PermissionDenied,
    NetworkError,
    Certificate,
    Other,
}

type ErrorCheck = fn(&str) -> bool;

const CLASSIFICATIONS: &[(ErrorCheck, FailureKind)] = &[
    (
        |msg| {
            msg.contains("not found")
                || msg.contains("404")
                || msg.contains("does not appear to be a git repository")
        },
        FailureKind::RepositoryNotFound,
    ),
    (
        |msg| {
            msg.contains("authentication")
                || msg.contains("credentials")
                || msg.contains("could not read username")
                || msg.contains("terminal prompts disabled")
                || msg.contains("invalid username or password")
                || msg.contains("401")
                || msg.contains("too many redirects")
        },
        FailureKind::AuthenticationFailed,
    ),
    (
        |msg| msg.contains("permission denied") || msg.contains("access denied") || msg.contains("403"),
        FailureKind::PermissionDenied,
    ),
    (
        |msg| {
            msg.contains("could not resolve host")
                || msg.contains("failed to resolve address")
                || msg.contains("connection")
                || msg.contains("network")
                || msg.contains("timed out")
        },
        FailureKind::NetworkError,
    ),
    (
        |msg| msg.contains("certificate") || msg.contains("ssl"),
        FailureKind::Certificate,
    ),
];

/// Classify a raw transport message
pub fn classify(message: &str) -> FailureKind {
    let message = message.to_lowercase();
    CLASSIFICATIONS
        .iter()
        .find(|(check, _)| check(&message))
        .map_or(FailureKind::Other, |(_, kind)| *kind)
}

/// Whether a failure should move the fallback chain to the next credential tier
///
/// "Repository not found" counts as an auth failure.
pub fn is_auth_failure(message: &str) -> bool {
    matches!(
        classify(message),
        FailureKind::RepositoryNotFound | FailureKind::AuthenticationFailed | FailureKind::PermissionDenied
    )
}

/// Interpret a transport message into a short user-facing cause
pub fn interpret(message: &str) -> String {
    match classify(message) {
        FailureKind::RepositoryNotFound => "Repository not found".to_string(),
        FailureKind::AuthenticationFailed => "Authentication failed".to_string(),
        FailureKind::PermissionDenied => "Permission denied".to_string(),
        FailureKind::NetworkError => format!("Network error: {message}"),
        FailureKind::Certificate => format!("Certificate error: {message}"),
        FailureKind::Other => message.to_string(),
    }
}

/// Best-known remedy for a failure message
pub fn remedy(message: &str) -> Option<String> {
    let text = match classify(message) {
        FailureKind::RepositoryNotFound | FailureKind::AuthenticationFailed | FailureKind::PermissionDenied => {
            "Check the repository URL, then sign in: configure an account in config.yaml \
             or set GITHUB_TOKEN, or make sure your SSH key is loaded"
        }
        FailureKind::NetworkError => "Check your network connection and retry",
        FailureKind::Certificate => "Check your system certificates or proxy settings",
        FailureKind::Other => return None,
    };
    Some(text.to_string())
}

/// Hint appended when HTTPS and SSH both failed with authentication errors
pub const SSO_HINT: &str = "If the repository belongs to an organization that enforces SAML single sign-on, \
     authorize your token and SSH key for that organization, then retry";
