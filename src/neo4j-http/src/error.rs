use serde_json::Value;

/// Failure reported by a [`Codec`](crate::codec::Codec) implementation.
pub type CodecError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Request-body encoding or response-body decoding failed.
    #[error("serialization failed: {0}")]
    Serialization(CodecError),

    /// Network or connection-level failure (connect, DNS, protocol).
    #[error("HTTP transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The resolved request timeout elapsed before the round trip
    /// completed. A transport-class failure, see [`Error::is_transport`].
    #[error("request timed out")]
    Timeout,

    /// Error reported by the server: either a non-2xx response (with
    /// `status` set) or an `"errors"` payload embedded in a successful
    /// response (`status` is `None`).
    #[error("client error: {}", format_detail(.status, .errors))]
    Client {
        status: Option<u16>,
        errors: Value,
    },

    /// Caller misuse detected before any network call was made.
    #[error("invalid usage: {0}")]
    Usage(String),

    /// Filesystem failure while loading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for connection-level failures, including timeouts.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Timeout)
    }

    /// Error detail reported by the server, if this is a client error.
    pub fn errors(&self) -> Option<&Value> {
        match self {
            Error::Client { errors, .. } => Some(errors),
            _ => None,
        }
    }
}

fn format_detail(status: &Option<u16>, errors: &Value) -> String {
    match status {
        Some(status) => format!("status {status} - {errors}"),
        None => errors.to_string(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn timeout_is_transport_class() {
        assert!(Error::Timeout.is_transport());
        assert!(!Error::Usage("nope".into()).is_transport());
    }

    #[test]
    fn client_error_exposes_detail() {
        let err = Error::Client {
            status: Some(404),
            errors: json!({"message": "not found"}),
        };
        assert_eq!(err.errors(), Some(&json!({"message": "not found"})));
        assert!(err.to_string().contains("status 404"));
    }

    #[test]
    fn embedded_error_display_omits_status() {
        let err = Error::Client {
            status: None,
            errors: json!(["Neo.ClientError.Statement.SyntaxError"]),
        };
        assert!(!err.to_string().contains("status"));
    }
}
