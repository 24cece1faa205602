//! HTTP basic-auth credentials.
//!
//! Credentials arrive three ways: a `(user, password)` pair, a
//! `"user:password"` string, or userinfo embedded in the endpoint URL
//! (extracted and stripped by [`ClientBuilder`](crate::ClientBuilder)).

/// A username/password pair applied to every request as basic auth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Parse a `"user:password"` string, splitting on the first colon
    /// only so passwords containing colons survive.
    ///
    /// # Panics
    ///
    /// Panics if the string contains no colon. A malformed auth string
    /// is a caller bug, not a runtime condition.
    pub fn parse(auth: &str) -> Self {
        let Some((username, password)) = auth.split_once(':') else {
            panic!("auth string must have the form \"user:password\", got {auth:?}");
        };
        Self::new(username, password)
    }
}

impl From<(&str, &str)> for BasicAuth {
    fn from((username, password): (&str, &str)) -> Self {
        Self::new(username, password)
    }
}

impl From<(String, String)> for BasicAuth {
    fn from((username, password): (String, String)) -> Self {
        Self { username, password }
    }
}

impl From<&str> for BasicAuth {
    fn from(auth: &str) -> Self {
        Self::parse(auth)
    }
}
