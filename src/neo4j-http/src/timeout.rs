//! Tri-state request timeout.
//!
//! "Not provided" must stay distinguishable from an explicit "no
//! timeout": a call passing [`Timeout::None`] disables the transport
//! default rather than falling back to it.

use std::time::Duration;

/// Timeout for one request, resolvable against a transport default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeout {
    /// Not specified; fall back to the transport-level value.
    #[default]
    Default,
    /// Explicitly no timeout, overriding any transport default.
    None,
    /// Wait at most this long for the full round trip.
    After(Duration),
}

impl Timeout {
    /// Resolve the effective timeout for one call. The per-call value
    /// wins whenever it is not [`Timeout::Default`]; a `Default` at
    /// both levels means no timeout.
    pub fn resolve(self, fallback: Timeout) -> Option<Duration> {
        match self {
            Timeout::After(duration) => Some(duration),
            Timeout::None => None,
            Timeout::Default => match fallback {
                Timeout::After(duration) => Some(duration),
                _ => None,
            },
        }
    }
}

impl From<Duration> for Timeout {
    fn from(duration: Duration) -> Self {
        Timeout::After(duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T1: Duration = Duration::from_secs(1);
    const T2: Duration = Duration::from_secs(2);

    #[test]
    fn test_call_value_wins() {
        assert_eq!(Timeout::After(T1).resolve(Timeout::After(T2)), Some(T1));
    }

    #[test]
    fn test_explicit_none_overrides_fallback() {
        assert_eq!(Timeout::None.resolve(Timeout::After(T2)), None);
    }

    #[test]
    fn test_default_falls_back() {
        assert_eq!(Timeout::Default.resolve(Timeout::After(T2)), Some(T2));
        assert_eq!(Timeout::Default.resolve(Timeout::None), None);
        assert_eq!(Timeout::Default.resolve(Timeout::Default), None);
    }
}
