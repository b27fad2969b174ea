//! Request environment reported by the host.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`RequestEnvironment`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid request environment: {0} (expected storefront, backend or isolated)")]
pub struct EnvironmentError(String);

/// The kind of request a decision is being made for.
///
/// Parent account data is only ever shown in genuine storefront sessions.
/// Admin (`Backend`) and API/test (`Isolated`) requests always see an
/// account's own data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestEnvironment {
    /// A customer-facing storefront request.
    #[default]
    Storefront,
    /// An admin/backend request.
    Backend,
    /// An isolated request, e.g. API calls or tests.
    Isolated,
}

impl RequestEnvironment {
    /// Whether this is an admin/backend request.
    #[must_use]
    pub const fn is_backend(self) -> bool {
        matches!(self, Self::Backend)
    }

    /// Whether this is an isolated request.
    #[must_use]
    pub const fn is_isolated(self) -> bool {
        matches!(self, Self::Isolated)
    }
}

impl fmt::Display for RequestEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storefront => write!(f, "storefront"),
            Self::Backend => write!(f, "backend"),
            Self::Isolated => write!(f, "isolated"),
        }
    }
}

impl std::str::FromStr for RequestEnvironment {
    type Err = EnvironmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "storefront" => Ok(Self::Storefront),
            "backend" => Ok(Self::Backend),
            "isolated" => Ok(Self::Isolated),
            _ => Err(EnvironmentError(s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_storefront() {
        assert_eq!(RequestEnvironment::default(), RequestEnvironment::Storefront);
    }

    #[test]
    fn test_flags() {
        assert!(RequestEnvironment::Backend.is_backend());
        assert!(!RequestEnvironment::Backend.is_isolated());
        assert!(RequestEnvironment::Isolated.is_isolated());
        assert!(!RequestEnvironment::Storefront.is_backend());
        assert!(!RequestEnvironment::Storefront.is_isolated());
    }

    #[test]
    fn test_parse_roundtrip() {
        for env in [
            RequestEnvironment::Storefront,
            RequestEnvironment::Backend,
            RequestEnvironment::Isolated,
        ] {
            assert_eq!(env.to_string().parse::<RequestEnvironment>().unwrap(), env);
        }
        assert_eq!(
            "Backend".parse::<RequestEnvironment>().unwrap(),
            RequestEnvironment::Backend
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert!("admin".parse::<RequestEnvironment>().is_err());
    }
}
