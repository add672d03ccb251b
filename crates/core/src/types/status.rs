//! Status enums for back-office entities.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing a status from a string fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown status: {0}")]
pub struct ParseStatusError(String);

/// Product listing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Draft,
    Active,
    Archived,
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Active => write!(f, "active"),
            Self::Archived => write!(f, "archived"),
        }
    }
}

impl std::str::FromStr for ProductStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            other => Err(ParseStatusError(other.to_owned())),
        }
    }
}

/// Email verification status for users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmailVerificationStatus {
    #[default]
    Unverified,
    Pending,
    Verified,
}

impl From<bool> for EmailVerificationStatus {
    fn from(verified: bool) -> Self {
        if verified { Self::Verified } else { Self::Unverified }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_status_serde_rename() {
        let json = serde_json::to_string(&ProductStatus::Active).unwrap_or_default();
        assert_eq!(json, "\"active\"");
    }

    #[test]
    fn test_product_status_from_str() {
        assert_eq!("active".parse::<ProductStatus>(), Ok(ProductStatus::Active));
        assert!("live".parse::<ProductStatus>().is_err());
    }

    #[test]
    fn test_verification_from_bool() {
        assert_eq!(
            EmailVerificationStatus::from(true),
            EmailVerificationStatus::Verified
        );
        assert_eq!(
            EmailVerificationStatus::from(false),
            EmailVerificationStatus::Unverified
        );
    }
}
