//! String transforms applied to resolved field values.
//!
//! Transforms normalize a value after resolution and before validation:
//! a tenant id extracted from a header and one generated as a fallback
//! should look identical to everything downstream.

use std::fmt;
use std::str::FromStr;

/// An error parsing a transform expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid transform '{0}'")]
pub struct TransformParseError(pub String);

/// A normalization applied to a resolved value.
///
/// # Example
///
/// ```rust
/// use iris_core::TransformKind;
///
/// assert_eq!(TransformKind::Lowercase.apply("ACME-Corp"), "acme-corp");
/// assert_eq!(TransformKind::Trim.apply("  abc  "), "abc");
///
/// let truncate: TransformKind = "truncate:8".parse().unwrap();
/// assert_eq!(truncate.apply("0123456789abcdef"), "01234567");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    /// ASCII-insensitive lowercasing.
    Lowercase,
    /// ASCII-insensitive uppercasing.
    Uppercase,
    /// Strip leading and trailing whitespace.
    Trim,
    /// Keep at most the first `n` characters.
    Truncate(usize),
}

impl TransformKind {
    /// Applies the transform to a value.
    #[must_use]
    pub fn apply(self, value: &str) -> String {
        match self {
            Self::Lowercase => value.to_lowercase(),
            Self::Uppercase => value.to_uppercase(),
            Self::Trim => value.trim().to_string(),
            Self::Truncate(n) => value.chars().take(n).collect(),
        }
    }
}

impl FromStr for TransformKind {
    type Err = TransformParseError;

    fn from_str(expression: &str) -> Result<Self, Self::Err> {
        match expression {
            "lowercase" => Ok(Self::Lowercase),
            "uppercase" => Ok(Self::Uppercase),
            "trim" => Ok(Self::Trim),
            other => {
                if let Some(n) = other.strip_prefix("truncate:") {
                    let n = n
                        .parse()
                        .map_err(|_| TransformParseError(expression.to_string()))?;
                    return Ok(Self::Truncate(n));
                }
                Err(TransformParseError(expression.to_string()))
            }
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lowercase => f.write_str("lowercase"),
            Self::Uppercase => f.write_str("uppercase"),
            Self::Trim => f.write_str("trim"),
            Self::Truncate(n) => write!(f, "truncate:{n}"),
        }
    }
}
