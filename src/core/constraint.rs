//! Version constraints declared on dependencies.
//!
//! A constraint is a prefix operator followed by a dotted numeric version:
//! `>=10.0.0`, `<2`, `~1.2`, `^3.1.4`. Missing components default to zero.
//!
//! Constraints are recognized and kept on the dependency, but activation does
//! not use them to choose a version.

use std::fmt;
use std::str::FromStr;

use semver::Version;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Constraint operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintOp {
    /// `>=`
    GreaterEq,
    /// `<`
    Less,
    /// `~` - patch-level changes
    Tilde,
    /// `^` - changes that keep the left-most non-zero component
    Caret,
}

impl ConstraintOp {
    fn as_str(&self) -> &'static str {
        match self {
            ConstraintOp::GreaterEq => ">=",
            ConstraintOp::Less => "<",
            ConstraintOp::Tilde => "~",
            ConstraintOp::Caret => "^",
        }
    }
}

impl fmt::Display for ConstraintOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed version constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionConstraint {
    pub op: ConstraintOp,
    pub version: Version,
}

/// Error parsing a version constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    #[error("empty version constraint")]
    Empty,

    #[error("version constraint `{0}` must start with one of `>=`, `<`, `~`, `^`")]
    MissingOperator(String),

    #[error("invalid version `{version}` in constraint `{constraint}`")]
    InvalidVersion { constraint: String, version: String },
}

impl VersionConstraint {
    /// Check whether a version satisfies this constraint.
    pub fn matches(&self, v: &Version) -> bool {
        let floor = &self.version;
        match self.op {
            ConstraintOp::GreaterEq => v >= floor,
            ConstraintOp::Less => v < floor,
            ConstraintOp::Tilde => {
                // ~1.2.3 means >=1.2.3 <1.3.0
                let upper = floor
                    .minor
                    .checked_add(1)
                    .map(|minor| Version::new(floor.major, minor, 0));
                v >= floor && below(v, upper)
            }
            ConstraintOp::Caret => {
                // ^1.2.3 means >=1.2.3 <2.0.0
                // ^0.2.3 means >=0.2.3 <0.3.0
                // ^0.0.3 means >=0.0.3 <0.0.4
                let upper = if floor.major > 0 {
                    floor.major.checked_add(1).map(|major| Version::new(major, 0, 0))
                } else if floor.minor > 0 {
                    floor.minor.checked_add(1).map(|minor| Version::new(0, minor, 0))
                } else {
                    floor.patch.checked_add(1).map(|patch| Version::new(0, 0, patch))
                };
                v >= floor && below(v, upper)
            }
        }
    }
}

/// `None` is an upper bound past `u64::MAX`, which every version is below.
fn below(v: &Version, upper: Option<Version>) -> bool {
    upper.map_or(true, |upper| *v < upper)
}

impl FromStr for VersionConstraint {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ConstraintError::Empty);
        }

        // `>=` must be tried before any single-character operator
        let (op, rest) = if let Some(rest) = s.strip_prefix(">=") {
            (ConstraintOp::GreaterEq, rest)
        } else if let Some(rest) = s.strip_prefix('<') {
            (ConstraintOp::Less, rest)
        } else if let Some(rest) = s.strip_prefix('~') {
            (ConstraintOp::Tilde, rest)
        } else if let Some(rest) = s.strip_prefix('^') {
            (ConstraintOp::Caret, rest)
        } else {
            return Err(ConstraintError::MissingOperator(s.to_string()));
        };

        let rest = rest.trim();
        let version =
            parse_dotted_version(rest).ok_or_else(|| ConstraintError::InvalidVersion {
                constraint: s.to_string(),
                version: rest.to_string(),
            })?;

        Ok(VersionConstraint { op, version })
    }
}

impl TryFrom<String> for VersionConstraint {
    type Error = ConstraintError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<VersionConstraint> for String {
    fn from(c: VersionConstraint) -> Self {
        c.to_string()
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op, self.version)
    }
}

/// Parse a dotted numeric version with one to three components.
///
/// `10` -> 10.0.0, `1.2` -> 1.2.0. Pre-release and build suffixes are not
/// accepted.
pub fn parse_dotted_version(s: &str) -> Option<Version> {
    let parts: Vec<&str> = s.split('.').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }

    let mut nums = [0u64; 3];
    for (slot, part) in nums.iter_mut().zip(&parts) {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        *slot = part.parse().ok()?;
    }

    Some(Version::new(nums[0], nums[1], nums[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_operators() {
        let c: VersionConstraint = ">=10.0.0".parse().unwrap();
        assert_eq!(c.op, ConstraintOp::GreaterEq);
        assert_eq!(c.version, Version::new(10, 0, 0));

        let c: VersionConstraint = "<2".parse().unwrap();
        assert_eq!(c.op, ConstraintOp::Less);
        assert_eq!(c.version, Version::new(2, 0, 0));

        let c: VersionConstraint = "~1.2".parse().unwrap();
        assert_eq!(c.op, ConstraintOp::Tilde);
        assert_eq!(c.version, Version::new(1, 2, 0));

        let c: VersionConstraint = " ^3.1.4 ".parse().unwrap();
        assert_eq!(c.op, ConstraintOp::Caret);
        assert_eq!(c.version, Version::new(3, 1, 4));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<VersionConstraint>(), Err(ConstraintError::Empty));
        assert!(matches!(
            "10.0.0".parse::<VersionConstraint>(),
            Err(ConstraintError::MissingOperator(_))
        ));
        assert!(matches!(
            ">=1.x".parse::<VersionConstraint>(),
            Err(ConstraintError::InvalidVersion { .. })
        ));
        assert!(">=1.2.3.4".parse::<VersionConstraint>().is_err());
        assert!(">=1.0.0-rc1".parse::<VersionConstraint>().is_err());
        assert!("=1.0.0".parse::<VersionConstraint>().is_err());
    }

    #[test]
    fn test_display_normalizes() {
        let c: VersionConstraint = ">=10".parse().unwrap();
        assert_eq!(c.to_string(), ">=10.0.0");
    }

    #[test]
    fn test_matches() {
        let ge: VersionConstraint = ">=10.0.0".parse().unwrap();
        assert!(ge.matches(&Version::new(10, 1, 0)));
        assert!(!ge.matches(&Version::new(9, 9, 9)));

        let lt: VersionConstraint = "<2.0".parse().unwrap();
        assert!(lt.matches(&Version::new(1, 99, 0)));
        assert!(!lt.matches(&Version::new(2, 0, 0)));

        let tilde: VersionConstraint = "~1.2.3".parse().unwrap();
        assert!(tilde.matches(&Version::new(1, 2, 9)));
        assert!(!tilde.matches(&Version::new(1, 3, 0)));

        let caret: VersionConstraint = "^0.2.3".parse().unwrap();
        assert!(caret.matches(&Version::new(0, 2, 9)));
        assert!(!caret.matches(&Version::new(0, 3, 0)));
    }

    #[test]
    fn test_matches_at_component_limit() {
        let tilde: VersionConstraint = "~1.18446744073709551615".parse().unwrap();
        assert!(tilde.matches(&Version::new(1, u64::MAX, 7)));
        assert!(!tilde.matches(&Version::new(1, 0, 0)));

        let caret: VersionConstraint = "^18446744073709551615".parse().unwrap();
        assert!(caret.matches(&Version::new(u64::MAX, 3, 0)));

        let caret: VersionConstraint = "^0.0.18446744073709551615".parse().unwrap();
        assert!(caret.matches(&Version::new(0, 0, u64::MAX)));
        assert!(!caret.matches(&Version::new(0, 0, 1)));
    }

    #[test]
    fn test_deserialize_from_string() {
        let c: VersionConstraint = serde_json::from_str("\"^1.12\"").unwrap();
        assert_eq!(c.op, ConstraintOp::Caret);
        assert!(serde_json::from_str::<VersionConstraint>("\"1.12\"").is_err());
    }
}
