//! # Debian Version Numbers
//!
//! Parses and orders version numbers according to
//! [section 5.6.12 of the Debian Policy Manual](https://www.debian.org/doc/debian-policy/ch-controlfields.html#version).
//!
//! ## Version Format
//!
//! Debian versions follow the structure `[epoch:]upstream_version[-debian_revision]`:
//!
//! - **Epoch**: a non-negative integer before the first `:`, defaulting to `0`.
//!   Used to force a version to sort higher when the upstream numbering scheme changes.
//! - **Upstream version**: the main part of the version.
//! - **Debian revision**: the packaging-specific part after the last `-`, empty if absent.
//!
//! ## Ordering Rules
//!
//! 1. Epochs are compared numerically.
//! 2. Upstream versions are compared with the segment ordering in [`order`].
//! 3. Debian revisions are compared with the same segment ordering.

use std::{borrow::Cow, cmp::Ordering, hash::Hash, str::FromStr};

use compact_str::{CompactString, ToCompactString};
use derive_more::Display;
use documented::Documented;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::trace;
use utoipa::{
    PartialSchema, ToSchema,
    openapi::{ObjectBuilder, Type},
};

use crate::{Error, Operator, VersionError, error};

mod order;

/// A parsed Debian version number.
///
/// Versions are immutable once parsed. They order according to the Debian rules,
/// and equality follows that ordering: `1.0` equals `1.00` and `1.0-0` equals `1.0`,
/// even though their text differs. Hashing is consistent with this equality,
/// so versions can be used as map keys.
///
/// The original text is retained and used when displaying the version,
/// so displaying and re-parsing a version always yields the same components.
///
/// ```
/// # use debdeps::Version;
/// let version = Version::parse("1:2.30-1~bpo1").expect("must parse");
/// assert_eq!(version.epoch(), 1);
/// assert_eq!(version.upstream_version(), "2.30");
/// assert_eq!(version.debian_revision(), "1~bpo1");
/// assert_eq!(version.to_string(), "1:2.30-1~bpo1");
/// ```
#[derive(Clone, Debug, Display, Documented)]
#[display("{input}")]
pub struct Version {
    epoch: u64,
    upstream: CompactString,
    revision: CompactString,

    /// The original input, trimmed of surrounding whitespace.
    input: CompactString,
}

impl Version {
    /// Parse a Debian version number.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, Error> {
        Self::parse_components(input.as_ref()).map_err(Error::from)
    }

    /// The epoch of the version, `0` if the version doesn't specify one.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The upstream part of the version.
    pub fn upstream_version(&self) -> &str {
        &self.upstream
    }

    /// The Debian revision of the version; empty if the version doesn't specify one.
    pub fn debian_revision(&self) -> &str {
        &self.revision
    }

    /// View the version as the string it was parsed from.
    pub fn as_str(&self) -> &str {
        &self.input
    }

    /// Check whether this version satisfies `operator` against `other`,
    /// reading the comparison as `self <operator> other`.
    pub fn satisfies(&self, operator: Operator, other: &Version) -> bool {
        operator.satisfied_by(self.cmp(other))
    }

    pub(crate) fn parse_components(input: &str) -> Result<Self, VersionError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(VersionError::Empty);
        }

        let (epoch, remainder) = match input.split_once(':') {
            None => (0, input),
            Some((epoch, remainder)) => {
                let parsed = epoch
                    .bytes()
                    .all(|b| b.is_ascii_digit())
                    .then(|| epoch.parse::<u64>().ok())
                    .flatten();
                match parsed {
                    Some(parsed) => (parsed, remainder),
                    None => {
                        return Err(VersionError::Epoch {
                            input: input.to_string(),
                            epoch: epoch.to_string(),
                            span: error::span(input, epoch),
                        });
                    }
                }
            }
        };

        let (upstream, revision) = remainder.rsplit_once('-').unwrap_or((remainder, ""));
        if upstream.is_empty() {
            return Err(VersionError::Upstream {
                input: input.to_string(),
                span: error::span(input, upstream),
            });
        }

        Ok(Self {
            epoch,
            upstream: upstream.to_compact_string(),
            revision: revision.to_compact_string(),
            input: input.to_compact_string(),
        })
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let ordering = self
            .epoch
            .cmp(&other.epoch)
            .then_with(|| order::compare(&self.upstream, &other.upstream))
            .then_with(|| order::compare(&self.revision, &other.revision));
        trace!(lhs = %self, rhs = %other, ?ordering, "compared versions");
        ordering
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.epoch.hash(state);
        order::hash(&self.upstream, state);
        order::hash(&self.revision, state);
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Version {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for Version {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&String> for Version {
    type Error = Error;

    fn try_from(value: &String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl AsRef<str> for Version {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.as_str().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(s).map_err(serde::de::Error::custom)
    }
}

impl PartialSchema for Version {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        ObjectBuilder::new()
            .description(Some(Self::DOCS))
            .examples([json!("1.0"), json!("2.30-1"), json!("1:2.30-1~bpo1")])
            .min_length(Some(1))
            .schema_type(Type::String)
            .build()
            .into()
    }
}

impl ToSchema for Version {
    fn name() -> Cow<'static, str> {
        Cow::Borrowed("Version")
    }
}

/// Compare two version strings with an operator token,
/// reading the comparison as `version1 <operator> version2`.
///
/// ```
/// # use debdeps::compare_versions;
/// assert!(compare_versions("1.9", "<<", "1.10").expect("must compare"));
/// assert!(compare_versions("1:0.4", ">>", "2.0").expect("must compare"));
/// assert!(compare_versions("1.0", "<", "1.0").expect("legacy '<' means '<='"));
/// ```
pub fn compare_versions(
    version1: impl AsRef<str>,
    operator: impl AsRef<str>,
    version2: impl AsRef<str>,
) -> Result<bool, Error> {
    let operator = Operator::parse(operator)?;
    let version1 = Version::parse(version1)?;
    let version2 = Version::parse(version2)?;
    Ok(version1.satisfies(operator, &version2))
}

/// Create a [`Version`], panicking if the input is not a valid version.
///
/// This is meant for literals known to be valid, like in tests and examples.
///
/// ```
/// # use debdeps::Version;
/// let version = debdeps::version!("2:1.0-3");
/// assert_eq!(version.epoch(), 2);
/// ```
#[macro_export]
macro_rules! version {
    ($input:expr) => {
        $crate::Version::parse($input).expect("parse version")
    };
}
