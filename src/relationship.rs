//! # Package Relationships
//!
//! Debian packages declare relationships to other packages in control fields like `Depends`:
//!
//! ```text
//! Depends: python (>= 2.6), python (<< 3), libc6 | libc6-udeb
//! ```
//!
//! Such a declaration is a conjunction ([`RelationshipSet`]) of relationships,
//! each of which is either a bare package name, a package name with a version constraint,
//! or a disjunction of those.
//!
//! ## Evaluation
//!
//! Relationships are evaluated against a candidate package name and optional version,
//! producing a three-valued [`Match`]:
//! - [`Match::Satisfied`]: the candidate is relevant and satisfies the relationship.
//! - [`Match::Violated`]: the candidate is relevant and fails the relationship.
//! - [`Match::NotApplicable`]: the relationship says nothing about the candidate.
//!
//! ```
//! # use debdeps::{Evaluate, Match, parse_depends};
//! let depends = parse_depends("python (>= 2.6), python (<< 3)").expect("must parse");
//! assert_eq!(depends.matches("python", Some("2.7")).expect("must evaluate"), Match::Satisfied);
//! assert_eq!(depends.matches("python", Some("3.0")).expect("must evaluate"), Match::Violated);
//! assert_eq!(depends.matches("ruby", Some("1.0")).expect("must evaluate"), Match::NotApplicable);
//! ```

use std::{borrow::Cow, collections::BTreeSet, fmt, str::FromStr};

use derive_more::Deref;
use derive_new::new;
use documented::Documented;
use serde::{Deserialize, Serialize};
use serde_json::json;
use strum::Display;
use utoipa::{
    PartialSchema, ToSchema,
    openapi::{ObjectBuilder, Type},
};

use crate::{Error, Operator, Version, error};

mod name;
mod parse;
mod set;

pub use name::*;
pub use parse::*;
pub use set::*;

/// The result of evaluating a relationship against a candidate package.
#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Hash,
    Debug,
    Display,
    Serialize,
    Deserialize,
    Documented,
    ToSchema,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Match {
    /// The candidate is named by the relationship and satisfies it.
    Satisfied,

    /// The candidate is named by the relationship but does not satisfy it.
    Violated,

    /// The relationship does not name the candidate.
    NotApplicable,
}

impl Match {
    /// Combine results as a disjunction.
    ///
    /// The first [`Match::Satisfied`] wins, and no further results are consumed.
    /// Otherwise the result is [`Match::Violated`] if any result was,
    /// and [`Match::NotApplicable`] if every result was (or there were none).
    pub fn any(results: impl IntoIterator<Item = Match>) -> Match {
        let mut combined = Match::NotApplicable;
        for result in results {
            match result {
                Match::Satisfied => return Match::Satisfied,
                Match::Violated => combined = Match::Violated,
                Match::NotApplicable => {}
            }
        }
        combined
    }

    /// Combine results as a conjunction.
    ///
    /// The first [`Match::Violated`] wins, and no further results are consumed.
    /// Otherwise the result is [`Match::Satisfied`] if any result was,
    /// and [`Match::NotApplicable`] if every result was (or there were none).
    pub fn all(results: impl IntoIterator<Item = Match>) -> Match {
        let mut combined = Match::NotApplicable;
        for result in results {
            match result {
                Match::Violated => return Match::Violated,
                Match::Satisfied => combined = Match::Satisfied,
                Match::NotApplicable => {}
            }
        }
        combined
    }

    /// Whether the result is [`Match::Satisfied`].
    pub fn is_satisfied(&self) -> bool {
        matches!(self, Match::Satisfied)
    }

    /// Whether the result is [`Match::Violated`].
    pub fn is_violated(&self) -> bool {
        matches!(self, Match::Violated)
    }

    /// Whether the result is [`Match::NotApplicable`].
    pub fn is_not_applicable(&self) -> bool {
        matches!(self, Match::NotApplicable)
    }
}

impl From<bool> for Match {
    fn from(satisfied: bool) -> Self {
        if satisfied {
            Match::Satisfied
        } else {
            Match::Violated
        }
    }
}

impl From<Match> for Option<bool> {
    fn from(result: Match) -> Self {
        match result {
            Match::Satisfied => Some(true),
            Match::Violated => Some(false),
            Match::NotApplicable => None,
        }
    }
}

impl From<Option<bool>> for Match {
    fn from(result: Option<bool>) -> Self {
        result.map(Match::from).unwrap_or(Match::NotApplicable)
    }
}

/// Types that can be evaluated against a candidate package name and version.
pub trait Evaluate {
    /// Evaluate against a candidate whose version, if any, is already parsed.
    fn evaluate(&self, name: &str, version: Option<&Version>) -> Match;

    /// The package names referenced anywhere in the expression.
    fn names(&self) -> BTreeSet<&str>;

    /// Evaluate against a candidate whose version, if any, is still text.
    ///
    /// A version that is empty or only whitespace is treated the same as no version;
    /// any other version must parse.
    fn matches(&self, name: &str, version: Option<&str>) -> Result<Match, Error> {
        let version = match version.map(str::trim) {
            None | Some("") => None,
            Some(version) => Some(Version::parse(version)?),
        };
        Ok(self.evaluate(name, version.as_ref()))
    }
}

/// A single relationship: a package name with an optional version constraint,
/// or a set of alternatives.
///
/// Relationships are built by the parser (see [`parse_alternatives`]) or from validated parts,
/// and are immutable afterwards. They display in canonical form,
/// which parses back into an equal relationship.
///
/// ```
/// # use debdeps::{Relationship, parse_alternatives};
/// let relationship = parse_alternatives("python2.6|python2.7 (>=2.7.3)").expect("must parse");
/// assert_eq!(relationship.to_string(), "python2.6 | python2.7 (>= 2.7.3)");
/// assert!(matches!(relationship, Relationship::Alternative(_)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Documented, new)]
pub enum Relationship {
    /// Requires a package by name, with no constraint on its version.
    Simple {
        /// The name of the package.
        name: PackageName,
    },

    /// Requires a package by name, with a version satisfying a constraint.
    Versioned {
        /// The name of the package.
        name: PackageName,

        /// The operator used to compare the candidate version to `version`.
        operator: Operator,

        /// The reference version.
        version: Version,
    },

    /// Requires any one of several relationships.
    Alternative(Alternatives),
}

impl Relationship {
    /// Combine relationships into a disjunction, the way `|` does in a declaration.
    ///
    /// Nested alternatives are flattened into their parent,
    /// and a single relationship is returned as is rather than as an alternative of one.
    ///
    /// ```
    /// # use debdeps::{PackageName, Relationship};
    /// let name = |name: &str| PackageName::new(name).expect("must be valid");
    /// let relationship = Relationship::alternatives([
    ///     Relationship::new_simple(name("libc6")),
    ///     Relationship::new_simple(name("libc6-udeb")),
    /// ])
    /// .expect("must combine");
    /// assert_eq!(relationship.to_string(), "libc6 | libc6-udeb");
    ///
    /// Relationship::alternatives(Vec::new()).expect_err("must not be empty");
    /// ```
    pub fn alternatives(
        relationships: impl IntoIterator<Item = Relationship>,
    ) -> Result<Relationship, Error> {
        let mut flattened = Vec::new();
        for relationship in relationships {
            match relationship {
                Relationship::Alternative(Alternatives(nested)) => flattened.extend(nested),
                atom => flattened.push(atom),
            }
        }
        Relationship::from_atoms(flattened)
            .ok_or_else(|| Error::from(error::relationship!(Empty, "" => "")))
    }

    /// Wrap two or more atoms in an alternative and unwrap a single one.
    pub(crate) fn from_atoms(mut atoms: Vec<Relationship>) -> Option<Relationship> {
        match atoms.len() {
            0 => None,
            1 => atoms.pop(),
            _ => Some(Relationship::Alternative(Alternatives(atoms))),
        }
    }
}

/// The choices of a [`Relationship::Alternative`], in declaration order.
///
/// There are always at least two, and none of them is itself an alternative;
/// build them with [`Relationship::alternatives`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deref)]
#[deref(forward)]
pub struct Alternatives(Vec<Relationship>);

impl<'a> IntoIterator for &'a Alternatives {
    type Item = &'a Relationship;
    type IntoIter = std::slice::Iter<'a, Relationship>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Evaluate for Relationship {
    fn evaluate(&self, name: &str, version: Option<&Version>) -> Match {
        match self {
            Relationship::Simple { name: required } => {
                if required.as_str() == name {
                    Match::Satisfied
                } else {
                    Match::NotApplicable
                }
            }
            Relationship::Versioned {
                name: required,
                operator,
                version: reference,
            } => {
                if required.as_str() != name {
                    return Match::NotApplicable;
                }
                match version {
                    Some(candidate) => Match::from(candidate.satisfies(*operator, reference)),
                    None => Match::Violated,
                }
            }
            Relationship::Alternative(alternatives) => Match::any(
                alternatives
                    .iter()
                    .map(|alternative| alternative.evaluate(name, version)),
            ),
        }
    }

    fn names(&self) -> BTreeSet<&str> {
        match self {
            Relationship::Simple { name } | Relationship::Versioned { name, .. } => {
                BTreeSet::from([name.as_str()])
            }
            Relationship::Alternative(alternatives) => {
                alternatives.iter().flat_map(Evaluate::names).collect()
            }
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relationship::Simple { name } => write!(f, "{name}"),
            Relationship::Versioned {
                name,
                operator,
                version,
            } => write!(f, "{name} ({operator} {version})"),
            Relationship::Alternative(alternatives) => {
                for (i, alternative) in alternatives.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{alternative}")?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for Relationship {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_alternatives(s)
    }
}

impl Serialize for Relationship {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Relationship {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_alternatives(&s).map_err(serde::de::Error::custom)
    }
}

impl PartialSchema for Relationship {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        ObjectBuilder::new()
            .description(Some(Self::DOCS))
            .examples([
                json!("libc6"),
                json!("python (>= 2.6)"),
                json!("python2.6 | python2.7"),
            ])
            .min_length(Some(1))
            .schema_type(Type::String)
            .build()
            .into()
    }
}

impl ToSchema for Relationship {
    fn name() -> Cow<'static, str> {
        Cow::Borrowed("Relationship")
    }
}
