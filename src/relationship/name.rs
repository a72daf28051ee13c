use std::{borrow::Cow, str::FromStr};

use compact_str::CompactString;
use derive_more::Display;
use documented::Documented;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{
    PartialSchema, ToSchema,
    openapi::{ObjectBuilder, Type},
};

use crate::{Error, RelationshipError, error};

/// The name of a package referenced by a relationship.
///
/// Names are non-empty and contain neither whitespace
/// nor any of the relationship delimiters `,`, `|`, `(` and `)`,
/// so every name displays as text that parses back to the same name.
///
/// ```
/// # use debdeps::PackageName;
/// let name = PackageName::new("libc6").expect("must be valid");
/// assert_eq!(name.as_str(), "libc6");
///
/// PackageName::new("libc6, zlib1g").expect_err("must reject delimiters");
/// ```
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Display, Debug, Serialize, Documented)]
#[display("{}", self.0)]
pub struct PackageName(CompactString);

impl PackageName {
    /// Validate `name` as a package name.
    pub fn new(name: impl AsRef<str>) -> Result<Self, Error> {
        let name = name.as_ref();
        Self::parse_within(name, name).map_err(Error::from)
    }

    /// Validate `name`, a slice of the declaration `input`.
    pub(crate) fn parse_within(input: &str, name: &str) -> Result<Self, RelationshipError> {
        let invalid = |c: char| c.is_whitespace() || matches!(c, ',' | '|' | '(' | ')');
        if name.is_empty() || name.contains(invalid) {
            return Err(error::relationship!(Name, input => name, name: name));
        }
        Ok(Self(CompactString::from(name)))
    }

    /// View the name as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for PackageName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for PackageName {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for PackageName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

impl PartialSchema for PackageName {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        ObjectBuilder::new()
            .description(Some(Self::DOCS))
            .examples([json!("libc6"), json!("python2.7"), json!("libstdc++6")])
            .min_length(Some(1))
            .schema_type(Type::String)
            .build()
            .into()
    }
}

impl ToSchema for PackageName {
    fn name() -> Cow<'static, str> {
        Cow::Borrowed("PackageName")
    }
}
