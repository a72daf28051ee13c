use std::{borrow::Cow, collections::BTreeSet, fmt, str::FromStr};

use derivative::Derivative;
use documented::Documented;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{
    PartialSchema, ToSchema,
    openapi::{ObjectBuilder, Type},
};

use crate::{
    Error, Evaluate, Match, MatchCache, MatchCacheView, Relationship, Version, parse_depends,
};

/// A conjunction of relationships, like the value of a `Depends` field.
///
/// Relationships keep the order (and duplicates) of the declaration they were parsed from.
/// The order is irrelevant to evaluation but preserved for display,
/// which renders the set in canonical form.
///
/// Each set owns a [`MatchCache`]: [`Evaluate::evaluate`] and [`Evaluate::matches`]
/// remember results per candidate, while [`RelationshipSet::evaluate_uncached`]
/// always recomputes them. The cache does not participate in equality or hashing.
///
/// ```
/// # use debdeps::{Evaluate, Match, parse_depends};
/// let depends = parse_depends("a | b, c (>= 1.0)").expect("must parse");
/// assert_eq!(depends.matches("b", None).expect("must evaluate"), Match::Satisfied);
/// assert_eq!(depends.matches("c", Some("0.9")).expect("must evaluate"), Match::Violated);
/// assert_eq!(depends.matches("d", None).expect("must evaluate"), Match::NotApplicable);
/// ```
#[derive(Clone, Default, Derivative, Documented)]
#[derivative(Debug, PartialEq, Eq, Hash)]
pub struct RelationshipSet {
    relationships: Vec<Relationship>,

    #[derivative(Debug = "ignore", PartialEq = "ignore", Hash = "ignore")]
    cache: MatchCache,
}

impl RelationshipSet {
    /// Parse a comma separated relationship declaration.
    ///
    /// Equivalent to [`parse_depends`].
    pub fn parse(declaration: impl AsRef<str>) -> Result<Self, Error> {
        parse_depends(declaration.as_ref())
    }

    /// Iterate over the relationships in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Relationship> {
        self.relationships.iter()
    }

    /// The number of relationships in the set.
    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    /// Whether the set has no relationships.
    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }

    /// Evaluate the set without consulting or updating its cache.
    pub fn evaluate_uncached(&self, name: &str, version: Option<&Version>) -> Match {
        Match::all(
            self.relationships
                .iter()
                .map(|relationship| relationship.evaluate(name, version)),
        )
    }

    /// Read only access to the cache holding results of previous evaluations.
    pub fn cache(&self) -> MatchCacheView<'_> {
        self.cache.view()
    }
}

impl Evaluate for RelationshipSet {
    fn evaluate(&self, name: &str, version: Option<&Version>) -> Match {
        self.cache
            .get_or_evaluate(name, version, || self.evaluate_uncached(name, version))
    }

    fn names(&self) -> BTreeSet<&str> {
        self.relationships.iter().flat_map(Evaluate::names).collect()
    }
}

impl From<Vec<Relationship>> for RelationshipSet {
    fn from(relationships: Vec<Relationship>) -> Self {
        Self {
            relationships,
            cache: MatchCache::default(),
        }
    }
}

impl FromIterator<Relationship> for RelationshipSet {
    fn from_iter<T: IntoIterator<Item = Relationship>>(iter: T) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a> IntoIterator for &'a RelationshipSet {
    type Item = &'a Relationship;
    type IntoIter = std::slice::Iter<'a, Relationship>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for RelationshipSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, relationship) in self.relationships.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{relationship}")?;
        }
        Ok(())
    }
}

impl FromStr for RelationshipSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_depends(s)
    }
}

impl Serialize for RelationshipSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RelationshipSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_depends(&s).map_err(serde::de::Error::custom)
    }
}

impl PartialSchema for RelationshipSet {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        ObjectBuilder::new()
            .description(Some(Self::DOCS))
            .examples([
                json!("python (>= 2.6), python (<< 3)"),
                json!("libc6 (>= 2.31), zlib1g | zlib1g-ng"),
            ])
            .schema_type(Type::String)
            .build()
            .into()
    }
}

impl ToSchema for RelationshipSet {
    fn name() -> Cow<'static, str> {
        Cow::Borrowed("RelationshipSet")
    }
}
