//! Parsers for relationship declarations.
//!
//! ```text
//! relationship_set := alternative ( "," alternative )*
//! alternative      := atom ( "|" atom )*
//! atom             := name [ "(" operator version ")" ]
//! ```
//!
//! Declarations are decomposed top down: first on `,`, then on `|`,
//! then each atom into a name and an optional parenthesized constraint.
//! Whitespace around delimiters is insignificant, and empty tokens between
//! delimiters are skipped. All errors report the offending substring
//! and its location in the original declaration.

use nom::{
    IResult, Parser,
    bytes::complete::{is_not, take_while1},
    character::complete::multispace0,
    combinator::eof,
    sequence::{delimited, preceded},
};
use tracing::trace;

use crate::{
    Error, Operator, PackageName, Relationship, RelationshipError, RelationshipSet, Version, error,
};

/// Parse a comma separated relationship declaration, like the value of a `Depends` field.
///
/// A declaration that is empty or only whitespace parses to an empty set.
///
/// ```
/// # use debdeps::parse_depends;
/// let depends = parse_depends("python (>= 2.6), python (<< 3)").expect("must parse");
/// assert_eq!(depends.len(), 2);
/// assert_eq!(depends.to_string(), "python (>= 2.6), python (<< 3)");
/// ```
#[tracing::instrument]
pub fn parse_depends(declaration: &str) -> Result<RelationshipSet, Error> {
    let relationships = declaration
        .split(',')
        .filter(|expression| !expression.trim().is_empty())
        .map(|expression| alternatives(declaration, expression))
        .collect::<Result<Vec<_>, _>>()?;

    trace!(count = relationships.len(), "parsed relationship set");
    Ok(RelationshipSet::from(relationships))
}

/// Parse a relationship set from declarations that have already been split on `,`.
///
/// Each item is parsed with [`parse_alternatives`].
///
/// ```
/// # use debdeps::parse_depends_list;
/// let depends = parse_depends_list(["python (>= 2.6)", "libc6 | libc6-udeb"]).expect("must parse");
/// assert_eq!(depends.to_string(), "python (>= 2.6), libc6 | libc6-udeb");
/// ```
#[tracing::instrument(skip_all)]
pub fn parse_depends_list<I, S>(declarations: I) -> Result<RelationshipSet, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    declarations
        .into_iter()
        .map(|declaration| parse_alternatives(declaration.as_ref()))
        .collect()
}

/// Parse an expression made of one or more relationships separated by `|`.
///
/// An expression holding a single relationship is returned as that relationship,
/// not as a [`Relationship::Alternative`] of one.
///
/// ```
/// # use debdeps::{Relationship, parse_alternatives};
/// let single = parse_alternatives("python2.6").expect("must parse");
/// assert!(matches!(single, Relationship::Simple { .. }));
///
/// let choice = parse_alternatives("python2.6 | python2.7").expect("must parse");
/// assert!(matches!(choice, Relationship::Alternative(ref alternatives) if alternatives.len() == 2));
/// ```
#[tracing::instrument]
pub fn parse_alternatives(expression: &str) -> Result<Relationship, Error> {
    alternatives(expression, expression).map_err(Error::from)
}

/// Parse a single relationship: a package name with an optional `(operator version)` constraint.
///
/// ```
/// # use debdeps::{Operator, Relationship, parse_relationship};
/// let relationship = parse_relationship("python (<< 3)").expect("must parse");
/// assert!(matches!(
///     relationship,
///     Relationship::Versioned { operator: Operator::StrictlyEarlier, .. },
/// ));
/// ```
#[tracing::instrument]
pub fn parse_relationship(expression: &str) -> Result<Relationship, Error> {
    atom(expression, expression).map_err(Error::from)
}

/// Parse `expression`, a slice of `input`, as `|` separated alternatives.
fn alternatives(input: &str, expression: &str) -> Result<Relationship, RelationshipError> {
    let relationships = expression
        .split('|')
        .filter(|atom| !atom.trim().is_empty())
        .map(|expression| atom(input, expression))
        .collect::<Result<Vec<_>, _>>()?;

    Relationship::from_atoms(relationships)
        .ok_or_else(|| error::relationship!(Empty, input => expression))
}

/// Parse `expression`, a slice of `input`, as a single relationship.
fn atom(input: &str, expression: &str) -> Result<Relationship, RelationshipError> {
    let trimmed = expression.trim();
    if trimmed.is_empty() {
        return Err(error::relationship!(Empty, input => expression));
    }

    let opening = trimmed.matches('(').count();
    let closing = trimmed.matches(')').count();
    if opening != closing {
        return Err(error::relationship!(Unbalanced, input => trimmed, expression: trimmed));
    }
    if opening > 1 {
        return Err(error::relationship!(MultipleGroups, input => trimmed, expression: trimmed));
    }

    let (name, constraint) = match (trimmed.find('('), trimmed.find(')')) {
        (Some(open), Some(close)) if open < close => {
            let trailing = trimmed[close + 1..].trim();
            if !trailing.is_empty() {
                return Err(error::relationship!(
                    Trailing, input => trailing,
                    expression: trimmed,
                    trailing: trailing,
                ));
            }
            (trimmed[..open].trim(), Some(&trimmed[open + 1..close]))
        }
        (None, None) => (trimmed, None),
        _ => return Err(error::relationship!(Unbalanced, input => trimmed, expression: trimmed)),
    };

    let name = PackageName::parse_within(input, name)?;
    let Some(constraint) = constraint else {
        return Ok(Relationship::new_simple(name));
    };

    let Ok((rest, operator)) = operator_token(constraint) else {
        return Err(error::relationship!(
            Constraint, input => constraint,
            expression: trimmed,
            constraint: constraint,
        ));
    };
    let operator = Operator::parse(operator).map_err(|_| {
        error::relationship!(
            Operator, input => operator,
            expression: trimmed,
            operator: operator,
        )
    })?;

    let Ok((_, version)) = version_token(rest) else {
        return Err(error::relationship!(
            Constraint, input => constraint,
            expression: trimmed,
            constraint: constraint,
        ));
    };
    let version = Version::parse_components(version).map_err(|err| {
        error::relationship!(
            Version, input => version,
            expression: trimmed,
            error: err,
        )
    })?;

    Ok(Relationship::new_versioned(name, operator, version))
}

/// The maximal run of punctuation that can't appear in a version, after optional whitespace.
///
/// Unsupported operators like `!=` are consumed whole so that they're reported as operators.
fn operator_token(s: &str) -> IResult<&str, &str> {
    let operator = |c: char| c.is_ascii_punctuation() && !matches!(c, '.' | '+' | '~' | '-' | ':');
    preceded(multispace0, take_while1(operator)).parse(s)
}

/// A single version token, which must be the last thing in the constraint.
fn version_token(s: &str) -> IResult<&str, &str> {
    delimited(multispace0, is_not(" \t\r\n()<>="), (multispace0, eof)).parse(s)
}
