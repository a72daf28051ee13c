use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Records all errors reported by this library.
#[derive(Error, Diagnostic, Clone, PartialEq, Eq, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A version string could not be parsed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    InvalidVersion(#[from] VersionError),

    /// A relationship declaration did not match the relationship grammar.
    #[error(transparent)]
    #[diagnostic(transparent)]
    InvalidRelationshipExpression(#[from] RelationshipError),

    /// An operator token outside of the supported set reached a comparison.
    #[error("unsupported version comparison operator '{operator}'")]
    UnsupportedOperator {
        /// The operator token that was provided.
        operator: String,
    },
}

/// Errors encountered when parsing a [`Version`](crate::Version) from a string.
#[derive(Error, Diagnostic, Clone, PartialEq, Eq, Debug)]
#[non_exhaustive]
pub enum VersionError {
    /// The provided version was empty.
    #[error("version string was empty")]
    Empty,

    /// The epoch (the part before the first `:`) is not a non-negative integer.
    #[error("invalid epoch '{epoch}' in version '{input}'")]
    Epoch {
        /// The version originally provided.
        #[source_code]
        input: String,

        /// The epoch text that failed to parse.
        epoch: String,

        /// The location of the epoch.
        #[label("epoch must be a non-negative integer")]
        span: SourceSpan,
    },

    /// Nothing remained for the upstream version after removing epoch and revision.
    #[error("missing upstream version in '{input}'")]
    Upstream {
        /// The version originally provided.
        #[source_code]
        input: String,

        /// The location where the upstream version was expected.
        #[label("upstream version expected here")]
        span: SourceSpan,
    },
}

/// Errors encountered when parsing a relationship declaration.
///
/// Every variant carries the full declaration as source code,
/// along with the span of the substring that failed to parse.
#[derive(Error, Diagnostic, Clone, PartialEq, Eq, Debug)]
#[non_exhaustive]
pub enum RelationshipError {
    /// A relationship was expected but only whitespace was found,
    /// usually because of a stray `,` or `|`.
    #[error("empty relationship in '{input}'")]
    Empty {
        /// The declaration originally provided.
        #[source_code]
        input: String,

        /// The location of the empty relationship.
        #[label("expected a relationship here")]
        span: SourceSpan,
    },

    /// The package name is empty, or contains whitespace or a relationship delimiter.
    #[error("invalid package name '{name}' in '{input}'")]
    Name {
        /// The declaration originally provided.
        #[source_code]
        input: String,

        /// The name that was rejected.
        name: String,

        /// The location of the name.
        #[label("package name")]
        span: SourceSpan,
    },

    /// Parentheses in the expression are not balanced.
    #[error("unbalanced parentheses in '{expression}'")]
    Unbalanced {
        /// The declaration originally provided.
        #[source_code]
        input: String,

        /// The relationship expression containing the parentheses.
        expression: String,

        /// The location of the expression.
        #[label("unbalanced")]
        span: SourceSpan,
    },

    /// The expression contains more than one parenthesized group.
    #[error("more than one parenthesized group in '{expression}'")]
    MultipleGroups {
        /// The declaration originally provided.
        #[source_code]
        input: String,

        /// The relationship expression containing the groups.
        expression: String,

        /// The location of the expression.
        #[label("only one version constraint is allowed")]
        span: SourceSpan,
    },

    /// Text follows the closing parenthesis of the version constraint.
    #[error("unexpected text '{trailing}' after version constraint in '{expression}'")]
    Trailing {
        /// The declaration originally provided.
        #[source_code]
        input: String,

        /// The relationship expression containing the text.
        expression: String,

        /// The unexpected text.
        trailing: String,

        /// The location of the unexpected text.
        #[label("expected ',' or '|' before this")]
        span: SourceSpan,
    },

    /// The version constraint uses an operator outside of `<<`, `<=`, `=`, `>=`, `>>`, `<`, `>`.
    #[error("unrecognized operator '{operator}' in '{expression}'")]
    Operator {
        /// The declaration originally provided.
        #[source_code]
        input: String,

        /// The relationship expression containing the operator.
        expression: String,

        /// The operator text that was rejected.
        operator: String,

        /// The location of the operator.
        #[label("unrecognized operator")]
        span: SourceSpan,
    },

    /// The parenthesized constraint is not an operator followed by a single version.
    #[error("malformed version constraint '{constraint}' in '{expression}'")]
    Constraint {
        /// The declaration originally provided.
        #[source_code]
        input: String,

        /// The relationship expression containing the constraint.
        expression: String,

        /// The text between the parentheses.
        constraint: String,

        /// The location of the constraint.
        #[label("expected an operator followed by a version")]
        span: SourceSpan,
    },

    /// The version inside the constraint failed to parse.
    #[error("invalid version in '{expression}': {error}")]
    Version {
        /// The declaration originally provided.
        #[source_code]
        input: String,

        /// The relationship expression containing the version.
        expression: String,

        /// The location of the version.
        #[label("invalid version")]
        span: SourceSpan,

        /// The error encountered while parsing the version.
        #[source]
        error: VersionError,
    },
}

/// Return the span of `substr` inside `text`.
///
/// `substr` is expected to be a slice of `text`; if it isn't, the first
/// textual occurrence is used instead, falling back to the whole of `text`.
pub(crate) fn span(text: &str, substr: &str) -> SourceSpan {
    let base = text.as_ptr() as usize;
    let start = substr.as_ptr() as usize;
    let offset = start
        .checked_sub(base)
        .filter(|offset| offset + substr.len() <= text.len())
        .or_else(|| text.find(substr));

    match offset {
        Some(offset) => (offset, substr.len()).into(),
        None => (0, text.len()).into(),
    }
}

/// Construct a [`RelationshipError`] that labels `$substr` inside `$input`.
///
/// Any additional fields of the variant are provided as `name: value` pairs,
/// each converted with `Into`.
macro_rules! relationship {
    ($variant:ident, $input:expr => $substr:expr $(, $field:ident: $value:expr)* $(,)?) => {
        $crate::error::RelationshipError::$variant {
            input: $input.to_string(),
            span: $crate::error::span($input, $substr),
            $($field: $value.into(),)*
        }
    };
}
pub(crate) use relationship;

/// Shorthand for conversion into [`Error`] and returning.
macro_rules! fatal {
    ($err:expr) => {
        return Err($crate::error::Error::from($err))
    };
}
pub(crate) use fatal;
