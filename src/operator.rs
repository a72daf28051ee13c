use std::cmp::Ordering;

use documented::Documented;
use enum_assoc::Assoc;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use tracing::debug;
use utoipa::ToSchema;

use crate::{Error, error::fatal};

/// A version comparison operator in a relationship declaration.
///
/// Debian defines five operators: `<<`, `<=`, `=`, `>=` and `>>`.
/// The deprecated single character forms `<` and `>` are still accepted:
/// they mean `<=` and `>=` respectively (not the strict comparisons their shape suggests),
/// and are preserved as written so that declarations display the way they were parsed.
///
/// ```
/// # use debdeps::Operator;
/// # use std::cmp::Ordering;
/// let operator = Operator::parse("<").expect("must parse");
/// assert!(operator.is_legacy());
/// assert_eq!(operator.canonical(), Operator::EarlierOrEqual);
/// assert!(operator.satisfied_by(Ordering::Equal));
/// ```
#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Debug,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    Serialize,
    Deserialize,
    Documented,
    ToSchema,
    Assoc,
)]
#[func(const fn legacy(&self) -> bool)]
#[func(const fn canonical_form(&self) -> Operator)]
pub enum Operator {
    /// Strictly earlier than the reference version (`<<`).
    #[strum(serialize = "<<")]
    #[serde(rename = "<<")]
    #[assoc(legacy = false)]
    #[assoc(canonical_form = Operator::StrictlyEarlier)]
    StrictlyEarlier,

    /// Earlier than or equal to the reference version (`<=`).
    #[strum(serialize = "<=")]
    #[serde(rename = "<=")]
    #[assoc(legacy = false)]
    #[assoc(canonical_form = Operator::EarlierOrEqual)]
    EarlierOrEqual,

    /// Exactly equal to the reference version (`=`).
    #[strum(serialize = "=")]
    #[serde(rename = "=")]
    #[assoc(legacy = false)]
    #[assoc(canonical_form = Operator::Equal)]
    Equal,

    /// Later than or equal to the reference version (`>=`).
    #[strum(serialize = ">=")]
    #[serde(rename = ">=")]
    #[assoc(legacy = false)]
    #[assoc(canonical_form = Operator::LaterOrEqual)]
    LaterOrEqual,

    /// Strictly later than the reference version (`>>`).
    #[strum(serialize = ">>")]
    #[serde(rename = ">>")]
    #[assoc(legacy = false)]
    #[assoc(canonical_form = Operator::StrictlyLater)]
    StrictlyLater,

    /// Deprecated form of [`Operator::EarlierOrEqual`] (`<`).
    #[strum(serialize = "<")]
    #[serde(rename = "<")]
    #[assoc(legacy = true)]
    #[assoc(canonical_form = Operator::EarlierOrEqual)]
    LegacyEarlier,

    /// Deprecated form of [`Operator::LaterOrEqual`] (`>`).
    #[strum(serialize = ">")]
    #[serde(rename = ">")]
    #[assoc(legacy = true)]
    #[assoc(canonical_form = Operator::LaterOrEqual)]
    LegacyLater,
}

impl Operator {
    /// Parse an operator token, ignoring surrounding whitespace.
    pub fn parse(token: impl AsRef<str>) -> Result<Self, Error> {
        let token = token.as_ref().trim();
        match token.parse::<Self>() {
            Ok(operator) => {
                if operator.is_legacy() {
                    debug!(%operator, canonical = %operator.canonical(), "parsed deprecated operator");
                }
                Ok(operator)
            }
            Err(_) => fatal!(Error::UnsupportedOperator {
                operator: token.to_string(),
            }),
        }
    }

    /// Whether this is one of the deprecated single character operators.
    pub fn is_legacy(&self) -> bool {
        self.legacy()
    }

    /// The operator with the same meaning, spelled the way current Debian policy does.
    pub fn canonical(&self) -> Operator {
        self.canonical_form()
    }

    /// Report whether a comparison result satisfies this operator.
    ///
    /// `ordering` is the result of comparing the candidate version
    /// against the reference version, in that order.
    pub fn satisfied_by(&self, ordering: Ordering) -> bool {
        match self {
            Operator::StrictlyEarlier => ordering == Ordering::Less,
            Operator::EarlierOrEqual | Operator::LegacyEarlier => ordering != Ordering::Greater,
            Operator::Equal => ordering == Ordering::Equal,
            Operator::LaterOrEqual | Operator::LegacyLater => ordering != Ordering::Less,
            Operator::StrictlyLater => ordering == Ordering::Greater,
        }
    }
}
