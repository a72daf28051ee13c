//! # Memoization
//!
//! Evaluating relationships and comparing versions are pure computations,
//! so their results can be remembered and reused.
//!
//! Both caches in this module are plain values owned by their callers;
//! there is no process-wide cache. They are internally synchronized,
//! so a cache can be shared between threads by reference.
//!
//! - [`MatchCache`] remembers evaluation results for a single relationship expression.
//!   Each [`RelationshipSet`](crate::RelationshipSet) owns one.
//! - [`ComparisonCache`] remembers the ordering of pairs of version strings.

use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use compact_str::CompactString;
use tracing::trace;

use crate::{Error, Evaluate, Match, Operator, Version};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct MatchKey {
    name: CompactString,
    version: Option<Version>,
}

/// Remembers the result of evaluating one expression against candidate packages.
///
/// Results are keyed by candidate name and version. Versions that compare equal
/// (like `1.0` and `1.00`) share an entry, since evaluation only depends on ordering.
///
/// A cache must only ever be used with a single expression,
/// and that expression must not change while the cache is in use.
/// [`RelationshipSet`](crate::RelationshipSet) upholds this by owning its cache,
/// never exposing its relationships mutably, and only lending out a [`MatchCacheView`].
///
/// ```
/// # use debdeps::{Match, MatchCache, parse_alternatives, version};
/// let relationship = parse_alternatives("a | b (>= 1.0)").expect("must parse");
/// let cache = MatchCache::default();
///
/// let candidate = version!("1.2");
/// let result = cache.evaluate(&relationship, "b", Some(&candidate));
/// assert_eq!(result, Match::Satisfied);
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MatchCache {
    entries: RwLock<HashMap<MatchKey, Match>>,
}

impl MatchCache {
    /// Return the remembered result for the candidate,
    /// or run `evaluate` and remember its result.
    pub(crate) fn get_or_evaluate(
        &self,
        name: &str,
        version: Option<&Version>,
        evaluate: impl FnOnce() -> Match,
    ) -> Match {
        let key = MatchKey {
            name: CompactString::from(name),
            version: version.cloned(),
        };
        let shown = version.map(Version::as_str).unwrap_or_default();

        let cached = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .copied();
        if let Some(result) = cached {
            trace!(%name, version = %shown, %result, "match cache hit");
            return result;
        }

        let result = evaluate();
        trace!(%name, version = %shown, %result, "match cache miss");
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, result);
        result
    }

    /// Evaluate `target` against the candidate through the cache.
    ///
    /// Results are keyed by the candidate alone, so `target` must be the same expression
    /// on every call. Passing a different target returns results remembered for the previous one.
    pub fn evaluate<E>(&self, target: &E, name: &str, version: Option<&Version>) -> Match
    where
        E: Evaluate + ?Sized,
    {
        self.get_or_evaluate(name, version, || target.evaluate(name, version))
    }

    /// The number of remembered results.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no results are remembered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget all remembered results.
    pub fn clear(&mut self) {
        self.entries
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub(crate) fn view(&self) -> MatchCacheView<'_> {
        MatchCacheView { cache: self }
    }
}

/// Read only access to a [`MatchCache`] owned by a [`RelationshipSet`](crate::RelationshipSet).
///
/// Results only enter a set's cache by evaluating the set itself:
///
/// ```compile_fail
/// # use debdeps::{parse_depends, parse_relationship};
/// let depends = parse_depends("a (>= 2)").expect("must parse");
/// let other = parse_relationship("a (<< 2)").expect("must parse");
/// depends.cache().evaluate(&other, "a", None);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct MatchCacheView<'a> {
    cache: &'a MatchCache,
}

impl MatchCacheView<'_> {
    /// The number of remembered results.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether no results are remembered.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl Clone for MatchCache {
    fn clone(&self) -> Self {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        Self {
            entries: RwLock::new(entries),
        }
    }
}

/// Remembers the ordering of pairs of version strings.
///
/// Useful when the same raw versions are compared over and over,
/// for example while sorting the contents of a package archive.
/// Failed comparisons are not remembered.
///
/// ```
/// # use debdeps::ComparisonCache;
/// # use std::cmp::Ordering;
/// let cache = ComparisonCache::default();
/// assert_eq!(cache.compare("1:0.4", "2:0.3").expect("must compare"), Ordering::Less);
/// assert!(cache.compare_with("1.9", "<<", "1.10").expect("must compare"));
/// ```
#[derive(Debug, Default)]
pub struct ComparisonCache {
    entries: RwLock<HashMap<(CompactString, CompactString), Ordering>>,
}

impl ComparisonCache {
    /// Compare two version strings, parsing them only if the pair hasn't been compared before.
    pub fn compare(&self, version1: &str, version2: &str) -> Result<Ordering, Error> {
        let key = (CompactString::from(version1), CompactString::from(version2));
        let cached = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .copied();
        if let Some(ordering) = cached {
            trace!(%version1, %version2, ?ordering, "comparison cache hit");
            return Ok(ordering);
        }

        let ordering = Version::parse(version1)?.cmp(&Version::parse(version2)?);
        trace!(%version1, %version2, ?ordering, "comparison cache miss");

        let (lhs, rhs) = key;
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert((rhs.clone(), lhs.clone()), ordering.reverse());
        entries.insert((lhs, rhs), ordering);
        Ok(ordering)
    }

    /// Compare two version strings with an operator token,
    /// reading the comparison as `version1 <operator> version2`.
    pub fn compare_with(&self, version1: &str, operator: &str, version2: &str) -> Result<bool, Error> {
        let operator = Operator::parse(operator)?;
        let ordering = self.compare(version1, version2)?;
        Ok(operator.satisfied_by(ordering))
    }

    /// The number of remembered orderings.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no orderings are remembered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget all remembered orderings.
    pub fn clear(&mut self) {
        self.entries
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
