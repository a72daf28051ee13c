use std::cmp::Ordering;

use itertools::Itertools;
use pretty_assertions::assert_eq;

use debdeps::*;

#[test]
fn comparison_cache_sorts_archive() {
    let cache = ComparisonCache::default();
    let versions = ["2:0.3", "1.0", "0.5", "1:0.4", "3.0", "0.1", "2.0"];
    let sorted = versions
        .into_iter()
        .sorted_by(|lhs, rhs| cache.compare(lhs, rhs).unwrap_or(Ordering::Equal))
        .collect_vec();
    assert_eq!(sorted, ["0.1", "0.5", "1.0", "2.0", "3.0", "1:0.4", "2:0.3"]);
    assert!(!cache.is_empty());
}

#[test]
fn comparison_cache_agrees_with_compare_versions() {
    let cache = ComparisonCache::default();
    let versions = ["1.0", "1.0-1", "1.0~rc1", "1:0.9", "1.00"];
    let operators = ["<<", "<=", "=", ">=", ">>", "<", ">"];

    for ((lhs, rhs), operator) in versions
        .iter()
        .cartesian_product(versions.iter())
        .cartesian_product(operators)
    {
        let expected = compare_versions(lhs, operator, rhs).expect("must compare");
        let cached = cache.compare_with(lhs, operator, rhs).expect("must compare");
        assert_eq!(cached, expected, "{lhs} {operator} {rhs}");
    }
}

#[test]
fn match_cache_is_per_set() {
    let first = parse_depends("a (>= 1)").expect("must parse");
    let second = first.clone();

    first.matches("a", Some("2")).expect("must evaluate");
    assert_eq!(first.cache().len(), 1);
    assert!(second.cache().is_empty());
}

#[test]
fn match_cache_wraps_any_expression() {
    let relationship = parse_relationship("a (= 1.0)").expect("must parse");
    let cache = MatchCache::default();
    let candidates = [Some(version!("1.0")), Some(version!("1.1")), None];

    for candidate in &candidates {
        let expected = relationship.evaluate("a", candidate.as_ref());
        assert_eq!(cache.evaluate(&relationship, "a", candidate.as_ref()), expected);
        assert_eq!(cache.evaluate(&relationship, "a", candidate.as_ref()), expected);
    }
    assert_eq!(cache.len(), candidates.len());
}

#[test]
fn set_cache_agrees_with_recomputation() {
    let depends = parse_depends("a (>= 2)").expect("must parse");
    let other = parse_relationship("a (<< 2)").expect("must parse");
    let candidate = version!("1.0");

    let standalone = MatchCache::default();
    assert_eq!(standalone.evaluate(&other, "a", Some(&candidate)), Match::Satisfied);

    let view = depends.cache();
    assert!(view.is_empty());
    assert_eq!(depends.evaluate("a", Some(&candidate)), Match::Violated);
    assert_eq!(
        depends.evaluate("a", Some(&candidate)),
        depends.evaluate_uncached("a", Some(&candidate))
    );
    assert_eq!(depends.cache().len(), 1);
}
