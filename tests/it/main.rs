//! Tests for the crate.

use simple_test_case::test_case;

use debdeps::*;

mod cache;
mod error;
mod relationship;

#[test_case(r#""1:2.30-1""#, version!("1:2.30-1"); "version")]
#[test_case(r#""1.0~rc1""#, version!("1.0~rc1"); "version_tilde")]
#[test]
fn version_deserializes(input: &str, expected: Version) {
    let deserialized: Version = serde_json::from_str(input).expect("must deserialize");
    assert_eq!(expected, deserialized);
    assert_eq!(expected.as_str(), deserialized.as_str());
}

#[test_case(r#""<<""#, Operator::StrictlyEarlier; "strictly_earlier")]
#[test_case(r#""<=""#, Operator::EarlierOrEqual; "earlier_or_equal")]
#[test_case(r#""=""#, Operator::Equal; "equal")]
#[test_case(r#"">=""#, Operator::LaterOrEqual; "later_or_equal")]
#[test_case(r#"">>""#, Operator::StrictlyLater; "strictly_later")]
#[test_case(r#""<""#, Operator::LegacyEarlier; "legacy_earlier")]
#[test_case(r#"">""#, Operator::LegacyLater; "legacy_later")]
#[test]
fn operator_serializes(expected: &str, value: Operator) {
    assert_eq!(expected, serde_json::to_string(&value).expect("must serialize"));
}

#[test_case(r#""satisfied""#, Match::Satisfied; "satisfied")]
#[test_case(r#""violated""#, Match::Violated; "violated")]
#[test_case(r#""not_applicable""#, Match::NotApplicable; "not_applicable")]
#[test]
fn match_serializes(expected: &str, value: Match) {
    assert_eq!(expected, serde_json::to_string(&value).expect("must serialize"));
    assert_eq!(expected.trim_matches('"'), value.to_string());
}

#[test_case("python"; "simple")]
#[test_case("python (>= 2.6)"; "versioned")]
#[test_case("python2.6 | python2.7 (<< 2.7.3)"; "alternative")]
#[test]
fn relationship_roundtrip(input: &str) {
    let relationship = parse_alternatives(input).expect("must parse");
    let serialized = serde_json::to_string(&relationship).expect("must serialize");
    let deserialized: Relationship = serde_json::from_str(&serialized).expect("must deserialize");
    assert_eq!(relationship, deserialized);
}

#[test_case(""; "empty")]
#[test_case("python (>= 2.6), python (<< 3)"; "range")]
#[test_case("libc6 (>= 2.31), zlib1g | zlib1g-ng, debconf (>= 0.5) | debconf-2.0"; "mixed")]
#[test]
fn relationship_set_roundtrip(input: &str) {
    let depends = parse_depends(input).expect("must parse");
    let serialized = serde_json::to_string(&depends).expect("must serialize");
    let deserialized: RelationshipSet = serde_json::from_str(&serialized).expect("must deserialize");
    assert_eq!(depends, deserialized);
}
