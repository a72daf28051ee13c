use assert_matches::assert_matches;
use maplit::btreeset;
use proptest::prelude::*;
use simple_test_case::test_case;

use debdeps::*;

#[test_case("python", Some("2.5"), Match::Violated; "python_2.5")]
#[test_case("python", Some("2.6"), Match::Satisfied; "python_2.6")]
#[test_case("python", Some("2.7"), Match::Satisfied; "python_2.7")]
#[test_case("python", Some("3.0"), Match::Violated; "python_3.0")]
#[test_case("python", None, Match::Violated; "python_unversioned")]
#[test_case("ruby", Some("1.0"), Match::NotApplicable; "ruby_1.0")]
#[test]
fn python_range(name: &str, version: Option<&str>, expected: Match) {
    let depends = parse_depends("python (>= 2.6), python (<< 3)").expect("must parse");
    assert_eq!(depends.matches(name, version).expect("must evaluate"), expected);
}

#[test]
fn alternative_without_version() {
    let depends = parse_depends("a | b").expect("must parse");
    assert_eq!(depends.matches("b", None).expect("must evaluate"), Match::Satisfied);
}

#[test]
fn alternative_under_partial_failure() {
    let depends = parse_depends("a (>=1) | b (>=1)").expect("must parse");
    assert_eq!(depends.matches("a", Some("0.5")).expect("must evaluate"), Match::Violated);
    assert_eq!(depends.matches("a", Some("1.5")).expect("must evaluate"), Match::Satisfied);
    assert_eq!(depends.matches("c", Some("1.5")).expect("must evaluate"), Match::NotApplicable);
}

#[test]
fn legacy_operators_are_inclusive() {
    let depends = parse_depends("a (< 2.0), b (> 2.0)").expect("must parse");
    assert_eq!(depends.matches("a", Some("2.0")).expect("must evaluate"), Match::Satisfied);
    assert_eq!(depends.matches("b", Some("2.0")).expect("must evaluate"), Match::Satisfied);
    assert_eq!(depends.matches("a", Some("2.1")).expect("must evaluate"), Match::Violated);
    assert_eq!(depends.to_string(), "a (< 2.0), b (> 2.0)");
}

#[test]
fn results_as_options() {
    let depends = parse_depends("python (>= 2.6)").expect("must parse");
    let result = |name: &str, version: Option<&str>| -> Option<bool> {
        depends.matches(name, version).expect("must evaluate").into()
    };
    assert_eq!(result("python", Some("2.7")), Some(true));
    assert_eq!(result("python", Some("2.5")), Some(false));
    assert_eq!(result("perl", Some("5.0")), None);
}

#[test]
fn names_index_packages() {
    let depends = parse_depends(
        "libc6 (>= 2.31), zlib1g | zlib1g-ng, debconf (>= 0.5) | debconf-2.0, libc6",
    )
    .expect("must parse");
    assert_eq!(
        depends.names(),
        btreeset! {"debconf", "debconf-2.0", "libc6", "zlib1g", "zlib1g-ng"}
    );
}

#[test]
fn list_and_string_agree() {
    let joined = parse_depends("a (>= 1), b | c").expect("must parse");
    let listed = parse_depends_list(["a (>= 1)", "b | c"]).expect("must parse");
    assert_eq!(joined, listed);
}

#[test]
fn invalid_candidate_version() {
    let depends = parse_depends("a (>= 1)").expect("must parse");
    assert_matches!(
        depends.matches("a", Some("b:1.0")),
        Err(Error::InvalidVersion(VersionError::Epoch { .. }))
    );
}

#[test]
fn set_is_shareable_between_threads() {
    let depends = parse_depends("a (>= 1) | b, c (<< 2)").expect("must parse");
    std::thread::scope(|scope| {
        for version in ["0.5", "1.5", "2.5"] {
            let depends = &depends;
            scope.spawn(move || {
                let cached = depends.matches("a", Some(version)).expect("must evaluate");
                let uncached = depends.evaluate_uncached("a", Some(&version!(version)));
                assert_eq!(cached, uncached);
            });
        }
    });
    assert_eq!(depends.cache().len(), 3);
}

#[test]
fn names_must_survive_display() {
    for name in ["", "a, b", "a | b", "a (b)", "py thon"] {
        assert_matches!(
            PackageName::new(name),
            Err(Error::InvalidRelationshipExpression(RelationshipError::Name { .. })),
            "{name:?}"
        );
    }
}

#[test]
fn built_set_reparses() {
    let name = |name: &str| PackageName::new(name).expect("must be valid");
    let depends = RelationshipSet::from(vec![
        Relationship::new_simple(name("libc6")),
        Relationship::alternatives([
            Relationship::new_versioned(name("zlib1g"), Operator::LaterOrEqual, version!("1:1.2")),
            Relationship::new_simple(name("zlib1g-ng")),
        ])
        .expect("must combine"),
    ]);

    let reparsed = parse_depends(&depends.to_string()).expect("must reparse");
    assert_eq!(reparsed.len(), depends.len());
    assert_eq!(reparsed, depends);

    let serialized = serde_json::to_string(&depends).expect("must serialize");
    let deserialized: RelationshipSet = serde_json::from_str(&serialized).expect("must deserialize");
    assert_eq!(deserialized, depends);
}

#[test]
fn empty_alternatives_are_rejected() {
    assert_matches!(
        Relationship::alternatives(Vec::new()),
        Err(Error::InvalidRelationshipExpression(RelationshipError::Empty { .. }))
    );
}

/// Matches canonical relationships: a package name
/// with an optional version constraint using any of the supported operators.
const ATOM: &str = r"[a-z][a-z0-9.+-]{0,8}( \((<<|<=|=|>=|>>|<|>) [0-9][0-9a-z.+~]{0,5}\))?";

fn canonical_declaration() -> impl Strategy<Value = String> {
    let alternative = prop::collection::vec(ATOM, 1..4).prop_map(|atoms| atoms.join(" | "));
    prop::collection::vec(alternative, 0..5).prop_map(|alternatives| alternatives.join(", "))
}

proptest! {
    /// Parsing and displaying a canonical declaration must reproduce it exactly.
    #[test]
    fn canonical_roundtrip(input in canonical_declaration()) {
        let parsed = parse_depends(&input).expect("must parse declaration");
        prop_assert_eq!(parsed.to_string(), input);
    }
}

proptest! {
    /// Parsing must be idempotent through display.
    #[test]
    fn display_reparses(input in canonical_declaration()) {
        let parsed = parse_depends(&input).expect("must parse declaration");
        let reparsed = parse_depends(&parsed.to_string()).expect("must reparse declaration");
        prop_assert_eq!(parsed, reparsed);
    }
}
