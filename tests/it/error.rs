use color_eyre::{Result, eyre::Context};
use miette::Diagnostic;
use pretty_assertions::assert_eq;

use debdeps::*;

#[test]
fn error_wrappable_context() -> Result<()> {
    const INPUT: &str = "python (>= 2.6), python (<< 3)";

    let parsed = parse_depends(INPUT).context("can wrap")?;
    assert_eq!(parsed.len(), 2);

    let parsed = Version::parse("1:2.30-1").context("can wrap")?;
    assert_eq!(parsed.epoch(), 1);

    let compared = compare_versions("1.0", "<<", "2.0").context("can wrap")?;
    assert!(compared);

    Ok(())
}

#[test]
fn error_wrappable_withcontext() -> Result<()> {
    const INPUT: &str = "python (>= 2.6) | python3";

    let parsed = parse_alternatives(INPUT).with_context(|| format!("parse '{INPUT}'"))?;
    assert_eq!(parsed.to_string(), INPUT);

    Ok(())
}

#[test]
fn error_reports_context() {
    let err = parse_depends("python (>= 2.6), python (!= 3)")
        .context("parse dependencies")
        .expect_err("must not parse");
    assert_eq!(err.to_string(), "parse dependencies");

    let source = err.root_cause().to_string();
    assert_eq!(source, "unrecognized operator '!=' in 'python (!= 3)'");
}

#[test]
fn diagnostic_labels_offending_text() {
    const INPUT: &str = "libc6, python (>= 2.6) (<< 3)";

    let err = parse_depends(INPUT).expect_err("must not parse");
    assert!(err.source_code().is_some(), "must have source code");

    let label = err
        .labels()
        .and_then(|mut labels| labels.next())
        .expect("must have a label");
    let labelled = &INPUT[label.offset()..label.offset() + label.len()];
    assert_eq!(labelled, "python (>= 2.6) (<< 3)");
}

#[test]
fn version_diagnostic_labels_epoch() {
    let err = Version::parse("a1:1.0").expect_err("must not parse");
    let label = err
        .labels()
        .and_then(|mut labels| labels.next())
        .expect("must have a label");
    assert_eq!(label.offset(), 0);
    assert_eq!(label.len(), 2);
    assert_eq!(label.label(), Some("epoch must be a non-negative integer"));
}

#[test]
fn unsupported_operator_message() {
    let err = compare_versions("1.0", "!=", "2.0").expect_err("must not compare");
    assert_eq!(err.to_string(), "unsupported version comparison operator '!='");
}
