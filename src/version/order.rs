//! # Debian Segment Ordering
//!
//! Implements the comparison applied to the upstream version and to the Debian revision
//! of a [`Version`](crate::Version), as described in the `deb-version` manual page.
//!
//! ## Algorithm
//!
//! Both strings are consumed from the front in lockstep, alternating between two kinds of run:
//!
//! 1. The maximal run of non-digit characters (possibly empty).
//!    These runs are compared character by character using a modified ASCII order:
//!    - `~` sorts before anything, even the end of the run
//!    - the end of the run sorts before any other character
//!    - letters sort before non-letters
//! 2. The maximal run of digit characters (possibly empty, which counts as zero).
//!    These runs are compared by numeric value.
//!
//! The first difference found decides the comparison.
//! For example, the following are in sorted order: `~~`, `~~a`, `~`, the empty string, `a`.

use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};

/// Compare two upstream versions or two Debian revisions.
pub(crate) fn compare(lhs: &str, rhs: &str) -> Ordering {
    let (mut lhs, mut rhs) = (lhs, rhs);
    while !lhs.is_empty() || !rhs.is_empty() {
        let (lhs_lexical, lhs_rest) = lexical_run(lhs);
        let (rhs_lexical, rhs_rest) = lexical_run(rhs);
        match compare_lexical(lhs_lexical, rhs_lexical) {
            Ordering::Equal => {}
            ordering => return ordering,
        }

        let (lhs_numeric, lhs_rest) = numeric_run(lhs_rest);
        let (rhs_numeric, rhs_rest) = numeric_run(rhs_rest);
        match compare_numeric(lhs_numeric, rhs_numeric) {
            Ordering::Equal => {}
            ordering => return ordering,
        }

        lhs = lhs_rest;
        rhs = rhs_rest;
    }
    Ordering::Equal
}

/// Feed the canonical form of `segment` into `state`.
///
/// Two segments hash identically whenever [`compare`] reports them equal:
/// numeric runs are hashed without leading zeros,
/// and a segment made only of zeros hashes like the empty segment.
pub(crate) fn hash<H: Hasher>(segment: &str, state: &mut H) {
    let mut rest = segment;
    let mut runs = 0usize;
    while !rest.is_empty() {
        let (lexical, remainder) = lexical_run(rest);
        let (numeric, remainder) = numeric_run(remainder);
        let numeric = numeric.trim_start_matches('0');
        rest = remainder;

        // "0", "00" and "" all compare equal.
        if lexical.is_empty() && numeric.is_empty() && rest.is_empty() {
            break;
        }

        lexical.hash(state);
        numeric.hash(state);
        runs += 1;
    }
    state.write_usize(runs);
}

/// Split off the leading run of non-digit characters.
fn lexical_run(input: &str) -> (&str, &str) {
    let end = input.find(|c: char| c.is_ascii_digit()).unwrap_or(input.len());
    input.split_at(end)
}

/// Split off the leading run of digit characters.
fn numeric_run(input: &str) -> (&str, &str) {
    let end = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    input.split_at(end)
}

/// Sort weight of a character inside a non-digit run; `None` is the end of the run.
fn weight(c: Option<char>) -> i64 {
    match c {
        Some('~') => -1,
        None => 0,
        Some(c) if c.is_ascii_alphabetic() => i64::from(u32::from(c)),
        Some(c) => i64::from(u32::from(c)) + 256,
    }
}

fn compare_lexical(lhs: &str, rhs: &str) -> Ordering {
    let mut lhs = lhs.chars();
    let mut rhs = rhs.chars();
    loop {
        match (lhs.next(), rhs.next()) {
            (None, None) => return Ordering::Equal,
            (l, r) => match weight(l).cmp(&weight(r)) {
                Ordering::Equal => {}
                ordering => return ordering,
            },
        }
    }
}

/// Digit runs may be arbitrarily long, so they're compared as normalized text
/// instead of being converted to a fixed-width integer.
fn compare_numeric(lhs: &str, rhs: &str) -> Ordering {
    let lhs = lhs.trim_start_matches('0');
    let rhs = rhs.trim_start_matches('0');
    lhs.len().cmp(&rhs.len()).then_with(|| lhs.cmp(rhs))
}
