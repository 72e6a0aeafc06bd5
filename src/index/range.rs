//! Maven-style version range matching
//!
//! A range expression is either a plain version, matched exactly, or an
//! interval such as `[8,9)` or `(,11.0.4]` with inclusive brackets and
//! exclusive parentheses. An omitted endpoint leaves that side open.

use std::cmp::Ordering;

use crate::models::VersionData;
use crate::parser::{self, ParseError};

#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub version: VersionData,
    pub inclusive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VersionRangeFilter {
    /// Literal semver comparison; the expression is never re-parsed, so
    /// nightly semvers with date metadata match exactly.
    Exact(String),
    Range {
        lower: Option<Endpoint>,
        upper: Option<Endpoint>,
    },
}

impl VersionRangeFilter {
    pub fn parse(expression: &str) -> Result<VersionRangeFilter, ParseError> {
        let expression = expression.trim();
        if expression.is_empty() {
            return Err(ParseError::InvalidVersionRange(expression.to_string()));
        }

        let starts_interval = expression.starts_with('[') || expression.starts_with('(');
        if !starts_interval {
            return Ok(VersionRangeFilter::Exact(expression.to_string()));
        }

        let lower_inclusive = expression.starts_with('[');
        let upper_inclusive = expression.ends_with(']');
        if !upper_inclusive && !expression.ends_with(')') {
            return Err(ParseError::InvalidVersionRange(expression.to_string()));
        }

        let inner = &expression[1..expression.len() - 1];
        let mut bounds = inner.split(',');
        let (lower, upper) = match (bounds.next(), bounds.next(), bounds.next()) {
            (Some(lower), Some(upper), None) => (lower.trim(), upper.trim()),
            _ => return Err(ParseError::InvalidVersionRange(expression.to_string())),
        };

        let lower = parse_bound(lower, lower_inclusive, expression)?;
        let upper = parse_bound(upper, upper_inclusive, expression)?;
        if lower.is_none() && upper.is_none() {
            return Err(ParseError::InvalidVersionRange(expression.to_string()));
        }

        Ok(VersionRangeFilter::Range { lower, upper })
    }

    pub fn matches(&self, version: &VersionData) -> bool {
        match self {
            VersionRangeFilter::Exact(exact) => exact == &version.semver,
            VersionRangeFilter::Range { lower, upper } => {
                let above_lower = lower.as_ref().is_none_or(|bound| {
                    let order = version.compare(&bound.version);
                    order == Ordering::Greater || (bound.inclusive && order == Ordering::Equal)
                });
                let below_upper = upper.as_ref().is_none_or(|bound| {
                    let order = version.compare(&bound.version);
                    order == Ordering::Less || (bound.inclusive && order == Ordering::Equal)
                });
                above_lower && below_upper
            }
        }
    }
}

fn parse_bound(
    bound: &str,
    inclusive: bool,
    expression: &str,
) -> Result<Option<Endpoint>, ParseError> {
    if bound.is_empty() {
        return Ok(None);
    }
    Ok(Some(Endpoint {
        version: parse_endpoint_version(bound, expression)?,
        inclusive,
    }))
}

fn parse_endpoint_version(bound: &str, expression: &str) -> Result<VersionData, ParseError> {
    parser::parse(bound, None)
        .map_err(|_| ParseError::InvalidVersionRange(expression.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn version(major: u32, minor: u32, security: u32, build: u32) -> VersionData {
        let raw = format!("{major}.{minor}.{security}+{build}");
        VersionData::new(major, minor, security, None, None, build, None, raw)
    }

    #[rstest]
    #[case("[8,9)", 8, 0, 222, 10, true)]
    #[case("[8,9)", 9, 0, 0, 1, false)]
    #[case("(8,9]", 9, 0, 0, 0, true)]
    #[case("(8,9]", 8, 0, 0, 0, false)]
    #[case("[11.0.3,11.0.4]", 11, 0, 4, 0, true)]
    // build metadata orders too: 11.0.4+11 sits above the 11.0.4 endpoint
    #[case("[11.0.3,11.0.4]", 11, 0, 4, 11, false)]
    #[case("[11.0.3,11.0.4]", 11, 0, 5, 1, false)]
    #[case("(,11]", 8, 0, 222, 10, true)]
    #[case("(,11]", 12, 0, 0, 0, false)]
    #[case("[13,)", 13, 0, 1, 9, true)]
    #[case("[13,)", 12, 0, 2, 10, false)]
    fn interval_expressions_bound_versions(
        #[case] expression: &str,
        #[case] major: u32,
        #[case] minor: u32,
        #[case] security: u32,
        #[case] build: u32,
        #[case] expected: bool,
    ) {
        let filter = VersionRangeFilter::parse(expression).expect("range parses");
        assert_eq!(filter.matches(&version(major, minor, security, build)), expected);
    }

    #[test]
    fn plain_expression_matches_exactly() {
        let filter = VersionRangeFilter::parse("11.0.4+11").expect("version parses");

        assert!(filter.matches(&version(11, 0, 4, 11)));
        assert!(!filter.matches(&version(11, 0, 4, 12)));
        assert!(!filter.matches(&version(11, 0, 5, 11)));
    }

    #[test]
    fn plain_expression_matches_nightly_semver_literally() {
        // nightly date metadata survives only as the literal semver string
        let filter =
            VersionRangeFilter::parse("13.0.0+2019-10-30-23-10").expect("expression accepted");

        let nightly = VersionData::new(
            13,
            0,
            0,
            None,
            None,
            0,
            Some("2019-10-30-23-10".to_string()),
            "13u-2019-10-30-23-10".to_string(),
        );
        assert_eq!(nightly.semver, "13.0.0+2019-10-30-23-10");
        assert!(filter.matches(&nightly));
    }

    #[test]
    fn plain_expression_distinguishes_adopt_build_metadata() {
        let filter = VersionRangeFilter::parse("8.0.222+10").expect("expression accepted");

        let with_adopt = VersionData::new(
            8,
            0,
            222,
            None,
            Some(0),
            10,
            None,
            "jdk8u222-b10_openj9-0.15.1".to_string(),
        );
        assert_eq!(with_adopt.semver, "8.0.222+10.0");
        assert!(!filter.matches(&with_adopt));
        assert!(filter.matches(&version(8, 0, 222, 10)));
    }

    #[rstest]
    #[case("")]
    #[case("[,]")]
    #[case("[8,9")]
    #[case("[8;9]")]
    #[case("[8,9,10]")]
    #[case("[banana,9]")]
    fn malformed_expressions_are_rejected(#[case] expression: &str) {
        assert!(matches!(
            VersionRangeFilter::parse(expression),
            Err(ParseError::InvalidVersionRange(_))
        ));
    }
}
