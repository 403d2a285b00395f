//! Prerelease component handling for semantic versioning
//!
//! A prerelease label such as `beta.4` is treated as an ordered sequence of
//! dot-separated components, each either numeric or alphanumeric.
//! According to semver.org: https://semver.org/#spec-item-9

use crate::error::{Result, VersionBranchError};
use semver::Prerelease;
use std::cmp::Ordering;
use std::fmt;

/// One dot-separated prerelease component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrereleaseComponent {
    Numeric(u64),
    Alpha(String),
}

impl PrereleaseComponent {
    /// Classify a raw component; all-digit text without a leading zero that
    /// fits in a `u64` is numeric. Anything else is kept verbatim.
    pub fn parse(s: &str) -> Self {
        let digits = !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if digits && (s == "0" || !s.starts_with('0')) {
            if let Ok(n) = s.parse::<u64>() {
                return PrereleaseComponent::Numeric(n);
            }
        }
        PrereleaseComponent::Alpha(s.to_string())
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, PrereleaseComponent::Numeric(_))
    }
}

impl Ord for PrereleaseComponent {
    fn cmp(&self, other: &Self) -> Ordering {
        use PrereleaseComponent::*;
        match (self, other) {
            (Numeric(a), Numeric(b)) => a.cmp(b),
            (Numeric(_), Alpha(_)) => Ordering::Less,
            (Alpha(_), Numeric(_)) => Ordering::Greater,
            (Alpha(a), Alpha(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for PrereleaseComponent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PrereleaseComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrereleaseComponent::Numeric(n) => write!(f, "{}", n),
            PrereleaseComponent::Alpha(s) => f.write_str(s),
        }
    }
}

/// Split a semver prerelease label into its components
pub fn components(pre: &Prerelease) -> Vec<PrereleaseComponent> {
    if pre.is_empty() {
        return Vec::new();
    }
    pre.as_str().split('.').map(PrereleaseComponent::parse).collect()
}

/// Join components back into a validated semver prerelease label
pub fn to_prerelease(components: &[PrereleaseComponent]) -> Result<Prerelease> {
    let label = join(components);
    Prerelease::new(&label).map_err(|e| {
        VersionBranchError::invalid_input(format!("Invalid prerelease '{}': {}", label, e))
    })
}

fn join(components: &[PrereleaseComponent]) -> String {
    components
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// Advance a prerelease sequence.
///
/// Without an identifier the last numeric component is incremented, or `0`
/// is appended when there is none. With an identifier the sequence keeps
/// counting only if it already starts with that identifier followed by a
/// number; otherwise it restarts at `<identifier>.0`.
///
/// # Examples
/// ```
/// # use version_branch::domain::prerelease::{increment, PrereleaseComponent::*};
/// let next = increment(&[Alpha("beta".into()), Numeric(3)], None).unwrap();
/// assert_eq!(next, vec![Alpha("beta".into()), Numeric(4)]);
///
/// let restarted = increment(&[Alpha("alpha".into()), Numeric(7)], Some("beta")).unwrap();
/// assert_eq!(restarted, vec![Alpha("beta".into()), Numeric(0)]);
/// ```
pub fn increment(
    current: &[PrereleaseComponent],
    identifier: Option<&str>,
) -> Result<Vec<PrereleaseComponent>> {
    let mut next = current.to_vec();

    match next.iter().rposition(PrereleaseComponent::is_numeric) {
        Some(pos) => {
            if let PrereleaseComponent::Numeric(n) = next[pos] {
                let bumped = n.checked_add(1).ok_or_else(|| {
                    VersionBranchError::invalid_input(format!(
                        "Prerelease component {} cannot be incremented",
                        n
                    ))
                })?;
                next[pos] = PrereleaseComponent::Numeric(bumped);
            }
        }
        None => next.push(PrereleaseComponent::Numeric(0)),
    }

    let Some(identifier) = identifier else {
        return Ok(next);
    };

    let id_components: Vec<PrereleaseComponent> =
        identifier.split('.').map(PrereleaseComponent::parse).collect();
    let continues = next.starts_with(&id_components)
        && next
            .get(id_components.len())
            .is_some_and(PrereleaseComponent::is_numeric);

    if continues {
        Ok(next)
    } else {
        let mut restarted = id_components;
        restarted.push(PrereleaseComponent::Numeric(0));
        Ok(restarted)
    }
}

/// Split a component sequence into `(identifier, increment)`.
///
/// The last component is the increment and the leading components, joined
/// with `.`, form the identifier. An empty sequence yields two empty strings.
pub fn split_identifier(components: &[PrereleaseComponent]) -> (String, String) {
    match components.split_last() {
        Some((last, leading)) => (join(leading), last.to_string()),
        None => (String::new(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PrereleaseComponent::{Alpha, Numeric};

    fn alpha(s: &str) -> PrereleaseComponent {
        Alpha(s.to_string())
    }

    #[test]
    fn test_component_parse() {
        assert_eq!(PrereleaseComponent::parse("4"), Numeric(4));
        assert_eq!(PrereleaseComponent::parse("beta"), alpha("beta"));
        assert_eq!(PrereleaseComponent::parse("x-1"), alpha("x-1"));
        assert_eq!(PrereleaseComponent::parse(""), alpha(""));
    }

    #[test]
    fn test_component_parse_keeps_leading_zero() {
        assert_eq!(PrereleaseComponent::parse("0"), Numeric(0));
        assert_eq!(PrereleaseComponent::parse("01"), alpha("01"));
        assert_eq!(PrereleaseComponent::parse("007"), alpha("007"));
    }

    #[test]
    fn test_identifier_with_leading_zero_is_rejected() {
        let next = increment(&[alpha("rc"), Numeric(1)], Some("rc.01")).unwrap();
        assert_eq!(next, vec![alpha("rc"), alpha("01"), Numeric(0)]);
        assert!(to_prerelease(&next).is_err());
    }

    #[test]
    fn test_numeric_sorts_before_alpha() {
        assert!(Numeric(99) < alpha("a"));
        assert!(Numeric(2) < Numeric(11));
        assert!(alpha("alpha") < alpha("beta"));
    }

    #[test]
    fn test_components_of_empty_prerelease() {
        assert!(components(&Prerelease::EMPTY).is_empty());
    }

    #[test]
    fn test_components_roundtrip_label() {
        let pre = Prerelease::new("rc.1.x").unwrap();
        let parts = components(&pre);
        assert_eq!(parts, vec![alpha("rc"), Numeric(1), alpha("x")]);
        assert_eq!(to_prerelease(&parts).unwrap(), pre);
    }

    #[test]
    fn test_to_prerelease_rejects_bad_identifier() {
        assert!(to_prerelease(&[alpha("be ta"), Numeric(0)]).is_err());
        assert!(to_prerelease(&[alpha("beta!"), Numeric(0)]).is_err());
    }

    #[test]
    fn test_increment_empty_appends_zero() {
        assert_eq!(increment(&[], None).unwrap(), vec![Numeric(0)]);
    }

    #[test]
    fn test_increment_last_numeric() {
        let next = increment(&[alpha("beta"), Numeric(3)], None).unwrap();
        assert_eq!(next, vec![alpha("beta"), Numeric(4)]);
    }

    #[test]
    fn test_increment_numeric_before_trailing_alpha() {
        let next = increment(&[alpha("beta"), Numeric(3), alpha("x")], None).unwrap();
        assert_eq!(next, vec![alpha("beta"), Numeric(4), alpha("x")]);
    }

    #[test]
    fn test_increment_without_numeric_appends_zero() {
        let next = increment(&[alpha("alpha")], None).unwrap();
        assert_eq!(next, vec![alpha("alpha"), Numeric(0)]);
    }

    #[test]
    fn test_increment_same_identifier_continues() {
        let next = increment(&[alpha("beta"), Numeric(3)], Some("beta")).unwrap();
        assert_eq!(next, vec![alpha("beta"), Numeric(4)]);
    }

    #[test]
    fn test_increment_new_identifier_restarts() {
        let next = increment(&[alpha("alpha"), Numeric(3)], Some("beta")).unwrap();
        assert_eq!(next, vec![alpha("beta"), Numeric(0)]);

        let from_empty = increment(&[], Some("rc")).unwrap();
        assert_eq!(from_empty, vec![alpha("rc"), Numeric(0)]);
    }

    #[test]
    fn test_increment_identifier_without_number_restarts() {
        let next = increment(&[alpha("beta")], Some("beta")).unwrap();
        assert_eq!(next, vec![alpha("beta"), Numeric(0)]);
    }

    #[test]
    fn test_increment_dotted_identifier() {
        let next = increment(&[alpha("rc"), Numeric(1), Numeric(2)], Some("rc.1")).unwrap();
        assert_eq!(next, vec![alpha("rc"), Numeric(1), Numeric(3)]);
    }

    #[test]
    fn test_increment_overflow_is_rejected() {
        assert!(increment(&[Numeric(u64::MAX)], None).is_err());
    }

    #[test]
    fn test_increment_does_not_mutate_input() {
        let input = vec![alpha("beta"), Numeric(1)];
        let _ = increment(&input, None).unwrap();
        assert_eq!(input, vec![alpha("beta"), Numeric(1)]);
    }

    #[test]
    fn test_split_identifier() {
        assert_eq!(
            split_identifier(&[alpha("beta"), Numeric(4)]),
            ("beta".to_string(), "4".to_string())
        );
        assert_eq!(
            split_identifier(&[alpha("rc"), Numeric(1), Numeric(0)]),
            ("rc.1".to_string(), "0".to_string())
        );
        assert_eq!(
            split_identifier(&[Numeric(0)]),
            (String::new(), "0".to_string())
        );
        assert_eq!(split_identifier(&[]), (String::new(), String::new()));
    }
}
