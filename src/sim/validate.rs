//! Placement rules and challenge matching

use serde::{Deserialize, Serialize};

use super::component::{ComponentKind, MarbleColor, Part};

/// Gear-family parts only go on gray space; everything else only on empty
/// part slots.
pub fn can_place(part: Part, target: ComponentKind) -> bool {
    if part.is_gear_family() {
        target == ComponentKind::GraySpace
    } else {
        target == ComponentKind::Empty
    }
}

/// `expected` appears in `log` as one contiguous run
pub fn is_challenge_satisfied(log: &[MarbleColor], expected: &[MarbleColor]) -> bool {
    if expected.is_empty() {
        return true;
    }
    log.windows(expected.len()).any(|w| w == expected)
}

/// How an output log is compared to a challenge's expected sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Expected sequence appears anywhere in the log
    #[default]
    Contains,
    /// Log starts with the expected sequence
    Prefix,
    /// Log is exactly the expected sequence
    Exact,
}

impl MatchMode {
    pub const ALL: [MatchMode; 3] = [MatchMode::Contains, MatchMode::Prefix, MatchMode::Exact];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Contains => "contains",
            MatchMode::Prefix => "prefix",
            MatchMode::Exact => "exact",
        }
    }

    pub fn from_tag(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.as_str() == s)
    }

    pub fn matches(&self, log: &[MarbleColor], expected: &[MarbleColor]) -> bool {
        match self {
            MatchMode::Contains => is_challenge_satisfied(log, expected),
            MatchMode::Prefix => log.starts_with(expected),
            MatchMode::Exact => log == expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use MarbleColor::{Blue, Red};

    #[test]
    fn test_gear_parts_need_gray_space() {
        for part in [Part::Gear, Part::GearBitLeft, Part::GearBitRight] {
            assert!(can_place(part, ComponentKind::GraySpace));
            assert!(!can_place(part, ComponentKind::Empty));
            assert!(!can_place(part, ComponentKind::Invalid));
        }
    }

    #[test]
    fn test_plain_parts_need_empty() {
        for part in [
            Part::RampLeft,
            Part::RampRight,
            Part::BitLeft,
            Part::BitRight,
            Part::Crossover,
            Part::Interceptor,
        ] {
            assert!(can_place(part, ComponentKind::Empty));
            assert!(!can_place(part, ComponentKind::GraySpace));
            assert!(!can_place(part, ComponentKind::Crossover));
        }
    }

    #[test]
    fn test_challenge_contains() {
        assert!(is_challenge_satisfied(&[Red, Blue, Blue], &[Blue, Blue]));
        assert!(!is_challenge_satisfied(&[Blue, Red, Blue], &[Blue, Blue]));
        assert!(!is_challenge_satisfied(&[Blue], &[Blue, Blue]));
        assert!(is_challenge_satisfied(&[], &[]));
        assert!(is_challenge_satisfied(&[Red], &[]));
    }

    #[test]
    fn test_match_modes() {
        let log = [Red, Blue, Blue];
        assert!(MatchMode::Contains.matches(&log, &[Blue, Blue]));
        assert!(!MatchMode::Prefix.matches(&log, &[Blue, Blue]));
        assert!(MatchMode::Prefix.matches(&log, &[Red, Blue]));
        assert!(!MatchMode::Exact.matches(&log, &[Red, Blue]));
        assert!(MatchMode::Exact.matches(&log, &[Red, Blue, Blue]));
        assert_eq!(MatchMode::default(), MatchMode::Contains);
    }

    #[test]
    fn test_match_mode_tags() {
        for mode in MatchMode::ALL {
            assert_eq!(MatchMode::from_tag(mode.as_str()), Some(mode));
        }
        assert_eq!(MatchMode::from_tag("exact"), Some(MatchMode::Exact));
        assert_eq!(MatchMode::from_tag("fuzzy"), None);
    }
}
