//! Big blind denomination rounding.

use std::fmt;
use std::str::FromStr;

use buyin_common::{Result, TrackerError};
use rust_decimal::{Decimal, RoundingStrategy};

/// Candidate blind sizes used for small values.
///
/// Values up to and including one snap to the nearest candidate; larger
/// values round to a whole number. On an exact tie the earlier candidate in
/// the list wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenominationSet {
    candidates: Vec<Decimal>,
}

impl DenominationSet {
    /// Create a set from explicit candidates, keeping their order.
    pub fn new(candidates: Vec<Decimal>) -> Result<Self> {
        if candidates.is_empty() {
            return Err(TrackerError::Configuration(
                "denomination set cannot be empty".to_string(),
            ));
        }
        if let Some(bad) = candidates.iter().find(|c| **c <= Decimal::ZERO) {
            return Err(TrackerError::Configuration(format!(
                "denomination {} must be positive",
                bad
            )));
        }
        Ok(Self { candidates })
    }

    /// Candidates in scan order.
    pub fn candidates(&self) -> &[Decimal] {
        &self.candidates
    }

    /// Round `value` to an allowed blind size.
    pub fn round(&self, value: Decimal) -> Decimal {
        if value > Decimal::ONE {
            return value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        }

        let mut closest = self.candidates[0];
        let mut min_diff = (value - closest).abs();
        for &candidate in &self.candidates {
            let diff = (value - candidate).abs();
            if diff < min_diff {
                min_diff = diff;
                closest = candidate;
            }
        }
        closest
    }
}

impl Default for DenominationSet {
    fn default() -> Self {
        Self {
            candidates: vec![
                Decimal::new(1, 1),
                Decimal::new(25, 2),
                Decimal::new(5, 1),
                Decimal::ONE,
            ],
        }
    }
}

impl FromStr for DenominationSet {
    type Err = TrackerError;

    /// Parse a comma-separated list such as `0.1,0.25,0.5,1`.
    fn from_str(s: &str) -> Result<Self> {
        let candidates = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                Decimal::from_str(part).map_err(|e| {
                    TrackerError::Configuration(format!("invalid denomination {:?}: {}", part, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(candidates)
    }
}

impl fmt::Display for DenominationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.candidates.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

/// Round with the default candidates `{0.1, 0.25, 0.5, 1}`.
pub fn round_to_allowed_denomination(value: Decimal) -> Decimal {
    DenominationSet::default().round(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_small_values_snap_to_candidates() {
        assert_eq!(round_to_allowed_denomination(dec!(0.05)), dec!(0.1));
        assert_eq!(round_to_allowed_denomination(dec!(0.3)), dec!(0.25));
        assert_eq!(round_to_allowed_denomination(dec!(0.45)), dec!(0.5));
        assert_eq!(round_to_allowed_denomination(dec!(0.9)), dec!(1));
        assert_eq!(round_to_allowed_denomination(dec!(1)), dec!(1));
    }

    #[test]
    fn test_zero_snaps_to_smallest_candidate() {
        assert_eq!(round_to_allowed_denomination(Decimal::ZERO), dec!(0.1));
    }

    #[test]
    fn test_exact_ties_keep_earlier_candidate() {
        // 0.175 is equidistant from 0.1 and 0.25
        assert_eq!(round_to_allowed_denomination(dec!(0.175)), dec!(0.1));
        assert_eq!(round_to_allowed_denomination(dec!(0.375)), dec!(0.25));
        assert_eq!(round_to_allowed_denomination(dec!(0.75)), dec!(0.5));
    }

    #[test]
    fn test_large_values_round_half_up() {
        assert_eq!(round_to_allowed_denomination(dec!(1.5)), dec!(2));
        assert_eq!(round_to_allowed_denomination(dec!(1.4)), dec!(1));
        assert_eq!(round_to_allowed_denomination(dec!(2.5)), dec!(3));
        assert_eq!(round_to_allowed_denomination(dec!(12.49)), dec!(12));
    }

    #[test]
    fn test_parse_custom_set() {
        let set: DenominationSet = "0.05, 0.1,0.2".parse().unwrap();
        assert_eq!(set.candidates(), &[dec!(0.05), dec!(0.1), dec!(0.2)]);
        assert_eq!(set.round(dec!(0.06)), dec!(0.05));
        assert_eq!(set.round(dec!(0.9)), dec!(0.2));
        // values above one ignore the candidates
        assert_eq!(set.round(dec!(3.5)), dec!(4));
    }

    #[test]
    fn test_invalid_sets_rejected() {
        assert!("".parse::<DenominationSet>().is_err());
        assert!("0.1,abc".parse::<DenominationSet>().is_err());
        assert!("0.1,-1".parse::<DenominationSet>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        let set = DenominationSet::default();
        assert_eq!(set.to_string(), "0.1,0.25,0.5,1");
        assert_eq!(set.to_string().parse::<DenominationSet>().unwrap(), set);
    }
}
