//! Fixed-point math utilities for deterministic simulation.
//!
//! All economy and combat quantities use fixed-point arithmetic so that
//! repeated spending never accumulates rounding drift and snapshots
//! restore bit-identical state on any platform.

use fixed::types::I32F32;

/// Fixed-point number type for all simulation math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
/// Range: approximately -2,147,483,648 to 2,147,483,647
/// Precision: approximately 0.00000000023
pub type Fixed = I32F32;

/// Serde support for fixed-point numbers.
///
/// Serializes fixed-point numbers as their raw bit representation (i64)
/// to preserve exact precision across serialization boundaries.
pub mod fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as its raw bit representation.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_bits().serialize(serializer)
    }

    /// Deserialize a fixed-point number from its raw bit representation.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = i64::deserialize(deserializer)?;
        Ok(Fixed::from_bits(bits))
    }
}

/// Convert an integer percentage into a fraction (`25` -> `0.25`).
#[must_use]
pub fn percent(value: i32) -> Fixed {
    Fixed::from_num(value) / Fixed::from_num(100)
}

/// Raise `base` to a non-negative integer power by repeated multiplication.
///
/// Saturates instead of overflowing, so absurd upgrade levels clamp at
/// [`Fixed::MAX`] rather than wrapping.
#[must_use]
pub fn pow_fixed(base: Fixed, exponent: u32) -> Fixed {
    let mut result = Fixed::ONE;
    for _ in 0..exponent {
        result = result.saturating_mul(base);
    }
    result
}

/// Growth factor applied to upgrade costs per level (1.5).
#[must_use]
pub fn upgrade_cost_growth() -> Fixed {
    Fixed::from_num(3) / Fixed::from_num(2)
}

/// Growth factor applied to building output per level (1.1).
#[must_use]
pub fn production_growth() -> Fixed {
    Fixed::from_num(11) / Fixed::from_num(10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent() {
        assert_eq!(percent(25), Fixed::from_num(0.25));
        assert_eq!(percent(100), Fixed::ONE);
        assert_eq!(percent(0), Fixed::ZERO);
    }

    #[test]
    fn test_pow_fixed_exact_for_halves() {
        let growth = upgrade_cost_growth();
        assert_eq!(pow_fixed(growth, 0), Fixed::ONE);
        assert_eq!(pow_fixed(growth, 1), Fixed::from_num(1.5));
        assert_eq!(pow_fixed(growth, 2), Fixed::from_num(2.25));
        assert_eq!(pow_fixed(growth, 3), Fixed::from_num(3.375));
    }

    #[test]
    fn test_pow_fixed_production_growth_close_to_float() {
        let value = pow_fixed(production_growth(), 5);
        let expected = Fixed::from_num(1.1_f64.powi(5));
        let diff = (value - expected).abs();
        assert!(diff < Fixed::from_num(0.000_001));
    }

    #[test]
    fn test_pow_fixed_saturates() {
        let huge = pow_fixed(Fixed::from_num(1000), 10);
        assert_eq!(huge, Fixed::MAX);
    }

    #[test]
    fn test_fixed_serde_roundtrip_bits() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Wrapper(#[serde(with = "fixed_serde")] Fixed);

        let value = Fixed::from_num(1234.5678);
        let bytes = bincode::serialize(&Wrapper(value)).unwrap();
        let restored: Wrapper = bincode::deserialize(&bytes).unwrap();
        assert_eq!(restored.0.to_bits(), value.to_bits());
    }
}
