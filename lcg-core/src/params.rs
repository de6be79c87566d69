//! Parameter resolution: modulus derivation and validation of raw input.

use core::num::ParseFloatError;
use core::str::FromStr;

use crate::config::{ModulusPolicy, ValidationPolicy};
use crate::error::{LcgError, Parameter};
use crate::math;

/// One numeric field as typed by a user.
///
/// Integer text keeps its exact value. Only input written with a fraction or
/// an exponent, or too large for 64 bits, is carried as a float.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum RawNumber {
    Unsigned(u64),
    Signed(i64),
    Real(f64),
}

impl From<u64> for RawNumber {
    fn from(value: u64) -> Self {
        RawNumber::Unsigned(value)
    }
}

impl From<i64> for RawNumber {
    fn from(value: i64) -> Self {
        RawNumber::Signed(value)
    }
}

impl From<f64> for RawNumber {
    fn from(value: f64) -> Self {
        RawNumber::Real(value)
    }
}

impl FromStr for RawNumber {
    type Err = ParseFloatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(value) = s.parse::<u64>() {
            return Ok(RawNumber::Unsigned(value));
        }
        if let Ok(value) = s.parse::<i64>() {
            return Ok(RawNumber::Signed(value));
        }
        s.parse::<f64>().map(RawNumber::Real)
    }
}

/// Unvalidated numeric input as it arrives from a form or command line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawParameters {
    pub seed: RawNumber,
    pub multiplier: RawNumber,
    pub increment: RawNumber,
    pub count: RawNumber,
    pub modulus: Option<RawNumber>,
}

impl Default for RawParameters {
    fn default() -> Self {
        Self {
            seed: RawNumber::Unsigned(37),
            multiplier: RawNumber::Unsigned(19),
            increment: RawNumber::Unsigned(33),
            count: RawNumber::Unsigned(100),
            modulus: None,
        }
    }
}

impl RawParameters {
    /// Numerical Recipes constants with `m = 2^32`.
    pub fn numerical_recipes() -> Self {
        Self {
            seed: RawNumber::Unsigned(123),
            multiplier: RawNumber::Unsigned(1_664_525),
            increment: RawNumber::Unsigned(1_013_904_223),
            count: RawNumber::Unsigned(50),
            modulus: Some(RawNumber::Unsigned(1 << 32)),
        }
    }
}

/// Validated generator parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorParameters {
    pub seed: u64,
    pub multiplier: u64,
    pub increment: u64,
    pub modulus: u64,
    pub count: usize,
}

impl GeneratorParameters {
    /// `g = ceil(log2(m))`; exact for power-of-two moduli.
    pub fn bit_width(&self) -> u32 {
        bit_width(self.modulus)
    }

    /// Upper bound on the generator's cycle length.
    pub fn period(&self) -> u64 {
        self.modulus
    }
}

/// A resolved modulus together with its bit width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModulusResolution {
    pub modulus: u64,
    pub bit_width: u32,
    pub derived: bool,
}

fn bit_width(modulus: u64) -> u32 {
    if modulus <= 1 {
        0
    } else {
        u64::BITS - (modulus - 1).leading_zeros()
    }
}

/// `2^ceil(log2(max(1, count)))`.
pub fn derive_modulus(count: u64) -> Result<u64, LcgError> {
    count.max(1).checked_next_power_of_two().ok_or(LcgError::Overflow)
}

/// Resolve the modulus from an explicit value or from the sample count.
///
/// An explicit modulus must be a power of two greater than 1.
pub fn resolve_modulus(count: u64, explicit: Option<u64>) -> Result<ModulusResolution, LcgError> {
    match explicit {
        Some(modulus) => {
            if modulus <= 1 || !modulus.is_power_of_two() {
                return Err(LcgError::InvalidModulus);
            }
            Ok(ModulusResolution {
                modulus,
                bit_width: bit_width(modulus),
                derived: false,
            })
        }
        None => {
            let modulus = derive_modulus(count)?;
            Ok(ModulusResolution {
                modulus,
                bit_width: bit_width(modulus),
                derived: true,
            })
        }
    }
}

/// Floats at or above 2^53 no longer name a single integer.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

fn require_integer(value: RawNumber, parameter: Parameter) -> Result<i128, LcgError> {
    match value {
        RawNumber::Unsigned(value) => Ok(i128::from(value)),
        RawNumber::Signed(value) => Ok(i128::from(value)),
        RawNumber::Real(value) if !value.is_finite() || math::trunc(value) != value => {
            Err(LcgError::NonIntegerParameter(parameter))
        }
        RawNumber::Real(value) if math::abs(value) >= MAX_EXACT_FLOAT => Err(LcgError::Overflow),
        RawNumber::Real(value) => Ok(value as i128),
    }
}

fn to_u64(value: i128) -> Result<u64, LcgError> {
    u64::try_from(value).map_err(|_| LcgError::Overflow)
}

/// Check raw input and turn it into generator parameters.
///
/// Checks run in the order the messages are shown to users: integrality,
/// count, multiplier, increment, modulus, then the seed range.
pub fn validate_parameters(
    raw: &RawParameters,
    policy: &ValidationPolicy,
) -> Result<GeneratorParameters, LcgError> {
    let seed = require_integer(raw.seed, Parameter::Seed)?;
    let multiplier = require_integer(raw.multiplier, Parameter::Multiplier)?;
    let increment = require_integer(raw.increment, Parameter::Increment)?;
    let count = require_integer(raw.count, Parameter::Count)?;
    let explicit = match raw.modulus {
        Some(modulus) => Some(require_integer(modulus, Parameter::Modulus)?),
        None => None,
    };

    if count <= 0 {
        return Err(LcgError::InvalidCount);
    }
    if multiplier <= 0 {
        return Err(LcgError::InvalidMultiplier);
    }
    if increment < 0 {
        return Err(LcgError::InvalidIncrement);
    }

    let count = to_u64(count)?;
    let explicit = match (policy.modulus_policy, explicit) {
        (ModulusPolicy::DerivedFromCount, Some(_)) => {
            log::debug!("Ignoring supplied modulus; deriving it from count {}", count);
            None
        }
        (_, Some(modulus)) if modulus <= 1 => return Err(LcgError::InvalidModulus),
        (_, Some(modulus)) => Some(to_u64(modulus)?),
        (_, None) => None,
    };

    let modulus = match explicit {
        Some(modulus) if !policy.power_of_two_modulus => modulus,
        _ => {
            let resolution = resolve_modulus(count, explicit)?;
            if resolution.derived {
                log::debug!(
                    "Derived modulus m = 2^{} = {} from count {}",
                    resolution.bit_width,
                    resolution.modulus,
                    count
                );
            }
            resolution.modulus
        }
    };
    if modulus <= 1 {
        return Err(LcgError::InvalidModulus);
    }

    if seed < 0 || seed >= i128::from(modulus) {
        return Err(LcgError::SeedOutOfRange { seed, modulus });
    }

    Ok(GeneratorParameters {
        seed: to_u64(seed)?,
        multiplier: to_u64(multiplier)?,
        increment: to_u64(increment)?,
        modulus,
        count: usize::try_from(count).map_err(|_| LcgError::Overflow)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(seed: i64, count: i64) -> RawParameters {
        RawParameters {
            seed: seed.into(),
            count: count.into(),
            ..RawParameters::default()
        }
    }

    #[test]
    fn test_derive_modulus() {
        assert_eq!(derive_modulus(0), Ok(1));
        assert_eq!(derive_modulus(1), Ok(1));
        assert_eq!(derive_modulus(5), Ok(8));
        assert_eq!(derive_modulus(100), Ok(128));
        assert_eq!(derive_modulus(128), Ok(128));
        assert_eq!(derive_modulus(u64::MAX), Err(LcgError::Overflow));
    }

    #[test]
    fn test_resolve_explicit_modulus() {
        let resolution = resolve_modulus(10, Some(1024)).unwrap();
        assert_eq!(resolution.modulus, 1024);
        assert_eq!(resolution.bit_width, 10);
        assert!(!resolution.derived);

        assert_eq!(resolve_modulus(10, Some(100)), Err(LcgError::InvalidModulus));
        assert_eq!(resolve_modulus(10, Some(1)), Err(LcgError::InvalidModulus));
    }

    #[test]
    fn test_resolve_derived_modulus() {
        let resolution = resolve_modulus(100, None).unwrap();
        assert_eq!(resolution.modulus, 128);
        assert_eq!(resolution.bit_width, 7);
        assert!(resolution.derived);
    }

    #[test]
    fn test_parse_raw_number() {
        assert_eq!("42".parse(), Ok(RawNumber::Unsigned(42)));
        assert_eq!(" -7 ".parse(), Ok(RawNumber::Signed(-7)));
        assert_eq!("2.5".parse(), Ok(RawNumber::Real(2.5)));
        assert_eq!("1e3".parse(), Ok(RawNumber::Real(1000.0)));
        assert_eq!(
            "9007199254740993".parse(),
            Ok(RawNumber::Unsigned(9_007_199_254_740_993))
        );
        assert!("seven".parse::<RawNumber>().is_err());
    }

    #[test]
    fn test_validate_defaults() {
        let params = validate_parameters(&RawParameters::default(), &ValidationPolicy::default())
            .unwrap();
        assert_eq!(params.seed, 37);
        assert_eq!(params.multiplier, 19);
        assert_eq!(params.increment, 33);
        assert_eq!(params.modulus, 128);
        assert_eq!(params.count, 100);
        assert_eq!(params.bit_width(), 7);
        assert_eq!(params.period(), 128);
    }

    #[test]
    fn test_validate_numerical_recipes() {
        let params =
            validate_parameters(&RawParameters::numerical_recipes(), &ValidationPolicy::default())
                .unwrap();
        assert_eq!(params.modulus, 1 << 32);
        assert_eq!(params.bit_width(), 32);
    }

    #[test]
    fn test_seed_boundary() {
        let policy = ValidationPolicy::default();
        assert_eq!(
            validate_parameters(&raw(128, 100), &policy),
            Err(LcgError::SeedOutOfRange {
                seed: 128,
                modulus: 128
            })
        );
        assert_eq!(validate_parameters(&raw(127, 100), &policy).unwrap().seed, 127);
        assert!(matches!(
            validate_parameters(&raw(-1, 100), &policy),
            Err(LcgError::SeedOutOfRange { seed: -1, .. })
        ));
    }

    #[test]
    fn test_integral_floats_are_accepted() {
        let raw = RawParameters {
            seed: RawNumber::Real(5.0),
            count: RawNumber::Real(64.0),
            modulus: Some(RawNumber::Real(1024.0)),
            ..RawParameters::default()
        };
        let params = validate_parameters(&raw, &ValidationPolicy::default()).unwrap();
        assert_eq!(params.seed, 5);
        assert_eq!(params.count, 64);
        assert_eq!(params.modulus, 1024);
    }

    #[test]
    fn test_non_integer_parameters() {
        let policy = ValidationPolicy::default();
        let cases = [
            (
                RawParameters {
                    seed: RawNumber::Real(1.5),
                    ..RawParameters::default()
                },
                Parameter::Seed,
            ),
            (
                RawParameters {
                    multiplier: RawNumber::Real(2.25),
                    ..RawParameters::default()
                },
                Parameter::Multiplier,
            ),
            (
                RawParameters {
                    increment: RawNumber::Real(f64::NAN),
                    ..RawParameters::default()
                },
                Parameter::Increment,
            ),
            (
                RawParameters {
                    count: RawNumber::Real(f64::INFINITY),
                    ..RawParameters::default()
                },
                Parameter::Count,
            ),
            (
                RawParameters {
                    modulus: Some(RawNumber::Real(64.5)),
                    ..RawParameters::default()
                },
                Parameter::Modulus,
            ),
        ];
        for (raw, parameter) in cases {
            assert_eq!(
                validate_parameters(&raw, &policy),
                Err(LcgError::NonIntegerParameter(parameter))
            );
        }
    }

    #[test]
    fn test_invalid_count() {
        let policy = ValidationPolicy::default();
        assert_eq!(
            validate_parameters(&raw(0, 0), &policy),
            Err(LcgError::InvalidCount)
        );
        assert_eq!(
            validate_parameters(&raw(0, -5), &policy),
            Err(LcgError::InvalidCount)
        );
    }

    #[test]
    fn test_invalid_multiplier_and_increment() {
        let policy = ValidationPolicy::default();
        let zero_multiplier = RawParameters {
            multiplier: 0u64.into(),
            ..RawParameters::default()
        };
        assert_eq!(
            validate_parameters(&zero_multiplier, &policy),
            Err(LcgError::InvalidMultiplier)
        );

        let negative_increment = RawParameters {
            increment: (-1i64).into(),
            ..RawParameters::default()
        };
        assert_eq!(
            validate_parameters(&negative_increment, &policy),
            Err(LcgError::InvalidIncrement)
        );

        let zero_increment = RawParameters {
            increment: 0u64.into(),
            ..RawParameters::default()
        };
        assert!(validate_parameters(&zero_increment, &policy).is_ok());
    }

    #[test]
    fn test_invalid_modulus() {
        let policy = ValidationPolicy::default();
        for modulus in [1i64, 0, -8, 100] {
            let raw = RawParameters {
                seed: 0u64.into(),
                modulus: Some(modulus.into()),
                ..RawParameters::default()
            };
            assert_eq!(
                validate_parameters(&raw, &policy),
                Err(LcgError::InvalidModulus),
                "modulus {}",
                modulus
            );
        }
    }

    #[test]
    fn test_single_sample_derives_unusable_modulus() {
        assert_eq!(
            validate_parameters(&raw(0, 1), &ValidationPolicy::default()),
            Err(LcgError::InvalidModulus)
        );
    }

    #[test]
    fn test_any_modulus_when_power_of_two_not_enforced() {
        let policy = ValidationPolicy {
            power_of_two_modulus: false,
            ..ValidationPolicy::default()
        };
        let raw = RawParameters {
            seed: 37u64.into(),
            multiplier: 19u64.into(),
            increment: 33u64.into(),
            count: 4u64.into(),
            modulus: Some(100u64.into()),
        };
        let params = validate_parameters(&raw, &policy).unwrap();
        assert_eq!(params.modulus, 100);
        assert_eq!(params.bit_width(), 7);
    }

    #[test]
    fn test_derived_policy_ignores_supplied_modulus() {
        let policy = ValidationPolicy {
            modulus_policy: ModulusPolicy::DerivedFromCount,
            ..ValidationPolicy::default()
        };
        let raw = RawParameters {
            seed: 3u64.into(),
            count: 20u64.into(),
            modulus: Some(1024u64.into()),
            ..RawParameters::default()
        };
        assert_eq!(validate_parameters(&raw, &policy).unwrap().modulus, 32);
    }

    #[test]
    fn test_oversized_values_overflow() {
        let raw = RawParameters {
            multiplier: RawNumber::Real(1.0e20),
            ..RawParameters::default()
        };
        assert_eq!(
            validate_parameters(&raw, &ValidationPolicy::default()),
            Err(LcgError::Overflow)
        );
    }

    #[test]
    fn test_large_integers_are_kept_exact() {
        let raw = RawParameters {
            seed: 9_007_199_254_740_993u64.into(),
            multiplier: 6_364_136_223_846_793_005u64.into(),
            increment: 1_442_695_040_888_963_407u64.into(),
            count: 4u64.into(),
            modulus: Some((1u64 << 63).into()),
        };
        let params = validate_parameters(&raw, &ValidationPolicy::default()).unwrap();
        assert_eq!(params.seed, 9_007_199_254_740_993);
        assert_eq!(params.multiplier, 6_364_136_223_846_793_005);
        assert_eq!(params.increment, 1_442_695_040_888_963_407);
        assert_eq!(params.modulus, 1 << 63);
    }

    #[test]
    fn test_floats_past_exact_range_are_rejected() {
        // 2^53 + 1 rounds to 2^53 once it is a float
        let raw = RawParameters {
            seed: RawNumber::Real(9_007_199_254_740_993u64 as f64),
            modulus: Some((1u64 << 63).into()),
            ..RawParameters::default()
        };
        assert_eq!(
            validate_parameters(&raw, &ValidationPolicy::default()),
            Err(LcgError::Overflow)
        );

        let below = RawParameters {
            seed: RawNumber::Real(9_007_199_254_740_991.0),
            modulus: Some((1u64 << 63).into()),
            ..RawParameters::default()
        };
        assert_eq!(
            validate_parameters(&below, &ValidationPolicy::default())
                .unwrap()
                .seed,
            9_007_199_254_740_991
        );
    }
}
