//! Error types for the LCG core.

use core::fmt;

/// Generator parameter named in validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    Seed,
    Multiplier,
    Increment,
    Count,
    Modulus,
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Parameter::Seed => "seed",
            Parameter::Multiplier => "multiplier",
            Parameter::Increment => "increment",
            Parameter::Count => "count",
            Parameter::Modulus => "modulus",
        };
        f.write_str(name)
    }
}

/// Errors produced by parameter validation, generation and the regeneration search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LcgError {
    /// A parameter is not a finite integer.
    NonIntegerParameter(Parameter),
    /// Modulus is not greater than 1, or not a power of two while that policy is in force.
    InvalidModulus,
    /// Sample count is not positive.
    InvalidCount,
    /// Multiplier is not positive.
    InvalidMultiplier,
    /// Increment is negative.
    InvalidIncrement,
    /// Seed lies outside `[0, modulus)`.
    SeedOutOfRange { seed: i128, modulus: u64 },
    /// A value or intermediate product does not fit the generator's integer types.
    Overflow,
    /// The regeneration search found no approved parameter set.
    ExhaustedRetries { attempts: usize },
}

impl fmt::Display for LcgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LcgError::NonIntegerParameter(parameter) => {
                write!(f, "Parameter '{}' must be an integer", parameter)
            }
            LcgError::InvalidModulus => {
                write!(f, "Modulus must be a power of two greater than 1")
            }
            LcgError::InvalidCount => write!(f, "Count (N) must be greater than 0"),
            LcgError::InvalidMultiplier => write!(f, "Multiplier (a) must be greater than 0"),
            LcgError::InvalidIncrement => {
                write!(f, "Increment (c) must be greater than or equal to 0")
            }
            LcgError::SeedOutOfRange { seed, modulus } => write!(
                f,
                "Seed {} must satisfy 0 <= seed < {}; adjust the seed or choose another count",
                seed, modulus
            ),
            LcgError::Overflow => {
                write!(f, "Generator arithmetic does not fit in the available integer width")
            }
            LcgError::ExhaustedRetries { attempts } => write!(
                f,
                "No parameter set passed validation after {} regeneration attempts",
                attempts
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LcgError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn test_display_non_integer() {
        let err = LcgError::NonIntegerParameter(Parameter::Multiplier);
        assert_eq!(format!("{}", err), "Parameter 'multiplier' must be an integer");
    }

    #[test]
    fn test_display_seed_out_of_range() {
        let err = LcgError::SeedOutOfRange {
            seed: 128,
            modulus: 128,
        };
        assert_eq!(
            format!("{}", err),
            "Seed 128 must satisfy 0 <= seed < 128; adjust the seed or choose another count"
        );
    }

    #[test]
    fn test_display_exhausted_retries() {
        let err = LcgError::ExhaustedRetries { attempts: 3 };
        assert_eq!(
            format!("{}", err),
            "No parameter set passed validation after 3 regeneration attempts"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(LcgError::InvalidCount, LcgError::InvalidCount);
        assert_ne!(LcgError::InvalidCount, LcgError::InvalidIncrement);
        assert_ne!(
            LcgError::NonIntegerParameter(Parameter::Seed),
            LcgError::NonIntegerParameter(Parameter::Count)
        );
    }
}
