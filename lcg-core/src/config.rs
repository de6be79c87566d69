//! Validation policy: how the modulus is chosen, how values are normalized,
//! and which tests run with which interval construction.

/// Where the modulus comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModulusPolicy {
    /// Use the supplied modulus; derive it from the count only when none is given.
    #[default]
    Explicit,
    /// Always derive `2^ceil(log2(count))`, ignoring any supplied modulus.
    DerivedFromCount,
}

/// Mapping from raw state `X` to the unit interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Normalization {
    /// `X / (m - 1)`, inclusive of 1.0.
    #[default]
    ModulusMinusOne,
    /// `X / m`, strictly inside `[0, 1)`.
    Modulus,
}

impl Normalization {
    pub fn apply(&self, value: u64, modulus: u64) -> f64 {
        let divisor = match self {
            Normalization::ModulusMinusOne => modulus.saturating_sub(1),
            Normalization::Modulus => modulus,
        };
        value as f64 / divisor as f64
    }
}

/// Acceptance interval for the sample variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VarianceInterval {
    /// Chi-square quantiles via the Wilson-Hilferty approximation.
    #[default]
    ChiSquare,
    /// Normal approximation centred at 1/12.
    Normal,
}

/// Which independence test runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndependenceMethod {
    /// Runs up and down.
    #[default]
    Runs,
    /// Lag-one serial correlation.
    SerialCorrelation,
}

/// Acceptance rule for the chi-square uniformity statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UniformityCriterion {
    /// `chi < critical(df)` from the 95% table.
    #[default]
    OneSided,
    /// `df - 1.96 sqrt(2 df) <= chi <= df + 1.96 sqrt(2 df)`.
    TwoSidedBand,
}

/// Subset of the battery to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestSelection {
    pub mean: bool,
    pub variance: bool,
    pub independence: bool,
    pub uniformity: bool,
}

impl TestSelection {
    pub fn all() -> Self {
        Self {
            mean: true,
            variance: true,
            independence: true,
            uniformity: true,
        }
    }

    pub fn none() -> Self {
        Self {
            mean: false,
            variance: false,
            independence: false,
            uniformity: false,
        }
    }
}

impl Default for TestSelection {
    fn default() -> Self {
        Self::all()
    }
}

/// Configuration for resolving parameters and validating sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub modulus_policy: ModulusPolicy,
    /// Reject moduli that are not powers of two.
    pub power_of_two_modulus: bool,
    pub normalization: Normalization,
    pub tests: TestSelection,
    pub variance_interval: VarianceInterval,
    pub independence: IndependenceMethod,
    pub uniformity: UniformityCriterion,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            modulus_policy: ModulusPolicy::Explicit,
            power_of_two_modulus: true,
            normalization: Normalization::ModulusMinusOne,
            tests: TestSelection::all(),
            variance_interval: VarianceInterval::ChiSquare,
            independence: IndependenceMethod::Runs,
            uniformity: UniformityCriterion::OneSided,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        assert_eq!(Normalization::ModulusMinusOne.apply(99, 100), 1.0);
        assert_eq!(Normalization::Modulus.apply(50, 100), 0.5);
        assert!(Normalization::Modulus.apply(99, 100) < 1.0);
    }

    #[test]
    fn test_default_policy_runs_everything() {
        let policy = ValidationPolicy::default();
        assert_eq!(policy.tests, TestSelection::all());
        assert_eq!(policy.variance_interval, VarianceInterval::ChiSquare);
        assert_eq!(policy.independence, IndependenceMethod::Runs);
        assert_eq!(policy.uniformity, UniformityCriterion::OneSided);
        assert!(policy.power_of_two_modulus);
    }
}
