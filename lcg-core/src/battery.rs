//! Statistical test battery for normalized sequences.
//!
//! Four independent tests, each at the 95% level:
//!
//! - **Mean**: the sample mean against `0.5 ± 1.96 / sqrt(12n)`.
//! - **Variance**: the sample variance against an interval around `1/12`,
//!   built from chi-square quantiles (Wilson-Hilferty) or a normal approximation.
//! - **Independence**: runs up and down, or lag-one serial correlation.
//! - **Uniformity**: chi-square goodness of fit over `floor(sqrt(n))` equal bins.
//!
//! Every enabled test runs even when another fails, so callers always get a
//! complete report. A test that cannot be computed for a sample this small
//! reports NaN for its statistic and limits and does not pass.

use alloc::vec;
use alloc::vec::Vec;

use crate::config::{IndependenceMethod, UniformityCriterion, ValidationPolicy, VarianceInterval};
use crate::math;

/// Two-sided 95% standard normal quantile.
pub const Z_95: f64 = 1.96;

/// Chi-square critical values at alpha = 0.05 for df 1 through 20.
const CHI_SQUARE_95: [f64; 20] = [
    3.841, 5.991, 7.815, 9.488, 11.070, 12.592, 14.067, 15.507, 16.919, 18.307, 19.675, 21.026,
    22.362, 23.685, 24.996, 26.296, 27.587, 28.869, 30.144, 31.410,
];
const CHI_SQUARE_95_DF25: f64 = 37.652;
const CHI_SQUARE_95_DF30: f64 = 43.773;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestKind {
    Mean,
    Variance,
    Independence,
    Uniformity,
}

impl TestKind {
    pub fn name(&self) -> &'static str {
        match self {
            TestKind::Mean => "mean",
            TestKind::Variance => "variance",
            TestKind::Independence => "independence",
            TestKind::Uniformity => "uniformity",
        }
    }
}

/// Test-specific values reported next to the statistic.
#[derive(Debug, Clone, PartialEq)]
pub enum TestDetail {
    None,
    Runs {
        observed_runs: usize,
        expected_runs: f64,
        variance: f64,
    },
    SerialCorrelation {
        lag_products_mean: f64,
    },
    ChiSquare {
        intervals: usize,
        degrees_of_freedom: usize,
        expected_per_interval: f64,
        observed: Vec<usize>,
    },
}

/// Outcome of a single test.
#[derive(Debug, Clone, PartialEq)]
pub struct TestResult {
    pub kind: TestKind,
    pub calculated_value: f64,
    pub lower_limit: f64,
    pub upper_limit: f64,
    pub passed: bool,
    pub detail: TestDetail,
}

impl TestResult {
    fn insufficient(kind: TestKind) -> Self {
        Self {
            kind,
            calculated_value: f64::NAN,
            lower_limit: f64::NAN,
            upper_limit: f64::NAN,
            passed: false,
            detail: TestDetail::None,
        }
    }

    fn within(
        kind: TestKind,
        calculated_value: f64,
        lower_limit: f64,
        upper_limit: f64,
        detail: TestDetail,
    ) -> Self {
        Self {
            kind,
            calculated_value,
            lower_limit,
            upper_limit,
            passed: lower_limit <= calculated_value && calculated_value <= upper_limit,
            detail,
        }
    }
}

/// Results of one validation pass. Tests disabled by the policy are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub mean: Option<TestResult>,
    pub variance: Option<TestResult>,
    pub independence: Option<TestResult>,
    pub uniformity: Option<TestResult>,
    /// Logical AND of every present test's verdict.
    pub approved: bool,
}

impl ValidationReport {
    pub fn new(
        mean: Option<TestResult>,
        variance: Option<TestResult>,
        independence: Option<TestResult>,
        uniformity: Option<TestResult>,
    ) -> Self {
        let approved = [&mean, &variance, &independence, &uniformity]
            .iter()
            .filter_map(|result| result.as_ref())
            .all(|result| result.passed);
        Self {
            mean,
            variance,
            independence,
            uniformity,
            approved,
        }
    }

    pub fn results(&self) -> impl Iterator<Item = &TestResult> {
        [&self.mean, &self.variance, &self.independence, &self.uniformity]
            .into_iter()
            .filter_map(|result| result.as_ref())
    }
}

/// Acceptance interval for the mean of `n` uniform values.
pub fn mean_interval(n: usize) -> (f64, f64) {
    let half_width = Z_95 / math::sqrt(12.0 * n as f64);
    (0.5 - half_width, 0.5 + half_width)
}

/// Judge an already computed mean; both limits are inclusive.
pub fn evaluate_mean(mean: f64, n: usize) -> TestResult {
    if n == 0 {
        return TestResult::insufficient(TestKind::Mean);
    }
    let (lower, upper) = mean_interval(n);
    TestResult::within(TestKind::Mean, mean, lower, upper, TestDetail::None)
}

pub fn mean_test(r: &[f64]) -> TestResult {
    evaluate_mean(math::mean(r), r.len())
}

/// Wilson-Hilferty approximation of the chi-square quantile at normal score `z`.
pub fn wilson_hilferty(df: f64, z: f64) -> f64 {
    let a = 2.0 / (9.0 * df);
    df * math::cube(1.0 - a + z * math::sqrt(a))
}

/// Acceptance interval for the sample variance of `n` uniform values.
pub fn variance_interval(n: usize, method: VarianceInterval) -> (f64, f64) {
    let df = n.saturating_sub(1) as f64;
    match method {
        VarianceInterval::ChiSquare => {
            let lower = wilson_hilferty(df, -Z_95).max(0.0) / (12.0 * df);
            let upper = wilson_hilferty(df, Z_95) / (12.0 * df);
            (lower, upper)
        }
        VarianceInterval::Normal => {
            let expected = 1.0 / 12.0;
            let half_width = Z_95 * math::sqrt(2.0 * expected * expected / df);
            (expected - half_width, expected + half_width)
        }
    }
}

pub fn variance_test(r: &[f64], method: VarianceInterval) -> TestResult {
    if r.len() < 2 {
        return TestResult::insufficient(TestKind::Variance);
    }
    let (lower, upper) = variance_interval(r.len(), method);
    TestResult::within(
        TestKind::Variance,
        math::sample_variance(r),
        lower,
        upper,
        TestDetail::None,
    )
}

/// Number of up/down runs: one plus the sign changes between consecutive steps.
pub fn count_runs(r: &[f64]) -> usize {
    if r.len() < 2 {
        return 0;
    }
    let signs: Vec<bool> = r.windows(2).map(|pair| pair[1] > pair[0]).collect();
    1 + signs.windows(2).filter(|pair| pair[0] != pair[1]).count()
}

/// Runs up and down: `Z0 = |C0 - (2n-1)/3| / sqrt((16n-29)/90)`, passing when `Z0 <= 1.96`.
pub fn runs_test(r: &[f64]) -> TestResult {
    let n = r.len();
    if n < 2 {
        return TestResult::insufficient(TestKind::Independence);
    }
    let observed_runs = count_runs(r);
    let expected_runs = (2.0 * n as f64 - 1.0) / 3.0;
    let variance = (16.0 * n as f64 - 29.0) / 90.0;
    let z = math::abs(observed_runs as f64 - expected_runs) / math::sqrt(variance);

    TestResult::within(
        TestKind::Independence,
        z,
        0.0,
        Z_95,
        TestDetail::Runs {
            observed_runs,
            expected_runs,
            variance,
        },
    )
}

/// Lag-one serial correlation `sum(r[i] r[i+1]) / (n-1) - mean^2` against `±1.96 / sqrt(12n)`.
pub fn serial_correlation_test(r: &[f64]) -> TestResult {
    let n = r.len();
    if n < 2 {
        return TestResult::insufficient(TestKind::Independence);
    }
    let lag_products_mean =
        r.windows(2).map(|pair| pair[0] * pair[1]).sum::<f64>() / (n - 1) as f64;
    let mean = math::mean(r);
    let correlation = lag_products_mean - mean * mean;
    let limit = Z_95 / math::sqrt(12.0 * n as f64);

    TestResult::within(
        TestKind::Independence,
        correlation,
        -limit,
        limit,
        TestDetail::SerialCorrelation { lag_products_mean },
    )
}

/// 95% chi-square critical value.
///
/// Tabulated for df 1..=20, 25 and 30, linearly interpolated in between,
/// and approximated as `df + 2 sqrt(df)` above 30. NaN for df 0.
pub fn chi_square_critical(df: usize) -> f64 {
    let interpolate = |from: usize, low: f64, high: f64| {
        low + (high - low) * (df - from) as f64 / 5.0
    };
    match df {
        0 => f64::NAN,
        1..=20 => CHI_SQUARE_95[df - 1],
        21..=24 => interpolate(20, CHI_SQUARE_95[19], CHI_SQUARE_95_DF25),
        25 => CHI_SQUARE_95_DF25,
        26..=29 => interpolate(25, CHI_SQUARE_95_DF25, CHI_SQUARE_95_DF30),
        30 => CHI_SQUARE_95_DF30,
        _ => df as f64 + 2.0 * math::sqrt(df as f64),
    }
}

fn interval_count(n: usize) -> usize {
    let mut k = math::sqrt(n as f64) as usize;
    while (k + 1) * (k + 1) <= n {
        k += 1;
    }
    while k * k > n {
        k -= 1;
    }
    k
}

/// Observed counts over `k` equal subintervals of `[0, 1]`; 1.0 lands in the last one.
pub fn tabulate(r: &[f64], k: usize) -> Vec<usize> {
    let mut observed = vec![0usize; k];
    if k == 0 {
        return observed;
    }
    for &value in r {
        let index = ((value * k as f64) as usize).min(k - 1);
        observed[index] += 1;
    }
    observed
}

pub fn chi_square_test(r: &[f64], criterion: UniformityCriterion) -> TestResult {
    let n = r.len();
    let k = interval_count(n);
    if k < 2 {
        return TestResult::insufficient(TestKind::Uniformity);
    }

    let observed = tabulate(r, k);
    let expected = n as f64 / k as f64;
    let chi: f64 = observed
        .iter()
        .map(|&count| {
            let diff = count as f64 - expected;
            diff * diff / expected
        })
        .sum();

    let df = k - 1;
    let detail = TestDetail::ChiSquare {
        intervals: k,
        degrees_of_freedom: df,
        expected_per_interval: expected,
        observed,
    };

    match criterion {
        UniformityCriterion::OneSided => {
            let critical = chi_square_critical(df);
            TestResult {
                kind: TestKind::Uniformity,
                calculated_value: chi,
                lower_limit: 0.0,
                upper_limit: critical,
                passed: chi < critical,
                detail,
            }
        }
        UniformityCriterion::TwoSidedBand => {
            let half_width = Z_95 * math::sqrt(2.0 * df as f64);
            TestResult::within(
                TestKind::Uniformity,
                chi,
                df as f64 - half_width,
                df as f64 + half_width,
                detail,
            )
        }
    }
}

/// Run every test the policy enables over the normalized sequence.
pub fn run_battery(r: &[f64], policy: &ValidationPolicy) -> ValidationReport {
    let tests = &policy.tests;
    let mean = tests.mean.then(|| mean_test(r));
    let variance = tests
        .variance
        .then(|| variance_test(r, policy.variance_interval));
    let independence = tests.independence.then(|| match policy.independence {
        IndependenceMethod::Runs => runs_test(r),
        IndependenceMethod::SerialCorrelation => serial_correlation_test(r),
    });
    let uniformity = tests
        .uniformity
        .then(|| chi_square_test(r, policy.uniformity));

    ValidationReport::new(mean, variance, independence, uniformity)
}
