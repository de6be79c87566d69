#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use lcg_core::{
    GeneratorParameters, Normalization, RawNumber, RawParameters, Sequence, TestDetail,
    TestResult, ValidationReport,
};
use serde::{Deserialize, Serialize};

/// Generation request from the presentation layer, e.g. a saved form.
/// JSON integers are kept exact; fractions are rejected later by validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationRequest {
    pub seed: RawNumber,
    pub multiplier: RawNumber,
    pub increment: RawNumber,
    pub count: RawNumber,
    /// None derives the modulus from the count
    pub modulus: Option<RawNumber>,
    pub max_attempts: Option<usize>,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self::from(RawParameters::default())
    }
}

impl From<RawParameters> for GenerationRequest {
    fn from(raw: RawParameters) -> Self {
        Self {
            seed: raw.seed,
            multiplier: raw.multiplier,
            increment: raw.increment,
            count: raw.count,
            modulus: raw.modulus,
            max_attempts: None,
        }
    }
}

impl GenerationRequest {
    pub fn raw_parameters(&self) -> RawParameters {
        RawParameters {
            seed: self.seed,
            multiplier: self.multiplier,
            increment: self.increment,
            count: self.count,
            modulus: self.modulus,
        }
    }
}

/// One generated value as shown in the results table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NumberRow {
    pub x_label: String,
    pub r_label: String,
    pub original: u64,
    /// Normalized value with six decimals
    pub normalized: String,
}

pub fn number_rows(sequence: &Sequence) -> Vec<NumberRow> {
    sequence
        .values()
        .iter()
        .zip(sequence.normalized())
        .enumerate()
        .map(|(index, (&original, normalized))| NumberRow {
            x_label: format!("X{}", index + 1),
            r_label: format!("r{}", index + 1),
            original,
            normalized: format!("{:.6}", normalized),
        })
        .collect()
}

/// One pass/fail row of the validation report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestRow {
    pub name: String,
    pub calculated: f64,
    pub lower_limit: f64,
    pub upper_limit: f64,
    pub passed: bool,
    pub observed_runs: Option<usize>,
    pub degrees_of_freedom: Option<usize>,
}

impl From<&TestResult> for TestRow {
    fn from(result: &TestResult) -> Self {
        let (observed_runs, degrees_of_freedom) = match &result.detail {
            TestDetail::Runs { observed_runs, .. } => (Some(*observed_runs), None),
            TestDetail::ChiSquare {
                degrees_of_freedom,
                ..
            } => (None, Some(*degrees_of_freedom)),
            TestDetail::SerialCorrelation { .. } | TestDetail::None => (None, None),
        };
        Self {
            name: result.kind.name().to_string(),
            calculated: result.calculated_value,
            lower_limit: result.lower_limit,
            upper_limit: result.upper_limit,
            passed: result.passed,
            observed_runs,
            degrees_of_freedom,
        }
    }
}

/// Parameters actually used for the reported run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParameterSummary {
    pub seed: u64,
    pub multiplier: u64,
    pub increment: u64,
    pub modulus: u64,
    pub count: usize,
    pub bit_width: u32,
    pub period: u64,
}

impl From<&GeneratorParameters> for ParameterSummary {
    fn from(params: &GeneratorParameters) -> Self {
        Self {
            seed: params.seed,
            multiplier: params.multiplier,
            increment: params.increment,
            modulus: params.modulus,
            count: params.count,
            bit_width: params.bit_width(),
            period: params.period(),
        }
    }
}

/// Complete result handed back to the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    pub parameters: ParameterSummary,
    pub normalization: String,
    pub numbers: Vec<NumberRow>,
    pub tests: Vec<TestRow>,
    pub approved: bool,
    /// Regeneration attempts spent, when the run came from a search
    pub attempts: Option<usize>,
}

impl RunReport {
    pub fn new(sequence: &Sequence, report: &ValidationReport, attempts: Option<usize>) -> Self {
        let normalization = match sequence.normalization() {
            Normalization::ModulusMinusOne => "X/(m-1)",
            Normalization::Modulus => "X/m",
        };
        Self {
            parameters: ParameterSummary::from(sequence.params()),
            normalization: normalization.to_string(),
            numbers: number_rows(sequence),
            tests: report.results().map(TestRow::from).collect(),
            approved: report.approved,
            attempts,
        }
    }
}

#[cfg(feature = "std")]
impl GenerationRequest {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}

#[cfg(feature = "std")]
impl RunReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}
