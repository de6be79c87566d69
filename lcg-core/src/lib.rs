//! Linear congruential generator with a classical statistical test battery.
//!
//! ```text
//! validate_parameters  (raw input -> GeneratorParameters, modulus derivation)
//!         |
//! generate             (X[i] = (a X[i-1] + c) mod m, normalized r[i])
//!         |
//! run_battery          (mean, variance, independence, uniformity)
//!         |
//! regenerate           (new a, c, seed from a candidate pool; std only)
//! ```
//!
//! # Examples
//!
//! ```
//! use lcg_core::{generate, GeneratorParameters};
//!
//! let params = GeneratorParameters {
//!     seed: 37,
//!     multiplier: 19,
//!     increment: 33,
//!     modulus: 100,
//!     count: 4,
//! };
//! let sequence = generate(&params).unwrap();
//! assert_eq!(sequence.values(), &[60, 17, 16, 37]);
//! ```
//!
//! Validate form input and run the battery:
//!
//! ```
//! use lcg_core::{generate_and_validate, validate_parameters, RawParameters, ValidationPolicy};
//!
//! let policy = ValidationPolicy::default();
//! let params = validate_parameters(&RawParameters::default(), &policy).unwrap();
//! assert_eq!(params.modulus, 128);
//!
//! let (sequence, report) = generate_and_validate(&params, &policy).unwrap();
//! assert_eq!(sequence.len(), 100);
//! assert_eq!(report.results().count(), 4);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(clippy::all)]

extern crate alloc;

pub mod battery;
pub mod config;
pub mod engine;
pub mod error;
pub mod math;
pub mod params;
#[cfg(feature = "std")]
pub mod regeneration;

pub use battery::{run_battery, TestDetail, TestKind, TestResult, ValidationReport};
pub use config::{
    IndependenceMethod, ModulusPolicy, Normalization, TestSelection, UniformityCriterion,
    ValidationPolicy, VarianceInterval,
};
pub use engine::{generate, generate_with, Lcg, Sequence};
pub use error::{LcgError, Parameter};
pub use params::{
    derive_modulus, resolve_modulus, validate_parameters, GeneratorParameters, ModulusResolution,
    RawNumber, RawParameters,
};
#[cfg(feature = "std")]
pub use regeneration::{
    continue_search, regenerate, regenerate_until_approved, regenerate_until_approved_with,
    SearchOutcome,
};

/// Generate a sequence and run the battery the policy selects over it.
pub fn generate_and_validate(
    params: &GeneratorParameters,
    policy: &ValidationPolicy,
) -> Result<(Sequence, ValidationReport), LcgError> {
    let sequence = generate_with(params, policy.normalization)?;
    let report = run_battery(sequence.normalized(), policy);
    Ok((sequence, report))
}
