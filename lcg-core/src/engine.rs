//! The linear congruential recurrence `X[i] = (a * X[i-1] + c) mod m`.

use alloc::vec::Vec;

use crate::config::Normalization;
use crate::error::LcgError;
use crate::params::GeneratorParameters;

/// Infinite stream of raw LCG states, starting after the seed.
///
/// Products are formed in `u128`, which holds `a * (m - 1) + c` exactly for
/// any 64-bit inputs.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u128,
    multiplier: u128,
    increment: u128,
    modulus: u128,
}

impl Lcg {
    pub fn new(params: &GeneratorParameters) -> Result<Self, LcgError> {
        if params.modulus <= 1 {
            return Err(LcgError::InvalidModulus);
        }
        if params.seed >= params.modulus {
            return Err(LcgError::SeedOutOfRange {
                seed: params.seed as i128,
                modulus: params.modulus,
            });
        }

        let multiplier = params.multiplier as u128;
        let increment = params.increment as u128;
        let modulus = params.modulus as u128;
        multiplier
            .checked_mul(modulus - 1)
            .and_then(|product| product.checked_add(increment))
            .ok_or(LcgError::Overflow)?;

        Ok(Self {
            state: params.seed as u128,
            multiplier,
            increment,
            modulus,
        })
    }

    pub fn state(&self) -> u64 {
        self.state as u64
    }
}

impl Iterator for Lcg {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        self.state = (self.multiplier * self.state + self.increment) % self.modulus;
        Some(self.state as u64)
    }
}

/// One generation run: raw states `X[1..=count]` and their normalized values.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    params: GeneratorParameters,
    normalization: Normalization,
    values: Vec<u64>,
    normalized: Vec<f64>,
}

impl Sequence {
    pub fn params(&self) -> &GeneratorParameters {
        &self.params
    }

    pub fn normalization(&self) -> Normalization {
        self.normalization
    }

    pub fn values(&self) -> &[u64] {
        &self.values
    }

    pub fn normalized(&self) -> &[f64] {
        &self.normalized
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parameters whose seed is the last emitted state, so generating from
    /// them continues this stream.
    pub fn continuation(&self) -> GeneratorParameters {
        GeneratorParameters {
            seed: self.values.last().copied().unwrap_or(self.params.seed),
            ..self.params
        }
    }
}

/// Generate `count` values normalized by `m - 1`.
pub fn generate(params: &GeneratorParameters) -> Result<Sequence, LcgError> {
    generate_with(params, Normalization::ModulusMinusOne)
}

pub fn generate_with(
    params: &GeneratorParameters,
    normalization: Normalization,
) -> Result<Sequence, LcgError> {
    let values: Vec<u64> = Lcg::new(params)?.take(params.count).collect();
    let normalized = values
        .iter()
        .map(|&value| normalization.apply(value, params.modulus))
        .collect();

    Ok(Sequence {
        params: *params,
        normalization,
        values,
        normalized,
    })
}
