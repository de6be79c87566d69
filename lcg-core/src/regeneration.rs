//! Heuristic search for parameters whose sequence passes the battery.

use rand::Rng;

use crate::battery::ValidationReport;
use crate::config::ValidationPolicy;
use crate::engine::Sequence;
use crate::error::LcgError;
use crate::generate_and_validate;
use crate::params::GeneratorParameters;

/// Candidate pool shared by multiplier and increment.
pub const CANDIDATES: [u64; 10] = [5, 7, 11, 13, 17, 19, 21, 23, 27, 29];

/// An approved run together with the parameters that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub params: GeneratorParameters,
    pub sequence: Sequence,
    pub report: ValidationReport,
    /// Regenerations performed after the initial run.
    pub attempts_used: usize,
}

fn pick<R: Rng + ?Sized>(rng: &mut R) -> u64 {
    CANDIDATES[rng.gen_range(0..CANDIDATES.len())]
}

/// Draw a fresh multiplier, increment and seed when the report was rejected.
///
/// The seed is uniform over `[0, m - 1)`; modulus and count are kept. An
/// approved report returns the parameters unchanged.
pub fn regenerate<R: Rng + ?Sized>(
    params: &GeneratorParameters,
    report: &ValidationReport,
    rng: &mut R,
) -> GeneratorParameters {
    if report.approved {
        return *params;
    }
    let multiplier = pick(rng);
    let increment = pick(rng);
    let seed = rng.gen_range(0..params.modulus.saturating_sub(1).max(1));
    GeneratorParameters {
        seed,
        multiplier,
        increment,
        ..*params
    }
}

/// Keep regenerating from an existing run until the battery approves or
/// `max_attempts` regenerations have been spent.
pub fn continue_search<R: Rng + ?Sized>(
    sequence: Sequence,
    report: ValidationReport,
    max_attempts: usize,
    policy: &ValidationPolicy,
    rng: &mut R,
) -> Result<SearchOutcome, LcgError> {
    let mut params = *sequence.params();
    if report.approved {
        return Ok(SearchOutcome {
            params,
            sequence,
            report,
            attempts_used: 0,
        });
    }

    let mut report = report;
    for attempt in 1..=max_attempts {
        params = regenerate(&params, &report, rng);
        let (sequence, next_report) = generate_and_validate(&params, policy)?;
        log::debug!(
            "Attempt {}: seed={} a={} c={} approved={}",
            attempt,
            params.seed,
            params.multiplier,
            params.increment,
            next_report.approved
        );
        if next_report.approved {
            log::info!(
                "Approved parameters found after {} attempt(s): seed={} a={} c={} m={}",
                attempt,
                params.seed,
                params.multiplier,
                params.increment,
                params.modulus
            );
            return Ok(SearchOutcome {
                params,
                sequence,
                report: next_report,
                attempts_used: attempt,
            });
        }
        report = next_report;
    }

    log::warn!(
        "No approved parameters after {} regeneration attempt(s)",
        max_attempts
    );
    Err(LcgError::ExhaustedRetries {
        attempts: max_attempts,
    })
}

/// Generate and validate `params`, then search with the given rng if rejected.
pub fn regenerate_until_approved_with<R: Rng + ?Sized>(
    params: &GeneratorParameters,
    max_attempts: usize,
    policy: &ValidationPolicy,
    rng: &mut R,
) -> Result<SearchOutcome, LcgError> {
    let (sequence, report) = generate_and_validate(params, policy)?;
    continue_search(sequence, report, max_attempts, policy, rng)
}

/// Same as [`regenerate_until_approved_with`] using the thread-local rng.
pub fn regenerate_until_approved(
    params: &GeneratorParameters,
    max_attempts: usize,
    policy: &ValidationPolicy,
) -> Result<SearchOutcome, LcgError> {
    let mut rng = rand::thread_rng();
    regenerate_until_approved_with(params, max_attempts, policy, &mut rng)
}
