use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use lcg_core::{
    generate_and_validate, regenerate_until_approved_with, validate_parameters,
    GeneratorParameters, IndependenceMethod, ModulusPolicy, Normalization, RawNumber,
    RawParameters, TestSelection, UniformityCriterion, ValidationPolicy, VarianceInterval,
};
use lcg_shared::{GenerationRequest, RunReport};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub mod confirm;
pub mod render;

use confirm::Confirm;

/// Counts above this ask for confirmation first.
pub const LARGE_COUNT_THRESHOLD: usize = 100;
pub const DEFAULT_MAX_ATTEMPTS: usize = 100;

#[derive(Parser, Debug)]
#[command(author, version, about = "LCG generator with statistical validation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Print the report as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate one sequence and run the statistical tests on it
    Generate(GenerateArgs),
    /// Draw new multiplier, increment and seed until the sequence passes
    Search(SearchArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Maximum number of regenerations after the first run
    #[arg(long)]
    pub max_attempts: Option<usize>,

    /// Seed for the parameter search itself (entropy when omitted)
    #[arg(long)]
    pub search_seed: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// seed=37 a=19 c=33 N=100, modulus derived from N
    Classroom,
    /// seed=123 a=1664525 c=1013904223 m=2^32 N=50
    NumericalRecipes,
}

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// JSON file holding a saved generation request
    #[arg(long, conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Start from a built-in parameter set
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// Seed X0
    #[arg(short, long, allow_negative_numbers = true)]
    pub seed: Option<RawNumber>,

    /// Multiplier a
    #[arg(short = 'a', long, allow_negative_numbers = true)]
    pub multiplier: Option<RawNumber>,

    /// Increment c
    #[arg(short = 'c', long, allow_negative_numbers = true)]
    pub increment: Option<RawNumber>,

    /// Number of values to generate (N)
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    pub count: Option<RawNumber>,

    /// Modulus m; derived as 2^ceil(log2(N)) when omitted
    #[arg(short = 'm', long, allow_negative_numbers = true)]
    pub modulus: Option<RawNumber>,

    /// Do not ask before generating more than 100 numbers
    #[arg(short, long)]
    pub yes: bool,
}

impl RequestArgs {
    /// Defaults, then preset or config file, then explicit flags.
    pub fn request(&self) -> Result<GenerationRequest> {
        let mut request = match (&self.config, self.preset) {
            (Some(path), _) => {
                log::info!("Loading request from {}", path.display());
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                GenerationRequest::from_json(&text)
                    .with_context(|| format!("Failed to parse {}", path.display()))?
            }
            (None, Some(Preset::NumericalRecipes)) => {
                GenerationRequest::from(RawParameters::numerical_recipes())
            }
            (None, Some(Preset::Classroom)) | (None, None) => GenerationRequest::default(),
        };

        if let Some(seed) = self.seed {
            request.seed = seed;
        }
        if let Some(multiplier) = self.multiplier {
            request.multiplier = multiplier;
        }
        if let Some(increment) = self.increment {
            request.increment = increment;
        }
        if let Some(count) = self.count {
            request.count = count;
        }
        if self.modulus.is_some() {
            request.modulus = self.modulus;
        }
        Ok(request)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum NormalizationArg {
    /// r = X / (m - 1)
    ModulusMinusOne,
    /// r = X / m
    Modulus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum VarianceArg {
    ChiSquare,
    Normal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum IndependenceArg {
    Runs,
    SerialCorrelation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum UniformityArg {
    OneSided,
    TwoSided,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TestArg {
    Mean,
    Variance,
    Independence,
    Uniformity,
}

#[derive(Args, Debug)]
pub struct PolicyArgs {
    /// Always derive the modulus from the count, ignoring --modulus
    #[arg(long)]
    pub derive_modulus: bool,

    /// Accept a modulus that is not a power of two
    #[arg(long)]
    pub any_modulus: bool,

    #[arg(long, value_enum, default_value_t = NormalizationArg::ModulusMinusOne)]
    pub normalization: NormalizationArg,

    #[arg(long, value_enum, default_value_t = VarianceArg::ChiSquare)]
    pub variance_interval: VarianceArg,

    #[arg(long, value_enum, default_value_t = IndependenceArg::Runs)]
    pub independence: IndependenceArg,

    #[arg(long, value_enum, default_value_t = UniformityArg::OneSided)]
    pub uniformity: UniformityArg,

    /// Tests to leave out of the battery (comma separated)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub skip: Vec<TestArg>,
}

impl PolicyArgs {
    pub fn policy(&self) -> ValidationPolicy {
        let mut tests = TestSelection::all();
        for test in &self.skip {
            match test {
                TestArg::Mean => tests.mean = false,
                TestArg::Variance => tests.variance = false,
                TestArg::Independence => tests.independence = false,
                TestArg::Uniformity => tests.uniformity = false,
            }
        }

        ValidationPolicy {
            modulus_policy: if self.derive_modulus {
                ModulusPolicy::DerivedFromCount
            } else {
                ModulusPolicy::Explicit
            },
            power_of_two_modulus: !self.any_modulus,
            normalization: match self.normalization {
                NormalizationArg::ModulusMinusOne => Normalization::ModulusMinusOne,
                NormalizationArg::Modulus => Normalization::Modulus,
            },
            tests,
            variance_interval: match self.variance_interval {
                VarianceArg::ChiSquare => VarianceInterval::ChiSquare,
                VarianceArg::Normal => VarianceInterval::Normal,
            },
            independence: match self.independence {
                IndependenceArg::Runs => IndependenceMethod::Runs,
                IndependenceArg::SerialCorrelation => IndependenceMethod::SerialCorrelation,
            },
            uniformity: match self.uniformity {
                UniformityArg::OneSided => UniformityCriterion::OneSided,
                UniformityArg::TwoSided => UniformityCriterion::TwoSidedBand,
            },
        }
    }
}

fn prepare(
    args: &RequestArgs,
    policy: &ValidationPolicy,
    confirm: &mut dyn Confirm,
) -> Result<(GenerationRequest, GeneratorParameters)> {
    let request = args.request()?;
    let params = validate_parameters(&request.raw_parameters(), policy)
        .context("Invalid generator parameters")?;
    log::info!(
        "Parameters: seed={} a={} c={} m={} (g={}) N={}",
        params.seed,
        params.multiplier,
        params.increment,
        params.modulus,
        params.bit_width(),
        params.count
    );

    if params.count > LARGE_COUNT_THRESHOLD && !args.yes {
        let message = format!(
            "Generate {} numbers (modulus = {})?",
            params.count, params.modulus
        );
        if !confirm.confirm(&message) {
            bail!("Generation of {} numbers was not confirmed", params.count);
        }
    }
    Ok((request, params))
}

pub fn generate(args: &GenerateArgs, confirm: &mut dyn Confirm) -> Result<RunReport> {
    let policy = args.policy.policy();
    let (_, params) = prepare(&args.request, &policy, confirm)?;
    let (sequence, report) =
        generate_and_validate(&params, &policy).context("Generation failed")?;
    log::info!("Validation {}", if report.approved { "approved" } else { "rejected" });
    Ok(RunReport::new(&sequence, &report, None))
}

pub fn search(args: &SearchArgs, confirm: &mut dyn Confirm) -> Result<RunReport> {
    let policy = args.policy.policy();
    let (request, params) = prepare(&args.request, &policy, confirm)?;
    let max_attempts = args
        .max_attempts
        .or(request.max_attempts)
        .unwrap_or(DEFAULT_MAX_ATTEMPTS);

    let mut rng = match args.search_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let outcome = regenerate_until_approved_with(&params, max_attempts, &policy, &mut rng)
        .with_context(|| format!("Search with up to {} attempts failed", max_attempts))?;
    Ok(RunReport::new(
        &outcome.sequence,
        &outcome.report,
        Some(outcome.attempts_used),
    ))
}

pub fn execute(command: &Command, confirm: &mut dyn Confirm) -> Result<RunReport> {
    match command {
        Command::Generate(args) => generate(args, confirm),
        Command::Search(args) => search(args, confirm),
    }
}
