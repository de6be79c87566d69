use std::fmt;

use lcg_shared::RunReport;

fn verdict(passed: bool) -> &'static str {
    if passed {
        "PASS"
    } else {
        "FAIL"
    }
}

/// Plain-text view of a run: parameters, numbers table, test rows.
pub struct TextReport<'a>(pub &'a RunReport);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let p = &report.parameters;

        writeln!(
            f,
            "seed={} a={} c={} m={} (g={}, period={}) N={} r={}",
            p.seed, p.multiplier, p.increment, p.modulus, p.bit_width, p.period, p.count,
            report.normalization
        )?;
        if let Some(attempts) = report.attempts {
            writeln!(f, "regeneration attempts: {}", attempts)?;
        }
        writeln!(f)?;

        writeln!(f, "{:>8} {:>20} {:>8} {:>10}", "i", "X", "", "r")?;
        for row in &report.numbers {
            writeln!(
                f,
                "{:>8} {:>20} {:>8} {:>10}",
                row.x_label, row.original, row.r_label, row.normalized
            )?;
        }
        writeln!(f)?;

        writeln!(
            f,
            "{:<14} {:>12} {:>12} {:>12}  {}",
            "test", "calculated", "lower", "upper", "result"
        )?;
        for test in &report.tests {
            write!(
                f,
                "{:<14} {:>12.6} {:>12.6} {:>12.6}  {}",
                test.name,
                test.calculated,
                test.lower_limit,
                test.upper_limit,
                verdict(test.passed)
            )?;
            if let Some(runs) = test.observed_runs {
                write!(f, "  (runs={})", runs)?;
            }
            if let Some(df) = test.degrees_of_freedom {
                write!(f, "  (df={})", df)?;
            }
            writeln!(f)?;
        }
        writeln!(
            f,
            "\n{}",
            if report.approved {
                "APPROVED: the sequence passed every test"
            } else {
                "REJECTED: at least one test failed"
            }
        )
    }
}

pub fn render_text(report: &RunReport) -> String {
    TextReport(report).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lcg_core::{generate_and_validate, GeneratorParameters, ValidationPolicy};

    #[test]
    fn test_render_text() {
        let params = GeneratorParameters {
            seed: 0,
            multiplier: 1,
            increment: 1,
            modulus: 128,
            count: 100,
        };
        let (sequence, report) =
            generate_and_validate(&params, &ValidationPolicy::default()).unwrap();
        let text = render_text(&RunReport::new(&sequence, &report, Some(0)));

        assert!(text.contains("m=128 (g=7, period=128)"));
        assert!(text.contains("regeneration attempts: 0"));
        assert!(text.contains("X100"));
        assert!(text.contains("independence"));
        assert!(text.contains("FAIL"));
        assert!(text.contains("(df=9)\n"));
        assert!(text.contains("REJECTED"));
    }
}
