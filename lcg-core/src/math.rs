//! Floating-point helpers that work with and without `std`.

pub(crate) fn sqrt(x: f64) -> f64 {
    #[cfg(feature = "std")]
    {
        x.sqrt()
    }
    #[cfg(not(feature = "std"))]
    {
        libm::sqrt(x)
    }
}

pub(crate) fn trunc(x: f64) -> f64 {
    #[cfg(feature = "std")]
    {
        x.trunc()
    }
    #[cfg(not(feature = "std"))]
    {
        libm::trunc(x)
    }
}

pub(crate) fn abs(x: f64) -> f64 {
    #[cfg(feature = "std")]
    {
        x.abs()
    }
    #[cfg(not(feature = "std"))]
    {
        libm::fabs(x)
    }
}

pub(crate) fn cube(x: f64) -> f64 {
    x * x * x
}

/// Arithmetic mean; NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance with the `n - 1` denominator; NaN below two values.
pub fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let mean = mean(values);
    let squares: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    squares / (values.len() - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[0.0, 0.5, 1.0]), 0.5);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn test_sample_variance() {
        // deviations -1, 0, 1 over n - 1 = 2
        assert!((sample_variance(&[1.0, 2.0, 3.0]) - 1.0).abs() < 1e-12);
        assert!(sample_variance(&[0.3]).is_nan());
    }

    #[test]
    fn test_helpers() {
        assert_eq!(sqrt(16.0), 4.0);
        assert_eq!(trunc(2.75), 2.0);
        assert_eq!(abs(-0.25), 0.25);
        assert_eq!(cube(-2.0), -8.0);
    }
}
