pub mod linear;

pub use linear::{LinearFit, LinearFitError, fit_line};

/// Mean over the finite-or-infinite entries, skipping NaN. Empty or all-NaN input gives NaN.
pub fn nan_mean(values: &[f64]) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|value| !value.is_nan())
        .fold((0.0_f64, 0_usize), |(sum, count), value| {
            (sum + value, count + 1)
        });

    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Elementwise `value.powf(exponent)`, NaN results preserved.
pub fn powf_each(values: &[f64], exponent: f64) -> Vec<f64> {
    values.iter().map(|value| value.powf(exponent)).collect()
}

/// Elementwise `value.powf(exponent)` with NaN results replaced by zero.
pub fn powf_each_nan_to_zero(values: &[f64], exponent: f64) -> Vec<f64> {
    values
        .iter()
        .map(|value| {
            let powered = value.powf(exponent);
            if powered.is_nan() { 0.0 } else { powered }
        })
        .collect()
}

/// Negative entries become zero; NaN is not negative and passes through.
pub fn clamp_negative_to_zero(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    values
        .into_iter()
        .map(|value| if value < 0.0 { 0.0 } else { value })
        .collect()
}

pub fn select_indices<T: Copy>(values: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&index| values[index]).collect()
}
