//! Background level, onset line fit and threshold energy.

use crate::numerics::{
    LinearFit, clamp_negative_to_zero, fit_line, nan_mean, powf_each, select_indices,
};
use crate::record::{BackgroundMode, SampleSeries, prefix};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdEstimate {
    pub threshold_energy: f64,
    pub slope: f64,
    pub y_intercept: f64,
    pub background_level: f64,
}

impl ThresholdEstimate {
    /// Legacy all-NaN form used when no fit exists.
    pub const NAN: Self = Self {
        threshold_energy: f64::NAN,
        slope: f64::NAN,
        y_intercept: f64::NAN,
        background_level: f64::NAN,
    };

    pub fn fit(&self) -> LinearFit {
        LinearFit {
            slope: self.slope,
            intercept: self.y_intercept,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ThresholdAnalysis {
    /// Powered yield the fit was made on (background-subtracted when requested).
    pub nayield: Vec<f64>,
    /// Piecewise background/onset curve over every energy, all NaN without a fit.
    pub guideline: Vec<f64>,
    pub estimate: Option<ThresholdEstimate>,
}

impl ThresholdAnalysis {
    fn without_fit(npyield: &[f64]) -> Self {
        Self {
            nayield: npyield.to_vec(),
            guideline: vec![f64::NAN; npyield.len()],
            estimate: None,
        }
    }

    pub fn truncated(&self, len: usize) -> Self {
        Self {
            nayield: prefix(&self.nayield, len),
            guideline: prefix(&self.guideline, len),
            estimate: self.estimate,
        }
    }
}

pub fn estimate_threshold(
    series: &SampleSeries,
    pyield: &[f64],
    npyield: &[f64],
    power_number: f64,
    mode: BackgroundMode,
) -> ThresholdAnalysis {
    let background_indices = series.background_indices();
    let regression_indices = series.regression_indices();
    if background_indices.is_empty() || regression_indices.is_empty() {
        tracing::debug!("no background or regression markers, skipping threshold fit");
        return ThresholdAnalysis::without_fit(npyield);
    }

    let (powered, background_y) = match mode {
        BackgroundMode::SubtractAverage => {
            let offset = nan_mean(&select_indices(pyield, &background_indices));
            let subtracted = clamp_negative_to_zero(pyield.iter().map(|value| value - offset));
            (
                powf_each(&subtracted, power_number),
                vec![0.0; background_indices.len()],
            )
        }
        BackgroundMode::AsMeasured => {
            let powered = powf_each(pyield, power_number);
            let background_y = select_indices(&powered, &background_indices);
            (powered, background_y)
        }
    };

    let regression_x = select_indices(&series.uv_energy, &regression_indices);
    let regression_y = select_indices(&powered, &regression_indices);
    // no minimum-norm line for a rank-deficient fit; fall back to no estimate
    let fit = match fit_line(&regression_x, &regression_y) {
        Ok(fit) => fit,
        Err(error) => {
            tracing::warn!(%error, "threshold fit unavailable");
            return ThresholdAnalysis::without_fit(npyield);
        }
    };

    let background_level = nan_mean(&background_y);
    let estimate = ThresholdEstimate {
        threshold_energy: fit.crossing(background_level),
        slope: fit.slope,
        y_intercept: fit.intercept,
        background_level,
    };
    tracing::debug!(
        threshold_energy = estimate.threshold_energy,
        slope = estimate.slope,
        background_level,
        "estimated photoemission threshold"
    );

    ThresholdAnalysis {
        guideline: guideline(&series.uv_energy, &estimate),
        nayield: powered,
        estimate: Some(estimate),
    }
}

/// Flat at the background level below the threshold, rising with the fitted slope above it.
pub fn guideline(energies: &[f64], estimate: &ThresholdEstimate) -> Vec<f64> {
    let inflection_point = estimate.fit().crossing(estimate.background_level);
    energies
        .iter()
        .map(|&energy| {
            let u = energy - inflection_point;
            let rise = if u > 0.0 { estimate.slope * u } else { 0.0 };
            rise + estimate.background_level
        })
        .collect()
}
